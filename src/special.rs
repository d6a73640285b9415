//! Special functions applied element-wise over strided buffers.
//!
//! Plain and masked variants of absolute value, ramp and reciprocal square
//! root. The masked variants skip positions whose mask byte is nonzero.

use crate::strided::{mskunary_ndarray, unary_ndarray};
use crate::{stride_to_offset, StridedFloat};

/// Absolute value.
#[inline]
pub fn abs_scalar<T: StridedFloat>(x: T) -> T {
    x.abs()
}

/// Ramp function: `x` when positive, otherwise zero. NaN propagates.
#[inline]
pub fn ramp_scalar<T: StridedFloat>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    if x > T::zero() {
        x
    } else {
        T::zero()
    }
}

/// Reciprocal square root, `1 / sqrt(x)`.
#[inline]
pub fn rsqrt_scalar<T: StridedFloat>(x: T) -> T {
    x.sqrt().recip()
}

macro_rules! strided_map {
    ($(#[$doc:meta])* $name:ident, $ndarray:ident, $f:expr) => {
        $(#[$doc])*
        pub fn $ndarray<'y, T: StridedFloat>(
            n: usize,
            x: &[T],
            stride_x: isize,
            offset_x: usize,
            y: &'y mut [T],
            stride_y: isize,
            offset_y: usize,
        ) -> &'y mut [T] {
            unary_ndarray(n, x, stride_x, offset_x, y, stride_y, offset_y, $f)
        }

        $(#[$doc])*
        pub fn $name<'y, T: StridedFloat>(
            n: usize,
            x: &[T],
            stride_x: isize,
            y: &'y mut [T],
            stride_y: isize,
        ) -> &'y mut [T] {
            $ndarray(
                n,
                x,
                stride_x,
                stride_to_offset(n, stride_x),
                y,
                stride_y,
                stride_to_offset(n, stride_y),
            )
        }
    };
}

macro_rules! strided_mask_map {
    ($(#[$doc:meta])* $name:ident, $ndarray:ident, $f:expr) => {
        $(#[$doc])*
        #[allow(clippy::too_many_arguments)]
        pub fn $ndarray<'y, T: StridedFloat>(
            n: usize,
            x: &[T],
            stride_x: isize,
            offset_x: usize,
            mask: &[u8],
            stride_mask: isize,
            offset_mask: usize,
            y: &'y mut [T],
            stride_y: isize,
            offset_y: usize,
        ) -> &'y mut [T] {
            mskunary_ndarray(
                n, x, stride_x, offset_x, mask, stride_mask, offset_mask, y, stride_y, offset_y, $f,
            )
        }

        $(#[$doc])*
        #[allow(clippy::too_many_arguments)]
        pub fn $name<'y, T: StridedFloat>(
            n: usize,
            x: &[T],
            stride_x: isize,
            mask: &[u8],
            stride_mask: isize,
            y: &'y mut [T],
            stride_y: isize,
        ) -> &'y mut [T] {
            $ndarray(
                n,
                x,
                stride_x,
                stride_to_offset(n, stride_x),
                mask,
                stride_mask,
                stride_to_offset(n, stride_mask),
                y,
                stride_y,
                stride_to_offset(n, stride_y),
            )
        }
    };
}

strided_map!(
    /// Absolute value of each element.
    abs, abs_ndarray, abs_scalar
);
strided_map!(
    /// Ramp function of each element.
    ramp, ramp_ndarray, ramp_scalar
);
strided_map!(
    /// Reciprocal square root of each element.
    rsqrt, rsqrt_ndarray, rsqrt_scalar
);

strided_mask_map!(
    /// Absolute value of each unmasked element.
    mskabs, mskabs_ndarray, abs_scalar
);
strided_mask_map!(
    /// Ramp function of each unmasked element.
    mskramp, mskramp_ndarray, ramp_scalar
);
strided_mask_map!(
    /// Reciprocal square root of each unmasked element.
    mskrsqrt, mskrsqrt_ndarray, rsqrt_scalar
);
