//! BLAS level-1 routines and their extensions over strided buffers.
//!
//! Every routine has a base form deriving offsets from the strides and an
//! `_ndarray` form with explicit offsets. Mutating routines return the output
//! buffer so calls can be chained.

use crate::strided::{nullary_ndarray, unary_inplace_ndarray, unary_ndarray};
use crate::{stride_to_offset, strided_indices, StridedFloat};

/// Copy `n` elements from `x` into `y`, explicit offsets.
///
/// ```rust
/// use strided_blas::blas::copy_ndarray;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let mut y = [1.0; 5];
/// copy_ndarray(3, &x, 2, 0, &mut y, 1, 0);
/// assert_eq!(y, [1.0, 3.0, 5.0, 1.0, 1.0]);
/// ```
pub fn copy_ndarray<'y, T: Copy>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    if n > 0 && stride_x == 1 && stride_y == 1 {
        y[offset_y..offset_y + n].copy_from_slice(&x[offset_x..offset_x + n]);
        return y;
    }
    unary_ndarray(n, x, stride_x, offset_x, y, stride_y, offset_y, |v| v)
}

/// Copy `n` elements from `x` into `y`.
pub fn copy<'y, T: Copy>(n: usize, x: &[T], stride_x: isize, y: &'y mut [T], stride_y: isize) -> &'y mut [T] {
    copy_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// Exchange `n` elements of `x` and `y`, explicit offsets. Returns `y`.
pub fn swap_ndarray<'y, T: Copy>(
    n: usize,
    x: &mut [T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        std::mem::swap(&mut x[ix], &mut y[iy]);
    }
    y
}

/// Exchange `n` elements of `x` and `y`. Returns `y`.
pub fn swap<'y, T: Copy>(n: usize, x: &mut [T], stride_x: isize, y: &'y mut [T], stride_y: isize) -> &'y mut [T] {
    swap_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// `x = alpha * x`, explicit offset. `alpha == 1` leaves `x` untouched.
pub fn scal_ndarray<T: StridedFloat>(n: usize, alpha: T, x: &mut [T], stride_x: isize, offset_x: usize) -> &mut [T] {
    if alpha == T::one() {
        return x;
    }
    unary_inplace_ndarray(n, x, stride_x, offset_x, |v| alpha * v)
}

/// `x = alpha * x`.
pub fn scal<T: StridedFloat>(n: usize, alpha: T, x: &mut [T], stride_x: isize) -> &mut [T] {
    scal_ndarray(n, alpha, x, stride_x, stride_to_offset(n, stride_x))
}

/// `y = alpha * x + y`, explicit offsets. `alpha == 0` leaves `y` untouched.
#[allow(clippy::too_many_arguments)]
pub fn axpy_ndarray<'y, T: StridedFloat>(
    n: usize,
    alpha: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    if alpha == T::zero() {
        return y;
    }
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        y[iy] = alpha * x[ix] + y[iy];
    }
    y
}

/// `y = alpha * x + y`.
pub fn axpy<'y, T: StridedFloat>(
    n: usize,
    alpha: T,
    x: &[T],
    stride_x: isize,
    y: &'y mut [T],
    stride_y: isize,
) -> &'y mut [T] {
    axpy_ndarray(
        n,
        alpha,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// Sum of absolute values, explicit offset. Accumulates in `T`.
pub fn asum_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    strided_indices(n, stride_x, offset_x).fold(T::zero(), |acc, ix| acc + x[ix].abs())
}

/// Sum of absolute values.
pub fn asum<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    asum_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Euclidean norm, explicit offset.
///
/// Scales by the running largest magnitude so that neither overflow nor
/// underflow occurs for representable results. NaN propagates.
pub fn nrm2_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    if n == 0 {
        return T::zero();
    }
    if n == 1 {
        return x[offset_x].abs();
    }
    let mut scale = T::zero();
    let mut ssq = T::one();
    for ix in strided_indices(n, stride_x, offset_x) {
        let v = x[ix];
        if v.is_nan() {
            return v;
        }
        if v.is_zero() {
            continue;
        }
        let a = v.abs();
        if scale < a {
            let r = scale / a;
            ssq = T::one() + ssq * r * r;
            scale = a;
        } else {
            let r = a / scale;
            ssq = ssq + r * r;
        }
    }
    scale * ssq.sqrt()
}

/// Euclidean norm.
pub fn nrm2<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    nrm2_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Logical index of the first element with the largest magnitude, explicit offset.
///
/// `None` when `n == 0`. NaN never compares larger, so it is only selected
/// when it comes first.
pub fn iamax_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> Option<usize> {
    let mut it = strided_indices(n, stride_x, offset_x).enumerate();
    let (_, first) = it.next()?;
    let mut best = 0;
    let mut max = x[first].abs();
    for (k, ix) in it {
        let a = x[ix].abs();
        if a > max {
            best = k;
            max = a;
        }
    }
    Some(best)
}

/// Logical index of the first element with the largest magnitude.
pub fn iamax<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> Option<usize> {
    iamax_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Reverse `n` elements of `x` in place, explicit offset.
///
/// Swaps from both ends inward, so odd and even lengths need no scratch.
///
/// ```rust
/// use strided_blas::blas::rev_ndarray;
///
/// let mut x = [1.0, 0.0, 2.0, 0.0, 3.0];
/// rev_ndarray(3, &mut x, 2, 0);
/// assert_eq!(x, [3.0, 0.0, 2.0, 0.0, 1.0]);
/// ```
pub fn rev_ndarray<T: Copy>(n: usize, x: &mut [T], stride_x: isize, offset_x: usize) -> &mut [T] {
    if n < 2 {
        return x;
    }
    if stride_x == 1 {
        x[offset_x..offset_x + n].reverse();
        return x;
    }
    let mut it = strided_indices(n, stride_x, offset_x);
    while let (Some(lo), Some(hi)) = (it.next(), it.next_back()) {
        x.swap(lo, hi);
    }
    x
}

/// Reverse `n` elements of `x` in place.
pub fn rev<T: Copy>(n: usize, x: &mut [T], stride_x: isize) -> &mut [T] {
    rev_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Set `n` elements of `x` to `alpha`, explicit offset.
pub fn fill_ndarray<T: Copy>(n: usize, alpha: T, x: &mut [T], stride_x: isize, offset_x: usize) -> &mut [T] {
    nullary_ndarray(n, x, stride_x, offset_x, || alpha)
}

/// Set `n` elements of `x` to `alpha`.
pub fn fill<T: Copy>(n: usize, alpha: T, x: &mut [T], stride_x: isize) -> &mut [T] {
    fill_ndarray(n, alpha, x, stride_x, stride_to_offset(n, stride_x))
}
