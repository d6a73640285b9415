//! Maximum reductions, plain and NaN-aware, with optional exclusion masks.
//!
//! These kernels compare in the element type. `+0.0` wins a tie against
//! `-0.0`. When no element qualifies the result is NaN.

use crate::{stride_to_offset, strided_indices, StridedFloat};

#[inline(always)]
fn exceeds<T: StridedFloat>(v: T, max: T) -> bool {
    v > max || (v == max && v.is_zero() && v.is_sign_positive())
}

/// Running maximum over candidate values; NaN either poisons or is skipped.
fn running_max<T: StridedFloat>(values: impl Iterator<Item = T>, skip_nan: bool) -> T {
    let mut max: Option<T> = None;
    for v in values {
        if v.is_nan() {
            if skip_nan {
                continue;
            }
            return v;
        }
        max = match max {
            Some(m) if !exceeds(v, m) => Some(m),
            _ => Some(v),
        };
    }
    max.unwrap_or_else(T::nan)
}

fn unmasked<'a, T: Copy>(
    n: usize,
    x: &'a [T],
    stride_x: isize,
    offset_x: usize,
    mask: &'a [u8],
    stride_mask: isize,
    offset_mask: usize,
) -> impl Iterator<Item = T> + 'a {
    strided_indices(n, stride_x, offset_x)
        .zip(strided_indices(n, stride_mask, offset_mask))
        .filter(move |&(_, im)| mask[im] == 0)
        .map(move |(ix, _)| x[ix])
}

/// Maximum value, explicit offset. A NaN element makes the result NaN.
pub fn max_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    running_max(strided_indices(n, stride_x, offset_x).map(|ix| x[ix]), false)
}

/// Maximum value. A NaN element makes the result NaN.
pub fn max<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    max_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Maximum value ignoring NaN, explicit offset.
pub fn nanmax_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    running_max(strided_indices(n, stride_x, offset_x).map(|ix| x[ix]), true)
}

/// Maximum value ignoring NaN.
pub fn nanmax<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    nanmax_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Maximum over elements whose mask byte is zero, explicit offsets.
pub fn mskmax_ndarray<T: StridedFloat>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    mask: &[u8],
    stride_mask: isize,
    offset_mask: usize,
) -> T {
    running_max(
        unmasked(n, x, stride_x, offset_x, mask, stride_mask, offset_mask),
        false,
    )
}

/// Maximum over elements whose mask byte is zero.
pub fn mskmax<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, mask: &[u8], stride_mask: isize) -> T {
    mskmax_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        mask,
        stride_mask,
        stride_to_offset(n, stride_mask),
    )
}

/// Maximum over unmasked, non-NaN elements, explicit offsets.
///
/// ```rust
/// use strided_blas::stats::nanmskmax_ndarray;
///
/// let x = [1.0, -2.0, -4.0, f64::NAN, 5.0, 0.0, 3.0];
/// let mask = [0, 0, 0, 1, 0, 0, 0];
/// assert_eq!(nanmskmax_ndarray(7, &x, 1, 0, &mask, 1, 0), 5.0);
/// ```
pub fn nanmskmax_ndarray<T: StridedFloat>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    mask: &[u8],
    stride_mask: isize,
    offset_mask: usize,
) -> T {
    running_max(
        unmasked(n, x, stride_x, offset_x, mask, stride_mask, offset_mask),
        true,
    )
}

/// Maximum over unmasked, non-NaN elements.
pub fn nanmskmax<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, mask: &[u8], stride_mask: isize) -> T {
    nanmskmax_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        mask,
        stride_mask,
        stride_to_offset(n, stride_mask),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_strided() {
        let x = [1.0f64, 9.0, -3.0, 12.0, 4.0];
        assert_eq!(max(5, &x, 1), 12.0);
        assert_eq!(max(3, &x, 2), 4.0);
        assert_eq!(max_ndarray(2, &x, 2, 1), 12.0);
        assert!(max::<f64>(0, &[], 1).is_nan());
    }

    #[test]
    fn test_max_nan_poisons() {
        let x = [1.0f32, f32::NAN, 3.0];
        assert!(max(3, &x, 1).is_nan());
        assert_eq!(nanmax(3, &x, 1), 3.0);
    }

    #[test]
    fn test_nanmax_all_nan_is_nan() {
        let x = [f64::NAN; 3];
        assert!(nanmax(3, &x, 1).is_nan());
    }

    #[test]
    fn test_positive_zero_wins_tie() {
        let x = [-0.0f64, 0.0, -0.0];
        let m = max(3, &x, 1);
        assert_eq!(m, 0.0);
        assert!(m.is_sign_positive());
    }

    #[test]
    fn test_mskmax() {
        let x = [1.0f64, 7.0, f64::NAN, 3.0];
        let mask = [0u8, 1, 0, 0];
        assert!(mskmax(4, &x, 1, &mask, 1).is_nan());
        let mask = [0u8, 1, 1, 0];
        assert_eq!(mskmax(4, &x, 1, &mask, 1), 3.0);
    }

    #[test]
    fn test_nanmskmax_no_valid_element() {
        let x = [f64::NAN, 2.0, f64::NAN];
        let mask = [0u8, 1, 0];
        assert!(nanmskmax(3, &x, 1, &mask, 1).is_nan());
        let all_masked = [1u8; 3];
        assert!(nanmskmax(3, &x, 1, &all_masked, 1).is_nan());
    }

    #[test]
    fn test_nanmskmax_reversed() {
        let x = [1.0f32, -2.0, -4.0, f32::NAN, 5.0, 0.0, 3.0];
        let mask = [0u8, 0, 0, 1, 0, 0, 0];
        assert_eq!(nanmskmax(7, &x, -1, &mask, -1), 5.0);
        let mask = [0u8, 0, 0, 0, 1, 0, 0];
        assert_eq!(nanmskmax(7, &x, 1, &mask, 1), 3.0);
    }
}
