//! Variance, standard deviation and standard error of the mean.
//!
//! Four accumulation algorithms share one set of degenerate-input rules:
//!
//! | algorithm | pass count | centre                      |
//! |-----------|------------|-----------------------------|
//! | `pn`      | two        | computed mean, corrected    |
//! | `mtk`     | one        | caller-supplied mean        |
//! | `ch`      | one        | first element as trial mean |
//! | `wd`      | one        | Welford running mean        |
//!
//! With `dof = n - correction`: `n == 0` or `dof <= 0` gives NaN, and a single
//! sample (or a zero stride) gives `0.0`. Accumulation is always in `f64`; the
//! result is rounded to `T` once. Standard deviation and standard error are
//! derived from the same `f64` variance so all three round consistently.

use crate::{stride_to_offset, strided_indices, StridedFloat};

/// Mean and variance computed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments<T> {
    pub mean: T,
    pub variance: T,
}

/// Mean and standard deviation computed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStdev<T> {
    pub mean: T,
    pub stdev: T,
}

/// Result for degenerate inputs, or `None` when accumulation is needed.
#[inline]
fn degenerate(n: usize, correction: f64, stride_x: isize) -> Option<f64> {
    let dof = n as f64 - correction;
    if n == 0 || dof <= 0.0 {
        return Some(f64::NAN);
    }
    if n == 1 || stride_x == 0 {
        return Some(0.0);
    }
    None
}

/// `(Σd² - (Σd)²/n) / dof` with `d = x - centre`.
///
/// Cancellation can push the difference a few ulps below zero when the data
/// have no spread; the result is clamped at `0.0` so that square roots stay
/// defined. NaN input still yields NaN.
#[inline]
fn corrected_sum_of_squares<T: StridedFloat>(
    n: usize,
    correction: f64,
    centre: f64,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> f64 {
    let (m2, m) = strided_indices(n, stride_x, offset_x).fold((0.0f64, 0.0f64), |(m2, m), ix| {
        let d = x[ix].to_accum() - centre;
        (m2 + d * d, m + d)
    });
    let nf = n as f64;
    let variance = (m2 - m * m / nf) / (nf - correction);
    if variance < 0.0 {
        0.0
    } else {
        variance
    }
}

fn mean_variance_pn_accum<T: StridedFloat>(
    n: usize,
    correction: f64,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> (f64, f64) {
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let dof = n as f64 - correction;
    if n == 1 || stride_x == 0 {
        let only = x[offset_x].to_accum();
        return (only, if dof <= 0.0 { f64::NAN } else { 0.0 });
    }
    tracing::trace!(dtype = T::NAME, n, stride_x, "two-pass moments");
    let mean = strided_indices(n, stride_x, offset_x).fold(0.0f64, |acc, ix| acc + x[ix].to_accum())
        / n as f64;
    if dof <= 0.0 {
        return (mean, f64::NAN);
    }
    (mean, corrected_sum_of_squares(n, correction, mean, x, stride_x, offset_x))
}

fn variance_pn_accum<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> f64 {
    if let Some(v) = degenerate(n, correction, stride_x) {
        return v;
    }
    mean_variance_pn_accum(n, correction, x, stride_x, offset_x).1
}

fn variance_ch_accum<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> f64 {
    if let Some(v) = degenerate(n, correction, stride_x) {
        return v;
    }
    tracing::trace!(dtype = T::NAME, n, stride_x, "trial-mean variance");
    let trial = x[offset_x].to_accum();
    corrected_sum_of_squares(n, correction, trial, x, stride_x, offset_x)
}

fn variance_wd_accum<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> f64 {
    if let Some(v) = degenerate(n, correction, stride_x) {
        return v;
    }
    tracing::trace!(dtype = T::NAME, n, stride_x, "welford variance");
    let mut mu = 0.0f64;
    let mut m2 = 0.0f64;
    for (k, ix) in strided_indices(n, stride_x, offset_x).enumerate() {
        let v = x[ix].to_accum();
        let delta = v - mu;
        mu += delta / (k + 1) as f64;
        m2 += delta * (v - mu);
    }
    m2 / (n as f64 - correction)
}

fn variance_mtk_accum<T: StridedFloat>(
    n: usize,
    correction: f64,
    mean: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> f64 {
    if let Some(v) = degenerate(n, correction, stride_x) {
        return v;
    }
    tracing::trace!(dtype = T::NAME, n, stride_x, "known-mean variance");
    corrected_sum_of_squares(n, correction, mean.to_accum(), x, stride_x, offset_x)
}

#[inline]
fn sem_from_variance(n: usize, variance: f64) -> f64 {
    (variance / n as f64).sqrt()
}

/// Mean and variance with the corrected two-pass algorithm, explicit offset.
///
/// The mean is defined whenever `n > 0`, even when `dof <= 0` makes the
/// variance NaN.
pub fn mean_variance_pn_ndarray<T: StridedFloat>(
    n: usize,
    correction: f64,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> Moments<T> {
    let (mean, variance) = mean_variance_pn_accum(n, correction, x, stride_x, offset_x);
    Moments {
        mean: T::from_accum(mean),
        variance: T::from_accum(variance),
    }
}

/// Mean and variance with the corrected two-pass algorithm.
pub fn mean_variance_pn<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize) -> Moments<T> {
    mean_variance_pn_ndarray(n, correction, x, stride_x, stride_to_offset(n, stride_x))
}

/// Mean and standard deviation with the corrected two-pass algorithm, explicit offset.
///
/// The standard deviation is the square root of the `f64` variance taken
/// before rounding, so it matches [`stdev_pn_ndarray`] bit for bit.
pub fn mean_stdev_pn_ndarray<T: StridedFloat>(
    n: usize,
    correction: f64,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> MeanStdev<T> {
    let (mean, variance) = mean_variance_pn_accum(n, correction, x, stride_x, offset_x);
    MeanStdev {
        mean: T::from_accum(mean),
        stdev: T::from_accum(variance.sqrt()),
    }
}

/// Mean and standard deviation with the corrected two-pass algorithm.
pub fn mean_stdev_pn<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize) -> MeanStdev<T> {
    mean_stdev_pn_ndarray(n, correction, x, stride_x, stride_to_offset(n, stride_x))
}

macro_rules! dispersion_family {
    (
        $accum:ident;
        $(#[$vdoc:meta])* $var:ident, $var_nd:ident;
        $(#[$sdoc:meta])* $std:ident, $std_nd:ident;
        $(#[$edoc:meta])* $sem:ident, $sem_nd:ident
    ) => {
        $(#[$vdoc])*
        pub fn $var_nd<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> T {
            T::from_accum($accum(n, correction, x, stride_x, offset_x))
        }

        $(#[$vdoc])*
        pub fn $var<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize) -> T {
            $var_nd(n, correction, x, stride_x, stride_to_offset(n, stride_x))
        }

        $(#[$sdoc])*
        pub fn $std_nd<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> T {
            T::from_accum($accum(n, correction, x, stride_x, offset_x).sqrt())
        }

        $(#[$sdoc])*
        pub fn $std<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize) -> T {
            $std_nd(n, correction, x, stride_x, stride_to_offset(n, stride_x))
        }

        $(#[$edoc])*
        pub fn $sem_nd<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize, offset_x: usize) -> T {
            T::from_accum(sem_from_variance(n, $accum(n, correction, x, stride_x, offset_x)))
        }

        $(#[$edoc])*
        pub fn $sem<T: StridedFloat>(n: usize, correction: f64, x: &[T], stride_x: isize) -> T {
            $sem_nd(n, correction, x, stride_x, stride_to_offset(n, stride_x))
        }
    };
}

dispersion_family!(
    variance_pn_accum;
    /// Variance using a corrected two-pass algorithm.
    variance_pn, variance_pn_ndarray;
    /// Standard deviation using a corrected two-pass algorithm.
    stdev_pn, stdev_pn_ndarray;
    /// Standard error of the mean using a corrected two-pass algorithm.
    sem_pn, sem_pn_ndarray
);

dispersion_family!(
    variance_ch_accum;
    /// Variance using a one-pass trial mean algorithm.
    variance_ch, variance_ch_ndarray;
    /// Standard deviation using a one-pass trial mean algorithm.
    stdev_ch, stdev_ch_ndarray;
    /// Standard error of the mean using a one-pass trial mean algorithm.
    sem_ch, sem_ch_ndarray
);

dispersion_family!(
    variance_wd_accum;
    /// Variance using Welford's algorithm.
    variance_wd, variance_wd_ndarray;
    /// Standard deviation using Welford's algorithm.
    stdev_wd, stdev_wd_ndarray;
    /// Standard error of the mean using Welford's algorithm.
    sem_wd, sem_wd_ndarray
);

/// Variance from a known mean (one-pass textbook algorithm), explicit offset.
pub fn variance_mtk_ndarray<T: StridedFloat>(
    n: usize,
    correction: f64,
    mean: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> T {
    T::from_accum(variance_mtk_accum(n, correction, mean, x, stride_x, offset_x))
}

/// Variance from a known mean (one-pass textbook algorithm).
pub fn variance_mtk<T: StridedFloat>(n: usize, correction: f64, mean: T, x: &[T], stride_x: isize) -> T {
    variance_mtk_ndarray(n, correction, mean, x, stride_x, stride_to_offset(n, stride_x))
}

/// Standard deviation from a known mean, explicit offset.
pub fn stdev_mtk_ndarray<T: StridedFloat>(
    n: usize,
    correction: f64,
    mean: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> T {
    T::from_accum(variance_mtk_accum(n, correction, mean, x, stride_x, offset_x).sqrt())
}

/// Standard deviation from a known mean.
pub fn stdev_mtk<T: StridedFloat>(n: usize, correction: f64, mean: T, x: &[T], stride_x: isize) -> T {
    stdev_mtk_ndarray(n, correction, mean, x, stride_x, stride_to_offset(n, stride_x))
}

/// Standard error of the mean from a known mean, explicit offset.
pub fn sem_mtk_ndarray<T: StridedFloat>(
    n: usize,
    correction: f64,
    mean: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
) -> T {
    let variance = variance_mtk_accum(n, correction, mean, x, stride_x, offset_x);
    T::from_accum(sem_from_variance(n, variance))
}

/// Standard error of the mean from a known mean.
pub fn sem_mtk<T: StridedFloat>(n: usize, correction: f64, mean: T, x: &[T], stride_x: isize) -> T {
    sem_mtk_ndarray(n, correction, mean, x, stride_x, stride_to_offset(n, stride_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const X: [f64; 4] = [1.0, -2.0, 4.0, 2.0];

    #[test]
    fn test_sample_variance_all_algorithms() {
        // mean 1.25, Σd² = 18.75
        let expected = 18.75 / 3.0;
        assert_relative_eq!(variance_pn(4, 1.0, &X, 1), expected, epsilon = 1e-12);
        assert_relative_eq!(variance_ch(4, 1.0, &X, 1), expected, epsilon = 1e-12);
        assert_relative_eq!(variance_wd(4, 1.0, &X, 1), expected, epsilon = 1e-12);
        assert_relative_eq!(variance_mtk(4, 1.0, 1.25, &X, 1), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_population_variance() {
        assert_relative_eq!(variance_pn(4, 0.0, &X, 1), 18.75 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(variance_wd(4, 0.0, &X, -1), 18.75 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degrees_of_freedom_boundary() {
        assert!(variance_pn(4, 4.0, &X, 1).is_nan());
        assert!(variance_ch(4, 5.0, &X, 1).is_nan());
        assert!(stdev_wd(4, 4.0, &X, 1).is_nan());
        assert!(sem_mtk(4, 4.0, 1.25, &X, 1).is_nan());
        assert!(variance_pn::<f64>(0, 0.0, &[], 1).is_nan());
    }

    #[test]
    fn test_single_sample_and_zero_stride() {
        assert_eq!(variance_pn(1, 0.0, &X, 1), 0.0);
        assert!(variance_pn(1, 1.0, &X, 1).is_nan());
        assert_eq!(variance_wd_ndarray(4, 1.0, &X, 0, 2), 0.0);
    }

    #[test]
    fn test_stdev_and_sem_derive_from_variance() {
        let var = 18.75f64 / 3.0;
        assert_relative_eq!(stdev_pn(4, 1.0, &X, 1), var.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(sem_pn(4, 1.0, &X, 1), (var / 4.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(sem_ch(4, 1.0, &X, 1), (var / 4.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stdev_mtk(4, 1.0, 1.25, &X, 1), var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_float32_accumulates_wide() {
        let x: Vec<f32> = X.iter().map(|&v| v as f32).collect();
        let s = stdev_pn(4, 1.0, &x, 1);
        assert_eq!(s, ((18.75f64 / 3.0).sqrt()) as f32);
    }

    #[test]
    fn test_strided_ndarray_offset() {
        let x = [0.0f64, 1.0, 0.0, -2.0, 0.0, 4.0, 0.0, 2.0];
        assert_relative_eq!(variance_pn_ndarray(4, 1.0, &x, 2, 1), 18.75 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_variance_pn() {
        let m = mean_variance_pn(4, 1.0, &X, 1);
        assert_relative_eq!(m.mean, 1.25);
        assert_relative_eq!(m.variance, 18.75 / 3.0, epsilon = 1e-12);

        let m = mean_variance_pn(4, 4.0, &X, 1);
        assert_relative_eq!(m.mean, 1.25);
        assert!(m.variance.is_nan());

        let m = mean_variance_pn::<f32>(0, 0.0, &[], 1);
        assert!(m.mean.is_nan() && m.variance.is_nan());
    }

    #[test]
    fn test_mean_stdev_pn() {
        let m = mean_stdev_pn(4, 1.0, &X, 1);
        assert_eq!(m.mean, 1.25);
        assert_eq!(m.stdev, 2.5);
        assert_eq!(m.stdev, stdev_pn(4, 1.0, &X, 1));

        let x = [0.0f64, 1.0, 0.0, -2.0, 0.0, 4.0, 0.0, 2.0];
        let m = mean_stdev_pn_ndarray(4, 1.0, &x, -2, 7);
        assert_relative_eq!(m.mean, 1.25);
        assert_relative_eq!(m.stdev, 2.5, epsilon = 1e-12);

        let m = mean_stdev_pn(4, 4.0, &X, 1);
        assert_eq!(m.mean, 1.25);
        assert!(m.stdev.is_nan());

        let xf: Vec<f32> = X.iter().map(|&v| v as f32).collect();
        let m = mean_stdev_pn(4, 1.0, &xf, 1);
        assert_eq!(m.mean, 1.25f32);
        assert_eq!(m.stdev, 2.5f32);
    }

    #[test]
    fn test_known_mean_constant_input_is_non_negative() {
        let x = [0.2123456789f64; 3];
        let mean = x[0] * 1.0000001;
        assert!(variance_mtk(3, 0.0, mean, &x, 1) >= 0.0);
        assert!(!stdev_mtk(3, 0.0, mean, &x, 1).is_nan());
        assert!(!sem_mtk(3, 0.0, mean, &x, 1).is_nan());

        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..2000 {
            let c: f64 = rng.gen_range(-1e3..1e3);
            let n = rng.gen_range(2..16usize);
            let x = vec![c; n];
            let mean = c * (1.0 + rng.gen_range(-1e-6..1e-6));
            for correction in [0.0, 1.0] {
                assert!(variance_mtk(n, correction, mean, &x, 1) >= 0.0);
                assert!(stdev_mtk(n, correction, mean, &x, 1) >= 0.0);
                assert!(sem_mtk(n, correction, mean, &x, 1) >= 0.0);
                assert!(stdev_pn(n, correction, &x, 1) >= 0.0);
                assert!(stdev_ch(n, correction, &x, 1) >= 0.0);
            }
        }
    }

    #[test]
    fn test_nan_input_still_propagates() {
        let x = [1.0f64, f64::NAN, 2.0];
        assert!(variance_mtk(3, 1.0, 1.5, &x, 1).is_nan());
        assert!(variance_pn(3, 1.0, &x, 1).is_nan());
        assert!(stdev_ch(3, 1.0, &x, 1).is_nan());
    }
}
