//! Scalar type bounds for strided kernels.

use std::fmt::Debug;

/// IEEE-754 element type of a strided numeric kernel.
///
/// Implemented for `f64` and `f32`. The statistics kernels accumulate in
/// `f64` regardless of the element type and round once on return, so the
/// conversions here are the only place precision changes.
pub trait StridedFloat: num_traits::Float + Send + Sync + Debug + Default + 'static {
    /// Short dtype name, recorded as the `dtype` field of kernel trace events.
    const NAME: &'static str;

    /// Widen to the `f64` accumulator.
    fn to_accum(self) -> f64;

    /// Round an `f64` accumulator back to the element type.
    fn from_accum(value: f64) -> Self;
}

impl StridedFloat for f64 {
    const NAME: &'static str = "float64";

    #[inline(always)]
    fn to_accum(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_accum(value: f64) -> Self {
        value
    }
}

impl StridedFloat for f32 {
    const NAME: &'static str = "float32";

    #[inline(always)]
    fn to_accum(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn from_accum(value: f64) -> Self {
        value as f32
    }
}
