//! Shared traits for the strided kernel workspace.
//!
//! This crate provides the element-type bound shared by `strided-view`,
//! `strided-kernel` and `strided-blas`. Every numeric kernel is generic over
//! [`StridedFloat`], which is implemented for `f64` and `f32` so that the
//! double- and single-precision families share one implementation.

pub mod scalar;

pub use scalar::StridedFloat;
