//! Strided numeric kernels over raw buffers.
//!
//! Every kernel reads and writes caller-owned slices through `(n, stride,
//! offset)` triples. Strides may be negative (reverse traversal) or zero
//! (every step touches the same element). Kernels never allocate output.
//!
//! # Calling conventions
//!
//! Each 1-D kernel is exported twice:
//!
//! - `name(n, x, stride_x, ...)`: offsets follow the BLAS convention, `0` for
//!   a positive stride and the last visited element for a negative one
//! - `name_ndarray(n, x, stride_x, offset_x, ...)`: explicit offsets
//!
//! Both produce bit-identical results for equivalent (stride, offset) pairs.
//!
//! # Modules
//!
//! - [`strided`]: generic nullary, unary, masked unary and binary loops
//! - [`blas`]: `copy`, `swap`, `scal`, `axpy`, `asum`, `nrm2`, `iamax`, `rev`, `fill`
//! - [`special`]: `abs`, `ramp`, `rsqrt` and their masked variants
//! - [`sum`]: `sum`, `nansum`, `nansum_kbn`, and plain, compensated and pairwise
//!   cumulative sums
//! - [`stats`]: maxima, and the variance / standard deviation / standard error families
//! - [`lapack`]: `ge_trans` and `lacpy` with loop interchange on output strides,
//!   `laswp` row interchanges
//!
//! Multi-dimensional traversal (`map_into`, `copy_into`, `reduce`, ...) is
//! re-exported from `strided-kernel`; addressing helpers and views from
//! `strided-view`.
//!
//! # Degenerate inputs
//!
//! Numeric edge cases are encoded in the return value, never as errors:
//! `n == 0` leaves outputs untouched, sums of nothing are `0.0`, and
//! statistics without enough samples are NaN. Only the leading-dimension
//! checks of the base-form LAPACK helpers return [`StridedError`].
//!
//! # Example
//!
//! ```rust
//! use strided_blas::{blas, stats};
//!
//! let x: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let mut y = [1.0; 5];
//! blas::copy(3, &x, 2, &mut y, 1);
//! assert_eq!(y, [1.0, 3.0, 5.0, 1.0, 1.0]);
//!
//! blas::rev(5, &mut y, 1);
//! assert_eq!(y, [1.0, 1.0, 5.0, 3.0, 1.0]);
//!
//! let var = stats::variance_pn(5, 1.0, &y, 1);
//! assert!((var - 3.2).abs() < 1e-12);
//! ```

pub mod blas;
pub mod lapack;
pub mod special;
pub mod stats;
pub mod strided;
pub mod sum;

// ============================================================================
// Addressing and views
// ============================================================================
pub use strided_view::{
    bind2vind, classify, col_major_strides, ind2sub, is_column_major, is_row_major,
    loop_interchange_order, physical_index, resolve_index, row_major_strides, stride_to_offset,
    strided_indices, strides_order, sub2ind, vind2bind, IndexMode, LoopOrder, Order,
    StridedIndices, StridesOrder,
};
pub use strided_view::{StridedArray, StridedView, StridedViewMut};

// ============================================================================
// N-dimensional traversal
// ============================================================================
pub use strided_kernel::{
    copy_into, fill, fill_with, map_inplace, map_into, reduce, zip_map2_into,
};

// ============================================================================
// Element types and errors
// ============================================================================
pub use strided_traits::StridedFloat;
pub use strided_view::{Result, StridedError};

pub use lapack::Uplo;
pub use stats::{MeanStdev, Moments};
