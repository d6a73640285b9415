//! Cache-blocked N-dimensional traversal engine for strided views.
//!
//! Every operation in this crate runs the same pipeline before touching data:
//!
//! 1. **order**: rank dimensions by stride magnitude (output weighted 2x) so
//!    the smallest-stride dimension becomes the innermost loop
//! 2. **fuse**: merge neighbouring dimensions that are contiguous in every
//!    operand, then drop singletons
//! 3. **block**: tile the iteration space so one tile of every operand fits
//!    in [`BLOCK_MEMORY_SIZE`]
//! 4. **kernel**: walk the tiles with per-dimension jump deltas; the inner
//!    callback receives a run of elements along the innermost dimension
//!
//! Operands whose layouts are identical and contiguous skip the pipeline and
//! run as a flat slice loop.
//!
//! # Operations
//!
//! - [`map_into`], [`map_inplace`]: unary element-wise apply
//! - [`zip_map2_into`]: binary element-wise apply
//! - [`fill`], [`fill_with`]: nullary apply
//! - [`copy_into`]: assignment between views of any layout
//! - [`reduce`]: full reduction with a map function
//!
//! # Example
//!
//! ```rust
//! use strided_kernel::{map_into, StridedArray, StridedView};
//!
//! let src = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! // Row-major 2x3 source, read through its transpose.
//! let a = StridedView::new(&src, &[2, 3], &[3, 1], 0).unwrap();
//! let at = a.transpose_2d().unwrap();
//!
//! let mut out = StridedArray::<f64>::row_major(&[3, 2]);
//! map_into(&mut out.view_mut(), &at, |x| x * 10.0).unwrap();
//! assert_eq!(out.data(), &[10.0, 40.0, 20.0, 50.0, 30.0, 60.0]);
//! ```

mod block;
mod fuse;
mod kernel;
mod map_view;
mod order;
mod reduce_view;
mod simd;

pub use map_view::{copy_into, fill, fill_with, map_inplace, map_into, zip_map2_into};
pub use reduce_view::reduce;

pub use strided_view::{
    col_major_strides, row_major_strides, Result, StridedArray, StridedError, StridedView,
    StridedViewMut,
};

// ============================================================================
// Constants
// ============================================================================

/// Block memory size for cache-optimized iteration (L1 cache target).
///
/// Operations are blocked into tiles that fit within this size to maximize cache hits.
pub const BLOCK_MEMORY_SIZE: usize = 32 * 1024;

/// Cache line size in bytes.
///
/// Used for memory region calculations in block size computation.
pub const CACHE_LINE_SIZE: usize = 64;
