//! Strided views, index resolution and layout classification.
//!
//! This crate holds the addressing half of the strided kernel workspace: how a
//! logical position maps to a physical buffer position. It never touches
//! element values except through the view accessors.
//!
//! # Components
//!
//! - [`index`]: the 1-D index resolver ([`strided_indices`], [`stride_to_offset`])
//!   and the subscript/linear-index conversions ([`sub2ind`], [`ind2sub`],
//!   [`vind2bind`], [`bind2vind`]) with their [`IndexMode`]s
//! - [`auxiliary`]: the layout classifier ([`classify`], [`strides_order`],
//!   [`loop_interchange_order`]) and contiguous stride construction
//! - [`StridedView`] / [`StridedViewMut`]: validated (buffer, shape, strides, offset) tuples
//! - [`StridedArray`]: owned row- or column-major array
//!
//! # Example
//!
//! ```rust
//! use strided_view::{StridedView, classify, Order};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let view = StridedView::new(&data, &[2, 3], &[3, 1], 0).unwrap();
//! assert_eq!(view.get(&[1, 2]), 6.0);
//! assert_eq!(classify(view.strides()), Order::RowMajor);
//!
//! let t = view.transpose_2d().unwrap();
//! assert_eq!(t.dims(), &[3, 2]);
//! assert_eq!(classify(t.strides()), Order::ColumnMajor);
//! ```

pub mod auxiliary;
pub mod index;
pub mod view;

// ============================================================================
// Index resolution
// ============================================================================
pub use index::{
    bind2vind, ind2sub, physical_index, resolve_index, stride_to_offset, strided_indices,
    sub2ind, vind2bind, IndexMode, StridedIndices,
};

// ============================================================================
// Layout classification
// ============================================================================
pub use auxiliary::{
    classify, col_major_strides, index_order, is_column_major, is_row_major,
    loop_interchange_order, row_major_strides, strides_order, LoopOrder, Order, StridesOrder,
};

// ============================================================================
// View types
// ============================================================================
pub use view::{StridedArray, StridedView, StridedViewMut};

pub use strided_traits::StridedFloat;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur while constructing views or converting indices.
///
/// The numeric kernels never produce these for numeric edge cases; they only
/// arise from malformed addressing descriptions.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// A reachable element lies outside the buffer, or offset arithmetic overflowed.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,

    /// An index was outside `[0, max]` under a non-recovering index mode.
    #[error("index {index} out of bounds; must be on the interval [0, {max}]")]
    IndexOutOfBounds { index: isize, max: isize },

    /// A leading dimension or buffer length argument is too small.
    #[error("invalid length: expected at least {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
