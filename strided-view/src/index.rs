//! Index resolution: logical positions to physical buffer positions.
//!
//! The 1-D resolver maps logical index `i` of an `n`-element traversal to
//! `offset + i * stride`. The N-D helpers convert between subscripts, view
//! linear indices and buffer linear indices for a (shape, strides, offset)
//! description, with an [`IndexMode`] deciding what happens to indices that
//! fall outside the array.

use std::iter::FusedIterator;

use crate::auxiliary::Order;
use crate::{Result, StridedError};

// ============================================================================
// 1-D resolver
// ============================================================================

/// Starting offset for an `n`-element traversal with the given stride.
///
/// Follows the BLAS convention: a non-negative stride starts at index `0`, a
/// negative stride starts at the last visited element, `(1 - n) * stride`.
///
/// ```rust
/// use strided_view::stride_to_offset;
///
/// assert_eq!(stride_to_offset(5, 2), 0);
/// assert_eq!(stride_to_offset(5, -2), 8);
/// assert_eq!(stride_to_offset(0, -2), 0);
/// ```
#[inline]
pub fn stride_to_offset(n: usize, stride: isize) -> usize {
    if stride >= 0 || n == 0 {
        return 0;
    }
    (n - 1) * stride.unsigned_abs()
}

/// Physical position of logical index `i`: `offset + i * stride`.
///
/// No bounds checking is performed; a negative result means the caller chose
/// an inconsistent (stride, offset) pair.
#[inline(always)]
pub fn physical_index(i: usize, stride: isize, offset: usize) -> isize {
    offset as isize + (i as isize) * stride
}

/// Iterator over the physical positions of a 1-D strided traversal.
///
/// Positions are produced incrementally (`ix += stride`), so the hot loop of
/// a kernel never multiplies. Zero strides yield `offset` `n` times.
#[derive(Debug, Clone)]
pub struct StridedIndices {
    next: isize,
    stride: isize,
    remaining: usize,
}

/// Physical positions `{offset + i*stride : i in [0, n)}`, in logical order.
///
/// ```rust
/// use strided_view::strided_indices;
///
/// let ix: Vec<usize> = strided_indices(3, -2, 4).collect();
/// assert_eq!(ix, vec![4, 2, 0]);
/// ```
#[inline]
pub fn strided_indices(n: usize, stride: isize, offset: usize) -> StridedIndices {
    StridedIndices {
        next: offset as isize,
        stride,
        remaining: n,
    }
}

impl Iterator for StridedIndices {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let ix = self.next;
        debug_assert!(ix >= 0, "strided traversal reached negative index {ix}");
        self.remaining -= 1;
        self.next = ix.wrapping_add(self.stride);
        Some(ix as usize)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for StridedIndices {
    #[inline(always)]
    fn next_back(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let ix = self.next + (self.remaining as isize) * self.stride;
        debug_assert!(ix >= 0, "strided traversal reached negative index {ix}");
        Some(ix as usize)
    }
}

impl ExactSizeIterator for StridedIndices {}

impl FusedIterator for StridedIndices {}

// ============================================================================
// Index modes
// ============================================================================

/// Policy for indices that fall outside `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexMode {
    /// Reject out-of-range indices.
    #[default]
    Throw,
    /// Interpret negative indices as counting back from the end, then reject.
    Normalize,
    /// Wrap modulo the extent (negative indices wrap from the end).
    Wrap,
    /// Saturate to the nearest valid index.
    Clamp,
}

/// Resolve `idx` against the inclusive upper bound `max` under `mode`.
///
/// ```rust
/// use strided_view::{resolve_index, IndexMode};
///
/// assert_eq!(resolve_index(-1, 3, IndexMode::Wrap).unwrap(), 3);
/// assert_eq!(resolve_index(10, 3, IndexMode::Clamp).unwrap(), 3);
/// assert_eq!(resolve_index(-3, 3, IndexMode::Normalize).unwrap(), 1);
/// assert!(resolve_index(4, 3, IndexMode::Throw).is_err());
/// ```
pub fn resolve_index(idx: isize, max: isize, mode: IndexMode) -> Result<isize> {
    if max < 0 {
        return Err(StridedError::IndexOutOfBounds { index: idx, max });
    }
    let in_range = |i: isize| (0..=max).contains(&i);
    match mode {
        IndexMode::Throw => {
            if in_range(idx) {
                Ok(idx)
            } else {
                Err(StridedError::IndexOutOfBounds { index: idx, max })
            }
        }
        IndexMode::Normalize => {
            let normalized = if idx < 0 { idx + max + 1 } else { idx };
            if in_range(normalized) {
                Ok(normalized)
            } else {
                Err(StridedError::IndexOutOfBounds { index: idx, max })
            }
        }
        IndexMode::Wrap => Ok(idx.rem_euclid(max + 1)),
        IndexMode::Clamp => Ok(idx.clamp(0, max)),
    }
}

// ============================================================================
// N-D conversions
// ============================================================================

fn check_lengths(shape: &[usize], strides: &[isize]) -> Result<()> {
    if shape.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    Ok(())
}

#[inline]
fn numel(shape: &[usize]) -> isize {
    shape.iter().product::<usize>() as isize
}

/// Axes visited from slowest- to fastest-varying for `order`.
fn axes_outer_to_inner(ndims: usize, order: Order) -> Vec<usize> {
    match order {
        Order::RowMajor => (0..ndims).collect(),
        Order::ColumnMajor => (0..ndims).rev().collect(),
    }
}

/// Lowest buffer index a view can reach: the offset minus the span of every
/// negatively strided dimension.
fn min_reachable(shape: &[usize], strides: &[isize], offset: usize) -> isize {
    let mut base = offset as isize;
    for (&d, &s) in shape.iter().zip(strides) {
        if s < 0 && d > 0 {
            base += (d as isize - 1) * s;
        }
    }
    base
}

/// Stride-aware decomposition of a buffer index relative to the lowest
/// reachable position. Negatively strided dimensions count from the end.
fn decompose_buffer_index(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    order: Order,
    idx: isize,
) -> Result<Vec<usize>> {
    let ndims = shape.len();
    let mut rem = idx - min_reachable(shape, strides, offset);
    let mut out = vec![0usize; ndims];
    for i in axes_outer_to_inner(ndims, order) {
        let s = strides[i];
        if s == 0 {
            continue;
        }
        let mag = s.abs();
        let k = rem / mag;
        rem -= k * mag;
        let sub = if s < 0 { shape[i] as isize - 1 - k } else { k };
        out[i] = usize::try_from(sub).map_err(|_| StridedError::IndexOutOfBounds {
            index: sub,
            max: shape[i] as isize - 1,
        })?;
    }
    Ok(out)
}

/// Convert subscripts to a linear index in the underlying buffer.
///
/// `modes` is recycled across dimensions, so a single mode applies to all of
/// them; an empty slice means [`IndexMode::Throw`].
///
/// ```rust
/// use strided_view::{sub2ind, IndexMode};
///
/// let idx = sub2ind(&[2, 2], &[-2, 1], 2, &[1, 0], &[IndexMode::Throw]).unwrap();
/// assert_eq!(idx, 0);
/// ```
pub fn sub2ind(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    subscripts: &[isize],
    modes: &[IndexMode],
) -> Result<usize> {
    check_lengths(shape, strides)?;
    if subscripts.len() != shape.len() {
        return Err(StridedError::RankMismatch(subscripts.len(), shape.len()));
    }
    let mut idx = offset as isize;
    for (i, (&dim, &stride)) in shape.iter().zip(strides).enumerate() {
        let mode = if modes.is_empty() {
            IndexMode::Throw
        } else {
            modes[i % modes.len()]
        };
        let sub = resolve_index(subscripts[i], dim as isize - 1, mode)?;
        idx += sub * stride;
    }
    usize::try_from(idx).map_err(|_| StridedError::OffsetOverflow)
}

/// Convert a linear index in the underlying buffer to subscripts.
///
/// With `offset == 0` the index is decomposed purely by shape in the given
/// order; otherwise the decomposition follows the strides, so negatively
/// strided dimensions are counted from their end.
///
/// ```rust
/// use strided_view::{ind2sub, IndexMode, Order};
///
/// let s = ind2sub(&[2, 2], &[-2, 1], 2, Order::RowMajor, 0, IndexMode::Throw).unwrap();
/// assert_eq!(s, vec![1, 0]);
/// ```
pub fn ind2sub(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    order: Order,
    idx: isize,
    mode: IndexMode,
) -> Result<Vec<usize>> {
    check_lengths(shape, strides)?;
    let idx = resolve_index(idx, numel(shape) - 1, mode)?;
    if offset == 0 {
        let ndims = shape.len();
        let mut out = vec![0usize; ndims];
        let mut rem = idx as usize;
        for i in axes_outer_to_inner(ndims, order).into_iter().rev() {
            out[i] = rem % shape[i];
            rem /= shape[i];
        }
        return Ok(out);
    }
    decompose_buffer_index(shape, strides, offset, order, idx)
}

/// Convert a view linear index (logical position in `order`) to a linear
/// index in the underlying buffer.
///
/// ```rust
/// use strided_view::{vind2bind, IndexMode, Order};
///
/// let b = vind2bind(&[2, 2], &[-2, 1], 2, Order::RowMajor, 2, IndexMode::Throw).unwrap();
/// assert_eq!(b, 0);
/// ```
pub fn vind2bind(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    order: Order,
    idx: isize,
    mode: IndexMode,
) -> Result<usize> {
    check_lengths(shape, strides)?;
    let idx = resolve_index(idx, numel(shape) - 1, mode)?;
    let mut rem = idx as usize;
    let mut ind = offset as isize;
    for i in axes_outer_to_inner(shape.len(), order).into_iter().rev() {
        let sub = rem % shape[i];
        rem /= shape[i];
        ind += sub as isize * strides[i];
    }
    usize::try_from(ind).map_err(|_| StridedError::OffsetOverflow)
}

/// Convert a linear index in the underlying buffer to a view linear index.
///
/// Inverse of [`vind2bind`] for any view whose strides are ordered
/// consistently with `order`.
///
/// ```rust
/// use strided_view::{bind2vind, IndexMode, Order};
///
/// let v = bind2vind(&[2, 2], &[-2, -1], 3, Order::RowMajor, 0, IndexMode::Throw).unwrap();
/// assert_eq!(v, 3);
/// ```
pub fn bind2vind(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    order: Order,
    idx: isize,
    mode: IndexMode,
) -> Result<usize> {
    check_lengths(shape, strides)?;
    let idx = resolve_index(idx, numel(shape) - 1, mode)?;
    let subs = decompose_buffer_index(shape, strides, offset, order, idx)?;
    let mut ind = 0usize;
    for i in axes_outer_to_inner(shape.len(), order) {
        ind = ind * shape[i] + subs[i];
    }
    Ok(ind)
}
