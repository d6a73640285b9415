//! Dynamic-rank strided view types.
//!
//! A view is the tuple (buffer, shape, strides, offset). Element
//! `(i_0, ..., i_{k-1})` lives at buffer position `offset + Σ i_j * strides[j]`.
//! Constructors validate that every reachable position is inside the buffer,
//! so the kernels in the traversal engine can walk raw pointers afterwards.
//!
//! - [`StridedView`]: borrowed read-only view
//! - [`StridedViewMut`]: borrowed mutable view
//! - [`StridedArray`]: owned array with contiguous row- or column-major strides

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::auxiliary::{col_major_strides, row_major_strides};
use crate::{Result, StridedError};

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that every reachable buffer position stays within `[0, len)`.
fn validate_bounds(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if dims.len() != strides.len() {
        tracing::debug!(?dims, ?strides, "rejecting view: stride/shape rank differ");
        return Err(StridedError::StrideLengthMismatch);
    }
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut lo = offset;
    let mut hi = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim < 2 {
            continue;
        }
        let span = stride
            .checked_mul(dim as isize - 1)
            .ok_or(StridedError::OffsetOverflow)?;
        let bound = if span >= 0 { &mut hi } else { &mut lo };
        *bound = bound.checked_add(span).ok_or(StridedError::OffsetOverflow)?;
    }
    if lo < 0 || hi < 0 || hi as usize >= len {
        tracing::debug!(
            len,
            ?dims,
            ?strides,
            offset,
            lo,
            hi,
            "rejecting view: reachable range leaves the buffer"
        );
        return Err(StridedError::OffsetOverflow);
    }
    Ok(())
}

/// Shape and strides after applying an axis permutation.
fn permuted_layout(
    dims: &[usize],
    strides: &[isize],
    perm: &[usize],
) -> Result<(Vec<usize>, Vec<isize>)> {
    let rank = dims.len();
    if perm.len() != rank {
        return Err(StridedError::RankMismatch(perm.len(), rank));
    }
    let mut seen = vec![false; rank];
    for &p in perm {
        if p >= rank || seen[p] {
            return Err(StridedError::InvalidAxis { axis: p, rank });
        }
        seen[p] = true;
    }
    Ok((
        perm.iter().map(|&p| dims[p]).collect(),
        perm.iter().map(|&p| strides[p]).collect(),
    ))
}

/// Strides and offset after reversing one axis.
fn flipped_layout(dims: &[usize], strides: &[isize], offset: isize, dim: usize) -> Result<(Vec<isize>, isize)> {
    let rank = dims.len();
    if dim >= rank {
        return Err(StridedError::InvalidAxis { axis: dim, rank });
    }
    let mut new_strides = strides.to_vec();
    let mut new_offset = offset;
    if dims[dim] > 0 {
        new_offset += (dims[dim] as isize - 1) * strides[dim];
    }
    new_strides[dim] = -strides[dim];
    Ok((new_strides, new_offset))
}

/// Buffer displacement of `indices` relative to the view's base offset.
#[inline]
fn displacement(dims: &[usize], strides: &[isize], indices: &[usize]) -> isize {
    assert_eq!(indices.len(), dims.len(), "wrong number of indices");
    let mut idx = 0isize;
    for ((&i, &d), &s) in indices.iter().zip(dims).zip(strides) {
        assert!(i < d, "index {} out of bounds for dim {}", i, d);
        idx += i as isize * s;
    }
    idx
}

// ============================================================================
// StridedView
// ============================================================================

/// Borrowed read-only strided view of dynamic rank.
///
/// Reshaping operations ([`permute`](Self::permute), [`transpose_2d`](Self::transpose_2d),
/// [`flip`](Self::flip), [`broadcast`](Self::broadcast)) only rewrite the
/// shape, strides and offset; the buffer is never copied.
pub struct StridedView<'a, T> {
    ptr: *const T,
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

unsafe impl<T: Send> Send for StridedView<'_, T> {}
unsafe impl<T: Sync> Sync for StridedView<'_, T> {}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a view over a borrowed slice, validating every reachable position.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        // SAFETY: validate_bounds ensured offset is inside the buffer (or the view is empty).
        Ok(unsafe { Self::new_unchecked(data, dims, strides, offset) })
    }

    /// Create a view without bounds checking.
    ///
    /// # Safety
    /// The caller must ensure all index combinations stay within bounds.
    pub unsafe fn new_unchecked(
        data: &'a [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Self {
        Self {
            ptr: data.as_ptr().wrapping_offset(offset),
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        }
    }

    fn with_layout(&self, dims: Arc<[usize]>, strides: Arc<[isize]>, offset: isize) -> Self {
        Self {
            ptr: self.data.as_ptr().wrapping_offset(offset),
            data: self.data,
            dims,
            strides,
            offset,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Raw const pointer to the element at the view's base offset.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.ptr
    }

    /// Reorder the dimensions.
    pub fn permute(&self, perm: &[usize]) -> Result<StridedView<'a, T>> {
        let (dims, strides) = permuted_layout(&self.dims, &self.strides, perm)?;
        Ok(self.with_layout(Arc::from(dims), Arc::from(strides), self.offset))
    }

    /// Swap the two axes of a matrix view.
    pub fn transpose_2d(&self) -> Result<StridedView<'a, T>> {
        if self.dims.len() != 2 {
            return Err(StridedError::RankMismatch(self.dims.len(), 2));
        }
        self.permute(&[1, 0])
    }

    /// Reverse the traversal direction of one axis.
    ///
    /// The offset moves to the last element along `dim` and the stride flips
    /// sign, so the same buffer positions are reached in the opposite order.
    pub fn flip(&self, dim: usize) -> Result<StridedView<'a, T>> {
        let (strides, offset) = flipped_layout(&self.dims, &self.strides, self.offset, dim)?;
        Ok(self.with_layout(self.dims.clone(), Arc::from(strides), offset))
    }

    /// Broadcast this view to a target shape.
    ///
    /// Size-1 dimensions are expanded (stride set to 0) to match target.
    pub fn broadcast(&self, target_dims: &[usize]) -> Result<StridedView<'a, T>> {
        if self.dims.len() != target_dims.len() {
            return Err(StridedError::RankMismatch(
                self.dims.len(),
                target_dims.len(),
            ));
        }
        let strides = self
            .dims
            .iter()
            .zip(target_dims)
            .zip(self.strides.iter())
            .map(|((&have, &want), &s)| match (have == want, have == 1) {
                (true, _) => Ok(s),
                (false, true) => Ok(0),
                (false, false) => Err(StridedError::ShapeMismatch(
                    self.dims.to_vec(),
                    target_dims.to_vec(),
                )),
            })
            .collect::<Result<Vec<isize>>>()?;
        Ok(self.with_layout(Arc::from(target_dims), Arc::from(strides), self.offset))
    }
}

impl<'a, T: Copy> StridedView<'a, T> {
    /// Read the element at a multi-dimensional index.
    ///
    /// # Panics
    /// If the index has the wrong rank or any coordinate is out of range.
    pub fn get(&self, indices: &[usize]) -> T {
        let idx = displacement(&self.dims, &self.strides, indices);
        self.data[(self.offset + idx) as usize]
    }

    /// Read an element without bounds checking.
    ///
    /// # Safety
    /// Caller must ensure indices are within bounds.
    #[inline]
    pub unsafe fn get_unchecked(&self, indices: &[usize]) -> T {
        let mut idx = 0isize;
        for (&i, &s) in indices.iter().zip(self.strides.iter()) {
            idx += i as isize * s;
        }
        *self.ptr.offset(idx)
    }
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Borrowed mutable strided view of dynamic rank.
///
/// Layout-changing methods consume the view so two mutable views of the same
/// buffer cannot coexist.
pub struct StridedViewMut<'a, T> {
    ptr: *mut T,
    data: &'a mut [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

unsafe impl<T: Send> Send for StridedViewMut<'_, T> {}

impl<T> std::fmt::Debug for StridedViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedViewMut<'a, T> {
    /// Create a mutable view, validating every reachable position.
    pub fn new(
        data: &'a mut [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        // SAFETY: validated above.
        Ok(unsafe { Self::new_unchecked(data, dims, strides, offset) })
    }

    /// Create without bounds checking.
    ///
    /// # Safety
    /// Caller must ensure all index combinations stay within bounds.
    pub unsafe fn new_unchecked(
        data: &'a mut [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Self {
        Self {
            ptr: data.as_mut_ptr().wrapping_offset(offset),
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        }
    }

    fn into_layout(self, dims: Arc<[usize]>, strides: Arc<[isize]>, offset: isize) -> Self {
        let data = self.data;
        Self {
            ptr: data.as_mut_ptr().wrapping_offset(offset),
            data,
            dims,
            strides,
            offset,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Raw const pointer to the element at the view's base offset.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.ptr as *const T
    }

    /// Raw mutable pointer to the element at the view's base offset.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// Reorder the dimensions, consuming the view.
    pub fn permute(self, perm: &[usize]) -> Result<StridedViewMut<'a, T>> {
        let (dims, strides) = permuted_layout(&self.dims, &self.strides, perm)?;
        let offset = self.offset;
        Ok(self.into_layout(Arc::from(dims), Arc::from(strides), offset))
    }

    /// Swap the two axes of a matrix view, consuming the view.
    pub fn transpose_2d(self) -> Result<StridedViewMut<'a, T>> {
        if self.dims.len() != 2 {
            return Err(StridedError::RankMismatch(self.dims.len(), 2));
        }
        self.permute(&[1, 0])
    }

    /// Reverse the traversal direction of one axis, consuming the view.
    pub fn flip(self, dim: usize) -> Result<StridedViewMut<'a, T>> {
        let (strides, offset) = flipped_layout(&self.dims, &self.strides, self.offset, dim)?;
        let dims = self.dims.clone();
        Ok(self.into_layout(dims, Arc::from(strides), offset))
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            ptr: self.ptr as *const T,
            data: &*self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<'a, T: Copy> StridedViewMut<'a, T> {
    /// Read the element at a multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        let idx = displacement(&self.dims, &self.strides, indices);
        self.data[(self.offset + idx) as usize]
    }

    /// Write the element at a multi-dimensional index.
    pub fn set(&mut self, indices: &[usize], value: T) {
        let idx = displacement(&self.dims, &self.strides, indices);
        self.data[(self.offset + idx) as usize] = value;
    }
}

// ============================================================================
// StridedArray
// ============================================================================

/// Owned strided multidimensional array.
///
/// Built with contiguous row-major or column-major strides; [`from_parts`](Self::from_parts)
/// accepts any validated layout.
pub struct StridedArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> std::fmt::Debug for StridedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T: Clone> Clone for StridedArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Clone + Default> StridedArray<T> {
    /// Column-major array filled with `T::default()`.
    pub fn col_major(dims: &[usize]) -> Self {
        Self::filled(dims, col_major_strides(dims))
    }

    /// Row-major array filled with `T::default()`.
    pub fn row_major(dims: &[usize]) -> Self {
        Self::filled(dims, row_major_strides(dims))
    }

    fn filled(dims: &[usize], strides: Vec<isize>) -> Self {
        let total: usize = dims.iter().product();
        Self {
            data: vec![T::default(); total],
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: 0,
        }
    }
}

impl<T> StridedArray<T> {
    /// Column-major array whose values come from `f`, called in column-major order.
    pub fn from_fn_col_major(dims: &[usize], f: impl FnMut(&[usize]) -> T) -> Self {
        let axes: Vec<usize> = (0..dims.len()).collect();
        Self::generate(dims, col_major_strides(dims), &axes, f)
    }

    /// Row-major array whose values come from `f`, called in row-major order.
    pub fn from_fn_row_major(dims: &[usize], f: impl FnMut(&[usize]) -> T) -> Self {
        let axes: Vec<usize> = (0..dims.len()).rev().collect();
        Self::generate(dims, row_major_strides(dims), &axes, f)
    }

    /// `fastest` lists axes from fastest- to slowest-varying.
    fn generate(
        dims: &[usize],
        strides: Vec<isize>,
        fastest: &[usize],
        mut f: impl FnMut(&[usize]) -> T,
    ) -> Self {
        let total: usize = dims.iter().product();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; dims.len()];
        for _ in 0..total {
            data.push(f(&idx));
            for &d in fastest {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: 0,
        }
    }

    /// Wrap an existing buffer with an arbitrary layout.
    pub fn from_parts(
        data: Vec<T>,
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the array and return its buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Borrow as a read-only view.
    pub fn view(&self) -> StridedView<'_, T> {
        // SAFETY: layout was validated at construction.
        unsafe { StridedView::new_unchecked(&self.data, &self.dims, &self.strides, self.offset) }
    }

    /// Borrow as a mutable view.
    pub fn view_mut(&mut self) -> StridedViewMut<'_, T> {
        let dims = self.dims.clone();
        let strides = self.strides.clone();
        // SAFETY: layout was validated at construction.
        unsafe { StridedViewMut::new_unchecked(&mut self.data, &dims, &strides, self.offset) }
    }

    /// Iterate over all elements in memory order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    fn position(&self, indices: &[usize]) -> usize {
        (self.offset + displacement(&self.dims, &self.strides, indices)) as usize
    }
}

impl<T: Copy> StridedArray<T> {
    /// Read an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[self.position(indices)]
    }

    /// Write an element by multi-dimensional index.
    pub fn set(&mut self, indices: &[usize], value: T) {
        let pos = self.position(indices);
        self.data[pos] = value;
    }
}

impl<T> Index<&[usize]> for StridedArray<T> {
    type Output = T;

    fn index(&self, indices: &[usize]) -> &T {
        &self.data[self.position(indices)]
    }
}

impl<T> IndexMut<&[usize]> for StridedArray<T> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut T {
        let pos = self.position(indices);
        &mut self.data[pos]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn iota(n: usize) -> Vec<f64> {
        (1..=n).map(|x| x as f64).collect()
    }

    #[test]
    fn test_view_accessors() {
        let data = iota(6);
        let view = StridedView::new(&data, &[2, 3], &[3, 1], 0).unwrap();
        assert_eq!(view.ndim(), 2);
        assert_eq!(view.dims(), &[2, 3]);
        assert_eq!(view.strides(), &[3, 1]);
        assert_eq!(view.len(), 6);
        assert!(!view.is_empty());
        assert_eq!(view.get(&[1, 0]), 4.0);
        assert_eq!(view.get(&[1, 2]), 6.0);
    }

    #[test]
    fn test_view_col_major_addressing() {
        let data = iota(6);
        let view = StridedView::new(&data, &[2, 3], &[1, 2], 0).unwrap();
        let got: Vec<f64> = [[0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2]]
            .iter()
            .map(|ix| view.get(ix))
            .collect();
        assert_eq!(got, data);
    }

    #[test]
    fn test_view_negative_stride_with_offset() {
        // Reverse of [1, 2, 3, 4]: offset at the last element, stride -1.
        let data = iota(4);
        let view = StridedView::new(&data, &[4], &[-1], 3).unwrap();
        assert_eq!(view.get(&[0]), 4.0);
        assert_eq!(view.get(&[3]), 1.0);
        assert!(StridedView::new(&data, &[4], &[-1], 2).is_err());
    }

    #[test]
    fn test_view_permute_and_transpose() {
        let data = iota(6);
        let view = StridedView::new(&data, &[2, 3], &[3, 1], 0).unwrap();
        let t = view.transpose_2d().unwrap();
        assert_eq!(t.dims(), &[3, 2]);
        assert_eq!(t.strides(), &[1, 3]);
        assert_eq!(t.get(&[1, 0]), 2.0);
        assert_eq!(t.get(&[0, 1]), 4.0);

        assert!(view.permute(&[0, 0]).is_err());
        assert!(view.permute(&[0]).is_err());
        assert!(view.permute(&[0, 2]).is_err());
    }

    #[test]
    fn test_transpose_requires_rank_2() {
        let data = iota(3);
        let v = StridedView::new(&data, &[3], &[1], 0).unwrap();
        assert!(matches!(
            v.transpose_2d(),
            Err(StridedError::RankMismatch(1, 2))
        ));
    }

    #[test]
    fn test_view_flip() {
        let data = iota(6);
        let view = StridedView::new(&data, &[2, 3], &[3, 1], 0).unwrap();
        let f = view.flip(1).unwrap();
        assert_eq!(f.strides(), &[3, -1]);
        assert_eq!(f.offset(), 2);
        assert_eq!(f.get(&[0, 0]), 3.0);
        assert_eq!(f.get(&[1, 2]), 4.0);

        let back = f.flip(1).unwrap();
        assert_eq!(back.strides(), view.strides());
        assert_eq!(back.offset(), view.offset());
        assert!(view.flip(2).is_err());
    }

    #[test]
    fn test_view_broadcast() {
        let data = vec![1.0, 2.0, 3.0];
        let view = StridedView::new(&data, &[1, 3], &[3, 1], 0).unwrap();
        let broad = view.broadcast(&[4, 3]).unwrap();
        assert_eq!(broad.strides(), &[0, 1]);
        for i in 0..4 {
            assert_eq!(broad.get(&[i, 2]), 3.0);
        }
        assert!(view.broadcast(&[4, 2]).is_err());
        assert!(view.broadcast(&[3]).is_err());
    }

    #[test]
    fn test_view_mut_set_and_flip() {
        let mut data = vec![0.0; 6];
        {
            let mut view = StridedViewMut::new(&mut data, &[2, 3], &[3, 1], 0).unwrap();
            view.set(&[0, 0], 1.0);
            let mut flipped = view.flip(0).unwrap();
            flipped.set(&[0, 2], 6.0);
            assert_eq!(flipped.as_view().get(&[1, 0]), 1.0);
        }
        assert_eq!(data[0], 1.0);
        assert_eq!(data[5], 6.0);
    }

    #[test]
    fn test_view_mut_transpose() {
        let mut data = iota(6);
        {
            let vm = StridedViewMut::new(&mut data, &[2, 3], &[3, 1], 0).unwrap();
            let mut t = vm.transpose_2d().unwrap();
            t.set(&[2, 1], 60.0);
            assert_eq!(t.get(&[0, 1]), 4.0);
        }
        assert_eq!(data[5], 60.0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_range_panics() {
        let data = iota(6);
        let view = StridedView::new(&data, &[2, 3], &[3, 1], 0).unwrap();
        view.get(&[2, 0]);
    }

    #[test]
    fn test_array_from_fn() {
        let c = StridedArray::from_fn_col_major(&[2, 3], |ix| (ix[0] * 3 + ix[1]) as f64);
        assert_eq!(c.strides(), &[1, 2]);
        assert_eq!(c.data(), &[0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);

        let r = StridedArray::from_fn_row_major(&[2, 3], |ix| (ix[0] * 3 + ix[1]) as f64);
        assert_eq!(r.strides(), &[3, 1]);
        assert_eq!(r.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(r.get(&[1, 2]), c.get(&[1, 2]));
    }

    #[test]
    fn test_array_3d_col_major() {
        let t = StridedArray::from_fn_col_major(&[2, 3, 4], |ix| {
            (ix[0] * 100 + ix[1] * 10 + ix[2]) as f64
        });
        assert_eq!(t.strides(), &[1, 2, 6]);
        assert_eq!(t.get(&[1, 2, 3]), 123.0);
        assert_eq!(t.get(&[0, 0, 1]), 1.0);
    }

    #[test]
    fn test_array_views_and_indexing() {
        let mut t = StridedArray::<f64>::row_major(&[2, 3]);
        t.view_mut().set(&[1, 2], 42.0);
        t[&[0usize, 1] as &[usize]] = 7.0;
        assert_eq!(t.view().get(&[1, 2]), 42.0);
        assert_eq!(t[&[0usize, 1] as &[usize]], 7.0);
        assert_eq!(t.into_data(), vec![0.0, 7.0, 0.0, 0.0, 0.0, 42.0]);
    }

    #[test]
    fn test_array_from_parts() {
        let a = StridedArray::from_parts(iota(4), &[2, 2], &[-2, 1], 2).unwrap();
        assert_eq!(a.get(&[0, 0]), 3.0);
        assert_eq!(a.get(&[1, 1]), 2.0);
        assert!(StridedArray::from_parts(iota(3), &[2, 2], &[2, 1], 0).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 0).is_ok());
        assert!(validate_bounds(6, &[2, 3], &[1, 2], 0).is_ok());
        assert!(validate_bounds(5, &[2, 3], &[3, 1], 0).is_err());
        assert!(validate_bounds(0, &[0, 3], &[3, 1], 0).is_ok());
        assert!(validate_bounds(7, &[2, 3], &[3, 1], 1).is_ok());
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 1).is_err());
        assert!(validate_bounds(6, &[2, 3], &[3], 0).is_err());
        assert!(validate_bounds(6, &[2], &[isize::MAX], 0).is_err());
    }
}
