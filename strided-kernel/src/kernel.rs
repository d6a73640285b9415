//! Blocked loop kernels and plan construction.
//!
//! A plan is built once per call: order the dimensions, fuse what is
//! contiguous, drop singletons, size the tiles. The kernels then walk tiles
//! with running offsets. Offsets move by one stride per step and are rewound
//! once per dimension boundary, so no index is recomputed from scratch.

use crate::fuse::{compress_dims, fuse_dims};
use crate::{block, order, Result, StridedError};

/// Shape, strides and tile extents in iteration order (innermost first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KernelPlan {
    pub(crate) dims: Vec<usize>,
    pub(crate) strides: Vec<Vec<isize>>,
    pub(crate) blocks: Vec<usize>,
}

/// Build an execution plan.
///
/// Ordering runs first so that fusion sees dimensions in stride order and
/// catches contiguity for any permutation of a dense layout.
pub(crate) fn build_plan_fused(
    dims: &[usize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
    elem_size: usize,
) -> KernelPlan {
    let perm = order::compute_order(dims, strides_list, dest_index);

    let ordered_dims: Vec<usize> = perm.iter().map(|&d| dims[d]).collect();
    let ordered_strides: Vec<Vec<isize>> = strides_list
        .iter()
        .map(|s| perm.iter().map(|&d| s[d]).collect())
        .collect();
    let ordered_refs: Vec<&[isize]> = ordered_strides.iter().map(Vec::as_slice).collect();

    let fused = fuse_dims(&ordered_dims, &ordered_refs);
    let (dims, strides) = compress_dims(&fused, &ordered_strides);

    let refs: Vec<&[isize]> = strides.iter().map(Vec::as_slice).collect();
    let blocks = block::compute_block_sizes(&dims, &refs, elem_size);

    tracing::trace!(?perm, ?dims, ?blocks, "built blocked traversal plan");
    KernelPlan {
        dims,
        strides,
        blocks,
    }
}

// ============================================================================
// Block iteration
// ============================================================================

/// Walk a plan, calling `f(offsets, len, inner_strides)` once per inner run.
///
/// `offsets[k]` is the element offset of operand `k` at the start of the run,
/// relative to its base pointer; `len` elements follow at `inner_strides[k]`.
pub(crate) fn for_each_inner_block_preordered<F>(
    plan: &KernelPlan,
    initial_offsets: &[isize],
    mut f: F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let dims = &plan.dims;
    if dims.is_empty() {
        return f(initial_offsets, 1, &[]);
    }
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let inner: Vec<isize> = plan.strides.iter().map(|s| s[0]).collect();
    let mut offsets = initial_offsets.to_vec();
    if dims.len() == 1 {
        kernel_1d(dims[0], plan.blocks[0], &inner, &mut offsets, &mut f)
    } else {
        kernel_nd(dims, &plan.blocks, &plan.strides, &inner, &mut offsets, &mut f)
    }
}

fn advance(offsets: &mut [isize], strides: &[Vec<isize>], level: usize, steps: isize) {
    for (o, s) in offsets.iter_mut().zip(strides) {
        *o += steps * s[level];
    }
}

fn kernel_1d<F>(
    d0: usize,
    b0: usize,
    inner: &[isize],
    offsets: &mut [isize],
    f: &mut F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let b0 = b0.clamp(1, d0);
    let mut j = 0usize;
    while j < d0 {
        let len = b0.min(d0 - j);
        f(offsets, len, inner)?;
        for (o, &s) in offsets.iter_mut().zip(inner) {
            *o += len as isize * s;
        }
        j += len;
    }
    Ok(())
}

/// Rank >= 2: an odometer over tile origins wrapping an odometer over the
/// elements of one tile. Level 0 is never stepped element-wise; it is handed
/// to the callback as a run.
fn kernel_nd<F>(
    dims: &[usize],
    blocks: &[usize],
    strides: &[Vec<isize>],
    inner: &[isize],
    offsets: &mut [isize],
    f: &mut F,
) -> Result<()>
where
    F: FnMut(&[isize], usize, &[isize]) -> Result<()>,
{
    let rank = dims.len();
    let blocks: Vec<usize> = blocks.iter().zip(dims).map(|(&b, &d)| b.clamp(1, d)).collect();
    let mut origin = vec![0usize; rank];
    let mut extent = vec![0usize; rank];
    let mut pos = vec![0usize; rank];
    let mut cur = offsets.to_vec();

    loop {
        for l in 0..rank {
            extent[l] = blocks[l].min(dims[l] - origin[l]);
        }

        // Elements of the current tile.
        cur.copy_from_slice(offsets);
        pos.iter_mut().for_each(|p| *p = 0);
        'tile: loop {
            f(&cur, extent[0], inner)?;
            let mut level = 1;
            loop {
                if level == rank {
                    break 'tile;
                }
                pos[level] += 1;
                if pos[level] < extent[level] {
                    advance(&mut cur, strides, level, 1);
                    break;
                }
                advance(&mut cur, strides, level, -(pos[level] as isize - 1));
                pos[level] = 0;
                level += 1;
            }
        }

        // Next tile origin.
        let mut level = 0;
        loop {
            if level == rank {
                return Ok(());
            }
            let step = blocks[level];
            if origin[level] + step < dims[level] {
                origin[level] += step;
                advance(offsets, strides, level, step as isize);
                break;
            }
            advance(offsets, strides, level, -(origin[level] as isize));
            origin[level] = 0;
            level += 1;
        }
    }
}

// ============================================================================
// Utility functions
// ============================================================================

pub(crate) fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<()> {
    if a.len() != b.len() {
        tracing::debug!(?a, ?b, "rejecting operands: rank differs");
        return Err(StridedError::RankMismatch(a.len(), b.len()));
    }
    if a != b {
        tracing::debug!(?a, ?b, "rejecting operands: shape differs");
        return Err(StridedError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ContiguousLayout {
    /// Last axis varies fastest.
    RowMajor,
    /// First axis varies fastest.
    ColMajor,
}

/// Dense layout of `(dims, strides)`, if any.
///
/// Axes with extent <= 1 are ignored. Negative strides never count as dense.
pub(crate) fn contiguous_layout(dims: &[usize], strides: &[isize]) -> Option<ContiguousLayout> {
    if dims.len() != strides.len() {
        return None;
    }
    let dense = |axes: &mut dyn Iterator<Item = (usize, isize)>| {
        let mut expected = 1isize;
        for (dim, stride) in axes {
            if dim <= 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected = expected.saturating_mul(dim as isize);
        }
        true
    };
    let pairs = || dims.iter().copied().zip(strides.iter().copied());
    if dense(&mut pairs().rev()) {
        Some(ContiguousLayout::RowMajor)
    } else if dense(&mut pairs()) {
        Some(ContiguousLayout::ColMajor)
    } else {
        None
    }
}

pub(crate) fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// The layout shared by every operand, when all are dense in the same order.
pub(crate) fn common_contiguous_layout(
    dims: &[usize],
    strides_list: &[&[isize]],
) -> Option<ContiguousLayout> {
    let first = contiguous_layout(dims, strides_list.first()?)?;
    for strides in &strides_list[1..] {
        if contiguous_layout(dims, strides)? != first {
            return None;
        }
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every (operand-0 offset) visited by a plan, in visit order.
    fn visited(plan: &KernelPlan) -> Vec<isize> {
        let mut out = Vec::new();
        let zeros = vec![0isize; plan.strides.len()];
        for_each_inner_block_preordered(plan, &zeros, |offsets, len, strides| {
            let step = strides.first().copied().unwrap_or(0);
            for i in 0..len as isize {
                out.push(offsets[0] + i * step);
            }
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn test_plan_fuses_dense_layouts() {
        let s = [1isize, 2];
        let plan = build_plan_fused(&[2, 3], &[&s], Some(0), 8);
        assert_eq!(plan.dims, vec![6]);
        assert_eq!(plan.strides, vec![vec![1]]);
        assert_eq!(plan.blocks.len(), 1);

        let row = [3isize, 1];
        let plan = build_plan_fused(&[2, 3], &[&row, &row], Some(0), 8);
        assert_eq!(plan.dims, vec![6]);
    }

    #[test]
    fn test_plan_keeps_transposed_operands_apart() {
        let out = [3isize, 1];
        let inp = [1isize, 2];
        let plan = build_plan_fused(&[2, 3], &[&out, &inp], Some(0), 8);
        assert_eq!(plan.dims, vec![3, 2]);
        assert_eq!(plan.strides[0], vec![1, 3]);
        assert_eq!(plan.strides[1], vec![2, 1]);
    }

    #[test]
    fn test_kernel_visits_every_element_once() {
        for (dims, strides) in [
            (vec![4usize, 3], vec![3isize, 1]),
            (vec![4, 3], vec![1, 4]),
            (vec![2, 3, 4], vec![1, 8, 2]),
            (vec![3, 2, 2, 2, 2], vec![1, 3, 6, 12, 24]),
            (vec![5, 7], vec![7, -1]),
        ] {
            let plan = KernelPlan {
                dims: dims.clone(),
                strides: vec![strides.clone()],
                blocks: vec![2; dims.len()],
            };
            let mut got = visited(&plan);
            got.sort_unstable();
            let n: usize = dims.iter().product();
            let mut want = Vec::with_capacity(n);
            let mut idx = vec![0usize; dims.len()];
            for _ in 0..n {
                want.push(
                    idx.iter()
                        .zip(&strides)
                        .map(|(&i, &s)| i as isize * s)
                        .sum::<isize>(),
                );
                for d in 0..dims.len() {
                    idx[d] += 1;
                    if idx[d] < dims[d] {
                        break;
                    }
                    idx[d] = 0;
                }
            }
            want.sort_unstable();
            assert_eq!(got, want, "dims {:?} strides {:?}", dims, strides);
        }
    }

    #[test]
    fn test_kernel_unblocked_order_is_odometer() {
        let plan = KernelPlan {
            dims: vec![2, 3],
            strides: vec![vec![1, 2]],
            blocks: vec![2, 3],
        };
        assert_eq!(visited(&plan), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_kernel_rank0_and_empty() {
        let scalar = KernelPlan {
            dims: vec![],
            strides: vec![vec![]],
            blocks: vec![],
        };
        assert_eq!(visited(&scalar), vec![0]);

        let empty = KernelPlan {
            dims: vec![0, 3],
            strides: vec![vec![1, 1]],
            blocks: vec![1, 1],
        };
        assert!(visited(&empty).is_empty());
    }

    #[test]
    fn test_kernel_propagates_callback_error() {
        let plan = KernelPlan {
            dims: vec![4, 4],
            strides: vec![vec![1, 4]],
            blocks: vec![4, 4],
        };
        let mut calls = 0;
        let res = for_each_inner_block_preordered(&plan, &[0], |_, _, _| {
            calls += 1;
            if calls == 2 {
                Err(StridedError::OffsetOverflow)
            } else {
                Ok(())
            }
        });
        assert!(res.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_contiguous_layout() {
        assert_eq!(
            contiguous_layout(&[3, 4], &[4, 1]),
            Some(ContiguousLayout::RowMajor)
        );
        assert_eq!(
            contiguous_layout(&[3, 4], &[1, 3]),
            Some(ContiguousLayout::ColMajor)
        );
        assert_eq!(
            contiguous_layout(&[2, 1, 3], &[3, 999, 1]),
            Some(ContiguousLayout::RowMajor)
        );
        assert_eq!(contiguous_layout(&[3, 4], &[-4, 1]), None);
        assert_eq!(contiguous_layout(&[], &[]), Some(ContiguousLayout::RowMajor));
    }

    #[test]
    fn test_common_contiguous_layout() {
        let row = [4isize, 1];
        let col = [1isize, 3];
        let bad = [8isize, 2];
        assert_eq!(
            common_contiguous_layout(&[3, 4], &[&row, &row]),
            Some(ContiguousLayout::RowMajor)
        );
        assert_eq!(
            common_contiguous_layout(&[3, 4], &[&col, &col]),
            Some(ContiguousLayout::ColMajor)
        );
        assert_eq!(common_contiguous_layout(&[3, 4], &[&row, &col]), None);
        assert_eq!(common_contiguous_layout(&[3, 4], &[&row, &bad]), None);
        assert_eq!(common_contiguous_layout(&[3, 4], &[]), None);
    }

    #[test]
    fn test_ensure_same_shape() {
        assert!(ensure_same_shape(&[2, 3], &[2, 3]).is_ok());
        assert!(matches!(
            ensure_same_shape(&[2, 3], &[2]),
            Err(StridedError::RankMismatch(2, 1))
        ));
        assert!(matches!(
            ensure_same_shape(&[2, 3], &[3, 2]),
            Err(StridedError::ShapeMismatch(_, _))
        ));
    }
}
