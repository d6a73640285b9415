//! Tile size computation for cache-blocked traversal.
//!
//! The memory footprint of a tile is estimated per operand in cache lines:
//! dimensions whose byte stride is below one cache line extend a contiguous
//! run, larger strides multiply the number of runs. Tiles are shrunk until the
//! summed footprint fits in [`BLOCK_MEMORY_SIZE`].

use strided_view::index_order;

use crate::fuse::compute_costs;
use crate::{BLOCK_MEMORY_SIZE, CACHE_LINE_SIZE};

/// Tile extents for dimensions already in iteration order (innermost first).
pub(crate) fn compute_block_sizes(
    dims: &[usize],
    strides_list: &[&[isize]],
    elem_size: usize,
) -> Vec<usize> {
    if dims.is_empty() {
        return Vec::new();
    }
    let byte_strides: Vec<Vec<isize>> = strides_list
        .iter()
        .map(|s| s.iter().map(|&x| x * elem_size as isize).collect())
        .collect();
    let orders: Vec<Vec<usize>> = byte_strides.iter().map(|s| index_order(s)).collect();
    let costs = compute_costs(strides_list);

    let byte_refs: Vec<&[isize]> = byte_strides.iter().map(Vec::as_slice).collect();
    let order_refs: Vec<&[usize]> = orders.iter().map(Vec::as_slice).collect();
    compute_blocks(dims, &costs, &byte_refs, &order_refs, BLOCK_MEMORY_SIZE)
}

fn compute_blocks(
    dims: &[usize],
    costs: &[isize],
    byte_strides: &[&[isize]],
    stride_orders: &[&[usize]],
    budget: usize,
) -> Vec<usize> {
    let n = dims.len();
    if n == 0 {
        return Vec::new();
    }
    if total_memory_region(dims, byte_strides) <= budget {
        return dims.to_vec();
    }

    // If the innermost dimension is the smallest stride of every operand,
    // keep it whole and block the rest.
    let min_order = stride_orders
        .iter()
        .filter_map(|o| o.iter().min().copied())
        .min()
        .unwrap_or(1);
    if stride_orders.iter().all(|o| o.first() == Some(&min_order)) {
        let tail_strides: Vec<&[isize]> = byte_strides.iter().map(|s| &s[1..]).collect();
        let tail_orders: Vec<&[usize]> = stride_orders.iter().map(|o| &o[1..]).collect();
        let mut blocks = Vec::with_capacity(n);
        blocks.push(dims[0]);
        blocks.extend(compute_blocks(
            &dims[1..],
            &costs[1..],
            &tail_strides,
            &tail_orders,
            budget,
        ));
        return blocks;
    }

    let min_stride = byte_strides
        .iter()
        .filter_map(|s| s.iter().map(|x| x.unsigned_abs()).min())
        .min()
        .unwrap_or(0);
    if min_stride > budget {
        return vec![1; n];
    }

    let mut blocks = dims.to_vec();
    // Halve the most expensive dimension until within 2x of the budget, then
    // decrement until it fits.
    while total_memory_region(&blocks, byte_strides) >= 2 * budget {
        match last_argmax_weighted(&blocks, costs) {
            Some(i) => blocks[i] = (blocks[i] + 1) / 2,
            None => break,
        }
    }
    while total_memory_region(&blocks, byte_strides) > budget {
        match last_argmax_weighted(&blocks, costs) {
            Some(i) => blocks[i] -= 1,
            None => break,
        }
    }
    blocks
}

/// Estimated bytes touched by one tile of every operand.
fn total_memory_region(dims: &[usize], byte_strides: &[&[isize]]) -> usize {
    byte_strides
        .iter()
        .map(|strides| {
            let mut contiguous = 0usize;
            let mut runs = 1usize;
            for (&d, &s) in dims.iter().zip(strides.iter()) {
                let s = s.unsigned_abs();
                if s < CACHE_LINE_SIZE {
                    contiguous += d.saturating_sub(1) * s;
                } else {
                    runs = runs.saturating_mul(d);
                }
            }
            let lines = contiguous / CACHE_LINE_SIZE + 1;
            CACHE_LINE_SIZE.saturating_mul(lines).saturating_mul(runs)
        })
        .fold(0usize, usize::saturating_add)
}

/// Last index maximizing `(block - 1) * cost`, ignoring exhausted dimensions.
fn last_argmax_weighted(blocks: &[usize], costs: &[isize]) -> Option<usize> {
    let mut best: Option<(usize, isize)> = None;
    for (i, (&b, &c)) in blocks.iter().zip(costs).enumerate() {
        if b <= 1 {
            continue;
        }
        let score = (b as isize - 1) * c;
        if best.map_or(true, |(_, s)| score >= s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_memory_region_contiguous() {
        // 99 * 8 = 792 bytes -> 13 cache lines.
        let s = [8isize];
        assert_eq!(total_memory_region(&[100], &[&s]), 832);
    }

    #[test]
    fn test_total_memory_region_strided() {
        let s = [128isize];
        assert_eq!(total_memory_region(&[10], &[&s]), 640);
    }

    #[test]
    fn test_compute_blocks_fits() {
        let s = [8isize, 80];
        let o = [1usize, 2];
        let blocks = compute_blocks(&[10, 10], &[2, 2], &[&s], &[&o], BLOCK_MEMORY_SIZE);
        assert_eq!(blocks, vec![10, 10]);
    }

    #[test]
    fn test_compute_blocks_single_operand_in_order() {
        // Already walking memory in stride order: nothing to gain from tiling.
        let s = [8isize, 8000];
        let o = [1usize, 2];
        let blocks = compute_blocks(&[1000, 1000], &[2, 2], &[&s], &[&o], BLOCK_MEMORY_SIZE);
        assert_eq!(blocks, vec![1000, 1000]);
    }

    #[test]
    fn test_compute_blocks_transpose_shrinks_both() {
        // One operand unit-stride along dim 0, the other along dim 1.
        let a = [8isize, 8000];
        let b = [8000isize, 8];
        let oa = [1usize, 2];
        let ob = [2usize, 1];
        let blocks = compute_blocks(
            &[1000, 1000],
            &[2, 2],
            &[&a, &b],
            &[&oa, &ob],
            BLOCK_MEMORY_SIZE,
        );
        assert!(blocks[0] < 1000 && blocks[1] < 1000);
        assert!(total_memory_region(&blocks, &[&a, &b]) <= BLOCK_MEMORY_SIZE);
    }

    #[test]
    fn test_last_argmax_weighted() {
        assert_eq!(last_argmax_weighted(&[10, 20, 5], &[1, 1, 2]), Some(1));
        assert_eq!(last_argmax_weighted(&[10, 10], &[1, 1]), Some(1));
        assert_eq!(last_argmax_weighted(&[1, 1], &[1, 1]), None);
    }

    #[test]
    fn test_compute_block_sizes_pipeline() {
        let s = [1isize, 100];
        let blocks = compute_block_sizes(&[100, 100], &[&s], 8);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().zip([100, 100]).all(|(&b, d)| b >= 1 && b <= d));
    }
}
