//! Loop ordering for N-dimensional traversal.
//!
//! Each operand ranks its dimensions by |stride| ([`index_order`]). The ranks
//! are bit-packed into one importance score per dimension, with the output
//! operand counted twice, and dimensions are iterated from most to least
//! important. The most important dimension becomes the innermost loop.

use strided_view::index_order;

/// Importance score of each dimension.
///
/// `g` bits per rank position are enough to sum `M + 1` weights without
/// carrying into the next position. Singleton dimensions score 0 so they sink
/// to the outermost loops.
fn importance(dims: &[usize], orders: &[Vec<usize>]) -> Vec<u64> {
    let n = dims.len();
    let m = orders.len();
    let g = u64::from(64 - (m as u64 + 1).leading_zeros());
    (0..n)
        .map(|i| {
            if dims[i] <= 1 {
                return 0;
            }
            orders
                .iter()
                .enumerate()
                .map(|(k, order)| {
                    let weight = if k == 0 { 2 } else { 1 };
                    weight * (1u64 << (g * (n - order[i]) as u64))
                })
                .sum()
        })
        .collect()
}

/// Compute the iteration order, innermost dimension first.
///
/// `dest_index` names the operand that is written; its ranks count twice.
/// With `None` the first operand is the reference and counts twice.
pub(crate) fn compute_order(
    dims: &[usize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return Vec::new();
    }
    if strides_list.is_empty() {
        return (0..rank).collect();
    }

    let mut orders: Vec<Vec<usize>> = strides_list.iter().map(|s| index_order(s)).collect();
    if let Some(dest) = dest_index.filter(|&d| d > 0 && d < orders.len()) {
        let dest_order = orders.remove(dest);
        orders.insert(0, dest_order);
    }

    let scores = importance(dims, &orders);
    let mut perm: Vec<usize> = (0..rank).collect();
    // Stable: equal scores keep their declared order.
    perm.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
    perm
}
