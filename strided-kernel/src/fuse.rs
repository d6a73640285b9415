//! Dimension fusion and loop-cost helpers.
//!
//! Inputs are already in iteration order (innermost first). Fusion folds a
//! dimension into its inner neighbour whenever every operand steps across the
//! boundary as if the two were a single dimension.

/// Fold contiguous neighbouring dimensions together.
///
/// Dimension `i` merges into `i - 1` when, for every operand,
/// `strides[i] == dims[i - 1] * strides[i - 1]`. The merged extent lands on
/// `i - 1` and `i` becomes a singleton; strides are left untouched, which is
/// correct because the inner stride still describes the fused dimension.
pub(crate) fn fuse_dims(dims: &[usize], all_strides: &[&[isize]]) -> Vec<usize> {
    let mut fused = dims.to_vec();
    if fused.len() < 2 || all_strides.is_empty() {
        return fused;
    }
    for i in (1..fused.len()).rev() {
        let inner = fused[i - 1] as isize;
        if all_strides.iter().all(|s| s[i] == inner * s[i - 1]) {
            fused[i - 1] *= fused[i];
            fused[i] = 1;
        }
    }
    fused
}

/// Drop singleton dimensions from the shape and from every stride tuple.
///
/// A shape made only of singletons keeps one trivial dimension so the kernel
/// still visits its single element.
pub(crate) fn compress_dims(
    dims: &[usize],
    all_strides: &[Vec<isize>],
) -> (Vec<usize>, Vec<Vec<isize>>) {
    let kept: Vec<usize> = (0..dims.len()).filter(|&i| dims[i] != 1).collect();
    if kept.is_empty() {
        if dims.is_empty() {
            return (Vec::new(), all_strides.to_vec());
        }
        return (vec![1], all_strides.iter().map(|s| vec![s[0]]).collect());
    }
    let new_dims = kept.iter().map(|&i| dims[i]).collect();
    let new_strides = all_strides
        .iter()
        .map(|s| kept.iter().map(|&i| s[i]).collect())
        .collect();
    (new_dims, new_strides)
}

/// Per-dimension cost used when shrinking tiles.
///
/// The cost of a dimension is twice the smallest |stride| any operand has
/// along it; a dimension every operand broadcasts over costs 1.
pub(crate) fn compute_costs(all_strides: &[&[isize]]) -> Vec<isize> {
    let Some(first) = all_strides.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|i| {
            let min = all_strides
                .iter()
                .map(|s| s[i].abs())
                .min()
                .unwrap_or(0);
            if min == 0 {
                1
            } else {
                min * 2
            }
        })
        .collect()
}
