//! Layout classification and stride bookkeeping.
//!
//! Everything here is a pure function of shape and stride tuples. The kernels
//! use these to decide which dimension to put in the innermost loop so that it
//! walks memory with the smallest stride available.

use std::cmp::Ordering;

/// Memory layout of a multi-dimensional view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Last dimension varies fastest.
    #[default]
    RowMajor,
    /// First dimension varies fastest.
    ColumnMajor,
}

/// Result of a strict monotonicity test on stride magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StridesOrder {
    /// Neither non-increasing nor non-decreasing.
    None,
    /// Magnitudes are non-increasing (row-major compatible).
    RowMajor,
    /// Magnitudes are non-decreasing (column-major compatible).
    ColumnMajor,
    /// Both: rank <= 1 or all magnitudes equal.
    Both,
}

/// Compute the relative order of strides.
///
/// Returns a vector where `result[i]` is the rank of `strides[i]` among all non-zero strides.
/// Zero strides have order 1.
pub fn index_order(strides: &[isize]) -> Vec<usize> {
    let n = strides.len();
    let mut result = vec![1usize; n];

    for i in 0..n {
        let si = strides[i].unsigned_abs();
        if si == 0 {
            continue;
        }
        let mut k = 1usize;
        for &s in strides {
            if s != 0 && s.unsigned_abs() < si {
                k += 1;
            }
        }
        result[i] = k;
    }

    result
}

/// Classify a stride tuple as row- or column-major.
///
/// The dimension with the smaller stride magnitude is treated as innermost:
/// a smaller last stride means row-major, a smaller first stride means
/// column-major. Ties, zero strides everywhere and rank < 2 fall back to
/// [`Order::default`]. Total: never fails.
pub fn classify(strides: &[isize]) -> Order {
    let n = strides.len();
    if n < 2 {
        return Order::default();
    }
    let first = strides[0].unsigned_abs();
    let last = strides[n - 1].unsigned_abs();
    let order = match first.cmp(&last) {
        Ordering::Less => Order::ColumnMajor,
        Ordering::Greater => Order::RowMajor,
        Ordering::Equal => Order::default(),
    };
    tracing::trace!(?strides, ?order, "classified stride layout");
    order
}

/// Strict monotonicity test on stride magnitudes.
pub fn strides_order(strides: &[isize]) -> StridesOrder {
    let mut row = true;
    let mut column = true;
    for w in strides.windows(2) {
        let prev = w[0].unsigned_abs();
        let cur = w[1].unsigned_abs();
        if cur > prev {
            row = false;
        } else if cur < prev {
            column = false;
        }
    }
    match (row, column) {
        (true, true) => StridesOrder::Both,
        (true, false) => StridesOrder::RowMajor,
        (false, true) => StridesOrder::ColumnMajor,
        (false, false) => StridesOrder::None,
    }
}

/// Whether the strides describe a row-major compatible layout.
#[inline]
pub fn is_row_major(strides: &[isize]) -> bool {
    matches!(
        strides_order(strides),
        StridesOrder::RowMajor | StridesOrder::Both
    )
}

/// Whether the strides describe a column-major compatible layout.
#[inline]
pub fn is_column_major(strides: &[isize]) -> bool {
    matches!(
        strides_order(strides),
        StridesOrder::ColumnMajor | StridesOrder::Both
    )
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Shape and strides permuted for loop interchange, innermost dimension first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOrder {
    pub shape: Vec<usize>,
    pub strides_x: Vec<isize>,
    pub strides_y: Vec<isize>,
}

/// Reorder a two-array iteration so the output walks its smallest stride innermost.
///
/// Dimensions are sorted by ascending output stride magnitude, ties broken by
/// the input stride magnitude, then by declared position. `shape[0]` of the
/// result is the innermost loop extent.
///
/// ```rust
/// use strided_view::loop_interchange_order;
///
/// // Row-major input, column-major output: the output decides.
/// let o = loop_interchange_order(&[2, 3], &[3, 1], &[1, 2]);
/// assert_eq!(o.shape, vec![2, 3]);
/// assert_eq!(o.strides_x, vec![3, 1]);
/// assert_eq!(o.strides_y, vec![1, 2]);
/// ```
pub fn loop_interchange_order(
    shape: &[usize],
    strides_x: &[isize],
    strides_y: &[isize],
) -> LoopOrder {
    let mut perm: Vec<usize> = (0..shape.len()).collect();
    perm.sort_by(|&a, &b| {
        strides_y[a]
            .unsigned_abs()
            .cmp(&strides_y[b].unsigned_abs())
            .then_with(|| strides_x[a].unsigned_abs().cmp(&strides_x[b].unsigned_abs()))
            .then_with(|| a.cmp(&b))
    });
    LoopOrder {
        shape: perm.iter().map(|&d| shape[d]).collect(),
        strides_x: perm.iter().map(|&d| strides_x[d]).collect(),
        strides_y: perm.iter().map(|&d| strides_y[d]).collect(),
    }
}
