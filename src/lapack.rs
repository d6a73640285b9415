//! LAPACK-style matrix layout helpers: transposition, (triangular) copy and
//! row interchanges.
//!
//! The `_ndarray` forms take two strides and an offset per matrix and trust
//! their inputs. The base forms take a storage [`Order`] plus leading
//! dimensions, validate the leading dimensions and forward to the `_ndarray`
//! form.

use crate::{is_row_major, loop_interchange_order, Order, Result, StridedError};

/// Which part of a matrix `lacpy` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Uplo {
    /// The whole matrix.
    #[default]
    All,
    /// The upper triangle, diagonal included.
    Upper,
    /// The lower triangle, diagonal included.
    Lower,
}

/// Reject a leading dimension smaller than `max(1, extent)`.
fn check_leading_dim(name: &'static str, ld: usize, extent: usize) -> Result<()> {
    let min = extent.max(1);
    if ld < min {
        tracing::debug!(name, ld, min, "rejecting leading dimension");
        return Err(StridedError::LengthMismatch {
            expected: min,
            got: ld,
        });
    }
    Ok(())
}

/// Row and column strides of a matrix stored in `order` with leading dimension `ld`.
#[inline]
fn matrix_strides(order: Order, ld: usize) -> (isize, isize) {
    match order {
        Order::RowMajor => (ld as isize, 1),
        Order::ColumnMajor => (1, ld as isize),
    }
}

/// Two-loop copy `dst[i, j] = src[i, j]` over an `extent0 x extent1` index space.
///
/// The loops are interchanged so the destination walks its smallest stride
/// innermost; pointer jumps are applied once per outer step.
#[allow(clippy::too_many_arguments)]
fn copy_2d<T: Copy>(
    extent0: usize,
    extent1: usize,
    src: &[T],
    src_strides: [isize; 2],
    src_offset: usize,
    dst: &mut [T],
    dst_strides: [isize; 2],
    dst_offset: usize,
) {
    if extent0 == 0 || extent1 == 0 {
        return;
    }
    let o = loop_interchange_order(&[extent0, extent1], &src_strides, &dst_strides);
    tracing::trace!(shape = ?o.shape, strides_src = ?o.strides_x, strides_dst = ?o.strides_y, "copy_2d");
    let (s0, s1) = (o.shape[0], o.shape[1]);
    let ds0 = o.strides_x[0];
    let ds1 = o.strides_x[1] - s0 as isize * o.strides_x[0];
    let dd0 = o.strides_y[0];
    let dd1 = o.strides_y[1] - s0 as isize * o.strides_y[0];

    let mut is = src_offset as isize;
    let mut id = dst_offset as isize;
    for _ in 0..s1 {
        for _ in 0..s0 {
            dst[id as usize] = src[is as usize];
            is += ds0;
            id += dd0;
        }
        is += ds1;
        id += dd1;
    }
}

/// Transpose the `m x n` matrix `a` into the `n x m` matrix `out`, explicit strides.
///
/// `out[j, i] = a[i, j]`. Input and output strides are independent, so this
/// also converts between row- and column-major storage.
///
/// ```rust
/// use strided_blas::lapack::ge_trans_ndarray;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let mut out = [0.0; 6];
/// ge_trans_ndarray(2, 3, &a, 3, 1, 0, &mut out, 2, 1, 0);
/// assert_eq!(out, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn ge_trans_ndarray<'o, T: Copy>(
    m: usize,
    n: usize,
    a: &[T],
    stride_a1: isize,
    stride_a2: isize,
    offset_a: usize,
    out: &'o mut [T],
    stride_out1: isize,
    stride_out2: isize,
    offset_out: usize,
) -> &'o mut [T] {
    // Index space is a's (i, j); out[j, i] lives at j*so1 + i*so2.
    copy_2d(
        m,
        n,
        a,
        [stride_a1, stride_a2],
        offset_a,
        out,
        [stride_out2, stride_out1],
        offset_out,
    );
    out
}

/// Transpose the `m x n` matrix `a` (leading dimension `lda`) into `out` (leading dimension `ldo`).
///
/// `out` is `n x m` in the same storage `order`.
#[allow(clippy::too_many_arguments)]
pub fn ge_trans<'o, T: Copy>(
    order: Order,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    out: &'o mut [T],
    ldo: usize,
) -> Result<&'o mut [T]> {
    let (a_cols, out_cols) = match order {
        Order::RowMajor => (n, m),
        Order::ColumnMajor => (m, n),
    };
    check_leading_dim("lda", lda, a_cols)?;
    check_leading_dim("ldo", ldo, out_cols)?;
    let (sa1, sa2) = matrix_strides(order, lda);
    let (so1, so2) = matrix_strides(order, ldo);
    Ok(ge_trans_ndarray(m, n, a, sa1, sa2, 0, out, so1, so2, 0))
}

/// Copy the upper or lower triangle (diagonal included), walking `a`'s contiguous axis.
#[allow(clippy::too_many_arguments)]
fn copy_triangle<T: Copy>(
    upper: bool,
    m: usize,
    n: usize,
    a: &[T],
    stride_a: [isize; 2],
    offset_a: usize,
    b: &mut [T],
    stride_b: [isize; 2],
    offset_b: usize,
) {
    let pos = |offset: usize, strides: [isize; 2], i: usize, j: usize| {
        (offset as isize + i as isize * strides[0] + j as isize * strides[1]) as usize
    };
    let mut put = |i: usize, j: usize| {
        b[pos(offset_b, stride_b, i, j)] = a[pos(offset_a, stride_a, i, j)];
    };
    match (upper, is_row_major(&stride_a)) {
        (true, true) => {
            for i in 0..m {
                for j in i..n {
                    put(i, j);
                }
            }
        }
        (true, false) => {
            for j in 0..n {
                for i in 0..=j.min(m - 1) {
                    put(i, j);
                }
            }
        }
        (false, true) => {
            for i in 0..m {
                for j in 0..=i.min(n - 1) {
                    put(i, j);
                }
            }
        }
        (false, false) => {
            for j in 0..n {
                for i in j..m {
                    put(i, j);
                }
            }
        }
    }
}

/// Copy all or one triangle of the `m x n` matrix `a` into `b`, explicit strides.
#[allow(clippy::too_many_arguments)]
pub fn lacpy_ndarray<'b, T: Copy>(
    uplo: Uplo,
    m: usize,
    n: usize,
    a: &[T],
    stride_a1: isize,
    stride_a2: isize,
    offset_a: usize,
    b: &'b mut [T],
    stride_b1: isize,
    stride_b2: isize,
    offset_b: usize,
) -> &'b mut [T] {
    if m == 0 || n == 0 {
        return b;
    }
    let sa = [stride_a1, stride_a2];
    let sb = [stride_b1, stride_b2];
    match uplo {
        Uplo::All => copy_2d(m, n, a, sa, offset_a, b, sb, offset_b),
        Uplo::Upper => copy_triangle(true, m, n, a, sa, offset_a, b, sb, offset_b),
        Uplo::Lower => copy_triangle(false, m, n, a, sa, offset_a, b, sb, offset_b),
    }
    b
}

/// Copy all or one triangle of the `m x n` matrix `a` (leading dimension `lda`) into `b`.
#[allow(clippy::too_many_arguments)]
pub fn lacpy<'b, T: Copy>(
    order: Order,
    uplo: Uplo,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    b: &'b mut [T],
    ldb: usize,
) -> Result<&'b mut [T]> {
    let cols = match order {
        Order::RowMajor => n,
        Order::ColumnMajor => m,
    };
    check_leading_dim("lda", lda, cols)?;
    check_leading_dim("ldb", ldb, cols)?;
    let (sa1, sa2) = matrix_strides(order, lda);
    let (sb1, sb2) = matrix_strides(order, ldb);
    Ok(lacpy_ndarray(uplo, m, n, a, sa1, sa2, 0, b, sb1, sb2, 0))
}

/// Rows `k1..=k2` in application order: ascending for a positive `inc_k`, descending otherwise.
fn pivot_rows(k1: usize, k2: usize, inc_k: isize) -> impl Iterator<Item = usize> {
    let forward = inc_k > 0;
    (0..=k2 - k1).map(move |t| if forward { k1 + t } else { k2 - t })
}

/// Apply the row interchanges recorded for rows `k1..=k2` to the `n` columns of `a`, explicit strides.
///
/// Row `k` is exchanged with row `ipiv[offset_ipiv + k * stride_ipiv]`.
/// A positive `inc_k` applies the interchanges from `k1` up to `k2`, a
/// negative one from `k2` down to `k1` (undoing a forward application), and
/// `0` leaves `a` untouched. Pivots are zero-based row indices.
///
/// ```rust
/// use strided_blas::lapack::laswp_ndarray;
///
/// // 3x2 row-major.
/// let mut a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// laswp_ndarray(2, &mut a, 2, 1, 0, 0, 1, 1, &[2, 2], 1, 0);
/// assert_eq!(a, [5.0, 6.0, 1.0, 2.0, 3.0, 4.0]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn laswp_ndarray<'a, T: Copy>(
    n: usize,
    a: &'a mut [T],
    stride_a1: isize,
    stride_a2: isize,
    offset_a: usize,
    k1: usize,
    k2: usize,
    inc_k: isize,
    ipiv: &[usize],
    stride_ipiv: isize,
    offset_ipiv: usize,
) -> &'a mut [T] {
    if n == 0 || k1 > k2 || inc_k == 0 {
        return a;
    }
    let pivot = |k: usize| ipiv[(offset_ipiv as isize + k as isize * stride_ipiv) as usize];
    let at = |row: usize, col: usize| {
        (offset_a as isize + row as isize * stride_a1 + col as isize * stride_a2) as usize
    };
    if is_row_major(&[stride_a1, stride_a2]) {
        tracing::trace!(n, k1, k2, inc_k, "laswp: row-wise interchanges");
        for k in pivot_rows(k1, k2, inc_k) {
            let p = pivot(k);
            if p == k {
                continue;
            }
            for j in 0..n {
                a.swap(at(k, j), at(p, j));
            }
        }
    } else {
        tracing::trace!(n, k1, k2, inc_k, "laswp: column-wise interchanges");
        for j in 0..n {
            for k in pivot_rows(k1, k2, inc_k) {
                let p = pivot(k);
                if p != k {
                    a.swap(at(k, j), at(p, j));
                }
            }
        }
    }
    a
}

/// Apply the row interchanges recorded for rows `k1..=k2` to the `n` columns of `a` (leading dimension `lda`).
///
/// `ipiv` is read with increment `|inc_ipiv|`, so row `k`'s pivot sits at
/// `ipiv[k * |inc_ipiv|]`. A negative increment applies the interchanges in
/// reverse and `0` leaves `a` untouched. Row-major storage requires
/// `lda >= max(1, n)`, column-major storage `lda >= max(1, k2 + 1)`.
#[allow(clippy::too_many_arguments)]
pub fn laswp<'a, T: Copy>(
    order: Order,
    n: usize,
    a: &'a mut [T],
    lda: usize,
    k1: usize,
    k2: usize,
    ipiv: &[usize],
    inc_ipiv: isize,
) -> Result<&'a mut [T]> {
    let extent = match order {
        Order::RowMajor => n,
        Order::ColumnMajor => k2 + 1,
    };
    check_leading_dim("lda", lda, extent)?;
    let (sa1, sa2) = matrix_strides(order, lda);
    Ok(laswp_ndarray(
        n,
        a,
        sa1,
        sa2,
        0,
        k1,
        k2,
        inc_ipiv.signum(),
        ipiv,
        inc_ipiv.abs(),
        0,
    ))
}
