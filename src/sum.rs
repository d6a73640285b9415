//! Summation kernels.
//!
//! All sums accumulate in the element type. `nansum` skips NaN values and
//! returns zero when nothing is left to add; `nansum_kbn` does the same with
//! Neumaier's compensated summation.
//!
//! The cumulative sums come in four flavours: plain recursive (`cusum`),
//! first- and second-order compensated (`cusum_kbn`, `cusum_kbn2`) and
//! pairwise (`cusum_pw`).

use crate::{stride_to_offset, strided_indices, StridedFloat};

/// Ordinary recursive sum, explicit offset. `n == 0` returns zero.
pub fn sum_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    if n > 0 && stride_x == 1 {
        return x[offset_x..offset_x + n].iter().fold(T::zero(), |acc, &v| acc + v);
    }
    strided_indices(n, stride_x, offset_x).fold(T::zero(), |acc, ix| acc + x[ix])
}

/// Ordinary recursive sum.
pub fn sum<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    sum_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Sum ignoring NaN values, explicit offset.
///
/// An input made only of NaN sums to `0.0`, not NaN.
///
/// ```rust
/// use strided_blas::sum::nansum_ndarray;
///
/// let x = [1.0, -2.0, f64::NAN, 2.0];
/// assert_eq!(nansum_ndarray(4, &x, 1, 0), 1.0);
/// assert_eq!(nansum_ndarray(1, &x, 1, 2), 0.0);
/// ```
pub fn nansum_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    strided_indices(n, stride_x, offset_x)
        .map(|ix| x[ix])
        .filter(|v| !v.is_nan())
        .fold(T::zero(), |acc, v| acc + v)
}

/// Sum ignoring NaN values.
pub fn nansum<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    nansum_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Compensated sum ignoring NaN values (Kahan-Babuska-Neumaier), explicit offset.
pub fn nansum_kbn_ndarray<T: StridedFloat>(n: usize, x: &[T], stride_x: isize, offset_x: usize) -> T {
    tracing::trace!(dtype = T::NAME, n, stride_x, "compensated nansum");
    let (total, comp) = strided_indices(n, stride_x, offset_x)
        .map(|ix| x[ix])
        .filter(|v| !v.is_nan())
        .fold((T::zero(), T::zero()), |(sum, comp), v| neumaier(sum, comp, v));
    total + comp
}

/// Compensated sum ignoring NaN values (Kahan-Babuska-Neumaier).
pub fn nansum_kbn<T: StridedFloat>(n: usize, x: &[T], stride_x: isize) -> T {
    nansum_kbn_ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
}

/// Cumulative sum starting from `init`, explicit offsets.
///
/// `y[i] = init + x[0] + ... + x[i]` in logical order.
#[allow(clippy::too_many_arguments)]
pub fn cusum_ndarray<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    let mut acc = init;
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        acc = acc + x[ix];
        y[iy] = acc;
    }
    y
}

/// Cumulative sum starting from `init`.
pub fn cusum<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    y: &'y mut [T],
    stride_y: isize,
) -> &'y mut [T] {
    cusum_ndarray(
        n,
        init,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// Inner block length of the pairwise cumulative sum.
const PAIRWISE_BLOCKSIZE: usize = 128;

/// Neumaier update of `(sum, comp)` with `v`.
#[inline(always)]
fn neumaier<T: StridedFloat>(sum: T, comp: T, v: T) -> (T, T) {
    let t = sum + v;
    let c = if sum.abs() >= v.abs() {
        (sum - t) + v
    } else {
        (v - t) + sum
    };
    (t, comp + c)
}

/// Cumulative sum with Neumaier compensation, explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn cusum_kbn_ndarray<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    let mut sum = init;
    let mut comp = T::zero();
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        (sum, comp) = neumaier(sum, comp, x[ix]);
        y[iy] = sum + comp;
    }
    y
}

/// Cumulative sum with Neumaier compensation.
pub fn cusum_kbn<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    y: &'y mut [T],
    stride_y: isize,
) -> &'y mut [T] {
    cusum_kbn_ndarray(
        n,
        init,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// Cumulative sum with second-order (Klein) compensation, explicit offsets.
///
/// The compensation term of the first-order update is itself summed with
/// Neumaier's scheme.
#[allow(clippy::too_many_arguments)]
pub fn cusum_kbn2_ndarray<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    let mut sum = init;
    let mut cs = T::zero();
    let mut ccs = T::zero();
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        let (t, c) = neumaier(sum, T::zero(), x[ix]);
        sum = t;
        let (t, cc) = neumaier(cs, T::zero(), c);
        cs = t;
        ccs = ccs + cc;
        y[iy] = sum + cs + ccs;
    }
    y
}

/// Cumulative sum with second-order (Klein) compensation.
pub fn cusum_kbn2<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    y: &'y mut [T],
    stride_y: isize,
) -> &'y mut [T] {
    cusum_kbn2_ndarray(
        n,
        init,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}

/// Cumulative sum by pairwise splitting, explicit offsets.
///
/// Runs of at most 128 elements keep a local running sum that is added to
/// the carry on output; longer runs split in two (first half a multiple of
/// eight) and the second half starts from the last output of the first.
#[allow(clippy::too_many_arguments)]
pub fn cusum_pw_ndarray<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [T],
    stride_y: isize,
    offset_y: usize,
) -> &'y mut [T] {
    if n == 0 {
        return y;
    }
    tracing::trace!(dtype = T::NAME, n, "pairwise cumulative sum");
    pairwise_cusum(n, init, x, stride_x, offset_x, y, stride_y, offset_y);
    y
}

#[allow(clippy::too_many_arguments)]
fn pairwise_cusum<T: StridedFloat>(
    n: usize,
    carry: T,
    x: &[T],
    stride_x: isize,
    offset_x: usize,
    y: &mut [T],
    stride_y: isize,
    offset_y: usize,
) {
    if n <= PAIRWISE_BLOCKSIZE {
        let mut local = T::zero();
        for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
            local = local + x[ix];
            y[iy] = carry + local;
        }
        return;
    }
    let mut half = n / 2;
    half -= half % 8;
    pairwise_cusum(half, carry, x, stride_x, offset_x, y, stride_y, offset_y);
    let last = (offset_y as isize + (half as isize - 1) * stride_y) as usize;
    let next_x = (offset_x as isize + half as isize * stride_x) as usize;
    let next_y = (offset_y as isize + half as isize * stride_y) as usize;
    pairwise_cusum(n - half, y[last], x, stride_x, next_x, y, stride_y, next_y);
}

/// Cumulative sum by pairwise splitting.
pub fn cusum_pw<'y, T: StridedFloat>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    y: &'y mut [T],
    stride_y: isize,
) -> &'y mut [T] {
    cusum_pw_ndarray(
        n,
        init,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
    )
}
