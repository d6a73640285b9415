//! Generic 1-D strided loops.
//!
//! Every element-wise kernel in this crate is an instantiation of one of the
//! loops here. Each loop comes in two forms:
//!
//! - `name_ndarray(n, x, stride_x, offset_x, ...)`: explicit offsets, the
//!   canonical implementation
//! - `name(n, x, stride_x, ...)`: derives each offset with
//!   [`stride_to_offset`] and forwards to the ndarray form
//!
//! Positions are produced by [`strided_indices`] so the hot loop only adds.
//! When every stride is `1` the loop walks plain slices instead.
//!
//! A position outside a buffer panics through slice indexing; the caller is
//! responsible for consistent `(n, stride, offset)` triples.

use crate::{stride_to_offset, strided_indices};

#[inline(always)]
fn unit_strides(strides: &[isize]) -> bool {
    strides.iter().all(|&s| s == 1)
}

// ============================================================================
// Nullary
// ============================================================================

/// Fill `n` positions of `y` with values produced by `f`, explicit offset.
pub fn nullary_ndarray<B, F>(n: usize, y: &mut [B], stride_y: isize, offset_y: usize, mut f: F) -> &mut [B]
where
    F: FnMut() -> B,
{
    if n == 0 {
        return y;
    }
    if stride_y == 1 {
        for out in &mut y[offset_y..offset_y + n] {
            *out = f();
        }
        return y;
    }
    for iy in strided_indices(n, stride_y, offset_y) {
        y[iy] = f();
    }
    y
}

/// Fill `n` positions of `y` with values produced by `f`.
pub fn nullary<B, F>(n: usize, y: &mut [B], stride_y: isize, f: F) -> &mut [B]
where
    F: FnMut() -> B,
{
    nullary_ndarray(n, y, stride_y, stride_to_offset(n, stride_y), f)
}

// ============================================================================
// Unary
// ============================================================================

/// `y[iy] = f(x[ix])` for `n` positions, explicit offsets.
///
/// ```rust
/// use strided_blas::strided::unary_ndarray;
///
/// let x = [1.0, -2.0, 3.0, -4.0];
/// let mut y = [0.0; 4];
/// unary_ndarray(2, &x, 2, 1, &mut y, -1, 1, |v: f64| v * 10.0);
/// assert_eq!(y, [-40.0, -20.0, 0.0, 0.0]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn unary_ndarray<'y, A, B, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: usize,
    y: &'y mut [B],
    stride_y: isize,
    offset_y: usize,
    f: F,
) -> &'y mut [B]
where
    A: Copy,
    F: Fn(A) -> B,
{
    if n == 0 {
        return y;
    }
    if unit_strides(&[stride_x, stride_y]) {
        tracing::trace!(n, "unary: unit-stride fast path");
        let src = &x[offset_x..offset_x + n];
        for (out, &v) in y[offset_y..offset_y + n].iter_mut().zip(src) {
            *out = f(v);
        }
        return y;
    }
    for (ix, iy) in strided_indices(n, stride_x, offset_x).zip(strided_indices(n, stride_y, offset_y)) {
        y[iy] = f(x[ix]);
    }
    y
}

/// `y[iy] = f(x[ix])` for `n` positions.
pub fn unary<'y, A, B, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &'y mut [B],
    stride_y: isize,
    f: F,
) -> &'y mut [B]
where
    A: Copy,
    F: Fn(A) -> B,
{
    unary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
    )
}

/// Apply `f` to `n` positions of `x` in place, explicit offset.
///
/// Each position is read once and written once, so the loop is safe for the
/// single-buffer case that `unary` cannot express under Rust's borrow rules.
pub fn unary_inplace_ndarray<T, F>(n: usize, x: &mut [T], stride_x: isize, offset_x: usize, f: F) -> &mut [T]
where
    T: Copy,
    F: Fn(T) -> T,
{
    if n == 0 {
        return x;
    }
    if stride_x == 1 {
        for v in &mut x[offset_x..offset_x + n] {
            *v = f(*v);
        }
        return x;
    }
    for ix in strided_indices(n, stride_x, offset_x) {
        x[ix] = f(x[ix]);
    }
    x
}

/// Apply `f` to `n` positions of `x` in place.
pub fn unary_inplace<T, F>(n: usize, x: &mut [T], stride_x: isize, f: F) -> &mut [T]
where
    T: Copy,
    F: Fn(T) -> T,
{
    unary_inplace_ndarray(n, x, stride_x, stride_to_offset(n, stride_x), f)
}

// ============================================================================
// Masked unary
// ============================================================================

/// `y[iy] = f(x[ix])` where `mask[im] == 0`, explicit offsets.
///
/// A nonzero mask value excludes the position: the output is left untouched.
#[allow(clippy::too_many_arguments)]
pub fn mskunary_ndarray<'y, A, B, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: usize,
    mask: &[u8],
    stride_mask: isize,
    offset_mask: usize,
    y: &'y mut [B],
    stride_y: isize,
    offset_y: usize,
    f: F,
) -> &'y mut [B]
where
    A: Copy,
    F: Fn(A) -> B,
{
    if n == 0 {
        return y;
    }
    let xs = strided_indices(n, stride_x, offset_x);
    let ms = strided_indices(n, stride_mask, offset_mask);
    let ys = strided_indices(n, stride_y, offset_y);
    for ((ix, im), iy) in xs.zip(ms).zip(ys) {
        if mask[im] == 0 {
            y[iy] = f(x[ix]);
        }
    }
    y
}

/// `y[iy] = f(x[ix])` where `mask[im] == 0`.
#[allow(clippy::too_many_arguments)]
pub fn mskunary<'y, A, B, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    mask: &[u8],
    stride_mask: isize,
    y: &'y mut [B],
    stride_y: isize,
    f: F,
) -> &'y mut [B]
where
    A: Copy,
    F: Fn(A) -> B,
{
    mskunary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        mask,
        stride_mask,
        stride_to_offset(n, stride_mask),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
    )
}

// ============================================================================
// Binary
// ============================================================================

/// `z[iz] = f(x[ix], y[iy])` for `n` positions, explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn binary_ndarray<'z, A, B, C, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: usize,
    y: &[B],
    stride_y: isize,
    offset_y: usize,
    z: &'z mut [C],
    stride_z: isize,
    offset_z: usize,
    f: F,
) -> &'z mut [C]
where
    A: Copy,
    B: Copy,
    F: Fn(A, B) -> C,
{
    if n == 0 {
        return z;
    }
    if unit_strides(&[stride_x, stride_y, stride_z]) {
        tracing::trace!(n, "binary: unit-stride fast path");
        let xs = &x[offset_x..offset_x + n];
        let ys = &y[offset_y..offset_y + n];
        for ((out, &a), &b) in z[offset_z..offset_z + n].iter_mut().zip(xs).zip(ys) {
            *out = f(a, b);
        }
        return z;
    }
    let xs = strided_indices(n, stride_x, offset_x);
    let ys = strided_indices(n, stride_y, offset_y);
    let zs = strided_indices(n, stride_z, offset_z);
    for ((ix, iy), iz) in xs.zip(ys).zip(zs) {
        z[iz] = f(x[ix], y[iy]);
    }
    z
}

/// `z[iz] = f(x[ix], y[iy])` for `n` positions.
#[allow(clippy::too_many_arguments)]
pub fn binary<'z, A, B, C, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &'z mut [C],
    stride_z: isize,
    f: F,
) -> &'z mut [C]
where
    A: Copy,
    B: Copy,
    F: Fn(A, B) -> C,
{
    binary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        f,
    )
}
