//! Element-wise apply over dynamic-rank strided views.
//!
//! Nullary ([`fill`], [`fill_with`]), unary ([`map_into`], [`map_inplace`],
//! [`copy_into`]) and binary ([`zip_map2_into`]) forms share one shape: check
//! shapes, try the dense fast path, otherwise build a blocked plan and run a
//! stride-specialized inner loop per run.

use crate::kernel::{
    build_plan_fused, common_contiguous_layout, ensure_same_shape,
    for_each_inner_block_preordered, total_len,
};
use crate::simd;
use crate::{Result, StridedView, StridedViewMut};

// ============================================================================
// Inner loops
//
// Unit strides take a slice loop LLVM can vectorize; anything else walks raw
// pointers by their strides.
// ============================================================================

#[inline(always)]
unsafe fn inner_loop_fill<D: Copy>(dp: *mut D, ds: isize, len: usize, f: &mut impl FnMut() -> D) {
    if ds == 1 {
        for d in std::slice::from_raw_parts_mut(dp, len) {
            *d = f();
        }
    } else {
        let mut dp = dp;
        for _ in 0..len {
            *dp = f();
            dp = dp.offset(ds);
        }
    }
}

#[inline(always)]
unsafe fn inner_loop_inplace<D: Copy>(dp: *mut D, ds: isize, len: usize, f: &impl Fn(D) -> D) {
    if ds == 1 {
        let dst = std::slice::from_raw_parts_mut(dp, len);
        simd::dispatch_if_large(len, || {
            for d in dst.iter_mut() {
                *d = f(*d);
            }
        });
    } else {
        let mut dp = dp;
        for _ in 0..len {
            *dp = f(*dp);
            dp = dp.offset(ds);
        }
    }
}

#[inline(always)]
unsafe fn inner_loop_map1<D: Copy, A: Copy>(
    dp: *mut D,
    ds: isize,
    sp: *const A,
    ss: isize,
    len: usize,
    f: &impl Fn(A) -> D,
) {
    if ds == 1 && ss == 1 {
        let src = std::slice::from_raw_parts(sp, len);
        let dst = std::slice::from_raw_parts_mut(dp, len);
        simd::dispatch_if_large(len, || {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = f(*s);
            }
        });
    } else {
        let (mut dp, mut sp) = (dp, sp);
        for _ in 0..len {
            *dp = f(*sp);
            dp = dp.offset(ds);
            sp = sp.offset(ss);
        }
    }
}

#[inline(always)]
#[allow(clippy::too_many_arguments)]
unsafe fn inner_loop_map2<D: Copy, A: Copy, B: Copy>(
    dp: *mut D,
    ds: isize,
    ap: *const A,
    a_s: isize,
    bp: *const B,
    b_s: isize,
    len: usize,
    f: &impl Fn(A, B) -> D,
) {
    if ds == 1 && a_s == 1 && b_s == 1 {
        let a = std::slice::from_raw_parts(ap, len);
        let b = std::slice::from_raw_parts(bp, len);
        let dst = std::slice::from_raw_parts_mut(dp, len);
        simd::dispatch_if_large(len, || {
            for i in 0..len {
                dst[i] = f(a[i], b[i]);
            }
        });
    } else {
        let (mut dp, mut ap, mut bp) = (dp, ap, bp);
        for _ in 0..len {
            *dp = f(*ap, *bp);
            dp = dp.offset(ds);
            ap = ap.offset(a_s);
            bp = bp.offset(b_s);
        }
    }
}

// ============================================================================
// Nullary
// ============================================================================

/// Set every element of `dest` to `value`.
pub fn fill<D: Copy>(dest: &mut StridedViewMut<'_, D>, value: D) -> Result<()> {
    fill_with(dest, || value)
}

/// Set every element of `dest` to successive results of `f`.
///
/// `f` is called exactly once per element. The visiting order follows memory,
/// not the logical row- or column-major order, so stateful generators should
/// not rely on it.
pub fn fill_with<D: Copy>(dest: &mut StridedViewMut<'_, D>, mut f: impl FnMut() -> D) -> Result<()> {
    let total = total_len(dest.dims());
    if total == 0 {
        return Ok(());
    }
    let dst_ptr = dest.as_mut_ptr();
    let strides_list: [&[isize]; 1] = [dest.strides()];

    if common_contiguous_layout(dest.dims(), &strides_list).is_some() {
        tracing::trace!(total, "fill: contiguous fast path");
        let dst = unsafe { std::slice::from_raw_parts_mut(dst_ptr, total) };
        for d in dst.iter_mut() {
            *d = f();
        }
        return Ok(());
    }

    let plan = build_plan_fused(dest.dims(), &strides_list, Some(0), std::mem::size_of::<D>());
    for_each_inner_block_preordered(&plan, &[0], |offsets, len, strides| {
        unsafe { inner_loop_fill(dst_ptr.offset(offsets[0]), strides[0], len, &mut f) };
        Ok(())
    })
}

// ============================================================================
// Unary
// ============================================================================

/// Apply `f` element-wise from `src` into `dest`.
///
/// Source and destination may have different element types and unrelated
/// layouts; only their shapes must agree.
pub fn map_into<D: Copy, A: Copy>(
    dest: &mut StridedViewMut<'_, D>,
    src: &StridedView<'_, A>,
    f: impl Fn(A) -> D,
) -> Result<()> {
    ensure_same_shape(dest.dims(), src.dims())?;
    let total = total_len(dest.dims());
    if total == 0 {
        return Ok(());
    }

    let dst_ptr = dest.as_mut_ptr();
    let src_ptr = src.ptr();
    let strides_list: [&[isize]; 2] = [dest.strides(), src.strides()];

    if common_contiguous_layout(dest.dims(), &strides_list).is_some() {
        tracing::trace!(total, "map_into: contiguous fast path");
        let dst = unsafe { std::slice::from_raw_parts_mut(dst_ptr, total) };
        let src = unsafe { std::slice::from_raw_parts(src_ptr, total) };
        simd::dispatch_if_large(total, || {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = f(*s);
            }
        });
        return Ok(());
    }

    let elem_size = std::mem::size_of::<D>().max(std::mem::size_of::<A>());
    let plan = build_plan_fused(dest.dims(), &strides_list, Some(0), elem_size);
    for_each_inner_block_preordered(&plan, &[0, 0], |offsets, len, strides| {
        unsafe {
            inner_loop_map1(
                dst_ptr.offset(offsets[0]),
                strides[0],
                src_ptr.offset(offsets[1]),
                strides[1],
                len,
                &f,
            )
        };
        Ok(())
    })
}

/// Replace every element `x` of `dest` with `f(x)`.
///
/// This is the aliasing form of [`map_into`]: input and output are the same
/// view, and each position is read exactly once before it is written.
pub fn map_inplace<D: Copy>(dest: &mut StridedViewMut<'_, D>, f: impl Fn(D) -> D) -> Result<()> {
    let total = total_len(dest.dims());
    if total == 0 {
        return Ok(());
    }
    let dst_ptr = dest.as_mut_ptr();
    let strides_list: [&[isize]; 1] = [dest.strides()];

    if common_contiguous_layout(dest.dims(), &strides_list).is_some() {
        tracing::trace!(total, "map_inplace: contiguous fast path");
        unsafe { inner_loop_inplace(dst_ptr, 1, total, &f) };
        return Ok(());
    }

    let plan = build_plan_fused(dest.dims(), &strides_list, Some(0), std::mem::size_of::<D>());
    for_each_inner_block_preordered(&plan, &[0], |offsets, len, strides| {
        unsafe { inner_loop_inplace(dst_ptr.offset(offsets[0]), strides[0], len, &f) };
        Ok(())
    })
}

/// Copy `src` into `dest`; layouts may differ.
pub fn copy_into<T: Copy>(dest: &mut StridedViewMut<'_, T>, src: &StridedView<'_, T>) -> Result<()> {
    map_into(dest, src, |x| x)
}

// ============================================================================
// Binary
// ============================================================================

/// Binary element-wise operation: `dest[i] = f(a[i], b[i])`.
pub fn zip_map2_into<D: Copy, A: Copy, B: Copy>(
    dest: &mut StridedViewMut<'_, D>,
    a: &StridedView<'_, A>,
    b: &StridedView<'_, B>,
    f: impl Fn(A, B) -> D,
) -> Result<()> {
    ensure_same_shape(dest.dims(), a.dims())?;
    ensure_same_shape(dest.dims(), b.dims())?;
    let total = total_len(dest.dims());
    if total == 0 {
        return Ok(());
    }

    let dst_ptr = dest.as_mut_ptr();
    let a_ptr = a.ptr();
    let b_ptr = b.ptr();
    let strides_list: [&[isize]; 3] = [dest.strides(), a.strides(), b.strides()];

    if common_contiguous_layout(dest.dims(), &strides_list).is_some() {
        tracing::trace!(total, "zip_map2_into: contiguous fast path");
        unsafe { inner_loop_map2(dst_ptr, 1, a_ptr, 1, b_ptr, 1, total, &f) };
        return Ok(());
    }

    let elem_size = std::mem::size_of::<D>()
        .max(std::mem::size_of::<A>())
        .max(std::mem::size_of::<B>());
    let plan = build_plan_fused(dest.dims(), &strides_list, Some(0), elem_size);
    for_each_inner_block_preordered(&plan, &[0, 0, 0], |offsets, len, strides| {
        unsafe {
            inner_loop_map2(
                dst_ptr.offset(offsets[0]),
                strides[0],
                a_ptr.offset(offsets[1]),
                strides[1],
                b_ptr.offset(offsets[2]),
                strides[2],
                len,
                &f,
            )
        };
        Ok(())
    })
}
