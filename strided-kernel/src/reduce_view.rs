//! Full reduction over dynamic-rank strided views.

use crate::kernel::{
    build_plan_fused, common_contiguous_layout, for_each_inner_block_preordered, total_len,
};
use crate::simd;
use crate::{Result, StridedView};

/// Full reduction with map function: `fold(init, op, map.(src))`.
///
/// Elements are visited in memory order, not logical order, so `reduce_fn`
/// should be associative and commutative if the result must not depend on
/// layout. An empty view returns `init`.
pub fn reduce<T: Copy, M, R, U>(
    src: &StridedView<'_, T>,
    map_fn: M,
    reduce_fn: R,
    init: U,
) -> Result<U>
where
    M: Fn(T) -> U,
    R: Fn(U, U) -> U,
    U: Clone,
{
    let total = total_len(src.dims());
    if total == 0 {
        return Ok(init);
    }
    let src_ptr = src.ptr();
    let strides_list: [&[isize]; 1] = [src.strides()];

    if common_contiguous_layout(src.dims(), &strides_list).is_some() {
        tracing::trace!(total, "reduce: contiguous fast path");
        let data = unsafe { std::slice::from_raw_parts(src_ptr, total) };
        return Ok(simd::dispatch_if_large(total, || {
            data.iter()
                .fold(init, |acc, &x| reduce_fn(acc, map_fn(x)))
        }));
    }

    let plan = build_plan_fused(src.dims(), &strides_list, None, std::mem::size_of::<T>());
    let mut acc = init;
    for_each_inner_block_preordered(&plan, &[0], |offsets, len, strides| {
        let mut ptr = unsafe { src_ptr.offset(offsets[0]) };
        let mut run = acc.clone();
        for _ in 0..len {
            run = reduce_fn(run, map_fn(unsafe { *ptr }));
            ptr = ptr.wrapping_offset(strides[0]);
        }
        acc = run;
        Ok(())
    })?;
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StridedArray;

    #[test]
    fn test_reduce_sum_contiguous() {
        let a = StridedArray::from_fn_row_major(&[10, 12], |ix| (ix[0] * 12 + ix[1]) as f64);
        let total = reduce(&a.view(), |x| x, |a, b| a + b, 0.0).unwrap();
        assert_eq!(total, (0..120).sum::<i32>() as f64);
    }

    #[test]
    fn test_reduce_strided_count() {
        let data: Vec<f64> = (0..24).map(f64::from).collect();
        // Columns 0 and 2 of a 4x6 row-major matrix, read transposed.
        let v = StridedView::new(&data, &[2, 4], &[2, 6], 0).unwrap();
        let count = reduce(&v, |_| 1usize, |a, b| a + b, 0).unwrap();
        assert_eq!(count, 8);
        let sum = reduce(&v, |x| x, |a, b| a + b, 0.0).unwrap();
        assert_eq!(sum, 0.0 + 6.0 + 12.0 + 18.0 + 2.0 + 8.0 + 14.0 + 20.0);
    }

    #[test]
    fn test_reduce_empty_returns_init() {
        let data: Vec<f64> = vec![];
        let v = StridedView::new(&data, &[3, 0], &[1, 3], 0).unwrap();
        assert_eq!(reduce(&v, |x| x, f64::max, f64::NEG_INFINITY).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_reduce_non_copy_accumulator() {
        let data = vec![3u8, 1, 2];
        let v = StridedView::new(&data, &[3], &[-1], 2).unwrap();
        let seen = reduce(&v, |x| vec![x], |mut a, b| {
            a.extend(b);
            a
        }, Vec::new())
        .unwrap();
        assert_eq!(seen, vec![2, 1, 3]);
    }
}
