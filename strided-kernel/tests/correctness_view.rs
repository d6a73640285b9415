use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use strided_kernel::{
    copy_into, fill, map_inplace, map_into, reduce, zip_map2_into, StridedArray, StridedError,
    StridedView, StridedViewMut,
};

fn make_tensor(rows: usize, cols: usize) -> StridedArray<f64> {
    StridedArray::from_fn_row_major(&[rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

fn random_col_major(dims: &[usize], seed: u64) -> StridedArray<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    StridedArray::from_fn_col_major(dims, |_| rng.sample(StandardNormal))
}

/// Visit every multi-index of `dims` in row-major order.
fn for_each_index(dims: &[usize], mut f: impl FnMut(&[usize])) {
    let n: usize = dims.iter().product();
    let mut idx = vec![0usize; dims.len()];
    for _ in 0..n {
        f(&idx);
        for d in (0..dims.len()).rev() {
            idx[d] += 1;
            if idx[d] < dims[d] {
                break;
            }
            idx[d] = 0;
        }
    }
}

#[test]
fn test_map_into_transposed() {
    let a = make_tensor(8, 5);
    let a_view = a.view();
    let a_t = a_view.permute(&[1, 0]).unwrap();

    let mut out = StridedArray::<f64>::row_major(&[5, 8]);
    map_into(&mut out.view_mut(), &a_t, |x| x * 2.0).unwrap();

    for i in 0..5 {
        for j in 0..8 {
            assert_relative_eq!(out.get(&[i, j]), a.get(&[j, i]) * 2.0);
        }
    }
}

#[test]
fn test_zip_map2_mixed_strides() {
    let a = make_tensor(6, 4);
    let b = random_col_major(&[4, 6], 7);
    let a_t = a.view().permute(&[1, 0]).unwrap();

    let mut out = StridedArray::<f64>::row_major(&[4, 6]);
    zip_map2_into(&mut out.view_mut(), &a_t, &b.view(), |x, y| x - y).unwrap();

    for i in 0..4 {
        for j in 0..6 {
            assert_relative_eq!(out.get(&[i, j]), a.get(&[j, i]) - b.get(&[i, j]));
        }
    }
}

#[test]
fn test_copy_into_permuted_4d_matches_naive() {
    let dims = [3usize, 4, 5, 6];
    let src = random_col_major(&dims, 42);
    let perm = [2usize, 0, 3, 1];
    let src_p = src.view().permute(&perm).unwrap();
    let out_dims: Vec<usize> = perm.iter().map(|&p| dims[p]).collect();

    let mut out = StridedArray::<f64>::row_major(&out_dims);
    copy_into(&mut out.view_mut(), &src_p).unwrap();

    for_each_index(&out_dims, |ix| {
        let mut orig = [0usize; 4];
        for (k, &p) in perm.iter().enumerate() {
            orig[p] = ix[k];
        }
        assert_eq!(out.get(ix), src.get(&orig));
    });
}

#[test]
fn test_copy_into_large_transpose_is_blocked_and_exact() {
    // Large enough that the plan tiles both dimensions.
    let n = 300;
    let src = random_col_major(&[n, n], 3);
    let mut out = StridedArray::<f64>::row_major(&[n, n]);
    copy_into(&mut out.view_mut(), &src.view()).unwrap();
    for i in (0..n).step_by(37) {
        for j in (0..n).step_by(11) {
            assert_eq!(out.get(&[i, j]), src.get(&[i, j]));
        }
    }
    let s1 = reduce(&src.view(), |x| x, |a, b| a + b, 0.0).unwrap();
    let s2 = reduce(&out.view(), |x| x, |a, b| a + b, 0.0).unwrap();
    assert_relative_eq!(s1, s2, max_relative = 1e-10);
}

#[test]
fn test_fill_then_reduce_on_flipped_view() {
    let mut data = vec![1.0f64; 20];
    {
        // Every other column, walked right to left.
        let v = StridedViewMut::new(&mut data, &[4, 3], &[5, 2], 0).unwrap();
        let mut flipped = v.flip(1).unwrap();
        fill(&mut flipped, 9.0).unwrap();
        map_inplace(&mut flipped, |x| x + 1.0).unwrap();
    }
    for r in 0..4 {
        assert_eq!(&data[r * 5..r * 5 + 5], &[10.0, 1.0, 10.0, 1.0, 10.0]);
    }
    let v = StridedView::new(&data, &[4, 5], &[5, 1], 0).unwrap();
    assert_eq!(reduce(&v, |x| x, |a, b| a + b, 0.0).unwrap(), 128.0);
}

#[test]
fn test_reduce_max_with_broadcast() {
    let row = vec![1.0f64, 5.0, -3.0];
    let v = StridedView::new(&row, &[1, 3], &[3, 1], 0)
        .unwrap()
        .broadcast(&[4, 3])
        .unwrap();
    let count = reduce(&v, |_| 1usize, |a, b| a + b, 0).unwrap();
    assert_eq!(count, 12);
    assert_eq!(reduce(&v, |x| x, f64::max, f64::NEG_INFINITY).unwrap(), 5.0);
}

#[test]
fn test_map_into_rank_mismatch() {
    let a = make_tensor(2, 3);
    let mut out = StridedArray::<f64>::row_major(&[6]);
    let err = map_into(&mut out.view_mut(), &a.view(), |x| x).unwrap_err();
    assert!(matches!(err, StridedError::RankMismatch(1, 2)));
}

#[test]
fn test_rank0_view_maps_single_element() {
    let src = vec![3.0f64];
    let a = StridedView::new(&src, &[], &[], 0).unwrap();
    let mut dst = vec![0.0f64];
    {
        let mut d = StridedViewMut::new(&mut dst, &[], &[], 0).unwrap();
        map_into(&mut d, &a, |x| x * x).unwrap();
    }
    assert_eq!(dst, vec![9.0]);
}

#[test]
fn test_random_layouts_match_naive_map() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..20 {
        let dims: Vec<usize> = (0..rng.gen_range(1..=4))
            .map(|_| rng.gen_range(1..=7))
            .collect();
        let src = random_col_major(&dims, rng.gen());
        let mut perm: Vec<usize> = (0..dims.len()).collect();
        for i in (1..perm.len()).rev() {
            perm.swap(i, rng.gen_range(0..=i));
        }
        let view = src.view().permute(&perm).unwrap();
        let flip_dim = rng.gen_range(0..dims.len());
        let view = view.flip(flip_dim).unwrap();

        let mut out = StridedArray::<f64>::row_major(view.dims());
        map_into(&mut out.view_mut(), &view, |x| 3.0 * x + 1.0).unwrap();

        for_each_index(view.dims(), |ix| {
            assert_eq!(out.get(ix), 3.0 * view.get(ix) + 1.0);
        });
    }
}
