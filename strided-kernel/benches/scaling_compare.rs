//! Scaling benchmarks for the traversal engine.
//!
//! - benchmark_reduce: full reduction over a reversed 1-D view, sizes 2^2 .. 2^20
//! - benchmark_transpose: 2-D copy from column-major into row-major, n = 16 .. 2048

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::hint::black_box;
use std::time::{Duration, Instant};
use strided_kernel::{copy_into, reduce, StridedArray, StridedView};

fn median(durations: &mut [Duration]) -> Duration {
    durations.sort();
    durations[durations.len() / 2]
}

/// Run enough iterations to fill roughly 100ms and report the median.
fn bench_adaptive(mut f: impl FnMut()) -> Duration {
    for _ in 0..3 {
        f();
    }

    let t0 = Instant::now();
    f();
    let single = t0.elapsed();
    let iters = if single.as_nanos() == 0 {
        10000
    } else {
        ((100_000_000u128 / single.as_nanos()) as usize).clamp(3, 10000)
    };

    let mut samples = Vec::with_capacity(iters);
    for _ in 0..iters {
        let t0 = Instant::now();
        f();
        samples.push(t0.elapsed());
    }
    median(&mut samples)
}

fn sizes_1d() -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut exp = 2.0f64;
    while exp <= 20.0 {
        sizes.push(2.0f64.powf(exp).ceil() as usize);
        exp += 1.5;
    }
    sizes
}

fn random_col_major(dims: &[usize], seed: u64) -> StridedArray<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    StridedArray::<f64>::from_fn_col_major(dims, |_| rng.sample(StandardNormal))
}

fn benchmark_reduce() {
    println!("=== benchmark_reduce (reversed 1D) ===");
    println!(
        "{:>10} {:>12} {:>12} {:>8}",
        "size", "naive (us)", "strided (us)", "ratio"
    );

    for (i, &n) in sizes_1d().iter().enumerate() {
        let a = random_col_major(&[n], i as u64);
        let data = a.data();

        let t_naive = bench_adaptive(|| {
            let mut acc = 0.0f64;
            for k in (0..n).rev() {
                acc += data[k];
            }
            black_box(acc);
        });

        let rev = StridedView::new(data, &[n], &[-1], n as isize - 1).unwrap();
        let t_strided = bench_adaptive(|| {
            black_box(reduce(&rev, |x| x, |a, b| a + b, 0.0).unwrap());
        });

        let ratio = t_strided.as_nanos() as f64 / t_naive.as_nanos().max(1) as f64;
        println!(
            "{:>10} {:>12.3} {:>12.3} {:>8.2}x",
            n,
            t_naive.as_nanos() as f64 / 1e3,
            t_strided.as_nanos() as f64 / 1e3,
            ratio
        );
    }
    println!();
}

fn benchmark_transpose() {
    println!("=== benchmark_transpose (col-major -> row-major) ===");
    println!(
        "{:>6} {:>12} {:>12} {:>8}",
        "n", "naive (us)", "strided (us)", "ratio"
    );

    for (i, &n) in [16usize, 64, 256, 512, 1024, 2048].iter().enumerate() {
        let a = random_col_major(&[n, n], 100 + i as u64);
        let mut b = StridedArray::<f64>::row_major(&[n, n]);

        let t_naive = {
            let src = a.data();
            let dst = b.data_mut();
            bench_adaptive(|| {
                for r in 0..n {
                    for c in 0..n {
                        dst[r * n + c] = src[c * n + r];
                    }
                }
                black_box(&dst[0]);
            })
        };

        let a_view = a.view();
        let t_strided = bench_adaptive(|| {
            copy_into(&mut b.view_mut(), &a_view).unwrap();
            black_box(b.data()[0]);
        });

        let ratio = t_strided.as_nanos() as f64 / t_naive.as_nanos().max(1) as f64;
        println!(
            "{:>6} {:>12.3} {:>12.3} {:>8.2}x",
            n,
            t_naive.as_nanos() as f64 / 1e3,
            t_strided.as_nanos() as f64 / 1e3,
            ratio
        );
    }
    println!();
}

fn main() {
    println!("Scaling benchmarks. Median timing.");
    println!();

    benchmark_reduce();
    benchmark_transpose();
}
