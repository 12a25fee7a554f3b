use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lapack64::{General, Lapack64, Layout, Lwork, Symmetric, Uplo};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Diagonally dominant, hence positive definite.
fn spd(n: usize) -> Vec<f64> {
    let mut a = random(n * n, 7);
    for i in 0..n {
        for j in 0..i {
            a[i * n + j] = a[j * n + i];
        }
        a[i * n + i] = n as f64 + 1.0;
    }
    a
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_row_to_col");
    for &n in &[16, 64, 256, 512] {
        let a = General::packed(Layout::RowMajor, n, n, random(n * n, 1)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| a.to_layout(Layout::ColMajor));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("convert_symmetric_half");
    for &n in &[16, 64, 256] {
        let a = Symmetric::new(Layout::RowMajor, n, n, Uplo::Upper, spd(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| a.to_layout(Layout::ColMajor));
        });
    }
    group.finish();
}

fn bench_potrf(c: &mut Criterion) {
    let lp = Lapack64::from_env().unwrap();
    for layout in [Layout::RowMajor, Layout::ColMajor] {
        let mut group = c.benchmark_group(format!("dpotrf_{layout:?}"));
        for &n in &[16, 64, 128] {
            let src = spd(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter(|| {
                    let mut a = Symmetric::new(layout, n, n, Uplo::Lower, src.clone()).unwrap();
                    lp.potrf(&mut a).unwrap()
                });
            });
        }
        group.finish();
    }
}

fn bench_geqrf_query_then_run(c: &mut Criterion) {
    let lp = Lapack64::from_env().unwrap();
    let mut group = c.benchmark_group("dgeqrf_query_then_run");
    for &n in &[16, 64, 128] {
        let m = 2 * n;
        let src = random(m * n, 3);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut a = General::packed(Layout::ColMajor, m, n, src.clone()).unwrap();
                let mut tau = vec![0.0; n];
                let mut size = [0.0];
                lp.geqrf(&mut a, &mut tau, &mut size, Lwork::Query).unwrap();
                let mut work = vec![0.0; size[0] as usize];
                let lwork = Lwork::all(&work);
                lp.geqrf(&mut a, &mut tau, &mut work, lwork).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_potrf, bench_geqrf_query_then_run);
criterion_main!(benches);
