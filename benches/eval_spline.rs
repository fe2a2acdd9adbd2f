use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use splinegrid::evaluate::{eval_spline_cube, eval_spline_grid};
use splinegrid::grid::UniformIntGrid;
use splinegrid::spline::{CubicSpline, Extrapolation, RadialFunction};
use splinegrid::{Matrix3, Vector3};
use std::f64::consts::PI;

/// Smooth bump of radius `rcut` tabulated on `n` knots
fn bump(rcut: f64, n: usize) -> CubicSpline {
    let x = (0..n).map(|i| rcut * i as f64 / (n - 1) as f64).collect();
    CubicSpline::from_fn(
        x,
        |r| 1.0 + (PI * r / rcut).cos(),
        |r| -PI / rcut * (PI * r / rcut).sin(),
        Extrapolation::Zero,
    )
    .unwrap()
}

/// Single spline lookups
fn bench_spline_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline");
    let spline = bump(3.0, 100);

    group.bench_function("value", |b| b.iter(|| spline.value(black_box(1.234))));

    let n = 10000;
    let distances: Vec<f64> = (0..n).map(|i| 3.0 * i as f64 / n as f64).collect();
    let mut values = vec![0.0; n];
    group.bench_with_input(BenchmarkId::new("eval", n), &distances, |b, distances| {
        b.iter(|| spline.eval(distances, &mut values))
    });

    group.finish();
}

/// Periodic uniform grids of increasing size
fn bench_cube(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube");
    let spline = bump(3.0, 100);
    let center = Vector3::new(0.3, -0.2, 0.1);

    for n in [16, 32, 64] {
        let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * (8.0 / n as f64), [n; 3], [true; 3])
            .unwrap();
        let mut output = grid.zeros();
        group.bench_with_input(BenchmarkId::new("periodic", n), &grid, |b, grid| {
            b.iter(|| eval_spline_cube(&spline, black_box(&center), &mut output, grid))
        });
    }

    // the cutoff sphere spans several periods
    let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * 0.125, [16; 3], [true; 3]).unwrap();
    let mut output = grid.zeros();
    group.bench_function("multi_period", |b| {
        b.iter(|| eval_spline_cube(&spline, black_box(&center), &mut output, &grid))
    });

    group.finish();
}

/// The same grid points evaluated without grid structure
fn bench_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("points");
    let spline = bump(3.0, 100);
    let center = Vector3::new(0.3, -0.2, 0.1);

    for n in [16, 32] {
        let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * (8.0 / n as f64), [n; 3], [true; 3])
            .unwrap();
        let points = grid.points();
        let mut output = grid.zeros();
        group.bench_with_input(BenchmarkId::new("periodic", n), &points, |b, points| {
            b.iter(|| eval_spline_grid(&spline, black_box(&center), &mut output, points, grid.cell()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spline_value, bench_cube, bench_points);
criterion_main!(benches);
