//! Compare grid and point-cloud evaluation of a periodic promolecule.
//!
//! A few smooth pro-atom densities are placed in a cubic box, evaluated
//! once through the block-decomposed uniform grid path and once through the
//! generic point path. Both must agree; the integral converges to the
//! analytic number of electrons as the grid is refined.
//!
//! Run with: `cargo run --example cube_vs_points`

use splinegrid::promolecule::Promolecule;
use splinegrid::spline::{CubicSpline, Extrapolation};
use splinegrid::{grid::UniformIntGrid, Matrix3, Vector3};
use std::f64::consts::PI;
use std::time::Instant;

/// Normalized bump `N (1 + cos(πr/R))` holding `electrons` electrons
fn pro_atom(electrons: f64, radius: f64) -> anyhow::Result<CubicSpline> {
    let norm = electrons / (4.0 * PI * radius.powi(3) * (1.0 / 3.0 - 2.0 / (PI * PI)));
    let x = (0..200).map(|i| radius * i as f64 / 199.0).collect();
    CubicSpline::from_fn(
        x,
        |r| norm * (1.0 + (PI * r / radius).cos()),
        |r| -norm * PI / radius * (PI * r / radius).sin(),
        Extrapolation::Zero,
    )
}

fn main() -> anyhow::Result<()> {
    let box_length = 6.0; // bohr
    let atoms = [
        (Vector3::new(0.0, 0.0, 0.0), 8.0, 2.5),
        (Vector3::new(1.4, 1.1, 0.0), 1.0, 1.8),
        (Vector3::new(-1.4, 1.1, 0.0), 1.0, 1.8),
        (Vector3::new(2.9, -2.9, 2.9), 10.0, 3.2),
    ];
    let electrons: f64 = atoms.iter().map(|(_, n, _)| n).sum();

    let mut promolecule = Promolecule::default();
    for (center, n, radius) in atoms {
        promolecule.push(center, pro_atom(n, radius)?);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║   Periodic promolecule: grid vs point evaluation, box = {box_length:.1} bohr       ║");
    println!("║   {} centers, {electrons:.0} electrons                                          ║", atoms.len());
    println!("╚══════════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌──────┬──────────┬──────────────┬──────────────┬────────────┬────────────┐");
    println!("│  n   │  points  │   integral   │  max |Δ|     │  cube (ms) │ points (ms)│");
    println!("├──────┼──────────┼──────────────┼──────────────┼────────────┼────────────┤");

    for n in [12, 24, 36, 48] {
        let spacing = box_length / n as f64;
        let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * spacing, [n; 3], [true; 3])?;

        let start = Instant::now();
        let mut cube = grid.zeros();
        promolecule.eval_cube(&grid, &mut cube);
        let cube_time = start.elapsed();

        let points = grid.points();
        let start = Instant::now();
        let mut scattered = grid.zeros();
        promolecule.eval_points(&points, grid.cell(), &mut scattered);
        let points_time = start.elapsed();

        let max_difference = cube
            .iter()
            .zip(&scattered)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);

        println!(
            "│ {:>4} │ {:>8} │ {:>12.6} │ {:>12.2e} │ {:>10.2} │ {:>10.2} │",
            n,
            grid.npoint(),
            grid.integrate(&[&cube]),
            max_difference,
            cube_time.as_secs_f64() * 1e3,
            points_time.as_secs_f64() * 1e3
        );
    }

    println!("└──────┴──────────┴──────────────┴──────────────┴────────────┴────────────┘");
    println!();
    println!("Legend: max |Δ| = largest difference between grid and point evaluation");
    println!();
    Ok(())
}
