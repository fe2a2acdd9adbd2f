// Copyright 2024 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! # Evaluation of radial functions on grids
//!
//! Both drivers add the contribution of a single radial function centered
//! at `center` to caller-owned output, including all periodic images
//! within the cutoff. A point further away than the cutoff is skipped
//! unless the function has a tail.
//!
//! - [`eval_spline_cube`] works on a [`UniformIntGrid`] and decomposes the
//!   covering index range into wrap-free blocks.
//! - [`eval_spline_grid`] works on an arbitrary list of points embedded in a
//!   periodic [`Cell`].

use crate::grid::UniformIntGrid;
use crate::index::Block3Iterator;
use crate::spline::RadialFunction;
use crate::{Cell, Vector3};
use itertools::iproduct;
use rayon::prelude::*;

/// Add a radial function to data on a uniform grid.
///
/// `output` holds one value per grid point in storage order. Blocks are
/// visited one after another since different blocks fold onto the same
/// storage; within a block, rows of the grid are updated in parallel.
///
/// # Examples
/// ~~~
/// use splinegrid::evaluate::eval_spline_cube;
/// use splinegrid::grid::UniformIntGrid;
/// use splinegrid::spline::{CubicSpline, Extrapolation};
/// use splinegrid::{Matrix3, Vector3};
/// let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity(), [4, 1, 1], [true, false, false]).unwrap();
/// let hat = CubicSpline::new(vec![0.0, 1.5], vec![1.0, 0.0], vec![-1.0 / 1.5; 2], Extrapolation::Zero).unwrap();
/// let mut output = grid.zeros();
/// eval_spline_cube(&hat, &Vector3::zeros(), &mut output, &grid);
/// assert_eq!(output[2], 0.0);
/// assert!((output[3] - output[1]).abs() < 1e-12);
/// ~~~
pub fn eval_spline_cube<F: RadialFunction + ?Sized>(
    spline: &F,
    center: &Vector3,
    output: &mut [f64],
    grid: &UniformIntGrid,
) {
    assert_eq!(output.len(), grid.npoint(), "output does not match the grid size");
    let rcut = spline.cutoff();
    let tail = spline.has_tail();
    let (begin, end) = grid.ranges_rcut(center, rcut);
    let shape = grid.shape();
    let b3i = Block3Iterator::new(&begin, &end, shape);
    let _span = tracing::debug_span!("eval_spline_cube", nblock = b3i.nblock(), rcut, tail).entered();

    for b in b3i.blocks() {
        let (cube_begin, cube_end) = b3i.cube_ranges(&b);
        let first_row = (cube_begin[0] * shape[1]) as usize;
        let nrow = ((cube_end[0] - cube_begin[0]) * shape[1]) as usize;
        output
            .par_chunks_mut(shape[2] as usize)
            .enumerate()
            .skip(first_row)
            .take(nrow)
            .filter(|(irow, _)| {
                let i1 = *irow as i64 % shape[1];
                (cube_begin[1]..cube_end[1]).contains(&i1)
            })
            .for_each(|(irow, row)| {
                let i0 = irow as i64 / shape[1];
                let i1 = irow as i64 % shape[1];
                for i2 in cube_begin[2]..cube_end[2] {
                    let j = b3i.translate(&b, &[i0, i1, i2]);
                    let distance = grid.dist_grid_point(center, &j);
                    if distance < rcut || tail {
                        row[i2 as usize] += spline.value(distance);
                    }
                }
            });
    }
}

/// Add a radial function to values on arbitrary points.
///
/// Every point receives the sum over all periodic images of `cell` that may
/// lie within the cutoff. Points are processed in parallel; the images of a
/// single point are summed sequentially.
pub fn eval_spline_grid<F: RadialFunction + ?Sized>(
    spline: &F,
    center: &Vector3,
    output: &mut [f64],
    points: &[Vector3],
    cell: &Cell,
) {
    assert_eq!(output.len(), points.len(), "output and points differ in length");
    let rcut = spline.cutoff();
    let tail = spline.has_tail();
    let _span = tracing::debug_span!("eval_spline_grid", npoint = points.len(), nvec = cell.nvec(), rcut, tail)
        .entered();

    output
        .par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(value, point)| {
            let delta = point - center;
            let (begin, end) = cell.ranges_rcut(&delta, rcut);
            for (i0, i1, i2) in iproduct!(begin[0]..end[0], begin[1]..end[1], begin[2]..end[2]) {
                let distance = cell.add_rvec(&delta, &[i0, i1, i2]).norm();
                if distance < rcut || tail {
                    *value += spline.value(distance);
                }
            }
        });
}
