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

use super::integrate::{sum_moments, sum_product};
use super::{Moments, UniformIntGrid};
use crate::index::{Block3Iterator, Cube3Iterator, Range3Iterator};
use crate::Vector3;
use rayon::prelude::*;

/// Rectangular window `[begin, end)` on a [`UniformIntGrid`].
///
/// The window may reach beyond the grid along periodic axes. Local data
/// has one value per window point, stored row-major. [`extend`](Self::extend)
/// gathers grid data into the window and [`wrap`](Self::wrap) folds window
/// data back onto the grid, summing all images that land on the same point.
///
/// # Examples
/// ~~~
/// use splinegrid::grid::UniformIntGrid;
/// use splinegrid::{Matrix3, Vector3};
/// let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity(), [3, 1, 1], [true; 3]).unwrap();
/// let window = grid.window([-1, 0, 0], [5, 1, 1]);
/// let mut local = window.zeros();
/// window.extend(&[1.0, 2.0, 3.0], &mut local);
/// assert_eq!(local, vec![3.0, 1.0, 2.0, 3.0, 1.0, 2.0]);
///
/// let mut target = grid.zeros();
/// window.wrap(&local, &mut target);
/// assert_eq!(target, vec![2.0, 4.0, 6.0]);
/// ~~~
#[derive(Debug, Clone, Copy)]
pub struct UniformIntGridWindow<'a> {
    grid: &'a UniformIntGrid,
    begin: [i64; 3],
    end: [i64; 3],
    shape: [i64; 3],
}

impl<'a> UniformIntGridWindow<'a> {
    pub fn new(grid: &'a UniformIntGrid, begin: [i64; 3], end: [i64; 3]) -> Self {
        assert!(
            (0..3).all(|axis| begin[axis] <= end[axis]),
            "window end {end:?} lies before begin {begin:?}"
        );
        Self {
            grid,
            begin,
            end,
            shape: [0, 1, 2].map(|axis| end[axis] - begin[axis]),
        }
    }

    pub fn grid(&self) -> &'a UniformIntGrid {
        self.grid
    }

    pub fn begin(&self) -> &[i64; 3] {
        &self.begin
    }

    pub fn end(&self) -> &[i64; 3] {
        &self.end
    }

    pub fn shape(&self) -> &[i64; 3] {
        &self.shape
    }

    #[inline]
    pub fn npoint(&self) -> usize {
        self.shape.iter().product::<i64>() as usize
    }

    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.npoint()]
    }

    /// Local storage offset of the unwrapped grid index `j`
    #[inline(always)]
    pub fn offset(&self, j: &[i64; 3]) -> usize {
        let local = [0, 1, 2].map(|axis| j[axis] - self.begin[axis]);
        debug_assert!((0..3).all(|axis| (0..self.shape[axis]).contains(&local[axis])));
        ((local[0] * self.shape[1] + local[1]) * self.shape[2] + local[2]) as usize
    }

    /// Copy grid data into the window, repeating it periodically
    pub fn extend(&self, source: &[f64], local: &mut [f64]) {
        assert_eq!(source.len(), self.grid.npoint(), "source does not match the grid size");
        assert_eq!(local.len(), self.npoint(), "local data does not match the window size");
        let shape = self.grid.shape();
        let r3i = Range3Iterator::new(Some(&self.begin), &self.end, shape);
        local
            .par_iter_mut()
            .enumerate()
            .for_each(|(ipoint, value)| {
                let (_, jwrap) = r3i.point_wrapped(ipoint);
                *value = source[self.grid.offset(&jwrap)];
            });
    }

    /// Add window data to the grid, folding each point onto its periodic image
    pub fn wrap(&self, local: &[f64], target: &mut [f64]) {
        assert_eq!(local.len(), self.npoint(), "local data does not match the window size");
        assert_eq!(target.len(), self.grid.npoint(), "target does not match the grid size");
        let b3i = Block3Iterator::new(&self.begin, &self.end, self.grid.shape());
        for b in b3i.blocks() {
            let (cube_begin, cube_end) = b3i.cube_ranges(&b);
            for jwrap in Cube3Iterator::new(Some(&cube_begin), &cube_end).iter() {
                let j = b3i.translate(&b, &jwrap);
                target[self.grid.offset(&jwrap)] += local[self.offset(&j)];
            }
        }
    }

    /// Integral of the product of local data arrays
    pub fn integrate(&self, factors: &[&[f64]]) -> f64 {
        sum_product(factors, self.npoint(), self.grid.grid_cell().volume())
    }

    /// Moments about `center` of the product of local data arrays.
    ///
    /// Positions are those of the unwrapped window points, so a window
    /// around an atom sees a contiguous neighborhood of `center`.
    pub fn integrate_moments(&self, factors: &[&[f64]], center: &Vector3, moments: Moments) -> Vec<f64> {
        let c3i = Cube3Iterator::new(Some(&self.begin), &self.end);
        sum_moments(
            factors,
            self.npoint(),
            self.grid.grid_cell().volume(),
            |ipoint| self.grid.grid_point(&c3i.point(ipoint)),
            center,
            moments,
        )
    }
}
