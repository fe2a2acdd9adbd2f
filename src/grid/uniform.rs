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
use super::{Moments, UniformIntGridWindow};
use crate::index::Cube3Iterator;
use crate::{Cell, Matrix3, Vector3};
use anyhow::ensure;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Uniform grid of points `origin + i·a + j·b + k·c`.
///
/// The step vectors `a`, `b`, `c` form the 3D `grid_cell`. Along each axis
/// flagged in `pbc` the grid repeats after `shape[axis]` steps; the
/// embedding `cell` holds these repeat vectors.
///
/// # Examples
/// ~~~
/// use splinegrid::grid::UniformIntGrid;
/// use splinegrid::{Matrix3, Vector3};
/// let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * 0.5, [4, 2, 2], [true, false, false]).unwrap();
/// assert_eq!(grid.npoint(), 16);
/// assert_eq!(grid.cell().nvec(), 1);
/// assert_eq!(grid.cell().rvec(0), Vector3::new(2.0, 0.0, 0.0));
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "UniformGridParams", into = "UniformGridParams")
)]
pub struct UniformIntGrid {
    /// Position of the grid point with index (0, 0, 0)
    origin: Vector3,
    /// Grid step vectors (always 3D)
    grid_cell: Cell,
    /// Number of points along each axis
    shape: [i64; 3],
    /// Periodic boundary conditions along each axis
    pbc: [bool; 3],
    /// Periodic cell in which the grid is embedded
    cell: Cell,
}

impl UniformIntGrid {
    /// Create a grid from step vectors (rows of `grid_rvecs`).
    ///
    /// The embedding cell is spanned by `grid_rvecs[axis] * shape[axis]`
    /// for every periodic axis.
    pub fn new(
        origin: Vector3,
        grid_rvecs: Matrix3,
        shape: [i64; 3],
        pbc: [bool; 3],
    ) -> anyhow::Result<Self> {
        let grid_cell = Cell::from_rows(&grid_rvecs)?;
        let repeat_vectors: Vec<Vector3> = (0..3)
            .filter(|&axis| pbc[axis])
            .map(|axis| grid_cell.rvec(axis) * shape[axis] as f64)
            .collect();
        let cell = Cell::new(&repeat_vectors)?;
        Self::from_cells(origin, grid_cell, shape, pbc, cell)
    }

    /// Create a grid from an explicit grid cell and embedding cell.
    ///
    /// Fails if the grid cell is not 3D, if any axis has no points, or if
    /// the number of periodic axes differs from the embedding cell.
    pub fn from_cells(
        origin: Vector3,
        grid_cell: Cell,
        shape: [i64; 3],
        pbc: [bool; 3],
        cell: Cell,
    ) -> anyhow::Result<Self> {
        ensure!(
            grid_cell.nvec() == 3,
            "the grid cell of a uniform grid must be 3D, got {} vectors",
            grid_cell.nvec()
        );
        ensure!(
            shape.iter().all(|&n| n > 0),
            "grid shape must be positive, got {shape:?}"
        );
        let nperiodic = pbc.iter().filter(|&&p| p).count();
        ensure!(
            nperiodic == cell.nvec(),
            "{nperiodic} periodic axes do not match a cell with {} vectors",
            cell.nvec()
        );
        Ok(Self {
            origin,
            grid_cell,
            shape,
            pbc,
            cell,
        })
    }

    pub fn origin(&self) -> &Vector3 {
        &self.origin
    }

    pub fn grid_cell(&self) -> &Cell {
        &self.grid_cell
    }

    #[inline]
    pub fn shape(&self) -> &[i64; 3] {
        &self.shape
    }

    pub fn pbc(&self) -> &[bool; 3] {
        &self.pbc
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Total number of grid points
    #[inline]
    pub fn npoint(&self) -> usize {
        self.shape.iter().product::<i64>() as usize
    }

    /// Zero-initialized data array for this grid
    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.npoint()]
    }

    /// Index range of all points that may lie within `rcut` of `center`.
    ///
    /// Along non-periodic axes the range is clipped to `[0, shape)`. Along
    /// periodic axes it may extend into neighboring images.
    pub fn ranges_rcut(&self, center: &Vector3, rcut: f64) -> ([i64; 3], [i64; 3]) {
        let delta = self.origin - center;
        let (mut begin, mut end) = self.grid_cell.ranges_rcut(&delta, rcut);
        for axis in 0..3 {
            if !self.pbc[axis] {
                begin[axis] = begin[axis].max(0);
                end[axis] = end[axis].min(self.shape[axis]);
            }
        }
        tracing::trace!(?begin, ?end, rcut, "grid ranges");
        (begin, end)
    }

    /// Vector from `center` to the grid point with (possibly unwrapped) index `i`
    #[inline]
    pub fn delta_grid_point(&self, center: &Vector3, i: &[i64; 3]) -> Vector3 {
        self.grid_cell.add_rvec(&(self.origin - center), i)
    }

    /// Distance from `center` to the grid point with (possibly unwrapped) index `i`
    #[inline]
    pub fn dist_grid_point(&self, center: &Vector3, i: &[i64; 3]) -> f64 {
        self.delta_grid_point(center, i).norm()
    }

    /// Cartesian position of the grid point with index `i`
    pub fn grid_point(&self, i: &[i64; 3]) -> Vector3 {
        self.grid_cell.add_rvec(&self.origin, i)
    }

    /// Cartesian positions of all grid points in storage order
    pub fn points(&self) -> Vec<Vector3> {
        Cube3Iterator::new(None, &self.shape)
            .iter()
            .map(|i| self.grid_point(&i))
            .collect()
    }

    /// Storage offset of a wrapped index
    #[inline(always)]
    pub fn offset(&self, i: &[i64; 3]) -> usize {
        debug_assert!((0..3).all(|axis| (0..self.shape[axis]).contains(&i[axis])));
        ((i[0] * self.shape[1] + i[1]) * self.shape[2] + i[2]) as usize
    }

    /// Integral of the product of grid data arrays.
    ///
    /// Each grid point carries the weight `|det grid_cell|`. Without any
    /// factors the result is the volume covered by the grid.
    ///
    /// # Examples
    /// ~~~
    /// use splinegrid::grid::UniformIntGrid;
    /// use splinegrid::{Matrix3, Vector3};
    /// let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity() * 0.5, [2, 1, 1], [false; 3]).unwrap();
    /// let (potential, density) = ([1.0, 2.0], [3.0, 4.0]);
    /// assert_eq!(grid.integrate(&[&potential, &density]), (3.0 + 8.0) * 0.125);
    /// assert_eq!(grid.integrate(&[]), 0.25);
    /// ~~~
    pub fn integrate(&self, factors: &[&[f64]]) -> f64 {
        sum_product(factors, self.npoint(), self.grid_cell.volume())
    }

    /// Moments about `center` of the product of grid data arrays
    ///
    /// Positions are those of [`UniformIntGrid::grid_point`], i.e. of the
    /// stored points without periodic images.
    pub fn integrate_moments(&self, factors: &[&[f64]], center: &Vector3, moments: Moments) -> Vec<f64> {
        let c3i = Cube3Iterator::new(None, &self.shape);
        sum_moments(
            factors,
            self.npoint(),
            self.grid_cell.volume(),
            |ipoint| self.grid_point(&c3i.point(ipoint)),
            center,
            moments,
        )
    }

    /// Window `[begin, end)` into this grid
    pub fn window(&self, begin: [i64; 3], end: [i64; 3]) -> UniformIntGridWindow<'_> {
        UniformIntGridWindow::new(self, begin, end)
    }

    /// Smallest window containing all points within `rcut` of `center`
    pub fn window_rcut(&self, center: &Vector3, rcut: f64) -> UniformIntGridWindow<'_> {
        let (begin, mut end) = self.ranges_rcut(center, rcut);
        for axis in 0..3 {
            end[axis] = end[axis].max(begin[axis]);
        }
        self.window(begin, end)
    }
}

/// Plain parameters describing a [`UniformIntGrid`]
///
/// With the `serde` feature, grids are (de)serialized through this struct so
/// that deserialized grids are validated like constructed ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(deny_unknown_fields))]
pub struct UniformGridParams {
    pub origin: [f64; 3],
    /// Grid step vectors as rows
    pub grid_rvecs: [[f64; 3]; 3],
    pub shape: [i64; 3],
    pub pbc: [bool; 3],
}

impl TryFrom<UniformGridParams> for UniformIntGrid {
    type Error = anyhow::Error;
    fn try_from(params: UniformGridParams) -> anyhow::Result<Self> {
        let rows = params.grid_rvecs.map(|row| Vector3::from(row).transpose());
        Self::new(
            Vector3::from(params.origin),
            Matrix3::from_rows(&rows),
            params.shape,
            params.pbc,
        )
    }
}

impl From<UniformIntGrid> for UniformGridParams {
    fn from(grid: UniformIntGrid) -> Self {
        let rvecs = grid.grid_cell.rvecs();
        Self {
            origin: grid.origin.into(),
            grid_rvecs: [0, 1, 2].map(|i| [rvecs[(i, 0)], rvecs[(i, 1)], rvecs[(i, 2)]]),
            shape: grid.shape,
            pbc: grid.pbc,
        }
    }
}
