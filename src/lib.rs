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

//! # Splinegrid
//!
//! A library for evaluating localized radial functions, such as atom-centered
//! densities or potentials represented as cubic splines, on uniform grids and
//! point clouds that may be periodic in zero, one, two or three directions.
//!
//! The heart of the crate is the periodic index machinery in [`index`]:
//! an arbitrary, possibly negative, index range is tiled into blocks that are
//! congruent to the grid shape so that the innermost loops never need to wrap.
//!
//! ## Examples
//! ~~~
//! use splinegrid::{wrap, Vector3, Matrix3};
//! use splinegrid::grid::UniformIntGrid;
//! use splinegrid::spline::{CubicSpline, Extrapolation};
//! use splinegrid::evaluate::eval_spline_cube;
//!
//! // 4 x 4 x 4 grid with unit spacing, periodic in all directions
//! let grid = UniformIntGrid::new(Vector3::zeros(), Matrix3::identity(), [4, 4, 4], [true; 3]).unwrap();
//! // a linear "hat" function of radius 1.5
//! let hat = CubicSpline::new(vec![0.0, 1.5], vec![1.0, 0.0], vec![-1.0 / 1.5; 2], Extrapolation::Zero).unwrap();
//!
//! let mut density = grid.zeros();
//! eval_spline_cube(&hat, &Vector3::zeros(), &mut density, &grid);
//! // the periodic image at index 3 sits at distance one from the center
//! assert!((density[grid.offset(&[3, 0, 0])] - 1.0 / 3.0).abs() < 1e-12);
//! assert_eq!(wrap(-1, 4), 3);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;
/// A stack-allocated 3x3 square matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;

use num::Integer;

pub mod cell;
pub mod evaluate;
pub mod grid;
pub mod index;
pub mod nucpot;
pub mod promolecule;
pub mod spline;

pub use cell::Cell;

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

/// Fold an index into the canonical range `[0, high)`.
///
/// This is the mathematical modulo, i.e. the result has the sign of `high`
/// and not of `i` as with the `%` operator.
///
/// # Examples
/// ~~~
/// use splinegrid::wrap;
/// assert_eq!(wrap(7, 3), 1);
/// assert_eq!(wrap(-1, 3), 2);
/// assert_eq!(wrap(-3, 3), 0);
/// ~~~
#[inline(always)]
pub fn wrap(i: i64, high: i64) -> i64 {
    debug_assert!(high > 0, "wrap requires a positive modulus");
    i.mod_floor(&high)
}

/// Fold every component of an index triple into `[0, shape)`.
#[inline(always)]
pub fn wrap3(i: &[i64; 3], shape: &[i64; 3]) -> [i64; 3] {
    [wrap(i[0], shape[0]), wrap(i[1], shape[1]), wrap(i[2], shape[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_wrap_is_true_modulo() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..1000 {
            let i: i64 = rng.gen_range(-1000..1000);
            let high: i64 = rng.gen_range(1..50);
            let w = wrap(i, high);
            assert!((0..high).contains(&w));
            assert_eq!((i - w) % high, 0);
        }
    }

    #[test]
    fn test_wrap_edges() {
        assert_eq!(wrap(0, 1), 0);
        assert_eq!(wrap(-1, 1), 0);
        assert_eq!(wrap(-4, 4), 0);
        assert_eq!(wrap(-5, 4), 3);
        assert_eq!(wrap3(&[-1, 4, 9], &[4, 4, 4]), [3, 0, 1]);
    }
}
