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

//! # Sums of atom-centered radial functions
//!
//! A [`Promolecule`] is a superposition of radial functions, each placed at
//! its own center, such as spherical pro-atom densities. It is evaluated by
//! adding one center at a time with the drivers in [`crate::evaluate`].

use crate::evaluate::{eval_spline_cube, eval_spline_grid};
use crate::grid::UniformIntGrid;
use crate::spline::RadialFunction;
use crate::{Cell, Cutoff, Vector3};

/// Radial functions placed at centers.
///
/// # Examples
/// ~~~
/// use splinegrid::promolecule::Promolecule;
/// use splinegrid::spline::{CubicSpline, Extrapolation};
/// use splinegrid::{Cell, Vector3};
/// let hat = CubicSpline::new(vec![0.0, 1.0], vec![1.0, 0.0], vec![-1.0, -1.0], Extrapolation::Zero).unwrap();
/// let mut promolecule = Promolecule::default();
/// promolecule.push(Vector3::zeros(), hat.clone());
/// promolecule.push(Vector3::new(1.0, 0.0, 0.0), hat);
///
/// let mut output = vec![0.0];
/// promolecule.eval_points(&[Vector3::new(0.5, 0.0, 0.0)], &Cell::non_periodic(), &mut output);
/// assert_eq!(output[0], 1.0);
/// ~~~
#[derive(Debug, Clone, Default)]
pub struct Promolecule {
    terms: Vec<(Vector3, Box<dyn RadialFunction>)>,
}

impl Promolecule {
    /// Add a radial function centered at `center`
    pub fn push(&mut self, center: Vector3, function: impl RadialFunction + 'static) {
        self.terms.push((center, Box::new(function)));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vector3, &dyn RadialFunction)> {
        self.terms.iter().map(|(center, function)| (center, function.as_ref()))
    }

    /// Add all terms to data on a uniform grid
    pub fn eval_cube(&self, grid: &UniformIntGrid, output: &mut [f64]) {
        let _span = tracing::debug_span!("promolecule_cube", nterm = self.len()).entered();
        for (center, function) in self.iter() {
            eval_spline_cube(function, center, output, grid);
        }
    }

    /// Add all terms to values on arbitrary points embedded in `cell`
    pub fn eval_points(&self, points: &[Vector3], cell: &Cell, output: &mut [f64]) {
        let _span = tracing::debug_span!("promolecule_points", nterm = self.len()).entered();
        for (center, function) in self.iter() {
            eval_spline_grid(function, center, output, points, cell);
        }
    }
}

impl FromIterator<(Vector3, Box<dyn RadialFunction>)> for Promolecule {
    fn from_iter<T: IntoIterator<Item = (Vector3, Box<dyn RadialFunction>)>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Largest cutoff of all terms, or zero if empty
impl Cutoff for Promolecule {
    fn cutoff(&self) -> f64 {
        self.terms
            .iter()
            .map(|(_, function)| function.cutoff())
            .fold(0.0, f64::max)
    }
}
