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

//! Electrostatic potential of bare nuclei on a set of points.

use crate::Vector3;
use rayon::prelude::*;

/// Add the potential `Σ Z/|p - R|` of point nuclei to each point `p`.
///
/// `numbers` holds the atomic numbers `Z` and `coordinates` the positions
/// `R` (atomic units). Points that coincide with a nucleus receive an
/// infinite contribution.
///
/// # Examples
/// ~~~
/// use splinegrid::nucpot::compute_grid_nucpot;
/// use splinegrid::Vector3;
/// let mut potential = vec![0.0];
/// compute_grid_nucpot(&[8], &[Vector3::zeros()], &[Vector3::new(0.0, 3.0, 4.0)], &mut potential);
/// assert_eq!(potential[0], 8.0 / 5.0);
/// ~~~
pub fn compute_grid_nucpot(numbers: &[u32], coordinates: &[Vector3], points: &[Vector3], output: &mut [f64]) {
    assert_eq!(numbers.len(), coordinates.len(), "numbers and coordinates differ in length");
    assert_eq!(points.len(), output.len(), "output and points differ in length");
    let _span = tracing::debug_span!("compute_grid_nucpot", natom = numbers.len(), npoint = points.len()).entered();
    output
        .par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(value, point)| {
            *value += numbers
                .iter()
                .zip(coordinates)
                .map(|(&z, position)| z as f64 / (point - position).norm())
                .sum::<f64>();
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_nuclei() {
        let numbers = [1, 2];
        let coordinates = [Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        let points = [Vector3::zeros(), Vector3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 0.0)];
        let mut output = vec![1.0; 3];
        compute_grid_nucpot(&numbers, &coordinates, &points, &mut output);
        assert_relative_eq!(output[0], 1.0 + 1.0 + 2.0, epsilon = 1e-12);
        assert_relative_eq!(output[1], 1.0 + 0.25 + 1.0, epsilon = 1e-12);
        assert_relative_eq!(output[2], 1.0 + 1.0 / 8.0_f64.sqrt() + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_atoms() {
        let mut output = vec![0.5; 2];
        compute_grid_nucpot(&[], &[], &[Vector3::zeros(), Vector3::x()], &mut output);
        assert_eq!(output, vec![0.5, 0.5]);
    }

    #[test]
    #[should_panic]
    fn test_length_mismatch() {
        compute_grid_nucpot(&[1], &[Vector3::zeros()], &[Vector3::x()], &mut [0.0; 2]);
    }
}
