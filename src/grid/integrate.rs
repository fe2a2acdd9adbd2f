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

use crate::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Multipole moments of an integrand about a center.
///
/// With `d = p - center` for each grid point `p`, the integrand is
/// multiplied by:
///
/// - `Cartesian(lmax)`: `dx^nx dy^ny dz^nz` for `l = nx + ny + nz` from 0
///   to `lmax`. Within one `l`, `nx` and then `ny` run downwards, so
///   `lmax = 2` gives `1, x, y, z, xx, xy, xz, yy, yz, zz`.
/// - `Radial(lmax)`: `|d|^n` for `n` from 0 to `lmax`.
///
/// # Examples
/// ~~~
/// use splinegrid::grid::Moments;
/// assert_eq!(Moments::Cartesian(2).len(), 10);
/// assert_eq!(Moments::Radial(2).len(), 3);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Moments {
    Cartesian(usize),
    Radial(usize),
}

impl Moments {
    /// Number of moments
    pub fn len(&self) -> usize {
        match *self {
            Self::Cartesian(lmax) => (lmax + 1) * (lmax + 2) * (lmax + 3) / 6,
            Self::Radial(lmax) => lmax + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Write all moment factors of the displacement `d` into `out`
    fn fill(&self, d: &Vector3, out: &mut [f64]) {
        match *self {
            Self::Cartesian(lmax) => {
                let mut k = 0;
                for l in 0..=lmax {
                    for nx in (0..=l).rev() {
                        for ny in (0..=l - nx).rev() {
                            let nz = l - nx - ny;
                            out[k] = d.x.powi(nx as i32) * d.y.powi(ny as i32) * d.z.powi(nz as i32);
                            k += 1;
                        }
                    }
                }
            }
            Self::Radial(_) => {
                let r = d.norm();
                let mut value = 1.0;
                for slot in out.iter_mut() {
                    *slot = value;
                    value *= r;
                }
            }
        }
    }
}

/// Check that every factor has one value per point
fn check_factors(factors: &[&[f64]], npoint: usize) {
    for (i, factor) in factors.iter().enumerate() {
        assert_eq!(factor.len(), npoint, "factor {i} has {} values for {npoint} points", factor.len());
    }
}

/// Product of all factors at point `ipoint`, one if there are none
#[inline]
fn product(factors: &[&[f64]], ipoint: usize) -> f64 {
    factors.iter().map(|factor| factor[ipoint]).product()
}

/// `volume * Σ_p Π factors`
pub(super) fn sum_product(factors: &[&[f64]], npoint: usize, volume: f64) -> f64 {
    check_factors(factors, npoint);
    (0..npoint).map(|ipoint| product(factors, ipoint)).sum::<f64>() * volume
}

/// `volume * Σ_p Π factors * moment(position(p) - center)` for every moment
pub(super) fn sum_moments(
    factors: &[&[f64]],
    npoint: usize,
    volume: f64,
    position: impl Fn(usize) -> Vector3,
    center: &Vector3,
    moments: Moments,
) -> Vec<f64> {
    check_factors(factors, npoint);
    let mut result = vec![0.0; moments.len()];
    let mut work = vec![0.0; moments.len()];
    for ipoint in 0..npoint {
        let weight = product(factors, ipoint) * volume;
        moments.fill(&(position(ipoint) - center), &mut work);
        for (total, factor) in result.iter_mut().zip(&work) {
            *total += weight * factor;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cartesian_order() {
        let d = Vector3::new(2.0, 3.0, 5.0);
        let mut out = vec![0.0; Moments::Cartesian(2).len()];
        Moments::Cartesian(2).fill(&d, &mut out);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 5.0, 4.0, 6.0, 10.0, 9.0, 15.0, 25.0]);
        assert_eq!(Moments::Cartesian(3).len(), 20);
    }

    #[test]
    fn test_radial_powers() {
        let d = Vector3::new(0.0, 3.0, 4.0);
        let mut out = vec![0.0; 4];
        Moments::Radial(3).fill(&d, &mut out);
        for (value, expected) in out.iter().zip([1.0, 5.0, 25.0, 125.0]) {
            assert_relative_eq!(*value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_without_factors() {
        assert_relative_eq!(sum_product(&[], 8, 0.5), 4.0);
    }
}
