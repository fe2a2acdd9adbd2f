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

//! Radial functions with a finite support radius
//!
//! Provides the [`RadialFunction`] trait consumed by the evaluation drivers and
//! [`CubicSpline`], a cubic Hermite spline on an arbitrary radial grid.
//!
//! The spline takes function values *and* derivatives at the knots; it never
//! fits derivatives itself. Between knots the polynomial
//! ```text
//! V(ε) = c[0] + c[1]·ε + c[2]·ε² + c[3]·ε³,   ε ∈ [0, 1)
//! ```
//! is evaluated with precomputed coefficients.

use crate::Cutoff;
use anyhow::ensure;
use dyn_clone::DynClone;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Spherically symmetric function, f(r), with a support radius.
///
/// The support radius is given by [`Cutoff::cutoff`]. Beyond it the function
/// vanishes, unless [`RadialFunction::has_tail`] is true in which case the
/// evaluation drivers also visit points beyond the cutoff.
pub trait RadialFunction: Cutoff + Debug + Send + Sync + DynClone {
    /// Function value at distance `r`
    fn value(&self, r: f64) -> f64;

    /// Evaluate the function at many distances
    fn eval(&self, distances: &[f64], values: &mut [f64]) {
        assert_eq!(distances.len(), values.len(), "distances and values differ in length");
        for (value, &r) in values.iter_mut().zip(distances) {
            *value = self.value(r);
        }
    }

    /// True if the function is non-zero beyond the cutoff
    fn has_tail(&self) -> bool {
        false
    }
}

dyn_clone::clone_trait_object!(RadialFunction);

/// Behavior beyond the last knot of a spline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Extrapolation {
    /// Zero beyond the last knot (no tail).
    #[default]
    Zero,
    /// Power law tail, V(r) = V(r_n)·(r/r_n)^p, continuous at the last knot.
    /// Use e.g. `Power(-1.0)` for a Coulomb-like tail.
    Power(f64),
}

impl Extrapolation {
    /// True if the extrapolation is non-zero beyond the last knot
    pub fn has_tail(&self) -> bool {
        matches!(self, Self::Power(_))
    }
}

/// Cubic Hermite spline through knots with given values and derivatives.
///
/// Below the first knot the value is held at the first knot value;
/// beyond the last knot the [`Extrapolation`] applies.
///
/// # Examples
/// ```
/// use splinegrid::spline::{CubicSpline, Extrapolation, RadialFunction};
/// use splinegrid::Cutoff;
/// // f(r) = 1 - r² on [0, 1], tabulated at three knots
/// let x = vec![0.0, 0.5, 1.0];
/// let spline = CubicSpline::from_fn(x, |r| 1.0 - r * r, |r| -2.0 * r, Extrapolation::Zero).unwrap();
/// assert_eq!(spline.cutoff(), 1.0);
/// assert!((spline.value(0.25) - 0.9375).abs() < 1e-12);
/// assert_eq!(spline.value(1.5), 0.0);
/// assert!(!spline.has_tail());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "SplineTable", into = "SplineTable")
)]
pub struct CubicSpline {
    /// Knot positions (strictly increasing)
    x: Vec<f64>,
    /// Values at the knots
    y: Vec<f64>,
    /// Derivatives at the knots
    d: Vec<f64>,
    /// Polynomial coefficients for each interval
    coeffs: Vec<[f64; 4]>,
    extrapolation: Extrapolation,
}

impl CubicSpline {
    /// Create a spline from knots, knot values and knot derivatives.
    ///
    /// Fails for fewer than two knots, for mismatched lengths and for knots
    /// that are not strictly increasing or not finite.
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        d: Vec<f64>,
        extrapolation: Extrapolation,
    ) -> anyhow::Result<Self> {
        ensure!(x.len() >= 2, "a spline needs at least two knots");
        ensure!(
            x.len() == y.len() && x.len() == d.len(),
            "knots, values and derivatives differ in length ({}, {}, {})",
            x.len(),
            y.len(),
            d.len()
        );
        ensure!(
            x.iter().chain(&y).chain(&d).all(|v| v.is_finite()),
            "spline data must be finite"
        );
        ensure!(
            x.windows(2).all(|w| w[0] < w[1]),
            "spline knots must be strictly increasing"
        );
        if let Extrapolation::Power(_) = extrapolation {
            ensure!(x[x.len() - 1] > 0.0, "a power law tail needs a positive last knot");
        }
        let coeffs = Self::compute_coeffs(&x, &y, &d);
        Ok(Self {
            x,
            y,
            d,
            coeffs,
            extrapolation,
        })
    }

    /// Tabulate a function and its derivative at the given knots.
    pub fn from_fn(
        x: Vec<f64>,
        f: impl Fn(f64) -> f64,
        df: impl Fn(f64) -> f64,
        extrapolation: Extrapolation,
    ) -> anyhow::Result<Self> {
        let y = x.iter().map(|&r| f(r)).collect();
        let d = x.iter().map(|&r| df(r)).collect();
        Self::new(x, y, d, extrapolation)
    }

    /// Hermite coefficients in the reduced coordinate ε of each interval
    fn compute_coeffs(x: &[f64], y: &[f64], d: &[f64]) -> Vec<[f64; 4]> {
        x.windows(2)
            .enumerate()
            .map(|(i, w)| {
                let h = w[1] - w[0];
                let (y0, y1) = (y[i], y[i + 1]);
                let (d0, d1) = (h * d[i], h * d[i + 1]);
                [
                    y0,
                    d0,
                    3.0 * (y1 - y0) - (2.0 * d0 + d1),
                    2.0 * (y0 - y1) + (d0 + d1),
                ]
            })
            .collect()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn d(&self) -> &[f64] {
        &self.d
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Number of knots
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl Cutoff for CubicSpline {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.x[self.x.len() - 1]
    }
}

impl RadialFunction for CubicSpline {
    #[inline]
    fn value(&self, r: f64) -> f64 {
        let n = self.x.len();
        let last = self.x[n - 1];
        if r > last {
            return match self.extrapolation {
                Extrapolation::Zero => 0.0,
                Extrapolation::Power(p) => self.y[n - 1] * (r / last).powf(p),
            };
        }
        if r <= self.x[0] {
            return self.y[0];
        }
        // interval i with x[i] <= r < x[i+1]; r == last falls in the final interval
        let i = (self.x.partition_point(|&xk| xk <= r) - 1).min(n - 2);
        let eps = (r - self.x[i]) / (self.x[i + 1] - self.x[i]);
        let c = &self.coeffs[i];
        c[0] + eps * (c[1] + eps * (c[2] + eps * c[3]))
    }

    fn has_tail(&self) -> bool {
        self.extrapolation.has_tail()
    }
}

/// Plain knot table used to (de)serialize a [`CubicSpline`]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(deny_unknown_fields))]
pub struct SplineTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub d: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extrapolation: Extrapolation,
}

impl TryFrom<SplineTable> for CubicSpline {
    type Error = anyhow::Error;
    fn try_from(table: SplineTable) -> anyhow::Result<Self> {
        Self::new(table.x, table.y, table.d, table.extrapolation)
    }
}

impl From<CubicSpline> for SplineTable {
    fn from(spline: CubicSpline) -> Self {
        Self {
            x: spline.x,
            y: spline.y,
            d: spline.d,
            extrapolation: spline.extrapolation,
        }
    }
}

/// Spline of 1 + cos(πr/rcut) on `[0, rcut]` with `n` knots
#[cfg(test)]
pub(crate) fn cosine_spline(rcut: f64, n: usize) -> CubicSpline {
    use std::f64::consts::PI;
    let x = (0..n).map(|i| rcut * i as f64 / (n - 1) as f64).collect();
    CubicSpline::from_fn(
        x,
        |r| 1.0 + (PI * r / rcut).cos(),
        |r| -PI / rcut * (PI * r / rcut).sin(),
        Extrapolation::Zero,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_at_knots() {
        let spline = cosine_spline(3.0, 25);
        for (&x, &y) in spline.x().iter().zip(spline.y()) {
            assert_relative_eq!(spline.value(x), y, epsilon = 1e-14);
        }
    }

    /// Hermite interpolation with exact derivatives reproduces cubics
    #[test]
    fn test_reproduces_cubic() {
        let f = |r: f64| 2.0 - r + 0.5 * r * r - 0.25 * r * r * r;
        let df = |r: f64| -1.0 + r - 0.75 * r * r;
        let x = vec![0.0, 0.3, 1.1, 2.0];
        let spline = CubicSpline::from_fn(x, f, df, Extrapolation::Zero).unwrap();
        for i in 0..=40 {
            let r = 2.0 * i as f64 / 40.0;
            assert_relative_eq!(spline.value(r), f(r), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cosine_accuracy() {
        let rcut = 2.0;
        let spline = cosine_spline(rcut, 100);
        let r = 0.7371;
        let exact = 1.0 + (std::f64::consts::PI * r / rcut).cos();
        assert_relative_eq!(spline.value(r), exact, epsilon = 1e-7);
    }

    #[test]
    fn test_extrapolation() {
        let spline = cosine_spline(2.0, 10);
        assert_eq!(spline.value(2.0001), 0.0);
        assert_eq!(spline.value(-1.0), 2.0);
        assert!(!spline.has_tail());

        let tail = CubicSpline::new(vec![1.0, 2.0], vec![2.0, 1.0], vec![-1.0, -0.5], Extrapolation::Power(-1.0))
            .unwrap();
        assert!(tail.has_tail());
        assert_relative_eq!(tail.value(2.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(tail.value(4.0), 0.5, epsilon = 1e-14);
        assert_relative_eq!(tail.value(20.0), 0.1, epsilon = 1e-14);
    }

    #[test]
    fn test_batch_eval() {
        let spline = cosine_spline(2.0, 30);
        let r = [0.0, 0.5, 1.9, 2.5];
        let mut values = [0.0; 4];
        spline.eval(&r, &mut values);
        for (value, r) in values.iter().zip(r) {
            assert_eq!(*value, spline.value(r));
        }
    }

    #[test]
    fn test_invalid_tables() {
        use Extrapolation::Zero;
        assert!(CubicSpline::new(vec![0.0], vec![1.0], vec![0.0], Zero).is_err());
        assert!(CubicSpline::new(vec![0.0, 1.0], vec![1.0], vec![0.0, 0.0], Zero).is_err());
        assert!(CubicSpline::new(vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0], Zero).is_err());
        assert!(CubicSpline::new(vec![0.0, f64::NAN], vec![1.0, 0.0], vec![0.0, 0.0], Zero).is_err());
        assert!(CubicSpline::new(vec![-1.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0], Extrapolation::Power(-1.0))
            .is_err());
    }

    #[test]
    fn test_boxed_clone() {
        let boxed: Box<dyn RadialFunction> = Box::new(cosine_spline(1.0, 5));
        let cloned = boxed.clone();
        assert_eq!(cloned.cutoff(), 1.0);
        assert_eq!(cloned.value(0.3), boxed.value(0.3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let spline = CubicSpline::new(vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0], Extrapolation::Power(-2.0))
            .unwrap();
        let json = serde_json::to_string(&spline).unwrap();
        let back: CubicSpline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spline);
        // knots are validated on deserialization
        assert!(serde_json::from_str::<CubicSpline>(r#"{"x":[1.0,0.0],"y":[0.0,0.0],"d":[0.0,0.0]}"#).is_err());
    }
}
