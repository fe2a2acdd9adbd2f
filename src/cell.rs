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

//! Periodic cells with zero to three lattice vectors.

use crate::{Matrix3, Vector3};
use anyhow::{anyhow, ensure};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lattice of periodic images with 0, 1, 2 or 3 lattice vectors.
///
/// Lattice vectors are stored as the rows of a 3x3 matrix. When fewer than
/// three vectors are given, the remaining rows are filled with orthonormal
/// vectors so that fractional and Cartesian coordinates can always be
/// converted. Only the first [`Cell::nvec`] rows describe periodicity.
///
/// # Examples
/// ~~~
/// use splinegrid::{Cell, Vector3};
/// let cell = Cell::new(&[Vector3::new(2.0, 0.0, 0.0)]).unwrap();
/// assert_eq!(cell.nvec(), 1);
/// let cart = cell.to_cart(&Vector3::new(1.5, 0.0, 0.0));
/// assert_eq!(cart, Vector3::new(3.0, 0.0, 0.0));
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "CellParams", into = "CellParams")
)]
pub struct Cell {
    /// Number of periodic directions
    nvec: usize,
    /// Real-space vectors as rows (completed to a basis)
    rvecs: Matrix3,
    /// Reciprocal vectors as rows; `gvecs * rvecs^T = 1`
    gvecs: Matrix3,
    /// Distances between neighboring lattice planes, 1/|g_i|
    rspacings: [f64; 3],
    /// Distances between neighboring reciprocal planes, 1/|r_i|
    gspacings: [f64; 3],
}

impl Cell {
    /// Create a cell from up to three lattice vectors.
    ///
    /// Fails if more than three vectors are given or if the vectors are
    /// linearly dependent.
    pub fn new(vectors: &[Vector3]) -> anyhow::Result<Self> {
        let nvec = vectors.len();
        ensure!(nvec <= 3, "a cell has at most three lattice vectors, got {nvec}");
        let [a, b, c] = complete_basis(vectors)?;
        let rvecs = Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]);
        // scale invariant: |det| relative to the largest possible volume
        let norms: f64 = (0..3).map(|i| rvecs.row(i).norm()).product();
        ensure!(
            rvecs.determinant().abs() > 1e-12 * norms,
            "lattice vectors of the cell are linearly dependent"
        );
        let gvecs = rvecs
            .try_inverse()
            .ok_or_else(|| anyhow!("lattice vectors of the cell are linearly dependent"))?
            .transpose();
        let rspacings = [0, 1, 2].map(|i| gvecs.row(i).norm().recip());
        let gspacings = [0, 1, 2].map(|i| rvecs.row(i).norm().recip());
        Ok(Self {
            nvec,
            rvecs,
            gvecs,
            rspacings,
            gspacings,
        })
    }

    /// Create a fully periodic cell from a matrix with lattice vectors as rows.
    pub fn from_rows(matrix: &Matrix3) -> anyhow::Result<Self> {
        let vectors = [0, 1, 2].map(|i| matrix.row(i).transpose());
        Self::new(&vectors)
    }

    /// A cell without periodicity
    pub fn non_periodic() -> Self {
        Self {
            nvec: 0,
            rvecs: Matrix3::identity(),
            gvecs: Matrix3::identity(),
            rspacings: [1.0; 3],
            gspacings: [1.0; 3],
        }
    }

    /// A cubic cell ((a, a, a), (90, 90, 90))
    pub fn cubic(a: f64) -> anyhow::Result<Self> {
        Self::orthorhombic(a, a, a)
    }

    /// An orthorhombic cell ((a, b, c), (90, 90, 90))
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> anyhow::Result<Self> {
        Self::from_rows(&Matrix3::from_diagonal(&Vector3::new(a, b, c)))
    }

    /// Number of periodic directions
    #[inline]
    pub fn nvec(&self) -> usize {
        self.nvec
    }

    /// Lattice vectors as rows, including the completing basis vectors
    pub fn rvecs(&self) -> &Matrix3 {
        &self.rvecs
    }

    /// Reciprocal vectors as rows (no 2π factor)
    pub fn gvecs(&self) -> &Matrix3 {
        &self.gvecs
    }

    pub fn rspacings(&self) -> &[f64; 3] {
        &self.rspacings
    }

    pub fn gspacings(&self) -> &[f64; 3] {
        &self.gspacings
    }

    /// Lattice vector `i` as a column vector
    #[inline]
    pub fn rvec(&self, i: usize) -> Vector3 {
        self.rvecs.row(i).transpose()
    }

    /// Generalized volume: volume, area, length or zero for 3, 2, 1 or 0 vectors.
    pub fn volume(&self) -> f64 {
        match self.nvec {
            0 => 0.0,
            1 => self.rvec(0).norm(),
            2 => self.rvec(0).cross(&self.rvec(1)).norm(),
            _ => self.rvecs.determinant().abs(),
        }
    }

    /// Convert fractional coordinates to Cartesian coordinates
    #[inline]
    pub fn to_cart(&self, frac: &Vector3) -> Vector3 {
        self.rvecs.tr_mul(frac)
    }

    /// Convert Cartesian coordinates to fractional coordinates
    #[inline]
    pub fn to_frac(&self, cart: &Vector3) -> Vector3 {
        self.gvecs * cart
    }

    /// Add the lattice vector of the periodic image `image` to `delta`.
    ///
    /// Components of `image` beyond [`Cell::nvec`] are ignored.
    #[inline]
    pub fn add_rvec(&self, delta: &Vector3, image: &[i64; 3]) -> Vector3 {
        (0..self.nvec).fold(*delta, |acc, i| acc + self.rvec(i) * image[i] as f64)
    }

    /// Half-open range of periodic images `n` for which `|delta + R(n)|` may be below `rcut`.
    ///
    /// Only the first [`Cell::nvec`] axes are meaningful; the remaining axes
    /// are set to the single image `[0, 1)`.
    pub fn ranges_rcut(&self, delta: &Vector3, rcut: f64) -> ([i64; 3], [i64; 3]) {
        let frac = self.to_frac(delta);
        let mut begin = [0; 3];
        let mut end = [1; 3];
        for i in 0..self.nvec {
            let step = rcut / self.rspacings[i];
            begin[i] = (-frac[i] - step).ceil() as i64;
            end[i] = (-frac[i] + step).floor() as i64 + 1;
        }
        (begin, end)
    }
}

/// Fill up to three vectors with orthonormal vectors
fn complete_basis(vectors: &[Vector3]) -> anyhow::Result<[Vector3; 3]> {
    let basis = match *vectors {
        [] => [Vector3::x(), Vector3::y(), Vector3::z()],
        [a] => {
            ensure!(a.norm() > 0.0, "lattice vector has zero length");
            // cross with the Cartesian axis least aligned with `a`
            let axis = a.iamin();
            let b = a.cross(&Vector3::ith(axis, 1.0)).normalize();
            let c = a.cross(&b).normalize();
            [a, b, c]
        }
        [a, b] => {
            let c = a.cross(&b);
            ensure!(c.norm() > 0.0, "lattice vectors are parallel");
            [a, b, c.normalize()]
        }
        [a, b, c] => [a, b, c],
        _ => unreachable!(),
    };
    Ok(basis)
}

impl Default for Cell {
    fn default() -> Self {
        Self::non_periodic()
    }
}

/// Periodic lattice vectors of a [`Cell`]
///
/// With the `serde` feature, cells are (de)serialized through this struct so
/// that the reciprocal vectors and spacings are always derived, never read.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(deny_unknown_fields))]
pub struct CellParams {
    pub rvecs: Vec<[f64; 3]>,
}

impl TryFrom<CellParams> for Cell {
    type Error = anyhow::Error;
    fn try_from(params: CellParams) -> anyhow::Result<Self> {
        let vectors: Vec<Vector3> = params.rvecs.into_iter().map(Vector3::from).collect();
        Self::new(&vectors)
    }
}

impl From<Cell> for CellParams {
    fn from(cell: Cell) -> Self {
        Self {
            rvecs: (0..cell.nvec).map(|i| cell.rvec(i).into()).collect(),
        }
    }
}

/// Random cell with a reasonable volume, for tests
#[cfg(test)]
pub(crate) fn random_cell<R: rand::Rng>(rng: &mut R, nvec: usize) -> Cell {
    loop {
        let vectors: Vec<Vector3> = (0..nvec)
            .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
            .collect();
        if let Ok(cell) = Cell::new(&vectors) {
            if nvec == 0 || cell.volume() > 0.2 {
                return cell;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use itertools::iproduct;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_frac_cart_roundtrip() {
        let mut rng = StdRng::seed_from_u64(1);
        for nvec in 0..=3 {
            let cell = random_cell(&mut rng, nvec);
            let x = Vector3::new(0.3, -1.2, 2.5);
            assert_relative_eq!(cell.to_cart(&cell.to_frac(&x)), x, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_completed_basis_is_orthogonal() {
        let cell = Cell::new(&[Vector3::new(1.0, 1.0, 0.0)]).unwrap();
        assert_relative_eq!(cell.rvec(0).dot(&cell.rvec(1)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(cell.rvec(0).dot(&cell.rvec(2)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(cell.rvec(1).norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cell.volume(), 2f64.sqrt(), epsilon = 1e-12);

        let cell = Cell::new(&[Vector3::x() * 2.0, Vector3::new(1.0, 3.0, 0.0)]).unwrap();
        assert_relative_eq!(cell.rvec(2), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(cell.volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_vectors_rejected() {
        assert!(Cell::new(&[Vector3::x(), Vector3::x() * 2.0]).is_err());
        assert!(Cell::new(&[Vector3::zeros()]).is_err());
        let flat = [Vector3::x(), Vector3::y(), Vector3::x() + Vector3::y()];
        assert!(Cell::new(&flat).is_err());
    }

    #[test]
    fn test_add_rvec() {
        let cell = Cell::orthorhombic(1.0, 2.0, 3.0).unwrap();
        let delta = cell.add_rvec(&Vector3::new(0.5, 0.0, 0.0), &[1, -1, 2]);
        assert_relative_eq!(delta, Vector3::new(1.5, -2.0, 6.0));
        // images beyond nvec are ignored
        let cell = Cell::new(&[Vector3::x()]).unwrap();
        assert_relative_eq!(cell.add_rvec(&Vector3::zeros(), &[2, 5, 5]), Vector3::x() * 2.0);
    }

    /// Every image closer than the cutoff must be inside the returned ranges
    #[test]
    fn test_ranges_rcut_cover_all_images() {
        let mut rng = StdRng::seed_from_u64(7);
        for nvec in 1..=3 {
            for _ in 0..20 {
                let cell = random_cell(&mut rng, nvec);
                let delta = Vector3::from_fn(|_, _| rng.gen_range(-3.0..3.0));
                let rcut = rng.gen_range(0.1..2.5);
                let (begin, end) = cell.ranges_rcut(&delta, rcut);
                let n = 12;
                let axis = |i: usize| if i < nvec { -n..n + 1 } else { 0..1 };
                for (i0, i1, i2) in iproduct!(axis(0), axis(1), axis(2)) {
                    let image = [i0, i1, i2];
                    if cell.add_rvec(&delta, &image).norm() < rcut {
                        for k in 0..3 {
                            assert!(begin[k] <= image[k] && image[k] < end[k]);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_ranges_rcut_unit_cube() {
        let cell = Cell::cubic(1.0).unwrap();
        let (begin, end) = cell.ranges_rcut(&Vector3::zeros(), 1.5);
        assert_eq!(begin, [-1; 3]);
        assert_eq!(end, [2; 3]);
        let (begin, end) = Cell::non_periodic().ranges_rcut(&Vector3::zeros(), 1.5);
        assert_eq!((begin, end), ([0; 3], [1; 3]));
    }

    #[test]
    fn test_fine_cell_accepted() {
        let cell = Cell::cubic(1e-5).unwrap();
        assert_relative_eq!(cell.volume(), 1e-15, max_relative = 1e-12);
        assert_relative_eq!(cell.rspacings()[0], 1e-5, max_relative = 1e-12);
        // a tiny but nearly flat cell is still rejected
        let flat = [Vector3::x() * 1e-5, Vector3::y() * 1e-5, Vector3::new(1e-5, 1e-5, 1e-22)];
        assert!(Cell::new(&flat).is_err());
    }

    #[test]
    fn test_params_roundtrip() {
        let cell = Cell::new(&[Vector3::new(1.0, 0.5, 0.0), Vector3::new(0.0, 2.0, 0.3)]).unwrap();
        let params = CellParams::from(cell.clone());
        assert_eq!(params.rvecs.len(), 2);
        assert_eq!(Cell::try_from(params).unwrap(), cell);
        let four = CellParams {
            rvecs: vec![[1.0, 0.0, 0.0]; 4],
        };
        assert!(Cell::try_from(four).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_validates() {
        let cell = Cell::cubic(1.0).unwrap();
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(serde_json::from_value::<Cell>(json.clone()).unwrap(), cell);

        // derived quantities cannot be injected
        let mut tampered = json.clone();
        tampered["nvec"] = serde_json::json!(5);
        assert!(serde_json::from_value::<Cell>(tampered).is_err());

        let four = r#"{"rvecs":[[1,0,0],[0,1,0],[0,0,1],[1,1,1]]}"#;
        assert!(serde_json::from_str::<Cell>(four).is_err());
        let flat = r#"{"rvecs":[[1,0,0],[0,1,0],[1,1,0]]}"#;
        assert!(serde_json::from_str::<Cell>(flat).is_err());
    }
}
