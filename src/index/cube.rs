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

use super::{add, decode, extent, volume};

/// Enumerates all triples in `[begin, end)` without periodic wrapping.
///
/// # Examples
/// ~~~
/// use splinegrid::index::Cube3Iterator;
/// let c3i = Cube3Iterator::new(Some(&[1, 0, 0]), &[3, 1, 2]);
/// assert_eq!(c3i.npoint(), 4);
/// assert_eq!(c3i.point(0), [1, 0, 0]);
/// assert_eq!(c3i.point(1), [1, 0, 1]);
/// assert_eq!(c3i.point(3), [2, 0, 1]);
/// ~~~
#[derive(Debug, Clone, Copy)]
pub struct Cube3Iterator<'a> {
    begin: Option<&'a [i64; 3]>,
    shape: [i64; 3],
    npoint: usize,
}

impl<'a> Cube3Iterator<'a> {
    /// Box `[begin, end)`; without `begin` the box starts at the origin.
    pub fn new(begin: Option<&'a [i64; 3]>, end: &[i64; 3]) -> Self {
        let shape = extent(begin, end);
        Self {
            begin,
            shape,
            npoint: volume(&shape),
        }
    }

    /// Number of triples in the box, zero for empty boxes
    #[inline]
    pub fn npoint(&self) -> usize {
        self.npoint
    }

    /// Extent of the box along each axis
    #[inline]
    pub fn shape(&self) -> &[i64; 3] {
        &self.shape
    }

    /// Triple with row-major linear index `ipoint`
    #[inline(always)]
    pub fn point(&self, ipoint: usize) -> [i64; 3] {
        debug_assert!(ipoint < self.npoint);
        let j = decode(ipoint, &self.shape);
        match self.begin {
            Some(begin) => add(&j, begin),
            None => j,
        }
    }

    /// All triples in row-major order
    pub fn iter(&self) -> impl Iterator<Item = [i64; 3]> + '_ {
        (0..self.npoint).map(move |ipoint| self.point(ipoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn test_matches_nested_loops() {
        let begin = [-1, 2, 0];
        let end = [1, 4, 3];
        let c3i = Cube3Iterator::new(Some(&begin), &end);
        let expected: Vec<[i64; 3]> = iproduct!(-1..1, 2..4, 0..3).map(|(a, b, c)| [a, b, c]).collect();
        assert_eq!(c3i.npoint(), expected.len());
        assert_eq!(c3i.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_without_begin() {
        let c3i = Cube3Iterator::new(None, &[2, 2, 2]);
        assert_eq!(c3i.npoint(), 8);
        assert_eq!(c3i.point(7), [1, 1, 1]);
        assert_eq!(c3i.shape(), &[2, 2, 2]);
    }

    #[test]
    fn test_empty_box() {
        let begin = [0, 3, 0];
        assert_eq!(Cube3Iterator::new(Some(&begin), &[4, 3, 4]).npoint(), 0);
        assert_eq!(Cube3Iterator::new(Some(&begin), &[4, 1, 4]).npoint(), 0);
        assert_eq!(Cube3Iterator::new(Some(&begin), &[4, 1, 4]).iter().count(), 0);
    }
}
