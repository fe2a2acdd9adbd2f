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
use crate::wrap3;

/// Enumerates all triples in a box that may reach outside the grid.
///
/// Besides the triple itself, the iterator produces its periodic image
/// folded into `[0, shape)`, i.e. the index of the physical storage slot.
///
/// # Examples
/// ~~~
/// use splinegrid::index::Range3Iterator;
/// let shape = [3, 1, 1];
/// let r3i = Range3Iterator::new(Some(&[-1, 0, 0]), &[4, 1, 1], &shape);
/// assert_eq!(r3i.npoint(), 5);
/// assert_eq!(r3i.point_wrapped(0), ([-1, 0, 0], [2, 0, 0]));
/// assert_eq!(r3i.point_wrapped(4), ([3, 0, 0], [0, 0, 0]));
/// ~~~
#[derive(Debug, Clone, Copy)]
pub struct Range3Iterator<'a> {
    begin: Option<&'a [i64; 3]>,
    loop_shape: [i64; 3],
    shape: &'a [i64; 3],
    npoint: usize,
}

impl<'a> Range3Iterator<'a> {
    /// Box `[begin, end)` on a periodic grid with the given `shape`
    pub fn new(begin: Option<&'a [i64; 3]>, end: &[i64; 3], shape: &'a [i64; 3]) -> Self {
        let loop_shape = extent(begin, end);
        Self {
            begin,
            loop_shape,
            shape,
            npoint: volume(&loop_shape),
        }
    }

    /// Number of triples in `[begin, end)`, zero for an empty box
    #[inline]
    pub fn npoint(&self) -> usize {
        self.npoint
    }

    /// Unwrapped triple with row-major linear index `ipoint`
    #[inline(always)]
    pub fn point(&self, ipoint: usize) -> [i64; 3] {
        debug_assert!(ipoint < self.npoint);
        let i = decode(ipoint, &self.loop_shape);
        match self.begin {
            Some(begin) => add(&i, begin),
            None => i,
        }
    }

    /// Unwrapped triple and its periodic image inside `[0, shape)`
    #[inline(always)]
    pub fn point_wrapped(&self, ipoint: usize) -> ([i64; 3], [i64; 3]) {
        let i = self.point(ipoint);
        (i, wrap3(&i, self.shape))
    }

    /// All `(unwrapped, wrapped)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = ([i64; 3], [i64; 3])> + '_ {
        (0..self.npoint).map(move |ipoint| self.point_wrapped(ipoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Cube3Iterator;

    #[test]
    fn test_same_order_as_cube() {
        let begin = [-3, 5, -1];
        let end = [2, 7, 1];
        let shape = [2, 3, 4];
        let r3i = Range3Iterator::new(Some(&begin), &end, &shape);
        let c3i = Cube3Iterator::new(Some(&begin), &end);
        assert_eq!(r3i.npoint(), c3i.npoint());
        for (ipoint, (i, iwrap)) in r3i.iter().enumerate() {
            assert_eq!(i, c3i.point(ipoint));
            for axis in 0..3 {
                assert!((0..shape[axis]).contains(&iwrap[axis]));
                assert_eq!((i[axis] - iwrap[axis]) % shape[axis], 0);
            }
        }
    }

    #[test]
    fn test_empty_box() {
        let shape = [3, 3, 3];
        let r3i = Range3Iterator::new(Some(&[-2, 0, 0]), &[-2, 3, 3], &shape);
        assert_eq!(r3i.npoint(), 0);
        assert_eq!(r3i.iter().count(), 0);
    }
}
