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

use super::{decode, extent, volume};

/// Tiles a box `[begin, end)` into blocks congruent to the grid shape.
///
/// Block `b` covers the tile `b*shape .. b*shape + shape`. Intersecting the
/// box with a tile and shifting the result by `-b*shape` gives a range
/// inside `[0, shape)` which can be walked with a plain
/// [`Cube3Iterator`](super::Cube3Iterator). The local triples of that walk
/// are directly the wrapped storage indices, and [`Block3Iterator::translate`]
/// recovers the unwrapped triple.
///
/// # Examples
/// ~~~
/// use splinegrid::index::Block3Iterator;
/// let (begin, end, shape) = ([-2, 0, 0], [2, 1, 1], [3, 1, 1]);
/// let b3i = Block3Iterator::new(&begin, &end, &shape);
/// assert_eq!(b3i.nblock(), 2);
/// assert_eq!(b3i.block(0), [-1, 0, 0]);
/// assert_eq!(b3i.cube_ranges(&[-1, 0, 0]), ([1, 0, 0], [3, 1, 1]));
/// assert_eq!(b3i.cube_ranges(&[0, 0, 0]), ([0, 0, 0], [2, 1, 1]));
/// assert_eq!(b3i.translate(&[-1, 0, 0], &[1, 0, 0]), [-2, 0, 0]);
/// ~~~
#[derive(Debug, Clone, Copy)]
pub struct Block3Iterator<'a> {
    begin: &'a [i64; 3],
    end: &'a [i64; 3],
    shape: &'a [i64; 3],
    block_begin: [i64; 3],
    block_end: [i64; 3],
    block_shape: [i64; 3],
    nblock: usize,
}

impl<'a> Block3Iterator<'a> {
    /// Tile `[begin, end)` with blocks of size `shape`.
    ///
    /// Block `b` covers `[b * shape, (b + 1) * shape)` along each axis, so
    /// block indices are floor and ceiling divisions of the bounds.
    pub fn new(begin: &'a [i64; 3], end: &'a [i64; 3], shape: &'a [i64; 3]) -> Self {
        let mut block_begin = [0; 3];
        let mut block_end = [0; 3];
        for axis in 0..3 {
            block_begin[axis] = floor_div(begin[axis], shape[axis]);
            block_end[axis] = ceil_div(end[axis], shape[axis]);
        }
        let block_shape = extent(Some(&block_begin), &block_end);
        // an empty box has no blocks, even if its bounds fall inside one tile
        let nblock = if volume(&extent(Some(begin), end)) == 0 {
            0
        } else {
            volume(&block_shape)
        };
        tracing::trace!(?begin, ?end, ?shape, ?block_begin, ?block_end, nblock, "block decomposition");
        Self {
            begin,
            end,
            shape,
            block_begin,
            block_end,
            block_shape,
            nblock,
        }
    }

    /// Number of blocks overlapping the box, zero if the box is empty
    #[inline]
    pub fn nblock(&self) -> usize {
        self.nblock
    }

    /// First block along each axis
    pub fn block_begin(&self) -> &[i64; 3] {
        &self.block_begin
    }

    /// One past the last block along each axis
    pub fn block_end(&self) -> &[i64; 3] {
        &self.block_end
    }

    /// Block triple with row-major linear index `iblock`
    #[inline]
    pub fn block(&self, iblock: usize) -> [i64; 3] {
        debug_assert!(iblock < self.nblock);
        let b = decode(iblock, &self.block_shape);
        [
            b[0] + self.block_begin[0],
            b[1] + self.block_begin[1],
            b[2] + self.block_begin[2],
        ]
    }

    /// All block triples in row-major order
    pub fn blocks(&self) -> impl Iterator<Item = [i64; 3]> + '_ {
        (0..self.nblock).map(move |iblock| self.block(iblock))
    }

    /// Intersection of the box with block `b`, in block-local coordinates
    pub fn cube_ranges(&self, b: &[i64; 3]) -> ([i64; 3], [i64; 3]) {
        let mut cube_begin = [0; 3];
        let mut cube_end = [0; 3];
        for axis in 0..3 {
            let offset = b[axis] * self.shape[axis];
            cube_begin[axis] = offset.max(self.begin[axis]) - offset;
            cube_end[axis] = (offset + self.shape[axis]).min(self.end[axis]) - offset;
        }
        (cube_begin, cube_end)
    }

    /// Map a block-local triple back to the unwrapped triple of the box
    #[inline(always)]
    pub fn translate(&self, b: &[i64; 3], local: &[i64; 3]) -> [i64; 3] {
        [
            local[0] + b[0] * self.shape[0],
            local[1] + b[1] * self.shape[1],
            local[2] + b[2] * self.shape[2],
        ]
    }
}

/// Division rounding towards negative infinity, for positive `b`
///
/// Integer division truncates towards zero, which rounds negative quotients
/// the wrong way, hence the explicit branch.
#[inline]
fn floor_div(a: i64, b: i64) -> i64 {
    if a >= 0 {
        a / b
    } else {
        -1 - (-(a + 1)) / b
    }
}

/// Division rounding towards positive infinity, for positive `b`
#[inline]
fn ceil_div(a: i64, b: i64) -> i64 {
    if a > 0 {
        (a - 1) / b + 1
    } else {
        -((-a) / b)
    }
}
