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

//! ## Index iterators
//!
//! Row-major enumeration of integer triples in half-open boxes `[begin, end)`.
//!
//! - [`Cube3Iterator`] walks a box without any wrapping.
//! - [`Range3Iterator`] walks a box that may extend beyond the grid and also
//!   yields the periodic image of each triple inside `[0, shape)`.
//! - [`Block3Iterator`] tiles a box into blocks congruent to the grid shape
//!   so that each block can be walked with a plain [`Cube3Iterator`].
//!
//! All iterators are small `Copy` values that borrow their bounds.

mod block;
mod cube;
mod range;
pub use self::block::Block3Iterator;
pub use self::cube::Cube3Iterator;
pub use self::range::Range3Iterator;

/// Per-axis extent of `[begin, end)`, taking a missing `begin` as the origin
#[inline]
fn extent(begin: Option<&[i64; 3]>, end: &[i64; 3]) -> [i64; 3] {
    match begin {
        Some(begin) => [end[0] - begin[0], end[1] - begin[1], end[2] - begin[2]],
        None => *end,
    }
}

/// Number of triples in a box of the given extent; zero if any extent is non-positive
#[inline]
fn volume(shape: &[i64; 3]) -> usize {
    if shape.iter().any(|&n| n <= 0) {
        0
    } else {
        shape.iter().product::<i64>() as usize
    }
}

/// Decode a row-major linear index (last axis fastest)
#[inline(always)]
fn decode(index: usize, shape: &[i64; 3]) -> [i64; 3] {
    let index = index as i64;
    let i2 = index % shape[2];
    let rest = index / shape[2];
    [rest / shape[1], rest % shape[1], i2]
}

#[inline(always)]
fn add(a: &[i64; 3], b: &[i64; 3]) -> [i64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[test]
fn test_decode_row_major() {
    let shape = [2, 3, 4];
    assert_eq!(decode(0, &shape), [0, 0, 0]);
    assert_eq!(decode(1, &shape), [0, 0, 1]);
    assert_eq!(decode(4, &shape), [0, 1, 0]);
    assert_eq!(decode(12, &shape), [1, 0, 0]);
    assert_eq!(decode(23, &shape), [1, 2, 3]);
}

#[test]
fn test_volume_of_empty_box() {
    assert_eq!(volume(&[2, 0, 3]), 0);
    // two negative extents must not give a positive count
    assert_eq!(volume(&[-1, -2, 3]), 0);
    assert_eq!(volume(&[2, 1, 3]), 6);
}
