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

//! ## Uniform grids
//!
//! Uniform integer grids that may be periodic along each axis, and
//! rectangular windows into them for gathering and scattering data.
//!
//! Data on a grid is a caller-owned `[f64]` slice of length
//! [`UniformIntGrid::npoint`] in row-major order (last axis fastest).

mod integrate;
mod uniform;
mod window;
pub use self::integrate::Moments;
pub use self::uniform::{UniformGridParams, UniformIntGrid};
pub use self::window::UniformIntGridWindow;
