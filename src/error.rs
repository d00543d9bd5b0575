// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use thiserror::Error;

use crate::scramble::{Algorithm, KeyKind};

/// Errors raised before any permutation is built.
///
/// A wrong (but well-formed) key is never reported here. It produces a
/// different valid permutation instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("image must have at least 2 axes (height, width), got {0}")]
    TooFewAxes(usize),

    #[error("image must not be empty (height {height}, width {width})")]
    EmptyImage { height: usize, width: usize },

    #[error("{algorithm} expects a {expected} key, got a {got} key")]
    KeyKind {
        algorithm: Algorithm,
        expected: KeyKind,
        got: KeyKind,
    },

    #[error("{algorithm} has no default key")]
    MissingKey { algorithm: Algorithm },

    #[error("key {key} is outside {range}")]
    KeyOutOfRange { key: f64, range: &'static str },

    #[error("index list of length {0} is not a permutation")]
    NotPermutation(usize),

    #[error("permutation of length {permutation} does not fit axis of length {axis}")]
    LengthMismatch { permutation: usize, axis: usize },
}
