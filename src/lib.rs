//! Library to reversibly scramble pixel positions of an image/array.
//!
//! Every algorithm derives a permutation of pixel positions from a key,
//! and applies it such that:
//!
//! * No element is duplicated nor removed, only moved.
//! * Shape and element type are unchanged.
//! * Decrypting with the same key restores the input exactly.
//! * Decrypting with a different key silently gives another scramble.
//!
//! Algorithms:
//!
//! * [per_pixel_md5_encrypt] : one MD5-ranked permutation over all pixels.
//! * [row_md5_encrypt] : a separate MD5-ranked permutation inside each row.
//! * [row_logistic_encrypt] : rows reordered by a logistic map orbit.
//! * [row_column_logistic_encrypt] : rows, then columns, reordered by
//!   a logistic map orbit.
//! * [tomato_encrypt] : pixels shifted along a Gilbert space-filling curve.
//!
//! Each has a matching `*_decrypt`. [Algorithm] selects one at runtime.
//!
//! This is position scrambling, not encryption of values. It does not
//! protect against a capable adversary.

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
//

mod error;
pub mod gilbert;
pub mod hash_order;
pub mod logistic;
pub mod permutation;
mod scramble;

#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use crate::permutation::{permute_rows_independently, Permutation};
#[doc(inline)]
pub use crate::scramble::*;
