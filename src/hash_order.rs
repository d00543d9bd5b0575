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

//! Digest-ranked permutations.
//!
//! Every index gets a score: the first 8 bytes (big-endian) of
//! `D(key_utf8 || [row_be64] || index_be64)`. Indices are then sorted by
//! score, ties broken by index.

use md5::digest::Digest;
use rayon::prelude::*;

use crate::permutation::Permutation;

fn score<D: Digest + Clone>(base: &D, row: Option<u64>, index: u64) -> u64 {
    let mut hasher = base.clone();
    if let Some(row) = row {
        hasher.update(row.to_be_bytes());
    }
    hasher.update(index.to_be_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    let n = digest.len().min(8);
    bytes[..n].copy_from_slice(&digest[..n]);
    u64::from_be_bytes(bytes)
}

fn ranked<D>(base: &D, row: Option<u64>, len: usize) -> Permutation
where
    D: Digest + Clone + Sync,
{
    let scores: Vec<u64> = (0..len)
        .into_par_iter()
        .map(|i| score(base, row, i as u64))
        .collect();
    Permutation::from_scores_by(&scores, Ord::cmp)
}

/// Permutation of `[0, len)` keyed by `key`.
pub fn hash_permutation<D>(key: &str, len: usize) -> Permutation
where
    D: Digest + Clone + Sync,
{
    tracing::trace!(len, "building hash permutation");
    ranked(&D::new_with_prefix(key.as_bytes()), None, len)
}

/// One unrelated permutation of `[0, width)` per row.
pub fn row_hash_permutations<D>(key: &str, height: usize, width: usize) -> Vec<Permutation>
where
    D: Digest + Clone + Sync,
{
    tracing::trace!(height, width, "building row hash permutations");
    let base = D::new_with_prefix(key.as_bytes());
    (0..height)
        .into_par_iter()
        .map(|r| ranked(&base, Some(r as u64), width))
        .collect()
}
