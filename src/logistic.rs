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

//! Logistic map permutations.
//!
//! `x_{n+1} = r * x_n * (1 - x_n)` with `r` just below 4. With `r < 4`
//! the orbit never reaches exactly 0 or 1, so every value is a valid
//! ranking score.

use crate::error::Error;
use crate::permutation::Permutation;

/// Growth rate `r`.
pub const GROWTH_RATE: f64 = 3.9999999;

/// Iterations discarded before sampling.
pub const BURN_IN: usize = 1000;

const SEED_LOW: f64 = 0.1;
const SEED_SPAN: f64 = 0.4;
const SEED_NUDGE: f64 = 1e-6;
const LOW_PERIOD_POINTS: [f64; 3] = [0.25, 0.5, 0.75];

pub(crate) const KEY_RANGE: &str = "the open interval (0, 1)";

/// Checks that `key` lies in `(0, 1)`.
pub(crate) fn check_key(key: f64) -> Result<f64, Error> {
    if key.is_finite() && key > 0.0 && key < 1.0 {
        Ok(key)
    } else {
        Err(Error::KeyOutOfRange {
            key,
            range: KEY_RANGE,
        })
    }
}

/// Maps a key from `(0, 1)` into `(0.1, 0.5)`, away from low-period points.
///
/// The map is symmetric around 0.5 (`f(x) = f(1 - x)`), so seeds stay
/// on one side of it or keys `k` and `1 - k` would share an orbit.
fn seed(key: f64) -> f64 {
    let x = SEED_LOW + SEED_SPAN * key;
    if LOW_PERIOD_POINTS.iter().any(|p| (x - p).abs() < 1e-9) {
        x + SEED_NUDGE
    } else {
        x
    }
}

/// Chaotic orbit seeded from a key, already past its burn-in.
#[derive(Debug, Clone)]
pub struct LogisticMap {
    x: f64,
}

impl LogisticMap {
    pub fn new(key: f64) -> Result<Self, Error> {
        let mut map = Self {
            x: seed(check_key(key)?),
        };
        for _ in 0..BURN_IN {
            map.step();
        }
        Ok(map)
    }

    #[inline]
    fn step(&mut self) -> f64 {
        self.x = GROWTH_RATE * self.x * (1.0 - self.x);
        self.x
    }

    /// Ranks the next `len` orbit values.
    pub fn permutation(&mut self, len: usize) -> Permutation {
        let seq: Vec<f64> = self.by_ref().take(len).collect();
        Permutation::from_scores_by(&seq, f64::total_cmp)
    }
}

impl Iterator for LogisticMap {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.step())
    }
}

/// Row permutation for the row-only variant.
pub fn row_permutation(key: f64, height: usize) -> Result<Permutation, Error> {
    tracing::trace!(key, height, "building logistic row permutation");
    Ok(LogisticMap::new(key)?.permutation(height))
}

/// Row and column permutations from one continuous orbit.
///
/// The row part equals [`row_permutation`] for the same key.
pub fn row_column_permutations(
    key: f64,
    height: usize,
    width: usize,
) -> Result<(Permutation, Permutation), Error> {
    tracing::trace!(key, height, width, "building logistic row/col permutations");
    let mut map = LogisticMap::new(key)?;
    let rows = map.permutation(height);
    let cols = map.permutation(width);
    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_key_range() {
        for key in [0.0, 1.0, -0.25, 1.5, f64::NAN, f64::INFINITY] {
            assert_matches!(LogisticMap::new(key), Err(Error::KeyOutOfRange { .. }));
        }
        for key in [1e-12, 0.001, 0.5, 0.999, 1.0 - 1e-12] {
            assert!(LogisticMap::new(key).is_ok());
        }
    }

    #[test]
    fn test_orbit_stays_open() {
        for key in [0.001, 0.1875, 0.5, 0.8125, 0.999] {
            let map = LogisticMap::new(key).unwrap();
            assert!(map.take(10_000).all(|x| x > 0.0 && x < 1.0));
        }
    }

    #[test]
    fn test_sensitivity() {
        let a = row_permutation(0.5, 64).unwrap();
        let b = row_permutation(0.5000001, 64).unwrap();
        assert_ne!(a, b);

        let a = row_permutation(0.123, 64).unwrap();
        let b = row_permutation(0.1230001, 64).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mirrored_keys_differ() {
        for key in [0.1, 0.3, 0.25, 0.4999] {
            assert_ne!(
                row_permutation(key, 32).unwrap(),
                row_permutation(1.0 - key, 32).unwrap(),
            );
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            row_column_permutations(0.456, 20, 30).unwrap(),
            row_column_permutations(0.456, 20, 30).unwrap(),
        );
    }

    #[test]
    fn test_row_part_shared() {
        let rows = row_permutation(0.618, 40).unwrap();
        let (rc_rows, cols) = row_column_permutations(0.618, 40, 25).unwrap();
        assert_eq!(rows, rc_rows);
        assert_eq!(cols.len(), 25);
        assert_ne!(cols, Permutation::identity(25));
    }
}
