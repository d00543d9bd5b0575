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

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use md5::Md5;
use ndarray::prelude::*;
use ndarray::RemoveAxis;
use tracing::instrument;

use crate::error::Error;
use crate::gilbert::{self, curve_permutation};
use crate::hash_order::{hash_permutation, row_hash_permutations};
use crate::logistic::{row_column_permutations, row_permutation};
use crate::permutation::{grid_shape, permute_rows_independently, Permutation};

/// Scrambles every pixel of the image with one MD5-ranked permutation.
///
/// Parameters:
/// * `arr` : Input image. The first 2 axes are height and width,
///   any further axes move together with their pixel.
/// * `key` : Any string, including the empty one. Hashed as UTF-8.
#[instrument(
    skip_all,
    name = "per_pixel_md5::encrypt",
    fields(shape = ?arr.shape())
)]
pub fn per_pixel_md5_encrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: &str,
) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    hash_permutation::<Md5>(key, h * w).apply_pixels(arr)
}

#[instrument(
    skip_all,
    name = "per_pixel_md5::decrypt",
    fields(shape = ?arr.shape())
)]
pub fn per_pixel_md5_decrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: &str,
) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    hash_permutation::<Md5>(key, h * w)
        .inverse()
        .apply_pixels(arr)
}

/// Scrambles the pixels inside each row, with an unrelated
/// MD5-ranked permutation per row. Pixels never change row.
#[instrument(
    skip_all,
    name = "row_md5::encrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_md5_encrypt<A, D>(arr: ArrayView<'_, A, D>, key: &str) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    permute_rows_independently(arr, &row_hash_permutations::<Md5>(key, h, w))
}

#[instrument(
    skip_all,
    name = "row_md5::decrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_md5_decrypt<A, D>(arr: ArrayView<'_, A, D>, key: &str) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    let perms: Vec<_> = row_hash_permutations::<Md5>(key, h, w)
        .iter()
        .map(Permutation::inverse)
        .collect();
    permute_rows_independently(arr, &perms)
}

/// Reorders whole rows by a logistic map orbit.
///
/// `key` must lie in `(0, 1)`.
#[instrument(
    skip_all,
    name = "row_logistic::encrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_logistic_encrypt<A, D>(arr: ArrayView<'_, A, D>, key: f64) -> Result<Array<A, D>, Error>
where
    A: Clone,
    D: RemoveAxis,
{
    let (h, _) = grid_shape(arr.shape())?;
    row_permutation(key, h)?.apply_axis(arr, Axis(0))
}

#[instrument(
    skip_all,
    name = "row_logistic::decrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_logistic_decrypt<A, D>(arr: ArrayView<'_, A, D>, key: f64) -> Result<Array<A, D>, Error>
where
    A: Clone,
    D: RemoveAxis,
{
    let (h, _) = grid_shape(arr.shape())?;
    row_permutation(key, h)?.inverse().apply_axis(arr, Axis(0))
}

/// Reorders rows, then columns, by one continuous logistic map orbit.
///
/// `key` must lie in `(0, 1)`. The row step is identical to
/// [`row_logistic_encrypt`] with the same key.
#[instrument(
    skip_all,
    name = "row_column_logistic::encrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_column_logistic_encrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: f64,
) -> Result<Array<A, D>, Error>
where
    A: Clone,
    D: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    let (rows, cols) = row_column_permutations(key, h, w)?;
    let out = rows.apply_axis(arr, Axis(0))?;
    cols.apply_axis(out.view(), Axis(1))
}

#[instrument(
    skip_all,
    name = "row_column_logistic::decrypt",
    fields(shape = ?arr.shape())
)]
pub fn row_column_logistic_decrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: f64,
) -> Result<Array<A, D>, Error>
where
    A: Clone,
    D: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    let (rows, cols) = row_column_permutations(key, h, w)?;
    let out = cols.inverse().apply_axis(arr, Axis(1))?;
    rows.inverse().apply_axis(out.view(), Axis(0))
}

/// Shifts every pixel along a Gilbert curve covering the image.
///
/// `key` may be any finite real, `None` means [`gilbert::DEFAULT_KEY`].
///
/// The key only picks one of `height * width` shift offsets (see
/// [`gilbert::curve_offset`]). Keys closer together than about
/// `1 / (0.618 * height * width)` usually give the same output, and a key
/// whose offset is a multiple of the pixel count, such as `0.0`, returns
/// the image unchanged.
#[instrument(
    skip_all,
    name = "tomato::encrypt",
    fields(shape = ?arr.shape())
)]
pub fn tomato_encrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: Option<f64>,
) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    let key = key.unwrap_or(gilbert::DEFAULT_KEY);
    curve_permutation(key, h, w)?.apply_pixels(arr)
}

#[instrument(
    skip_all,
    name = "tomato::decrypt",
    fields(shape = ?arr.shape())
)]
pub fn tomato_decrypt<A, D>(
    arr: ArrayView<'_, A, D>,
    key: Option<f64>,
) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    let key = key.unwrap_or(gilbert::DEFAULT_KEY);
    curve_permutation(key, h, w)?.inverse().apply_pixels(arr)
}

/// Kind of key an algorithm takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Text,
    Real,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Real => "real",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Text(String),
    Real(f64),
}

impl Key {
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Text(_) => KeyKind::Text,
            Self::Real(_) => KeyKind::Real,
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for Key {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

/// Scrambling algorithm, for callers choosing one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    PerPixelMd5,
    RowMd5,
    RowLogistic,
    RowColumnLogistic,
    Tomato,
}

impl Algorithm {
    pub fn key_kind(self) -> KeyKind {
        match self {
            Self::PerPixelMd5 | Self::RowMd5 => KeyKind::Text,
            Self::RowLogistic | Self::RowColumnLogistic | Self::Tomato => KeyKind::Real,
        }
    }

    pub fn default_key(self) -> Option<Key> {
        match self {
            Self::Tomato => Some(Key::Real(gilbert::DEFAULT_KEY)),
            _ => None,
        }
    }

    /// Parses a textual key into this algorithm's key kind.
    pub fn parse_key(self, s: &str) -> Result<Key, Error> {
        match self.key_kind() {
            KeyKind::Text => Ok(Key::Text(s.to_owned())),
            KeyKind::Real => match s.trim().parse() {
                Ok(v) => Ok(Key::Real(v)),
                Err(_) => Err(Error::KeyKind {
                    algorithm: self,
                    expected: KeyKind::Real,
                    got: KeyKind::Text,
                }),
            },
        }
    }

    pub fn encrypt<A, D>(
        self,
        arr: ArrayView<'_, A, D>,
        key: Option<&Key>,
    ) -> Result<Array<A, D>, Error>
    where
        A: Clone + Send + Sync,
        D: RemoveAxis,
        D::Smaller: RemoveAxis,
    {
        self.run(arr, key, false)
    }

    pub fn decrypt<A, D>(
        self,
        arr: ArrayView<'_, A, D>,
        key: Option<&Key>,
    ) -> Result<Array<A, D>, Error>
    where
        A: Clone + Send + Sync,
        D: RemoveAxis,
        D::Smaller: RemoveAxis,
    {
        self.run(arr, key, true)
    }

    fn run<A, D>(
        self,
        arr: ArrayView<'_, A, D>,
        key: Option<&Key>,
        decrypt: bool,
    ) -> Result<Array<A, D>, Error>
    where
        A: Clone + Send + Sync,
        D: RemoveAxis,
        D::Smaller: RemoveAxis,
    {
        let default;
        let key = match key {
            Some(k) => k,
            None => {
                default = self
                    .default_key()
                    .ok_or(Error::MissingKey { algorithm: self })?;
                &default
            }
        };

        match (self, key, decrypt) {
            (Self::PerPixelMd5, Key::Text(k), false) => per_pixel_md5_encrypt(arr, k),
            (Self::PerPixelMd5, Key::Text(k), true) => per_pixel_md5_decrypt(arr, k),
            (Self::RowMd5, Key::Text(k), false) => row_md5_encrypt(arr, k),
            (Self::RowMd5, Key::Text(k), true) => row_md5_decrypt(arr, k),
            (Self::RowLogistic, &Key::Real(k), false) => row_logistic_encrypt(arr, k),
            (Self::RowLogistic, &Key::Real(k), true) => row_logistic_decrypt(arr, k),
            (Self::RowColumnLogistic, &Key::Real(k), false) => row_column_logistic_encrypt(arr, k),
            (Self::RowColumnLogistic, &Key::Real(k), true) => row_column_logistic_decrypt(arr, k),
            (Self::Tomato, &Key::Real(k), false) => tomato_encrypt(arr, Some(k)),
            (Self::Tomato, &Key::Real(k), true) => tomato_decrypt(arr, Some(k)),
            (algorithm, key, _) => Err(Error::KeyKind {
                algorithm,
                expected: algorithm.key_kind(),
                got: key.kind(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PerPixelMd5 => "per-pixel-md5",
            Self::RowMd5 => "row-md5",
            Self::RowLogistic => "row-logistic",
            Self::RowColumnLogistic => "row-column-logistic",
            Self::Tomato => "tomato",
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        <Self as ValueEnum>::from_str(s, true)
    }
}
