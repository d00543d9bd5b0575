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

use std::cmp::Ordering;

use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use ndarray::RemoveAxis;
use rayon::slice::ParallelSliceMut;

use crate::error::Error;

/// Returns `(height, width)` of an image array.
///
/// The first two axes are the pixel grid, every other axis moves
/// together with its pixel.
pub(crate) fn grid_shape(shape: &[usize]) -> Result<(usize, usize), Error> {
    match *shape {
        [h, w, ..] if h == 0 || w == 0 => Err(Error::EmptyImage {
            height: h,
            width: w,
        }),
        [h, w, ..] => Ok((h, w)),
        _ => Err(Error::TooFewAxes(shape.len())),
    }
}

/// A bijection over `[0, len)`.
///
/// Applying it places the element formerly at `self[i]` at position `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Self((0..len).collect())
    }

    /// Ranks indices by their score.
    ///
    /// Ties keep their original index order, so the result is total
    /// and reproducible. `permutation[rank] = index`.
    pub(crate) fn from_scores_by<T, F>(scores: &[T], cmp: F) -> Self
    where
        T: Sync,
        F: Fn(&T, &T) -> Ordering + Sync,
    {
        let mut indices: Vec<usize> = (0..scores.len()).collect();
        // par_sort_by is stable
        indices.par_sort_by(|&a, &b| cmp(&scores[a], &scores[b]));
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns `q` such that `q[self[i]] = i`.
    pub fn inverse(&self) -> Self {
        let mut q = vec![0; self.0.len()];
        for (i, &p) in self.0.iter().enumerate() {
            q[p] = i;
        }
        Self(q)
    }

    /// Reorders `arr` along `axis`.
    pub fn apply_axis<A, D>(
        &self,
        arr: ArrayView<'_, A, D>,
        axis: Axis,
    ) -> Result<Array<A, D>, Error>
    where
        A: Clone,
        D: RemoveAxis,
    {
        let len = arr.len_of(axis);
        if len != self.len() {
            return Err(Error::LengthMismatch {
                permutation: self.len(),
                axis: len,
            });
        }

        Ok(arr.select(axis, &self.0))
    }

    /// Reorders the pixels of `arr` as one flattened `height * width` grid
    /// in row-major order.
    pub fn apply_pixels<A, D>(&self, arr: ArrayView<'_, A, D>) -> Result<Array<A, D>, Error>
    where
        A: Clone + Send + Sync,
        D: RemoveAxis,
        D::Smaller: RemoveAxis,
    {
        let (h, w) = grid_shape(arr.shape())?;
        if h * w != self.len() {
            return Err(Error::LengthMismatch {
                permutation: self.len(),
                axis: h * w,
            });
        }

        let mut out = arr.to_owned();
        let perm = &self.0[..];
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(r, mut row)| {
                for (c, mut px) in row.axis_iter_mut(Axis(0)).enumerate() {
                    let src = perm[r * w + c];
                    let src_row = arr.index_axis(Axis(0), src / w);
                    px.assign(&src_row.index_axis(Axis(0), src % w));
                }
            });

        Ok(out)
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = Error;

    fn try_from(v: Vec<usize>) -> Result<Self, Error> {
        let mut seen = vec![false; v.len()];
        for &i in &v {
            match seen.get_mut(i) {
                Some(s) if !*s => *s = true,
                _ => return Err(Error::NotPermutation(v.len())),
            }
        }
        Ok(Self(v))
    }
}

/// Reorders every row of `arr` with its own permutation.
///
/// Pixels never leave their row. `perms[r]` applies to row `r`.
pub fn permute_rows_independently<A, D>(
    arr: ArrayView<'_, A, D>,
    perms: &[Permutation],
) -> Result<Array<A, D>, Error>
where
    A: Clone + Send + Sync,
    D: RemoveAxis,
    D::Smaller: RemoveAxis,
{
    let (h, w) = grid_shape(arr.shape())?;
    if perms.len() != h {
        return Err(Error::LengthMismatch {
            permutation: perms.len(),
            axis: h,
        });
    }
    if let Some(p) = perms.iter().find(|p| p.len() != w) {
        return Err(Error::LengthMismatch {
            permutation: p.len(),
            axis: w,
        });
    }

    let mut out = arr.to_owned();
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(arr.axis_iter(Axis(0)).into_par_iter())
        .zip(perms.par_iter())
        .for_each(|((mut dst, src), p)| dst.assign(&src.select(Axis(0), p.as_slice())));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_try_from() {
        assert!(Permutation::try_from(vec![2, 0, 1]).is_ok());
        assert!(Permutation::try_from(vec![]).is_ok());
        assert_matches!(
            Permutation::try_from(vec![0, 0, 1]),
            Err(Error::NotPermutation(3))
        );
        assert_matches!(
            Permutation::try_from(vec![0, 3, 1]),
            Err(Error::NotPermutation(3))
        );
    }

    #[test]
    fn test_inverse() {
        let p = Permutation::try_from(vec![3, 0, 4, 1, 2]).unwrap();
        let q = p.inverse();
        assert_eq!(q.as_slice(), &[1, 3, 4, 0, 2]);
        assert_eq!(q.inverse(), p);
        for i in 0..p.len() {
            assert_eq!(q.as_slice()[p.as_slice()[i]], i);
        }
    }

    #[test]
    fn test_from_scores_is_stable() {
        let p = Permutation::from_scores_by(&[5u64, 1, 5, 0, 1], Ord::cmp);
        assert_eq!(p.as_slice(), &[3, 1, 4, 0, 2]);
    }

    #[test]
    fn test_apply_axis() {
        let arr = array![[1u8, 2, 3], [4, 5, 6]];
        let p = Permutation::try_from(vec![2, 0, 1]).unwrap();

        let out = p.apply_axis(arr.view(), Axis(1)).unwrap();
        assert_eq!(out, array![[3u8, 1, 2], [6, 4, 5]]);

        let back = p.inverse().apply_axis(out.view(), Axis(1)).unwrap();
        assert_eq!(back, arr);

        assert_matches!(
            p.apply_axis(arr.view(), Axis(0)),
            Err(Error::LengthMismatch {
                permutation: 3,
                axis: 2
            })
        );
    }

    #[test]
    fn test_apply_pixels_keeps_channels() {
        let arr = Array3::from_shape_fn((2, 2, 3), |(r, c, ch)| (r * 20 + c * 10 + ch) as u8);
        let p = Permutation::try_from(vec![3, 2, 1, 0]).unwrap();

        let out = p.apply_pixels(arr.view()).unwrap();
        assert_eq!(out.slice(s![0, 0, ..]), arr.slice(s![1, 1, ..]));
        assert_eq!(out.slice(s![0, 1, ..]), arr.slice(s![1, 0, ..]));
        assert_eq!(out.slice(s![1, 1, ..]), arr.slice(s![0, 0, ..]));

        let back = p.inverse().apply_pixels(out.view()).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn test_permute_rows_independently() {
        let arr = array![[1u8, 2, 3], [4, 5, 6]];
        let perms = [
            Permutation::try_from(vec![1, 2, 0]).unwrap(),
            Permutation::identity(3),
        ];

        let out = permute_rows_independently(arr.view(), &perms).unwrap();
        assert_eq!(out, array![[2u8, 3, 1], [4, 5, 6]]);

        let inv: Vec<_> = perms.iter().map(Permutation::inverse).collect();
        assert_eq!(permute_rows_independently(out.view(), &inv).unwrap(), arr);
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(&[4, 5, 3]), Ok((4, 5)));
        assert_matches!(grid_shape(&[7]), Err(Error::TooFewAxes(1)));
        assert_matches!(
            grid_shape(&[0, 5]),
            Err(Error::EmptyImage {
                height: 0,
                width: 5
            })
        );
    }
}
