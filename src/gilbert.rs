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

//! Generalized Gilbert curve and the curve-shift permutation built on it.

use crate::error::Error;
use crate::permutation::Permutation;

/// Key used by the curve variant when none is given.
pub const DEFAULT_KEY: f64 = 1.0;

/// `(sqrt(5) - 1) / 2`
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

pub(crate) const KEY_RANGE: &str = "the finite reals";

/// A sub-rectangle at `(x, y)` spanned by major axis `a` and minor axis `b`.
#[derive(Debug, Clone, Copy)]
struct Block {
    x: i64,
    y: i64,
    ax: i64,
    ay: i64,
    bx: i64,
    by: i64,
}

impl Block {
    const fn new(x: i64, y: i64, ax: i64, ay: i64, bx: i64, by: i64) -> Self {
        Self {
            x,
            y,
            ax,
            ay,
            bx,
            by,
        }
    }
}

/// Visits every cell of a `width` x `height` grid exactly once.
///
/// Returns row-major flat indices (`y * width + x`) in curve order,
/// starting at the top-left cell.
pub fn gilbert_order(width: usize, height: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(width * height);
    if width == 0 || height == 0 {
        return order;
    }

    let (w, h) = (width as i64, height as i64);
    let root = if w >= h {
        Block::new(0, 0, w, 0, 0, h)
    } else {
        Block::new(0, 0, 0, h, w, 0)
    };

    let mut push = |x: i64, y: i64| {
        debug_assert!((0..w).contains(&x) && (0..h).contains(&y));
        order.push(y as usize * width + x as usize);
    };

    // Children are pushed in reverse so they pop in visit order.
    let mut stack = vec![root];
    while let Some(block) = stack.pop() {
        let Block {
            x,
            y,
            ax,
            ay,
            bx,
            by,
        } = block;
        let w = (ax + ay).abs();
        let h = (bx + by).abs();
        let (dax, day) = (ax.signum(), ay.signum());
        let (dbx, dby) = (bx.signum(), by.signum());

        if h == 1 {
            for i in 0..w {
                push(x + i * dax, y + i * day);
            }
            continue;
        }
        if w == 1 {
            for i in 0..h {
                push(x + i * dbx, y + i * dby);
            }
            continue;
        }

        // Floor division, matters for negative axes.
        let (mut ax2, mut ay2) = (ax.div_euclid(2), ay.div_euclid(2));
        let (mut bx2, mut by2) = (bx.div_euclid(2), by.div_euclid(2));
        let w2 = (ax2 + ay2).abs();
        let h2 = (bx2 + by2).abs();

        if 2 * w > 3 * h {
            // Long block: split in two along the major axis.
            if w2 % 2 == 1 && w > 2 {
                ax2 += dax;
                ay2 += day;
            }
            stack.push(Block::new(x + ax2, y + ay2, ax - ax2, ay - ay2, bx, by));
            stack.push(Block::new(x, y, ax2, ay2, bx, by));
        } else {
            // Standard case: up, across, down.
            if h2 % 2 == 1 && h > 2 {
                bx2 += dbx;
                by2 += dby;
            }
            let cx = x + (ax - dax) + (bx2 - dbx);
            let cy = y + (ay - day) + (by2 - dby);
            stack.push(Block::new(cx, cy, -bx2, -by2, ax2 - ax, ay2 - ay));
            stack.push(Block::new(x + bx2, y + by2, ax, ay, bx - bx2, by - by2));
            stack.push(Block::new(x, y, bx2, by2, ax2, ay2));
        }
    }

    order
}

/// Number of curve steps every pixel is shifted by.
///
/// `round(0.618... * len * key)` reduced modulo `len`. There are only
/// `len` distinct offsets, so nearby keys collide and `key = 0.0` gives
/// offset 0.
pub fn curve_offset(key: f64, len: usize) -> Result<usize, Error> {
    if !key.is_finite() {
        return Err(Error::KeyOutOfRange {
            key,
            range: KEY_RANGE,
        });
    }
    if len == 0 {
        return Ok(0);
    }

    let n = len as f64;
    let offset = (GOLDEN_RATIO_CONJUGATE * n * key).round().rem_euclid(n) as usize;
    Ok(offset % len)
}

/// Moves the pixel at curve rank `k` to curve rank `k + offset`.
pub fn curve_permutation(key: f64, height: usize, width: usize) -> Result<Permutation, Error> {
    let order = gilbert_order(width, height);
    let n = order.len();
    let offset = curve_offset(key, n)?;
    tracing::trace!(key, height, width, offset, "building curve permutation");

    let mut perm = vec![0; n];
    for (k, &src) in order.iter().enumerate() {
        perm[order[(k + offset) % n]] = src;
    }
    Permutation::try_from(perm)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn coords(idx: usize, width: usize) -> (i64, i64) {
        ((idx % width) as i64, (idx / width) as i64)
    }

    #[test]
    fn test_visits_every_cell_once() {
        let mut sizes: Vec<(usize, usize)> = (1..=17)
            .flat_map(|w| (1..=17).map(move |h| (w, h)))
            .collect();
        sizes.extend([(1, 100), (100, 1), (37, 53)]);
        sizes.extend([(128, 3), (3, 128), (200, 150)]);

        for (w, h) in sizes {
            let order = gilbert_order(w, h);
            assert_eq!(order.len(), w * h, "{w}x{h}");
            assert_eq!(order[0], 0, "{w}x{h}");

            let mut seen = vec![false; w * h];
            for &i in &order {
                assert!(!seen[i], "{w}x{h} visits {i} twice");
                seen[i] = true;
            }
        }
    }

    #[test]
    fn test_steps_are_local() {
        for (w, h) in [(16, 16), (8, 8), (32, 16)] {
            let order = gilbert_order(w, h);
            for s in order.windows(2) {
                let (x0, y0) = coords(s[0], w);
                let (x1, y1) = coords(s[1], w);
                assert_eq!((x0 - x1).abs() + (y0 - y1).abs(), 1, "{w}x{h}");
            }
        }

        for (w, h) in [(7, 5), (5, 7), (33, 18), (1, 9)] {
            let order = gilbert_order(w, h);
            for s in order.windows(2) {
                let (x0, y0) = coords(s[0], w);
                let (x1, y1) = coords(s[1], w);
                assert!((x0 - x1).abs() <= 1 && (y0 - y1).abs() <= 1, "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_degenerate_strips() {
        assert_eq!(gilbert_order(5, 1), vec![0, 1, 2, 3, 4]);
        assert_eq!(gilbert_order(1, 4), vec![0, 1, 2, 3]);
        assert!(gilbert_order(0, 4).is_empty());
    }

    #[test]
    fn test_offset() {
        assert_eq!(curve_offset(DEFAULT_KEY, 100).unwrap(), 62);
        assert_eq!(curve_offset(2.0, 100).unwrap(), 24);
        assert_eq!(curve_offset(-1.0, 100).unwrap(), 38);
        assert_eq!(curve_offset(0.0, 100).unwrap(), 0);
        // nearby keys share an offset
        let near = curve_offset(1.001, 256).unwrap();
        assert_eq!(curve_offset(1.0, 256).unwrap(), near);
        assert_matches!(
            curve_offset(f64::NAN, 100),
            Err(Error::KeyOutOfRange { .. })
        );
    }

    #[test]
    fn test_curve_permutation() {
        let p = curve_permutation(DEFAULT_KEY, 12, 10).unwrap();
        assert_eq!(p.len(), 120);
        assert_ne!(p, Permutation::identity(120));
        assert_ne!(p, curve_permutation(2.0, 12, 10).unwrap());
        let identity = Permutation::identity(120);
        assert_eq!(curve_permutation(0.0, 12, 10).unwrap(), identity);
    }
}
