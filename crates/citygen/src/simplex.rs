//! 2D/3D simplex noise on a permutation table seeded from [`SineRandom`].
//!
//! Standard skewed-simplex-grid gradient noise (Gustavson's
//! formulation). The falloff thresholds (0.5 in 2D, 0.6 in 3D), the
//! `t*t * t*t` falloff polynomial, and the output scales (70 / 32) are
//! load-bearing: worlds generated against this exact formula depend on
//! them.

use crate::rng::SineRandom;

/// Gradient directions: the 12 edge midpoints of a cube.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

#[inline]
fn dot2(g: [f64; 3], x: f64, y: f64) -> f64 {
    g[0] * x + g[1] * y
}

#[inline]
fn dot3(g: [f64; 3], x: f64, y: f64, z: f64) -> f64 {
    g[0] * x + g[1] * y + g[2] * z
}

/// Deterministic gradient noise over a 512-entry permutation table.
/// The table is immutable after construction; two generators built from
/// equal RNG states produce identical noise everywhere.
pub struct SimplexNoise {
    /// 256 random bytes duplicated to 512 entries so gradient lookups
    /// never need index wrapping.
    perm: [usize; 512],
}

impl SimplexNoise {
    pub fn new(rng: &mut SineRandom) -> Self {
        let mut p = [0usize; 256];
        for slot in p.iter_mut() {
            *slot = (rng.next() * 256.0).floor() as usize;
        }
        let mut perm = [0usize; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    /// 2D noise in [-1, 1].
    pub fn noise2(&self, xin: f64, yin: f64) -> f64 {
        // Skew the input space to determine which simplex cell we're in.
        let f2 = 0.5 * (3.0f64.sqrt() - 1.0);
        let s = (xin + yin) * f2;
        let i = (xin + s).floor();
        let j = (yin + s).floor();
        let g2 = (3.0 - 3.0f64.sqrt()) / 6.0;
        let t = (i + j) * g2;
        // Unskew the cell origin back to (x, y) space.
        let x0 = xin - (i - t);
        let y0 = yin - (j - t);

        // The 2D simplex is an equilateral triangle; pick which half.
        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + g2;
        let y1 = y0 - j1 as f64 + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        // Hashed gradient indices of the three corners.
        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = self.perm[ii + self.perm[jj]] % 12;
        let gi1 = self.perm[ii + i1 + self.perm[jj + j1]] % 12;
        let gi2 = self.perm[ii + 1 + self.perm[jj + 1]] % 12;

        let mut n = 0.0;
        let t0 = 0.5 - x0 * x0 - y0 * y0;
        if t0 >= 0.0 {
            let t0 = t0 * t0;
            n += t0 * t0 * dot2(GRAD3[gi0], x0, y0);
        }
        let t1 = 0.5 - x1 * x1 - y1 * y1;
        if t1 >= 0.0 {
            let t1 = t1 * t1;
            n += t1 * t1 * dot2(GRAD3[gi1], x1, y1);
        }
        let t2 = 0.5 - x2 * x2 - y2 * y2;
        if t2 >= 0.0 {
            let t2 = t2 * t2;
            n += t2 * t2 * dot2(GRAD3[gi2], x2, y2);
        }

        // Scaled to the interval [-1, 1].
        70.0 * n
    }

    /// 3D noise in [-1, 1].
    pub fn noise3(&self, xin: f64, yin: f64, zin: f64) -> f64 {
        let f3 = 1.0 / 3.0;
        let s = (xin + yin + zin) * f3;
        let i = (xin + s).floor();
        let j = (yin + s).floor();
        let k = (zin + s).floor();
        let g3 = 1.0 / 6.0;
        let t = (i + j + k) * g3;
        let x0 = xin - (i - t);
        let y0 = yin - (j - t);
        let z0 = zin - (k - t);

        // The 3D simplex is a slightly irregular tetrahedron; order the
        // corner traversal by the magnitudes of the coordinate deltas.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0) // X Y Z
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1) // X Z Y
            } else {
                (0, 0, 1, 1, 0, 1) // Z X Y
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1) // Z Y X
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1) // Y Z X
        } else {
            (0, 1, 0, 1, 1, 0) // Y X Z
        };

        let x1 = x0 - i1 as f64 + g3;
        let y1 = y0 - j1 as f64 + g3;
        let z1 = z0 - k1 as f64 + g3;
        let x2 = x0 - i2 as f64 + 2.0 * g3;
        let y2 = y0 - j2 as f64 + 2.0 * g3;
        let z2 = z0 - k2 as f64 + 2.0 * g3;
        let x3 = x0 - 1.0 + 3.0 * g3;
        let y3 = y0 - 1.0 + 3.0 * g3;
        let z3 = z0 - 1.0 + 3.0 * g3;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;
        let gi0 = self.perm[ii + self.perm[jj + self.perm[kk]]] % 12;
        let gi1 = self.perm[ii + i1 + self.perm[jj + j1 + self.perm[kk + k1]]] % 12;
        let gi2 = self.perm[ii + i2 + self.perm[jj + j2 + self.perm[kk + k2]]] % 12;
        let gi3 = self.perm[ii + 1 + self.perm[jj + 1 + self.perm[kk + 1]]] % 12;

        let mut n = 0.0;
        let t0 = 0.6 - x0 * x0 - y0 * y0 - z0 * z0;
        if t0 >= 0.0 {
            let t0 = t0 * t0;
            n += t0 * t0 * dot3(GRAD3[gi0], x0, y0, z0);
        }
        let t1 = 0.6 - x1 * x1 - y1 * y1 - z1 * z1;
        if t1 >= 0.0 {
            let t1 = t1 * t1;
            n += t1 * t1 * dot3(GRAD3[gi1], x1, y1, z1);
        }
        let t2 = 0.6 - x2 * x2 - y2 * y2 - z2 * z2;
        if t2 >= 0.0 {
            let t2 = t2 * t2;
            n += t2 * t2 * dot3(GRAD3[gi2], x2, y2, z2);
        }
        let t3 = 0.6 - x3 * x3 - y3 * y3 - z3 * z3;
        if t3 >= 0.0 {
            let t3 = t3 * t3;
            n += t3 * t3 * dot3(GRAD3[gi3], x3, y3, z3);
        }

        // Scaled to stay just inside [-1, 1].
        32.0 * n
    }
}
