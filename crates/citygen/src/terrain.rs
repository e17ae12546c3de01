//! Octave-combined terrain height field over the city plane.

use crate::rng::SineRandom;
use crate::simplex::SimplexNoise;

/// World span of the generation domain in meters (the host tree scale).
pub const TREE_SCALE: f64 = 16384.0;
/// One meter in normalized domain units.
pub const METER: f64 = 1.0 / TREE_SCALE;

const PERLIN_BASE_RANGE: f64 = 4.0;
const PERLIN_DENOMINATOR: f64 = 16384.0 / PERLIN_BASE_RANGE;

/// Maximum terrain height in meters.
pub const PLANE_MAX_HEIGHT: f64 = 500.0;

/// Pure height function: three noise octaves over a fixed permutation
/// table. No mutable state after construction.
pub struct TerrainField {
    noise: SimplexNoise,
}

impl Default for TerrainField {
    fn default() -> Self {
        Self::new(42.0)
    }
}

impl TerrainField {
    pub fn new(seed: f64) -> Self {
        let mut rng = SineRandom::new(seed);
        Self {
            noise: SimplexNoise::new(&mut rng),
        }
    }

    /// Terrain height in meters at (x, z), in [0, PLANE_MAX_HEIGHT].
    ///
    /// Three octaves at 1x, 10x/5x and 30x/15x spatial scale, each
    /// remapped from [-1, 1] to [0, 1], weighted 1 / 0.25 / 0.125 and
    /// averaged by total weight.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        let scaled_x = x / (METER * PERLIN_DENOMINATOR);
        let scaled_z = z / (METER * PERLIN_DENOMINATOR);

        let base = (self.noise.noise2(scaled_x, scaled_z) + 1.0) / 2.0;
        let second = (self.noise.noise2(10.0 * scaled_x, 5.0 * scaled_z) + 1.0) / 2.0;
        let third = (self.noise.noise2(30.0 * scaled_x, 15.0 * scaled_z) + 1.0) / 2.0;

        let combined = (base + 0.25 * second + 0.125 * third) / (1.0 + 0.25 + 0.125);
        combined * PLANE_MAX_HEIGHT
    }
}
