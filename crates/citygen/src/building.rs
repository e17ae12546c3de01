//! Building records, color palette, and block-scale constants.

use glam::{DVec2, DVec3};

use crate::city::Ring;
use crate::terrain::METER;

/// Edge length of one building block in meters.
pub const BUILDING_BLOCK_METERS: f64 = 8.0;
/// Edge length of one building block in normalized domain units.
pub const BUILDING_BLOCK_SIZE: f64 = METER * BUILDING_BLOCK_METERS;

pub const MIN_BUILDING_SIDE_METERS: f64 = 16.0;
pub const MAX_BUILDING_SIDE_METERS: f64 = 128.0;
pub const MIN_BUILDING_SIDE_BLOCKS: i64 =
    (MIN_BUILDING_SIDE_METERS / BUILDING_BLOCK_METERS) as i64;
pub const MAX_BUILDING_SIDE_BLOCKS: i64 =
    (MAX_BUILDING_SIDE_METERS / BUILDING_BLOCK_METERS) as i64;

/// Banding interval bounds: every Nth row is darkened as a section break.
pub const MIN_SECTION_SIZE_BLOCKS: i64 = 2;
pub const MAX_SECTION_SIZE_BLOCKS: i64 = 24;
pub const SECTION_COLOR_MODIFIER: f64 = 0.5;

/// Facade base palette.
pub const BUILDING_COLORS: [[u8; 3]; 4] = [
    [42, 74, 123],
    [71, 108, 152],
    [140, 140, 136],
    [40, 45, 41],
];

pub const WINDOW_COLOR: [u8; 3] = [250, 250, 210];
pub const BLACK_COLOR: [u8; 3] = [1, 1, 1];

/// Chance that an odd edge block is a lit window rather than a dark one.
pub const WINDOW_LIT_PROBABILITY: f64 = 0.25;

/// Beacon cube edge length in normalized domain units.
pub const BEACON_SIZE: f64 = 32.0 * METER;
/// Chance an inner-city building gets a rooftop beacon.
pub const BEACON_PROBABILITY: f64 = 0.10;
/// Beacons whose roof position is at or below this height in meters are
/// silently dropped (counted, never raised as an error).
pub const MINIMUM_BEACON_HEIGHT: f64 = 400.0;

/// One placed building.
#[derive(Debug, Clone)]
pub struct BuildingRecord {
    /// Origin corner (x, z) in meters.
    pub corner: DVec2,
    /// Footprint in blocks; always odd so facade features center.
    pub size_x_blocks: i64,
    pub size_z_blocks: i64,
    pub height_blocks: i64,
    /// Banding interval for darkened section rows.
    pub section_size_blocks: i64,
    /// Facade base color from [`BUILDING_COLORS`].
    pub color: [u8; 3],
    pub ring: Ring,
}

/// An edge block that may be lit; flickered during steady state.
#[derive(Debug, Clone)]
pub struct Window {
    /// Block position in normalized domain units.
    pub position: DVec3,
    pub lit: bool,
}

/// A pulsing rooftop light.
#[derive(Debug, Clone)]
pub struct Beacon {
    /// Position in meters; normalized at emission time.
    pub position: DVec3,
    /// Current channel intensity, held in [1, 255] after the first step.
    pub intensity: i32,
    /// Which RGB channel pulses (0 = red, 1 = green, 2 = blue).
    pub channel: u8,
    /// Signed intensity step; negated at each bound.
    pub step: i32,
}

impl Beacon {
    /// Color at the current intensity: the pulsing channel lit, the
    /// other two dark.
    pub fn color(&self) -> [u8; 3] {
        let mut color = [0u8; 3];
        color[self.channel as usize % 3] = self.intensity.clamp(0, 255) as u8;
        color
    }

    /// Step the intensity, ping-ponging between 1 and 255.
    pub fn advance(&mut self) {
        self.intensity += self.step;
        if self.intensity < 1 {
            self.intensity = 1;
            self.step = -self.step;
        } else if self.intensity > 255 {
            self.intensity = 255;
            self.step = -self.step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beacon_intensity_ping_pongs_within_bounds() {
        let mut beacon = Beacon {
            position: DVec3::ZERO,
            intensity: 255,
            channel: 0,
            step: 7,
        };
        let mut reversals = 0;
        let mut last_step = beacon.step;
        for _ in 0..200 {
            beacon.advance();
            assert!((1..=255).contains(&beacon.intensity));
            if beacon.step != last_step {
                reversals += 1;
                // Direction flips exactly at a bound.
                assert!(beacon.intensity == 1 || beacon.intensity == 255);
                last_step = beacon.step;
            }
        }
        assert!(reversals >= 2, "beacon should bounce off both bounds");
    }

    #[test]
    fn beacon_color_selects_channel() {
        let beacon = Beacon {
            position: DVec3::ZERO,
            intensity: 120,
            channel: 1,
            step: 4,
        };
        assert_eq!(beacon.color(), [0, 120, 0]);
    }

    #[test]
    fn block_constants_are_consistent() {
        assert_eq!(MIN_BUILDING_SIDE_BLOCKS, 2);
        assert_eq!(MAX_BUILDING_SIDE_BLOCKS, 16);
        assert!((BUILDING_BLOCK_SIZE - 8.0 / 16384.0).abs() < 1e-15);
    }
}
