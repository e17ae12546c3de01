//! City generation state machine.
//!
//! Driven by an external tick: while buildings remain to be placed,
//! each tick voxelizes exactly one building; after the target count is
//! reached the generator permanently switches to animating rooftop
//! beacons and flickering windows. The transition is one-way for the
//! lifetime of the generator.
//!
//! Two RNG streams are kept separate on purpose. The structural stream
//! ([`SineRandom`]) decides placement, footprint, height, banding,
//! palette and beacon rolls, so the city's structure is reproducible
//! from its seed. The decoration stream (`rand::StdRng`) decides window
//! lit state, flicker, and the odd-size nudge, and may vary between
//! runs.

use glam::{DVec2, DVec3};
use rand::prelude::*;

use voxelq::{VoxelAdd, VoxelSink};

use crate::building::{
    Beacon, BuildingRecord, Window, BEACON_PROBABILITY, BEACON_SIZE, BLACK_COLOR,
    BUILDING_BLOCK_METERS, BUILDING_BLOCK_SIZE, BUILDING_COLORS, MAX_BUILDING_SIDE_BLOCKS,
    MAX_SECTION_SIZE_BLOCKS, MINIMUM_BEACON_HEIGHT, MIN_BUILDING_SIDE_BLOCKS,
    MIN_SECTION_SIZE_BLOCKS, SECTION_COLOR_MODIFIER, WINDOW_COLOR, WINDOW_LIT_PROBABILITY,
};
use crate::rng::SineRandom;
use crate::terrain::{TerrainField, METER};

/// Ring selection thresholds for the single placement draw.
pub const SUBURB_LEVEL: f64 = 0.4;
pub const OUTSKIRT_LEVEL: f64 = 0.05;

pub const INNER_CITY_MIN_BUILDING_HEIGHT_METERS: f64 = 64.0;
pub const INNER_CITY_MAX_BUILDING_HEIGHT_METERS: f64 = 512.0;
pub const SUBURB_MIN_BUILDING_HEIGHT_METERS: f64 = 16.0;
pub const SUBURB_MAX_BUILDING_HEIGHT_METERS: f64 = 64.0;
pub const OUTSKIRT_MIN_BUILDING_HEIGHT_METERS: f64 = 16.0;
pub const OUTSKIRT_MAX_BUILDING_HEIGHT_METERS: f64 = 32.0;

/// Window flicker cadence and per-window toggle chance in steady state.
pub const LIGHT_FLICKER_INTERVAL_TICKS: u64 = 100;
pub const LIGHT_FLICKER_PROBABILITY: f64 = 0.01;

/// Concentric placement ring, classified from one uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ring {
    InnerCity,
    Suburb,
    Outskirt,
}

impl Ring {
    pub fn classify(draw: f64) -> Self {
        if draw < OUTSKIRT_LEVEL {
            Ring::Outskirt
        } else if draw < SUBURB_LEVEL {
            Ring::Suburb
        } else {
            Ring::InnerCity
        }
    }

    /// Radius band (min, max) in meters for a square domain of
    /// `size_meters` a side.
    pub fn radius_band(self, size_meters: f64) -> (f64, f64) {
        let inner_city_radius = size_meters / 8.0;
        let suburb_radius = size_meters / 4.0;
        match self {
            Ring::Outskirt => (inner_city_radius + suburb_radius, size_meters),
            Ring::Suburb => (inner_city_radius, suburb_radius),
            Ring::InnerCity => (0.0, inner_city_radius),
        }
    }

    /// Building height band (min, max) in meters.
    pub fn height_band(self) -> (f64, f64) {
        match self {
            Ring::Outskirt => (
                OUTSKIRT_MIN_BUILDING_HEIGHT_METERS,
                OUTSKIRT_MAX_BUILDING_HEIGHT_METERS,
            ),
            Ring::Suburb => (
                SUBURB_MIN_BUILDING_HEIGHT_METERS,
                SUBURB_MAX_BUILDING_HEIGHT_METERS,
            ),
            Ring::InnerCity => (
                INNER_CITY_MIN_BUILDING_HEIGHT_METERS,
                INNER_CITY_MAX_BUILDING_HEIGHT_METERS,
            ),
        }
    }
}

/// Layout parameters. Defaults reproduce the reference city.
#[derive(Debug, Clone)]
pub struct CityConfig {
    /// Buildings to place before the generator goes steady-state.
    pub num_buildings: u32,
    /// Side length of the square generation domain in meters.
    pub size_meters: f64,
    /// City center in meters.
    pub center: DVec2,
    /// Seed for the structural PRNG; the terrain permutation table is
    /// seeded with the same value through an independent instance.
    pub structural_seed: f64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            num_buildings: 300,
            size_meters: 16384.0,
            center: DVec2::new(8192.0, 8192.0),
            structural_seed: 42.0,
        }
    }
}

/// Point-in-time generator counters for stats logging.
#[derive(Debug, Clone, Copy)]
pub struct CityStats {
    pub ticks: u64,
    pub created_buildings: u32,
    pub done_building: bool,
    pub beacons: usize,
    pub ignored_beacons: u32,
    pub windows: usize,
    pub lights_this_cycle: u32,
}

pub struct CityGenerator {
    config: CityConfig,
    terrain: TerrainField,
    structural: SineRandom,
    decor: StdRng,
    buildings: Vec<BuildingRecord>,
    windows: Vec<Window>,
    beacons: Vec<Beacon>,
    ignored_beacons: u32,
    created_buildings: u32,
    ticks: u64,
    lights_this_cycle: u32,
}

impl CityGenerator {
    pub fn new(config: CityConfig) -> Self {
        Self::with_decor_rng(config, StdRng::from_entropy())
    }

    /// Construct with an explicit decoration RNG for reproducible runs.
    pub fn with_decor_rng(config: CityConfig, decor: StdRng) -> Self {
        Self {
            terrain: TerrainField::new(config.structural_seed),
            structural: SineRandom::new(config.structural_seed),
            decor,
            buildings: Vec::with_capacity(config.num_buildings as usize),
            windows: Vec::new(),
            beacons: Vec::new(),
            ignored_beacons: 0,
            created_buildings: 0,
            ticks: 0,
            lights_this_cycle: 0,
            config,
        }
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn buildings(&self) -> &[BuildingRecord] {
        &self.buildings
    }

    pub fn beacons(&self) -> &[Beacon] {
        &self.beacons
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// True once the target building count has been reached. The
    /// generator never leaves that state.
    pub fn done_building(&self) -> bool {
        self.created_buildings >= self.config.num_buildings
    }

    pub fn stats(&self) -> CityStats {
        CityStats {
            ticks: self.ticks,
            created_buildings: self.created_buildings,
            done_building: self.done_building(),
            beacons: self.beacons.len(),
            ignored_beacons: self.ignored_beacons,
            windows: self.windows.len(),
            lights_this_cycle: self.lights_this_cycle,
        }
    }

    /// Run one generation step: place a building while any remain,
    /// otherwise animate beacons and windows.
    pub fn tick(&mut self, sink: &mut dyn VoxelSink) {
        if !self.done_building() {
            self.place_next_building(sink);
            self.created_buildings += 1;
        } else {
            self.glow_beacons(sink);
            self.city_lights(sink);
        }
        self.ticks += 1;
    }

    /// Sample a corner by polar rejection around the city center and
    /// voxelize the building there.
    ///
    /// The ring is classified from a single draw made before the
    /// rejection loop; retries re-sample radius and angle but keep the
    /// same density band.
    fn place_next_building(&mut self, sink: &mut dyn VoxelSink) {
        let placement = self.structural.next();
        let ring = Ring::classify(placement);
        let (min_radius, max_radius) = ring.radius_band(self.config.size_meters);

        let mut corner = DVec2::new(-1.0, -1.0);
        while corner.x < 0.0
            || corner.x > self.config.size_meters
            || corner.y < 0.0
            || corner.y > self.config.size_meters
        {
            let radius = self.structural.next_float(min_radius, max_radius);
            // The angle is drawn in [0, 360) but consumed as radians.
            // A quirk, but built worlds depend on it.
            let angle = self.structural.next_float(0.0, 360.0);
            corner.x = self.config.center.x + radius * angle.cos();
            corner.y = self.config.center.y + radius * angle.sin();
        }

        self.make_building(corner, ring, sink);
    }

    /// Odd integer in [min, max]; an even draw gets nudged one block in
    /// a direction chosen by the decoration RNG, so it can land one
    /// outside either bound.
    fn next_odd_int(&mut self, min: i64, max: i64) -> i64 {
        let mut value = self.structural.next_int(min, max);
        if value % 2 == 0 {
            value += if self.decor.gen::<f64>() < 0.5 { -1 } else { 1 };
        }
        value
    }

    /// Enumerate the building's block grid and emit one voxel add per
    /// block, with section banding, lobby, and window decoration.
    fn make_building(&mut self, corner: DVec2, ring: Ring, sink: &mut dyn VoxelSink) {
        let (min_height, max_height) = ring.height_band();

        let size_x_blocks = self.next_odd_int(MIN_BUILDING_SIDE_BLOCKS, MAX_BUILDING_SIDE_BLOCKS);
        let size_z_blocks = self.next_odd_int(MIN_BUILDING_SIDE_BLOCKS, MAX_BUILDING_SIDE_BLOCKS);
        let height_blocks = self.structural.next_int(
            (min_height / BUILDING_BLOCK_METERS) as i64,
            (max_height / BUILDING_BLOCK_METERS) as i64,
        );
        let section_size_blocks = self
            .structural
            .next_int(MIN_SECTION_SIZE_BLOCKS, MAX_SECTION_SIZE_BLOCKS);
        let base_color =
            BUILDING_COLORS[(self.structural.next() * BUILDING_COLORS.len() as f64) as usize];

        // Ground corner height in meters, sunk one meter into terrain.
        let corner_y = self.terrain.height(corner.x, corner.y) - 1.0;

        for x in 0..size_x_blocks {
            for z in 0..size_z_blocks {
                for y in 0..height_blocks {
                    let mut color = base_color;

                    let position = DVec3::new(
                        (corner.x + x as f64 * BUILDING_BLOCK_METERS) * METER,
                        (corner_y + y as f64 * BUILDING_BLOCK_METERS) * METER,
                        (corner.y + z as f64 * BUILDING_BLOCK_METERS) * METER,
                    );

                    let on_x_edge = x == 0 || x == size_x_blocks - 1;
                    let on_z_edge = z == 0 || z == size_z_blocks - 1;

                    if y != 0 && y != height_blocks - 1 && y % section_size_blocks == 0 {
                        // Section row: darker, no windows.
                        color = [
                            (color[0] as f64 * SECTION_COLOR_MODIFIER).round() as u8,
                            (color[1] as f64 * SECTION_COLOR_MODIFIER).round() as u8,
                            (color[2] as f64 * SECTION_COLOR_MODIFIER).round() as u8,
                        ];
                    } else if (y == 0 || y == 1)
                        && ((on_x_edge && !on_z_edge) || (on_z_edge && !on_x_edge))
                    {
                        // Ground-floor edge that is not a corner: the
                        // lobby is always lit.
                        color = WINDOW_COLOR;
                    } else if (on_x_edge && z % 2 != 0) || (on_z_edge && x % 2 != 0) {
                        // Odd block on an edge: maybe a lit window.
                        let lit = self.decor.gen::<f64>() < WINDOW_LIT_PROBABILITY;
                        color = if lit { WINDOW_COLOR } else { BLACK_COLOR };
                        self.windows.push(Window { position, lit });
                    }

                    sink.queue_add(VoxelAdd {
                        position,
                        size: BUILDING_BLOCK_SIZE,
                        color,
                    });
                }
            }
        }

        // Inner-city buildings might carry a rooftop beacon.
        if ring == Ring::InnerCity && self.structural.next() < BEACON_PROBABILITY {
            let position = DVec3::new(
                corner.x + ((size_x_blocks + 1) as f64 / 2.0) * BUILDING_BLOCK_METERS,
                corner_y
                    + height_blocks as f64 * BUILDING_BLOCK_METERS
                    + BEACON_SIZE / (2.0 * METER),
                corner.y + ((size_z_blocks + 1) as f64 / 2.0) * BUILDING_BLOCK_METERS,
            );
            if position.y > MINIMUM_BEACON_HEIGHT {
                let channel = self.structural.next_int(0, 2) as u8;
                let step = self.structural.next_int(4, 16) as i32;
                self.beacons.push(Beacon {
                    position,
                    intensity: 255,
                    channel,
                    step,
                });
            } else {
                self.ignored_beacons += 1;
                log::debug!(
                    "dropping beacon below {MINIMUM_BEACON_HEIGHT} m (roof at {:.1} m)",
                    position.y
                );
            }
        }

        self.buildings.push(BuildingRecord {
            corner,
            size_x_blocks,
            size_z_blocks,
            height_blocks,
            section_size_blocks,
            color: base_color,
            ring,
        });
    }

    /// Re-emit every beacon at its current pulse color, then step the
    /// intensities.
    fn glow_beacons(&mut self, sink: &mut dyn VoxelSink) {
        for beacon in &mut self.beacons {
            sink.queue_add(VoxelAdd {
                position: beacon.position * METER,
                size: BEACON_SIZE,
                color: beacon.color(),
            });
            beacon.advance();
        }
    }

    /// Every [`LIGHT_FLICKER_INTERVAL_TICKS`]th tick, toggle each
    /// window independently with a small probability and re-emit it.
    fn city_lights(&mut self, sink: &mut dyn VoxelSink) {
        self.lights_this_cycle = 0;
        if self.ticks % LIGHT_FLICKER_INTERVAL_TICKS != 0 {
            return;
        }
        for window in &mut self.windows {
            if self.decor.gen::<f64>() < LIGHT_FLICKER_PROBABILITY {
                window.lit = !window.lit;
                let color = if window.lit { WINDOW_COLOR } else { BLACK_COLOR };
                sink.queue_add(VoxelAdd {
                    position: window.position,
                    size: BUILDING_BLOCK_SIZE,
                    color,
                });
                self.lights_this_cycle += 1;
            }
        }
    }
}
