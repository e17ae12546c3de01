//! Runner configuration. Loaded from voxcity.ron at startup.

use serde::{Deserialize, Serialize};

/// Run settings. Loaded from `voxcity.ron` in the current directory;
/// every field falls back to the reference city's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seed for the structural PRNG (terrain and placement).
    #[serde(default = "default_structural_seed")]
    pub structural_seed: f64,
    /// Decoration RNG seed; omit for OS entropy.
    #[serde(default)]
    pub decor_seed: Option<u64>,
    /// Buildings to place before steady state.
    #[serde(default = "default_num_buildings")]
    pub num_buildings: u32,
    /// Outbound queue budget.
    #[serde(default = "default_packets_per_second")]
    pub packets_per_second: u32,
    /// Steady-state animation ticks to run after build-out.
    #[serde(default = "default_animation_ticks")]
    pub animation_ticks: u64,
    /// Simulated seconds per tick for the outbound queue.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
    /// Write drained voxel commands here, one per line. Omit to discard.
    #[serde(default)]
    pub dump_path: Option<String>,
    /// Log generator stats every N ticks (0 = never).
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u64,
}

fn default_structural_seed() -> f64 {
    42.0
}
fn default_num_buildings() -> u32 {
    300
}
fn default_packets_per_second() -> u32 {
    500
}
fn default_animation_ticks() -> u64 {
    600
}
fn default_tick_seconds() -> f64 {
    1.0 / 60.0
}
fn default_stats_interval() -> u64 {
    100
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            structural_seed: default_structural_seed(),
            decor_seed: None,
            num_buildings: default_num_buildings(),
            packets_per_second: default_packets_per_second(),
            animation_ticks: default_animation_ticks(),
            tick_seconds: default_tick_seconds(),
            dump_path: None,
            stats_interval: default_stats_interval(),
        }
    }
}

impl RunConfig {
    /// Load config from `voxcity.ron`. Missing or invalid files fall
    /// back to defaults with a warning.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("voxcity.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_city() {
        let config = RunConfig::default();
        assert_eq!(config.structural_seed, 42.0);
        assert_eq!(config.num_buildings, 300);
        assert_eq!(config.packets_per_second, 500);
        assert!(config.decor_seed.is_none());
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config: RunConfig = ron::from_str("(num_buildings: 25, decor_seed: Some(7))").unwrap();
        assert_eq!(config.num_buildings, 25);
        assert_eq!(config.decor_seed, Some(7));
        assert_eq!(config.packets_per_second, 500);
        assert_eq!(config.stats_interval, 100);
    }
}
