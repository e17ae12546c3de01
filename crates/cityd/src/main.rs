//! Headless city build-out runner.
//!
//! Drives the generator one tick at a time, drains the rate-limited
//! voxel queue each tick, and periodically logs the generator counters.
//! With a `dump_path` configured, every released voxel command is
//! written out as one whitespace-separated line: `x y z size r g b`.

mod config;

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{ensure, Context, Result};
use citygen::{CityConfig, CityGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use voxelq::{RateLimitedQueue, VoxelAdd};

use crate::config::RunConfig;

fn write_add(out: &mut BufWriter<File>, add: &VoxelAdd) -> Result<()> {
    writeln!(
        out,
        "{:.9} {:.9} {:.9} {:.9} {} {} {}",
        add.position.x,
        add.position.y,
        add.position.z,
        add.size,
        add.color[0],
        add.color[1],
        add.color[2]
    )?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let run = RunConfig::load();
    ensure!(run.tick_seconds > 0.0, "tick_seconds must be positive");

    let city = CityConfig {
        num_buildings: run.num_buildings,
        structural_seed: run.structural_seed,
        ..CityConfig::default()
    };
    let mut generator = match run.decor_seed {
        Some(seed) => CityGenerator::with_decor_rng(city, StdRng::seed_from_u64(seed)),
        None => CityGenerator::new(city),
    };
    let mut queue = RateLimitedQueue::new(run.packets_per_second)?;

    let mut dump = match &run.dump_path {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating dump file {path}"))?,
        )),
        None => None,
    };

    log::info!(
        "building {} structures (seed {}), {} pps outbound",
        run.num_buildings,
        run.structural_seed,
        run.packets_per_second
    );

    let total_ticks = run.num_buildings as u64 + run.animation_ticks;
    for _ in 0..total_ticks {
        generator.tick(&mut queue);
        for add in queue.drain(run.tick_seconds) {
            if let Some(out) = dump.as_mut() {
                write_add(out, &add)?;
            }
        }

        let stats = generator.stats();
        if run.stats_interval > 0 && stats.ticks % run.stats_interval == 0 {
            log::info!(
                "tick {}: buildings {}/{} done={} beacons={} ignored={} windows={} flickered={} queued={} sent={} pending={} ({:.1} qpps / {:.1} spps)",
                stats.ticks,
                stats.created_buildings,
                run.num_buildings,
                stats.done_building,
                stats.beacons,
                stats.ignored_beacons,
                stats.windows,
                stats.lights_this_cycle,
                queue.lifetime_queued(),
                queue.lifetime_sent(),
                queue.pending_len(),
                queue.queued_pps(),
                queue.sent_pps(),
            );
        }
    }

    // Let the rate limiter finish releasing whatever is still pending.
    while queue.pending_len() > 0 {
        for add in queue.drain(run.tick_seconds) {
            if let Some(out) = dump.as_mut() {
                write_add(out, &add)?;
            }
        }
    }
    if let Some(out) = dump.as_mut() {
        out.flush()?;
    }

    let stats = generator.stats();
    log::info!(
        "finished after {} ticks: {} buildings, {} beacons ({} ignored), {} windows, {} voxel adds over {:.1} s",
        stats.ticks,
        stats.created_buildings,
        stats.beacons,
        stats.ignored_beacons,
        stats.windows,
        queue.lifetime_sent(),
        queue.lifetime_seconds(),
    );

    Ok(())
}
