//! Headless simulation loop driver: reads a viewpoint, drives
//! `World::update_player_position` / `World::update`, and renders through
//! a trivial terminal-summary `Renderer`. A fixed-rate game loop with a
//! real input layer and GPU renderer is the embedding application's job;
//! this binary exists to exercise the core end to end.

use std::time::{Duration, Instant};

use sandsim::render::{ChunkSurface, Renderer};
use sandsim::{WorldConfig, WorldPos};

const TICK_RATE_HZ: u64 = 60;

/// Counts pixels submitted per tick instead of drawing anything, so this
/// binary can run in CI/headless environments: the core never touches
/// GPU resources directly.
#[derive(Default)]
struct SummaryRenderer {
  chunks_submitted: usize,
  opaque_pixels: usize,
}

impl Renderer for SummaryRenderer {
  fn submit(&mut self, surface: ChunkSurface<'_>) {
    self.chunks_submitted += 1;
    self.opaque_pixels += surface.rgba.chunks_exact(4).filter(|px| px[3] != 0).count();
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let seed = std::env::args()
    .nth(1)
    .and_then(|s| s.parse::<u64>().ok())
    .unwrap_or(0x5A4E_D5EE);
  let ticks: u64 = std::env::args()
    .nth(2)
    .and_then(|s| s.parse::<u64>().ok())
    .unwrap_or(300);

  tracing::info!(seed, ticks, "starting headless sandsim loop");

  let config = WorldConfig::new(seed);
  let mut world = sandsim::World::new(config);
  let mut renderer = SummaryRenderer::default();

  let viewpoint = WorldPos::new(0, 0);
  world.update_player_position(viewpoint);

  // Drop a little sand near the surface so the run has something to
  // watch fall and settle.
  for dx in -20..20 {
    world.set(WorldPos::new(dx, -40), sandsim::Material::Sand);
  }

  let tick_duration = Duration::from_millis(1000 / TICK_RATE_HZ);
  // Pause toggling only affects whether `world.update` is called; a real
  // loop would flip this from an input event.
  let paused = std::env::var("SANDSIM_PAUSED").is_ok();

  for tick in 0..ticks {
    let started = Instant::now();

    if !paused {
      world.update_player_position(viewpoint);
      world.update();
    }
    world.render(&mut renderer);

    if tick % 60 == 0 {
      tracing::info!(
        tick,
        active_chunks = world.active_chunks().len(),
        opaque_pixels = renderer.opaque_pixels,
        "tick summary"
      );
    }

    // Headless runs shouldn't actually sleep in CI; this mirrors the
    // fixed-rate pacing a real loop would do against a monotonic clock.
    let elapsed = started.elapsed();
    if elapsed < tick_duration && std::env::var("SANDSIM_NO_SLEEP").is_err() {
      std::thread::sleep(tick_duration - elapsed);
    }

  }

  world.save();
  tracing::info!("saved all modified chunks, exiting");
}
