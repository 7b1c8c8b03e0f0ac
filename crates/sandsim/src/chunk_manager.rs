//! Chunk lifecycle across loaded/cache/disk, active-set selection, and
//! save/load orchestration.
//!
//! Active-set selection diffs a desired-set against the loaded-set the way
//! a streaming window reconciler does, walking a fixed 12-entry spiral
//! order around the viewpoint's chunk; eviction follows an evict-then-save
//! discipline for the loaded/cache/disk tri-state.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::coords::ChunkCoord;
use crate::persistence;
use crate::worldgen::WorldGenerator;

struct CachedChunk {
  chunk: Chunk,
  /// Frame counter value at which this chunk entered the cache.
  cached_at: u64,
}

/// Owns every chunk the world currently knows about, split across three
/// states: `loaded` (actively simulated), `cache` (recently active, kept
/// warm in memory), and disk (evicted, persisted, regenerable).
pub struct ChunkManager {
  config: WorldConfig,
  generator: WorldGenerator,
  loaded: HashMap<ChunkCoord, Chunk>,
  cache: HashMap<ChunkCoord, CachedChunk>,
  active_list: Vec<ChunkCoord>,
  dirty_set: Vec<ChunkCoord>,
  frame_counter: u64,
}

/// The fixed outer-ring order active-set selection walks once the center
/// chunk and its 8-neighborhood are already included.
const OUTER_RING: [(i32, i32); 12] = [
  (-2, -1),
  (-2, 0),
  (-2, 1),
  (-1, -2),
  (0, -2),
  (1, -2),
  (2, -1),
  (2, 0),
  (2, 1),
  (-1, 2),
  (0, 2),
  (1, 2),
];

impl ChunkManager {
  pub fn new(config: WorldConfig) -> Self {
    let generator = WorldGenerator::new(config.seed);
    Self {
      config,
      generator,
      loaded: HashMap::new(),
      cache: HashMap::new(),
      active_list: Vec::new(),
      dirty_set: Vec::new(),
      frame_counter: 0,
    }
  }

  pub fn active_chunks(&self) -> &[ChunkCoord] {
    &self.active_list
  }

  /// Monotonically increasing tick counter, advanced once per `update()`.
  /// Folded into per-cell pixel jitter so gas/fire flicker varies tick to
  /// tick instead of being fixed forever for a given cell.
  pub fn frame_counter(&self) -> u64 {
    self.frame_counter
  }

  pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
    self.loaded.get(&coord)
  }

  pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
    self.loaded.get_mut(&coord)
  }

  /// Removes a loaded chunk from the map so it can be ticked alongside
  /// disjoint mutable borrows of its neighbors; the caller must put it
  /// back with [`Self::put_back`]. Chunks in `cache` or on disk are not
  /// candidates for ticking and are not returned.
  pub(crate) fn take(&mut self, coord: ChunkCoord) -> Option<Chunk> {
    self.loaded.remove(&coord)
  }

  pub(crate) fn put_back(&mut self, coord: ChunkCoord, chunk: Chunk) {
    self.loaded.insert(coord, chunk);
  }

  /// Fetches a chunk, promoting it from cache or loading/generating it as
  /// needed. Returns `None` only when `load_if_needed` is `false` and the
  /// chunk isn't already loaded or cached.
  pub fn get_chunk(&mut self, coord: ChunkCoord, load_if_needed: bool) -> Option<&Chunk> {
    if self.loaded.contains_key(&coord) {
      return self.loaded.get(&coord);
    }
    if let Some(cached) = self.cache.remove(&coord) {
      debug!(?coord, "promoting chunk from cache to loaded");
      self.loaded.insert(coord, cached.chunk);
      return self.loaded.get(&coord);
    }
    if !load_if_needed {
      return None;
    }

    let chunk = self.load_or_generate(coord);
    self.loaded.insert(coord, chunk);
    self.loaded.get(&coord)
  }

  fn load_or_generate(&self, coord: ChunkCoord) -> Chunk {
    let path = self.config.chunk_path(coord.cx, coord.cy);
    if path.exists() {
      match persistence::load(&path) {
        Ok(materials) => {
          let mut chunk = Chunk::new(coord, self.config.seed);
          chunk.fill_materials(materials);
          return chunk;
        }
        Err(e) => {
          warn!(?coord, error = %e, "failed to deserialize chunk, regenerating");
        }
      }
    }
    let mut chunk = Chunk::new(coord, self.config.seed);
    chunk.fill_materials(self.generator.generate_chunk(coord));
    chunk
  }

  /// Recomputes the desired active set around the chunk containing
  /// `(center_x, center_y)` and reconciles it against what's currently
  /// loaded.
  pub fn update_active_chunks(&mut self, center: crate::coords::WorldPos) {
    let (center_coord, _) = center.to_chunk_and_local();
    let mut desired = Vec::with_capacity(self.config.max_loaded_chunks);
    desired.push(center_coord);
    for dy in -1..=1 {
      for dx in -1..=1 {
        if dx == 0 && dy == 0 {
          continue;
        }
        if desired.len() >= self.config.max_loaded_chunks {
          break;
        }
        desired.push(center_coord.neighbor(dx, dy));
      }
    }
    for &(dx, dy) in OUTER_RING.iter() {
      if desired.len() >= self.config.max_loaded_chunks {
        break;
      }
      desired.push(center_coord.neighbor(dx, dy));
    }

    let to_evict: Vec<ChunkCoord> = self
      .loaded
      .keys()
      .copied()
      .filter(|c| !desired.contains(c))
      .collect();
    for coord in to_evict {
      if let Some(mut chunk) = self.loaded.remove(&coord) {
        if chunk.modified_since_save {
          self.save_chunk_inner(coord, &chunk);
          chunk.modified_since_save = false;
        }
        self.cache.insert(
          coord,
          CachedChunk {
            chunk,
            cached_at: self.frame_counter,
          },
        );
      }
    }

    for &coord in &desired {
      if !self.loaded.contains_key(&coord) {
        self.get_chunk(coord, true);
      }
    }

    self.active_list = desired;
  }

  /// Advances the frame counter, harvests newly-modified chunks into the
  /// dirty set, and periodically purges stale cache entries.
  pub fn update(&mut self) {
    self.frame_counter += 1;
    for (&coord, chunk) in self.loaded.iter() {
      if chunk.modified_since_save && !self.dirty_set.contains(&coord) {
        self.dirty_set.push(coord);
      }
    }
    if self.frame_counter % self.config.cache_sweep_interval == 0 {
      self.purge_expired_cache();
    }
  }

  fn purge_expired_cache(&mut self) {
    let ttl = self.config.cache_ttl;
    let now = self.frame_counter;
    self
      .cache
      .retain(|_, cached| now.saturating_sub(cached.cached_at) <= ttl);
  }

  pub fn save_all_modified(&mut self) {
    let coords: Vec<ChunkCoord> = self.dirty_set.drain(..).collect();
    for coord in coords {
      if let Some(chunk) = self.loaded.get_mut(&coord) {
        if chunk.modified_since_save {
          self.save_chunk_inner(coord, chunk);
          chunk.modified_since_save = false;
        }
      }
    }
  }

  pub fn save_chunk(&mut self, coord: ChunkCoord) {
    if let Some(chunk) = self.loaded.get_mut(&coord) {
      if chunk.modified_since_save {
        let path = self.config.chunk_path(coord.cx, coord.cy);
        if let Err(e) = persistence::save(&path, chunk.materials()) {
          warn!(?coord, error = %e, "failed to save chunk, leaving it dirty");
          return;
        }
        chunk.modified_since_save = false;
      }
    }
  }

  fn save_chunk_inner(&self, coord: ChunkCoord, chunk: &Chunk) {
    let path = self.config.chunk_path(coord.cx, coord.cy);
    if let Err(e) = persistence::save(&path, chunk.materials()) {
      warn!(?coord, error = %e, "failed to save evicted chunk; it will be regenerated if lost");
    }
  }

  pub fn load_chunk(&self, coord: ChunkCoord) -> Option<Chunk> {
    let path = self.config.chunk_path(coord.cx, coord.cy);
    if !path.exists() {
      return None;
    }
    match persistence::load(&path) {
      Ok(materials) => {
        let mut chunk = Chunk::new(coord, self.config.seed);
        chunk.fill_materials(materials);
        Some(chunk)
      }
      Err(e) => {
        warn!(?coord, error = %e, "failed to deserialize chunk on explicit load");
        None
      }
    }
  }

  /// AABB overlap test between a chunk's world rectangle and the given
  /// viewport rectangle.
  pub fn is_chunk_visible(cx: i32, cy: i32, cam: (i64, i64), viewport: (i64, i64)) -> bool {
    use crate::chunk::{CHUNK_H, CHUNK_W};
    let chunk_x0 = cx as i64 * CHUNK_W as i64;
    let chunk_y0 = cy as i64 * CHUNK_H as i64;
    let chunk_x1 = chunk_x0 + CHUNK_W as i64;
    let chunk_y1 = chunk_y0 + CHUNK_H as i64;
    let view_x0 = cam.0 - viewport.0 / 2;
    let view_y0 = cam.1 - viewport.1 / 2;
    let view_x1 = view_x0 + viewport.0;
    let view_y1 = view_y0 + viewport.1;
    chunk_x0 < view_x1 && chunk_x1 > view_x0 && chunk_y0 < view_y1 && chunk_y1 > view_y0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coords::WorldPos;

  fn manager_in(dir: &std::path::Path) -> ChunkManager {
    ChunkManager::new(WorldConfig::new(1).with_storage_root(dir).with_max_loaded_chunks(12))
  }

  #[test]
  fn update_active_chunks_caps_at_twelve() {
    let dir = tempfile::tempdir().unwrap();
    let mut mgr = manager_in(dir.path());
    mgr.update_active_chunks(WorldPos::new(0, 0));
    assert_eq!(mgr.active_chunks().len(), 12);
  }

  #[test]
  fn evicted_modified_chunk_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let mut mgr = manager_in(dir.path());
    mgr.update_active_chunks(WorldPos::new(0, 0));
    let coord = ChunkCoord::new(0, 0);
    {
      let chunk = mgr.get_mut(coord).unwrap();
      chunk.set(crate::coords::LocalPos::new(0, 0), crate::material::Material::Stone);
    }
    // Move the viewpoint far enough away that (0,0) falls out of the
    // active set and gets evicted + saved.
    mgr.update_active_chunks(WorldPos::new(100_000, 100_000));
    assert!(mgr.config.chunk_path(0, 0).exists());
  }

  #[test]
  fn visibility_overlap() {
    assert!(ChunkManager::is_chunk_visible(0, 0, (256, 256), (512, 512)));
    assert!(!ChunkManager::is_chunk_visible(10, 10, (0, 0), (512, 512)));
  }
}
