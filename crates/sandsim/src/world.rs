//! The single entry point a simulation loop or renderer talks to. Owns a
//! [`ChunkManager`] and drives one tick of cross-chunk physics plus liquid
//! leveling per `update()` call.

use tracing::trace;

use crate::chunk::{self, Chunk};
use crate::chunk_manager::ChunkManager;
use crate::config::WorldConfig;
use crate::coords::{ChunkCoord, WorldPos};
use crate::material::Material;

pub struct World {
  manager: ChunkManager,
  ticks_since_level: u64,
}

impl World {
  pub fn new(config: WorldConfig) -> Self {
    Self {
      manager: ChunkManager::new(config),
      ticks_since_level: 0,
    }
  }

  pub fn get(&mut self, pos: WorldPos) -> Material {
    let (coord, local) = pos.to_chunk_and_local();
    match self.manager.get_chunk(coord, true) {
      Some(chunk) => chunk.get(local),
      None => Material::Empty,
    }
  }

  /// Sets a single cell's material, loading/generating its chunk if
  /// needed. A write to an unreachable coordinate is a no-op, mirroring
  /// how a read of one returns `Empty` rather than failing.
  pub fn set(&mut self, pos: WorldPos, material: Material) {
    let (coord, local) = pos.to_chunk_and_local();
    self.manager.get_chunk(coord, true);
    if let Some(chunk) = self.manager.get_mut(coord) {
      chunk.set(local, material);
    }
  }

  pub fn update_player_position(&mut self, pos: WorldPos) {
    self.manager.update_active_chunks(pos);
  }

  pub fn active_chunks(&self) -> &[ChunkCoord] {
    self.manager.active_chunks()
  }

  pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
    self.manager.get(coord)
  }

  /// Advances the simulation by one tick: identifies dirty chunks, then
  /// steps each exactly once via the 3-neighbor handoff contract.
  pub fn update(&mut self) {
    self.manager.update();

    let active = self.manager.active_chunks().to_vec();
    let mut dirty: Vec<ChunkCoord> = Vec::new();
    for &coord in &active {
      let is_dirty = self.manager.get(coord).map(|c| c.dirty).unwrap_or(false);
      if is_dirty && !dirty.contains(&coord) {
        dirty.push(coord);
      }
    }

    let mut to_step: Vec<ChunkCoord> = Vec::new();
    for &coord in &dirty {
      if !to_step.contains(&coord) {
        to_step.push(coord);
      }
      for neighbor in [coord.neighbor(0, 1), coord.neighbor(-1, 0), coord.neighbor(1, 0)] {
        if self.manager.get(neighbor).is_some() && !to_step.contains(&neighbor) {
          to_step.push(neighbor);
        }
      }
    }

    for coord in to_step {
      self.step_chunk(coord);
    }

    self.ticks_since_level += 1;
    if self.ticks_since_level >= 1 {
      self.level_liquids();
      self.ticks_since_level = 0;
    }
  }

  /// Steps one chunk, handing it mutable references to its below/left/
  /// right neighbors if they're loaded. A chunk only ever writes into
  /// those three listed neighbors, never a diagonal one.
  fn step_chunk(&mut self, coord: ChunkCoord) {
    let below_coord = coord.neighbor(0, 1);
    let left_coord = coord.neighbor(-1, 0);
    let right_coord = coord.neighbor(1, 0);

    // `HashMap::get_many_mut` isn't stable; instead we take every
    // participant chunk out of the map, run the tick against owned
    // values, and put them back. Single-threaded, so this gives the same
    // disjoint-borrow guarantee a parallel four-color chunk scheduler
    // would need, without the scheduler.
    let mut center = match self.manager.take(coord) {
      Some(c) => c,
      None => return,
    };
    let mut below = self.manager.take(below_coord);
    let mut left = self.manager.take(left_coord);
    let mut right = self.manager.take(right_coord);

    trace!(?coord, "stepping chunk");
    chunk::update_chunk(
      &mut center,
      chunk::Neighbors {
        below: below.as_mut(),
        left: left.as_mut(),
        right: right.as_mut(),
      },
      self.manager.frame_counter(),
    );

    self.manager.put_back(coord, center);
    if let Some(c) = below {
      self.manager.put_back(below_coord, c);
    }
    if let Some(c) = left {
      self.manager.put_back(left_coord, c);
    }
    if let Some(c) = right {
      self.manager.put_back(right_coord, c);
    }
  }

  /// Single bottom-up leveling pass across every active chunk: a liquid
  /// cell with Empty below falls one cell; otherwise it looks up to 5
  /// columns left and right for a shorter column and transfers one cell
  /// there.
  ///
  /// Scoped to the active set rather than the whole persisted world,
  /// since running it over unloaded chunks would mean paying disk I/O
  /// every tick for a purely cosmetic smoothing pass (see DESIGN.md).
  pub fn level_liquids(&mut self) {
    let active = self.manager.active_chunks().to_vec();
    for coord in active {
      self.level_liquids_in_chunk(coord);
    }
  }

  fn level_liquids_in_chunk(&mut self, coord: ChunkCoord) {
    use crate::coords::LocalPos;
    let Some(chunk) = self.manager.get_mut(coord) else {
      return;
    };
    for y in (0..chunk::CHUNK_H - 1).rev() {
      for x in 0..chunk::CHUNK_W {
        let here = LocalPos::new(x, y);
        let m = chunk.get(here);
        if m.category() != crate::material::Category::Liquid {
          continue;
        }
        let below = LocalPos::new(x, y + 1);
        if chunk.get(below) == Material::Empty {
          chunk.set(below, m);
          chunk.set(here, Material::Empty);
          continue;
        }
        let span = 5.min(x).max(0);
        let mut best: Option<(u32, i32)> = None;
        for d in 1..=span {
          if x >= d {
            let h = column_height(chunk, x - d);
            let cur = best.map(|(_, bh)| bh).unwrap_or(i32::MAX);
            if h < cur {
              best = Some((x - d, h));
            }
          }
        }
        for d in 1..=5 {
          if x + d < chunk::CHUNK_W {
            let h = column_height(chunk, x + d);
            let cur = best.map(|(_, bh)| bh).unwrap_or(i32::MAX);
            if h < cur {
              best = Some((x + d, h));
            }
          }
        }
        if let Some((tx, _)) = best {
          let dest = LocalPos::new(tx, y);
          if chunk.get(dest) == Material::Empty {
            chunk.set(dest, m);
            chunk.set(here, Material::Empty);
          }
        }
      }
    }
  }

  pub fn save(&mut self) {
    self.manager.save_all_modified();
  }

  /// Submits every active chunk's pixel buffer to `renderer`. Called once
  /// per tick by the simulation loop after `update`.
  pub fn render(&self, renderer: &mut impl crate::render::Renderer) {
    for &coord in self.manager.active_chunks() {
      if let Some(chunk) = self.manager.get(coord) {
        renderer.submit(crate::render::ChunkSurface {
          coord,
          origin: chunk.world_origin(),
          width: chunk::CHUNK_W,
          height: chunk::CHUNK_H,
          rgba: chunk.rgba(),
        });
      }
    }
  }
}

/// Height of the liquid stack sitting in column `x`, counted as the
/// number of contiguous liquid cells from the current chunk's floor
/// upward. Used to find a "shorter column" to pour into.
fn column_height(chunk: &Chunk, x: u32) -> i32 {
  use crate::coords::LocalPos;
  let mut h = 0;
  for y in (0..chunk::CHUNK_H).rev() {
    if chunk.get(LocalPos::new(x, y)).category() == crate::material::Category::Liquid {
      h += 1;
    } else {
      break;
    }
  }
  h
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = World::new(WorldConfig::new(1).with_storage_root(dir.path()));
    w.update_player_position(WorldPos::new(0, 0));
    w.set(WorldPos::new(5, 5), Material::Stone);
    assert_eq!(w.get(WorldPos::new(5, 5)), Material::Stone);
  }

  #[test]
  fn update_runs_without_panicking_on_fresh_world() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = World::new(WorldConfig::new(1).with_storage_root(dir.path()));
    w.update_player_position(WorldPos::new(0, 0));
    for _ in 0..5 {
      w.update();
    }
  }
}
