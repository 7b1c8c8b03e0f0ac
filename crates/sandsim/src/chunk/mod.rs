//! Chunk: a fixed-size grid of cells plus its derived pixel buffer.

mod physics;
mod render;

pub use physics::{update_chunk, Neighbors};

use crate::coords::{ChunkCoord, LocalPos, WorldPos};
use crate::hash::Rng;
use crate::material::Material;

/// Chunk width in cells. Power-of-two, >= 64; the core contract does not
/// depend on the exact value beyond that.
pub const CHUNK_W: u32 = 512;
/// Chunk height in cells.
pub const CHUNK_H: u32 = 512;

const CELL_COUNT: usize = (CHUNK_W * CHUNK_H) as usize;

/// A fixed-size (`CHUNK_W` x `CHUNK_H`) grid of materials plus its derived
/// RGBA pixel buffer. Owns its local physics step given references to its
/// three neighbor chunks (below, left, right).
pub struct Chunk {
  origin_coord: ChunkCoord,
  materials: Box<[Material]>,
  /// Snapshot taken at the start of each tick; all read predicates during
  /// the tick consult this, not `materials`.
  snapshot: Box<[Material]>,
  /// Reserved free-falling flag for powder-inertia tie-breaks; cleared
  /// every tick.
  free_falling: Box<[bool]>,
  rgba: Box<[u8]>,
  /// Changed this tick or could still change next tick.
  pub dirty: bool,
  /// Changed since the chunk was last saved.
  pub modified_since_save: bool,
  /// Set when a neighbor wrote into this chunk mid-tick; forces it back
  /// into the active set even if its own activity gate went to sleep.
  pub should_update_next_frame: bool,
  /// Ticks since the last time any cell in this chunk moved.
  pub inactivity_counter: u32,
  rng: Rng,
}

impl Chunk {
  /// Creates a fresh, all-`Empty` chunk at the given chunk coordinate.
  pub fn new(coord: ChunkCoord, rng_seed: u64) -> Self {
    Self {
      origin_coord: coord,
      materials: vec![Material::Empty; CELL_COUNT].into_boxed_slice(),
      snapshot: vec![Material::Empty; CELL_COUNT].into_boxed_slice(),
      free_falling: vec![false; CELL_COUNT].into_boxed_slice(),
      rgba: vec![0u8; CELL_COUNT * 4].into_boxed_slice(),
      dirty: true,
      modified_since_save: false,
      should_update_next_frame: false,
      inactivity_counter: 0,
      rng: Rng::new(rng_seed ^ ((coord.cx as u64) << 32) ^ (coord.cy as u32 as u64)),
    }
  }

  pub fn coord(&self) -> ChunkCoord {
    self.origin_coord
  }

  /// World position of this chunk's top-left corner, stored redundantly
  /// with the coord key for pixel-perfect rendering.
  pub fn world_origin(&self) -> WorldPos {
    self.origin_coord.origin()
  }

  pub fn get(&self, local: LocalPos) -> Material {
    self.materials[local.index()]
  }

  /// The only way to mutate a cell's material: marks the chunk `dirty`
  /// and `modified_since_save`.
  pub fn set(&mut self, local: LocalPos, m: Material) {
    self.materials[local.index()] = m;
    self.dirty = true;
    self.modified_since_save = true;
  }

  pub fn materials(&self) -> &[Material] {
    &self.materials
  }

  pub fn materials_mut(&mut self) -> &mut [Material] {
    &mut self.materials
  }

  pub fn rgba(&self) -> &[u8] {
    &self.rgba
  }

  pub(crate) fn rgba_mut(&mut self) -> &mut [u8] {
    &mut self.rgba
  }

  /// Overwrites the whole material grid (used when loading a chunk from
  /// disk or from the world generator). Marks the chunk dirty so the
  /// pixel buffer is recomputed before it is first rendered.
  pub fn fill_materials(&mut self, materials: Box<[Material]>) {
    debug_assert_eq!(materials.len(), CELL_COUNT);
    self.materials = materials;
    self.dirty = true;
  }

  fn snapshot_now(&mut self) {
    self.snapshot.copy_from_slice(&self.materials);
  }

  fn rng(&mut self) -> &mut Rng {
    &mut self.rng
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_chunk_is_all_empty() {
    let c = Chunk::new(ChunkCoord::new(0, 0), 1);
    assert!(c.materials().iter().all(|&m| m == Material::Empty));
  }

  #[test]
  fn set_marks_dirty_and_modified() {
    let mut c = Chunk::new(ChunkCoord::new(0, 0), 1);
    c.dirty = false;
    c.modified_since_save = false;
    c.set(LocalPos::new(1, 1), Material::Sand);
    assert!(c.dirty);
    assert!(c.modified_since_save);
    assert_eq!(c.get(LocalPos::new(1, 1)), Material::Sand);
  }
}
