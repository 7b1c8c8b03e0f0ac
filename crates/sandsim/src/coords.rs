//! Coordinate types and the world/chunk/local mapping.
//!
//! Three coordinate spaces are in play:
//! - [`WorldPos`]: absolute integer pixel position, signed, unbounded.
//! - [`ChunkCoord`]: chunk-grid position, signed.
//! - [`LocalPos`]: position within one chunk, always in `[0, W) x [0, H)`.

use crate::chunk::{CHUNK_H, CHUNK_W};

/// Absolute pixel position in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldPos {
  pub x: i64,
  pub y: i64,
}

impl WorldPos {
  pub fn new(x: i64, y: i64) -> Self {
    Self { x, y }
  }

  /// Splits a world position into its owning chunk and the local offset
  /// within that chunk, using floor division so negative coordinates land
  /// in the correct chunk instead of rounding toward zero.
  pub fn to_chunk_and_local(self) -> (ChunkCoord, LocalPos) {
    let w = CHUNK_W as i64;
    let h = CHUNK_H as i64;
    let cx = self.x.div_euclid(w) as i32;
    let cy = self.y.div_euclid(h) as i32;
    let lx = self.x.rem_euclid(w) as u32;
    let ly = self.y.rem_euclid(h) as u32;
    (ChunkCoord::new(cx, cy), LocalPos::new(lx, ly))
  }
}

/// Chunk-grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
  pub cx: i32,
  pub cy: i32,
}

impl ChunkCoord {
  pub fn new(cx: i32, cy: i32) -> Self {
    Self { cx, cy }
  }

  /// World position of this chunk's top-left corner.
  pub fn origin(self) -> WorldPos {
    WorldPos::new(self.cx as i64 * CHUNK_W as i64, self.cy as i64 * CHUNK_H as i64)
  }

  pub fn neighbor(self, dx: i32, dy: i32) -> ChunkCoord {
    ChunkCoord::new(self.cx + dx, self.cy + dy)
  }
}

/// Position within a chunk, always in `[0, CHUNK_W) x [0, CHUNK_H)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
  pub x: u32,
  pub y: u32,
}

impl LocalPos {
  pub fn new(x: u32, y: u32) -> Self {
    debug_assert!(x < CHUNK_W && y < CHUNK_H);
    Self { x, y }
  }

  /// Combines a local position with its owning chunk to recover the
  /// original world position (round-trip half of testable property 9).
  pub fn to_world(self, chunk: ChunkCoord) -> WorldPos {
    let origin = chunk.origin();
    WorldPos::new(origin.x + self.x as i64, origin.y + self.y as i64)
  }

  pub fn index(self) -> usize {
    (self.y * CHUNK_W + self.x) as usize
  }
}
