//! The narrow contract the core exposes to an external renderer. The core
//! never touches GPU resources; it only hands out each active chunk's
//! world rectangle and RGBA buffer.
//!
//! Rendering backend polymorphism lives behind a one-method trait the
//! core calls out to, implemented by whatever the embedding application
//! provides.

use crate::coords::{ChunkCoord, WorldPos};

/// One chunk's worth of pixels ready to upload, as seen by a renderer.
pub struct ChunkSurface<'a> {
  pub coord: ChunkCoord,
  /// World-space top-left corner of this chunk.
  pub origin: WorldPos,
  pub width: u32,
  pub height: u32,
  /// `width * height * 4` RGBA bytes, row-major, `y=0` at the top.
  pub rgba: &'a [u8],
}

/// Implemented by the embedding application. The core calls `submit` once
/// per active chunk each time it updates a dirty chunk's pixel buffer;
/// implementations are expected to upload/refresh a GPU texture and draw
/// a pixel-aligned quad at an integer zoom level.
pub trait Renderer {
  fn submit(&mut self, surface: ChunkSurface<'_>);
}

/// A `Renderer` that does nothing; useful for headless simulation runs
/// and tests that don't need to observe pixel output.
#[derive(Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
  fn submit(&mut self, _surface: ChunkSurface<'_>) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn null_renderer_accepts_a_surface() {
    let mut r = NullRenderer;
    let pixels = [0u8; 16];
    r.submit(ChunkSurface {
      coord: ChunkCoord::new(0, 0),
      origin: WorldPos::new(0, 0),
      width: 2,
      height: 2,
      rgba: &pixels,
    });
  }
}
