//! Pixel data derivation: turns a chunk's material grid into the RGBA
//! buffer a renderer consumes.
//!
//! Per-cell color variation uses a position-hash idiom; the jitter table
//! is this crate's own, not a literal copy of any prior engine's
//! constants.
//!
//! Row recomputation is embarrassingly parallel (each row only reads the
//! material grid and writes its own slice of `rgba`), so it runs through
//! `rayon` the way tile-level pixel uploads are parallelized elsewhere in
//! this style of engine.

use rayon::prelude::*;

use crate::chunk::{Chunk, CHUNK_H, CHUNK_W};
use crate::coords::LocalPos;
use crate::hash::hash3;
use crate::material::Material;

fn clamp_channel(base: i32, delta: i32) -> u8 {
  (base + delta).clamp(0, 255) as u8
}

/// Folded into every position hash so variation differs per material even
/// at the same `(x, y)`, and deterministic given `(material, x, y)`
/// without depending on per-chunk RNG state (which is consumed during the
/// physics step and would make pixel color depend on how many random
/// rolls happened to occur this tick).
const VARIATION_SEED: u64 = 0x5BD1_E995_9E37_79B9;

/// Recomputes `chunk.rgba` from `chunk.materials`. Called once per tick
/// after the movement passes settle, whenever the chunk is dirty. `tick`
/// is folded into gas/fire jitter only, so flicker varies per tick while
/// the rest of the palette stays stable for a given cell.
pub(crate) fn recompute_pixels(chunk: &mut Chunk, tick: u64) {
  let origin = chunk.world_origin();
  let materials = chunk.materials().to_vec().into_boxed_slice();
  let row_stride = CHUNK_W as usize * 4;
  chunk
    .rgba_mut()
    .par_chunks_mut(row_stride)
    .enumerate()
    .for_each(|(y, row)| {
      let y = y as u32;
      for x in 0..CHUNK_W {
        let m = materials[LocalPos::new(x, y).index()];
        let wx = origin.x + x as i64;
        let wy = origin.y + y as i64;
        let [r, g, b, a] = pixel_for(&materials, m, wx, wy, x, y, tick);
        let idx = x as usize * 4;
        row[idx] = r;
        row[idx + 1] = g;
        row[idx + 2] = b;
        row[idx + 3] = a;
      }
    });
}

fn pixel_for(materials: &[Material], m: Material, wx: i64, wy: i64, x: u32, y: u32, tick: u64) -> [u8; 4] {
  if m == Material::Empty {
    return [0, 0, 0, 0];
  }
  let props = m.properties();
  let h = hash3(VARIATION_SEED ^ m.id() as u64, wx, wy);

  match m {
    Material::Fire => {
      let flicker_h = hash3(VARIATION_SEED ^ m.id() as u64 ^ tick, wx, wy);
      let flicker = 0.7 + crate::hash::unit_f64(flicker_h) * 0.6;
      let r = (props.r as f64 * flicker).clamp(0.0, 255.0) as u8;
      let g = (props.g as f64 * flicker * 0.8).clamp(0.0, 255.0) as u8;
      let b = (props.b as f64 * flicker * 0.6).clamp(0.0, 255.0) as u8;
      [r, g, b, props.transparency]
    }
    Material::Smoke | Material::Steam => {
      let alpha_h = hash3(VARIATION_SEED ^ m.id() as u64 ^ tick, wx, wy);
      let alpha = crate::hash::range_i32(alpha_h, 80, 200) as u8;
      [props.r, props.g, props.b, alpha]
    }
    Material::Grass if is_top_of_column(materials, x, y) => {
      let blade = (x % 5, y % 4);
      let (dr, dg, db) = if blade == (0, 0) || blade == (3, 1) {
        (-10, 18, -8)
      } else {
        (0, 0, 0)
      };
      [
        clamp_channel(props.r as i32, dr),
        clamp_channel(props.g as i32, dg),
        clamp_channel(props.b as i32, db),
        props.transparency,
      ]
    }
    _ => {
      let delta = crate::hash::range_i32(h, -7, 7);
      [
        clamp_channel(props.r as i32, delta),
        clamp_channel(props.g as i32, delta),
        clamp_channel(props.b as i32, delta),
        props.transparency,
      ]
    }
  }
}

fn is_top_of_column(materials: &[Material], x: u32, y: u32) -> bool {
  if y == 0 {
    return true;
  }
  materials[LocalPos::new(x, y - 1).index()] == Material::Empty
}
