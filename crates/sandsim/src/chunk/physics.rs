//! Per-cell physics update: material interactions, checkerboard movement
//! passes, cross-chunk handoff, and the activity gate.
//!
//! Reads during the interaction pre-pass consult the chunk's snapshot
//! (taken at tick entry) so reactive rules don't cascade within one pass.
//! Reads during the A/B movement passes consult the *live* grid, which is
//! the snapshot plus whatever has already been committed this tick. That
//! is what makes two same-parity cells racing for the same diagonal
//! destination resolve safely: the second comer sees the first comer's
//! write and stays put.

use crate::chunk::{Chunk, CHUNK_H, CHUNK_W};
use crate::material::{Category, Material};

const MAX_FLOW_DISTANCE: i32 = 3;

/// The three neighbor chunks a chunk may read from and write into.
/// Writes never reach a fourth, diagonal neighbor.
pub struct Neighbors<'a> {
  pub below: Option<&'a mut Chunk>,
  pub left: Option<&'a mut Chunk>,
  pub right: Option<&'a mut Chunk>,
}

impl<'a> Neighbors<'a> {
  pub fn none() -> Self {
    Self {
      below: None,
      left: None,
      right: None,
    }
  }
}

/// Advances `chunk` by exactly one tick, possibly writing into its three
/// neighbors. Only called on chunks the World Facade considers dirty.
/// `tick` is the world's monotonically increasing frame counter, folded
/// into the pixel recompute pass so per-cell jitter on gases varies tick
/// to tick.
pub fn update_chunk(chunk: &mut Chunk, mut n: Neighbors<'_>, tick: u64) {
  chunk.snapshot_now();
  for f in chunk.free_falling.iter_mut() {
    *f = false;
  }

  run_interactions(chunk, &n);

  run_pass(chunk, &mut n, Parity::Even);
  run_pass(chunk, &mut n, Parity::Odd);

  chunk.dirty = any_cell_could_still_move(chunk, &n) || chunk.should_update_next_frame;
  chunk.should_update_next_frame = false;
  if chunk.dirty {
    chunk.inactivity_counter = 0;
  } else {
    chunk.inactivity_counter += 1;
  }

  super::render::recompute_pixels(chunk, tick);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Parity {
  Even,
  Odd,
}

impl Parity {
  fn matches(self, x: u32, y: u32) -> bool {
    let even = (x + y) % 2 == 0;
    matches!((self, even), (Parity::Even, true) | (Parity::Odd, false))
  }
}

/// Reads a material at chunk-local coordinates that may fall outside
/// `[0,W) x [0,H)`, crossing into a neighbor chunk when the crossing is
/// one of the three reachable directions. Everything else (above the
/// chunk, or a diagonal neighbor) reads as Empty.
fn read_live(chunk: &Chunk, n: &Neighbors<'_>, x: i32, y: i32) -> Material {
  let w = CHUNK_W as i32;
  let h = CHUNK_H as i32;
  if (0..w).contains(&x) && (0..h).contains(&y) {
    return chunk.get(crate::coords::LocalPos::new(x as u32, y as u32));
  }
  if y >= h && (0..w).contains(&x) {
    return n
      .below
      .as_deref()
      .map(|b| b.get(crate::coords::LocalPos::new(x as u32, (y - h) as u32)))
      .unwrap_or(Material::Empty);
  }
  if x < 0 && (0..h).contains(&y) {
    return n
      .left
      .as_deref()
      .map(|l| l.get(crate::coords::LocalPos::new((w + x) as u32, y as u32)))
      .unwrap_or(Material::Empty);
  }
  if x >= w && (0..h).contains(&y) {
    return n
      .right
      .as_deref()
      .map(|r| r.get(crate::coords::LocalPos::new((x - w) as u32, y as u32)))
      .unwrap_or(Material::Empty);
  }
  Material::Empty
}

/// Same as `read_live` but reads the chunk's own snapshot for in-bounds
/// cells. Neighbor reads are still live, since we don't have access to a
/// neighbor's private mid-tick snapshot.
fn read_snapshot(chunk: &Chunk, n: &Neighbors<'_>, x: i32, y: i32) -> Material {
  let w = CHUNK_W as i32;
  let h = CHUNK_H as i32;
  if (0..w).contains(&x) && (0..h).contains(&y) {
    return chunk.snapshot[(y as u32 * CHUNK_W + x as u32) as usize];
  }
  read_live(chunk, n, x, y)
}

/// Writes a material at chunk-local coordinates that may cross into a
/// neighbor. Returns `false` if the target is unreachable (above the
/// chunk, a diagonal neighbor, or a neighbor that isn't loaded).
fn write_live(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32, m: Material) -> bool {
  let w = CHUNK_W as i32;
  let h = CHUNK_H as i32;
  if (0..w).contains(&x) && (0..h).contains(&y) {
    chunk.set(crate::coords::LocalPos::new(x as u32, y as u32), m);
    return true;
  }
  if y >= h && (0..w).contains(&x) {
    if let Some(below) = n.below.as_deref_mut() {
      below.set(crate::coords::LocalPos::new(x as u32, (y - h) as u32), m);
      below.should_update_next_frame = true;
      return true;
    }
    return false;
  }
  if x < 0 && (0..h).contains(&y) {
    if let Some(left) = n.left.as_deref_mut() {
      left.set(crate::coords::LocalPos::new((w + x) as u32, y as u32), m);
      left.should_update_next_frame = true;
      return true;
    }
    return false;
  }
  if x >= w && (0..h).contains(&y) {
    if let Some(right) = n.right.as_deref_mut() {
      right.set(crate::coords::LocalPos::new((x - w) as u32, y as u32), m);
      right.should_update_next_frame = true;
      return true;
    }
    return false;
  }
  false
}

/// Moves the material from `(sx,sy)` to `(dx,dy)`, leaving Empty behind.
/// The destination is checked for liveness immediately before writing so
/// two same-pass cells racing for one destination can't both succeed.
fn try_move(chunk: &mut Chunk, n: &mut Neighbors<'_>, sx: i32, sy: i32, dx: i32, dy: i32) -> bool {
  if read_live(chunk, n, dx, dy) != Material::Empty {
    return false;
  }
  let m = read_live(chunk, n, sx, sy);
  if !write_live(chunk, n, dx, dy, m) {
    return false;
  }
  write_live(chunk, n, sx, sy, Material::Empty);
  true
}

fn is_enclosed(chunk: &Chunk, n: &Neighbors<'_>, x: i32, y: i32) -> bool {
  const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
  ];
  OFFSETS
    .iter()
    .all(|&(ox, oy)| read_snapshot(chunk, n, x + ox, y + oy) != Material::Empty)
}

// ---------------------------------------------------------------------
// Material interactions pre-pass
// ---------------------------------------------------------------------

fn run_interactions(chunk: &mut Chunk, n: &Neighbors<'_>) {
  for y in 0..CHUNK_H as i32 {
    for x in 0..CHUNK_W as i32 {
      let m = read_snapshot(chunk, n, x, y);
      match m {
        Material::Fire => interact_fire(chunk, n, x, y),
        Material::Water => interact_water(chunk, n, x, y),
        Material::Smoke => interact_smoke(chunk, n, x, y),
        _ => {}
      }
    }
  }
}

const NEIGH8: [(i32, i32); 8] = [
  (-1, -1),
  (0, -1),
  (1, -1),
  (-1, 0),
  (1, 0),
  (-1, 1),
  (0, 1),
  (1, 1),
];

fn interact_fire(chunk: &mut Chunk, n: &Neighbors<'_>, x: i32, y: i32) {
  // Fire burns out: 5% per tick -> Smoke (30%) or Empty (70%).
  let roll_out = chunk.rng().next_below(10000);
  if roll_out < 500 {
    let new_m = if roll_out < 150 {
      Material::Smoke
    } else {
      Material::Empty
    };
    chunk.set(crate::coords::LocalPos::new(x as u32, y as u32), new_m);
    return;
  }

  for &(ox, oy) in &NEIGH8 {
    let nx = x + ox;
    let ny = y + oy;
    let neighbor = read_snapshot(chunk, n, nx, ny);
    if neighbor == Material::Water {
      if chunk.rng().chance_pct(20) {
        // Fire + Water: water -> Steam. Only writable within our 3
        // reachable neighbors; in-chunk case is the common one.
        write_inplace_if_local(chunk, nx, ny, Material::Steam);
      }
      continue;
    }
    if neighbor.is_flammable() {
      let spread_pct = match neighbor {
        Material::Wood => 15,
        Material::Oil => 40,
        Material::Grass => 25,
        _ => 0,
      };
      if spread_pct > 0 && chunk.rng().chance_pct(spread_pct) {
        write_inplace_if_local(chunk, nx, ny, Material::Fire);
      }
    }
  }
}

fn interact_water(chunk: &mut Chunk, n: &Neighbors<'_>, x: i32, y: i32) {
  for &(ox, oy) in &NEIGH8 {
    let nx = x + ox;
    let ny = y + oy;
    if read_snapshot(chunk, n, nx, ny) != Material::Fire {
      continue;
    }
    // Water extinguishes fire: each adjacent Fire cell independently
    // converts to Steam (40%) or Empty (60%), not the water itself.
    if chunk.rng().chance_pct(70) {
      let new_m = if chunk.rng().chance_pct(40) {
        Material::Steam
      } else {
        Material::Empty
      };
      write_inplace_if_local(chunk, nx, ny, new_m);
    }
  }
}

fn interact_smoke(chunk: &mut Chunk, n: &Neighbors<'_>, x: i32, y: i32) {
  let near_water = NEIGH8
    .iter()
    .any(|&(ox, oy)| read_snapshot(chunk, n, x + ox, y + oy) == Material::Water);
  if near_water && chunk.rng().chance_pct(20) {
    chunk.set(crate::coords::LocalPos::new(x as u32, y as u32), Material::Empty);
  }
}

/// Writes to a cell only if it is within this chunk. The interaction
/// pre-pass never crosses into a neighbor to ignite/condense a cell it
/// doesn't own outright, avoiding diagonal cross-chunk writes entirely.
fn write_inplace_if_local(chunk: &mut Chunk, x: i32, y: i32, m: Material) {
  let w = CHUNK_W as i32;
  let h = CHUNK_H as i32;
  if (0..w).contains(&x) && (0..h).contains(&y) {
    chunk.set(crate::coords::LocalPos::new(x as u32, y as u32), m);
  }
}

// ---------------------------------------------------------------------
// Movement passes
// ---------------------------------------------------------------------

fn run_pass(chunk: &mut Chunk, n: &mut Neighbors<'_>, parity: Parity) {
  for y in (0..CHUNK_H).rev() {
    for x in 0..CHUNK_W {
      if !parity.matches(x, y) {
        continue;
      }
      step_cell(chunk, n, x as i32, y as i32);
    }
  }
}

fn step_cell(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32) {
  let m = read_live(chunk, n, x, y);
  let props = m.properties();
  match props.category {
    Category::Empty | Category::Solid => {}
    Category::Powder => step_powder(chunk, n, x, y),
    Category::Liquid => step_liquid(chunk, n, x, y, &m),
    Category::Gas => step_gas(chunk, n, x, y, &m),
  }
}

fn parity_sign(x: i32, y: i32) -> i32 {
  if (x + y) % 2 == 0 {
    1
  } else {
    -1
  }
}

fn step_powder(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32) {
  if is_enclosed(chunk, n, x, y) {
    return;
  }
  if try_move(chunk, n, x, y, x, y + 1) {
    return;
  }
  let sign = parity_sign(x, y);
  if try_move(chunk, n, x, y, x + sign, y + 1) {
    return;
  }
  try_move(chunk, n, x, y, x - sign, y + 1);
}

fn step_liquid(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32, _m: &Material) {
  if is_enclosed(chunk, n, x, y) {
    return;
  }
  if try_move(chunk, n, x, y, x, y + 1) {
    return;
  }
  let sign = parity_sign(x, y);
  if try_move(chunk, n, x, y, x + sign, y + 1) {
    return;
  }
  if try_move(chunk, n, x, y, x - sign, y + 1) {
    return;
  }

  if try_flow(chunk, n, x, y, sign) {
    return;
  }
  try_flow(chunk, n, x, y, -sign);
}

/// Scans up to `MAX_FLOW_DISTANCE` cells in `dir`, stopping at the first
/// occupied cell. Prefers the farthest empty cell that has a floor
/// beneath it (so liquid settles instead of floating over a ledge); if
/// none of the scanned cells have a floor, falls back to the farthest
/// empty cell scanned so liquid still spreads to find its level.
fn try_flow(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32, dir: i32) -> bool {
  let mut best_supported: Option<i32> = None;
  let mut farthest_open: Option<i32> = None;
  for step in 1..=MAX_FLOW_DISTANCE {
    let tx = x + dir * step;
    if read_live(chunk, n, tx, y) != Material::Empty {
      break;
    }
    farthest_open = Some(tx);
    if read_live(chunk, n, tx, y + 1) != Material::Empty {
      best_supported = Some(tx);
    }
  }
  let target = best_supported.or(farthest_open);
  match target {
    Some(tx) => try_move(chunk, n, x, y, tx, y),
    None => false,
  }
}

fn step_gas(chunk: &mut Chunk, n: &mut Neighbors<'_>, x: i32, y: i32, m: &Material) {
  if is_enclosed(chunk, n, x, y) {
    return;
  }

  let (dissipate_pct, rise_pct, spread_pct) = match m {
    Material::Steam => (5, 95, 40),
    Material::Smoke => (10, 90, 60),
    _ => (50, 80, 50),
  };

  if chunk.rng().chance_pct(dissipate_pct) {
    write_live(chunk, n, x, y, Material::Empty);
    return;
  }

  if *m == Material::Steam {
    let near_water = NEIGH8
      .iter()
      .any(|&(ox, oy)| read_live(chunk, n, x + ox, y + oy) == Material::Water);
    if near_water && chunk.rng().chance_pct(30) {
      write_live(chunk, n, x, y, Material::Empty);
      return;
    }
  }

  let mut extra_push = false;
  if *m == Material::Smoke {
    let near_fire = NEIGH8
      .iter()
      .any(|&(ox, oy)| read_live(chunk, n, x + ox, y + oy) == Material::Fire);
    extra_push = near_fire && chunk.rng().chance_pct(30);
  }

  if chunk.rng().chance_pct(rise_pct) || extra_push {
    if try_move(chunk, n, x, y, x, y - 1) {
      return;
    }
    let sign = parity_sign(x, y);
    if try_move(chunk, n, x, y, x + sign, y - 1) {
      return;
    }
    if try_move(chunk, n, x, y, x - sign, y - 1) {
      return;
    }
  }

  if chunk.rng().chance_pct(spread_pct) {
    let sign = parity_sign(x, y);
    if try_move(chunk, n, x, y, x + sign, y) {
      return;
    }
    try_move(chunk, n, x, y, x - sign, y);
  }
}

// ---------------------------------------------------------------------
// Activity gate
// ---------------------------------------------------------------------

fn any_cell_could_still_move(chunk: &Chunk, n: &Neighbors<'_>) -> bool {
  for y in 0..CHUNK_H as i32 {
    for x in 0..CHUNK_W as i32 {
      let m = read_live(chunk, n, x, y);
      let props = m.properties();
      match props.category {
        Category::Empty | Category::Solid => continue,
        Category::Powder => {
          if !is_enclosed(chunk, n, x, y)
            && (read_live(chunk, n, x, y + 1) == Material::Empty
              || read_live(chunk, n, x - 1, y + 1) == Material::Empty
              || read_live(chunk, n, x + 1, y + 1) == Material::Empty)
          {
            return true;
          }
        }
        Category::Liquid => {
          if is_enclosed(chunk, n, x, y) {
            continue;
          }
          if read_live(chunk, n, x, y + 1) == Material::Empty
            || read_live(chunk, n, x - 1, y + 1) == Material::Empty
            || read_live(chunk, n, x + 1, y + 1) == Material::Empty
          {
            return true;
          }
          let has_floor = read_live(chunk, n, x, y + 1) != Material::Empty;
          if has_floor
            && (read_live(chunk, n, x - 1, y) == Material::Empty
              || read_live(chunk, n, x + 1, y) == Material::Empty)
          {
            return true;
          }
        }
        Category::Gas => {
          if is_enclosed(chunk, n, x, y) {
            continue;
          }
          if read_live(chunk, n, x, y - 1) == Material::Empty
            || read_live(chunk, n, x - 1, y) == Material::Empty
            || read_live(chunk, n, x + 1, y) == Material::Empty
          {
            return true;
          }
        }
      }
    }
  }
  false
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coords::{ChunkCoord, LocalPos};

  fn new_chunk() -> Chunk {
    Chunk::new(ChunkCoord::new(0, 0), 1)
  }

  #[test]
  fn immobile_world_is_a_noop_after_warmup() {
    let mut chunk = new_chunk();
    for y in 0..CHUNK_H {
      chunk.set(LocalPos::new(0, y), Material::Stone);
    }
    update_chunk(&mut chunk, Neighbors::none(), 0);
    let before: Vec<Material> = chunk.materials().to_vec();
    update_chunk(&mut chunk, Neighbors::none(), 1);
    assert_eq!(chunk.materials(), before.as_slice());
    assert!(!chunk.dirty);
  }

  #[test]
  fn sand_column_falls_to_floor() {
    let mut chunk = new_chunk();
    for x in 10..20 {
      chunk.set(LocalPos::new(x, 0), Material::Sand);
    }
    for tick in 0..(CHUNK_H as u64) {
      update_chunk(&mut chunk, Neighbors::none(), tick);
    }
    for x in 10..20 {
      assert_eq!(
        chunk.get(LocalPos::new(x, CHUNK_H - 1)),
        Material::Sand,
        "x={x}"
      );
    }
    let sand_count = chunk
      .materials()
      .iter()
      .filter(|&&m| m == Material::Sand)
      .count();
    assert_eq!(sand_count, 10);
  }

  #[test]
  fn sand_crosses_into_chunk_below() {
    let mut upper = new_chunk();
    let mut lower = Chunk::new(ChunkCoord::new(0, 1), 1);
    upper.set(LocalPos::new(5, CHUNK_H - 1), Material::Sand);
    update_chunk(
      &mut upper,
      Neighbors {
        below: Some(&mut lower),
        left: None,
        right: None,
      },
      0,
    );
    assert_eq!(upper.get(LocalPos::new(5, CHUNK_H - 1)), Material::Empty);
    assert_eq!(lower.get(LocalPos::new(5, 0)), Material::Sand);
  }
}
