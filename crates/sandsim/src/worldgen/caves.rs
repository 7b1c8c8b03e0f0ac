//! Cave carving: seven weighted archetypes plus inter-cave bridge tunnels.

use crate::hash::Rng;
use crate::material::Material;

#[derive(Clone, Copy)]
enum Archetype {
  SmallHoles,
  Winding,
  LargeCavern,
  NarrowPassage,
  Flooded,
  MaterialFilled,
  MassiveComplex,
}

/// Weighted roll table of cave archetype percentages.
const ARCHETYPES: [(Archetype, u32); 7] = [
  (Archetype::SmallHoles, 20),
  (Archetype::Winding, 25),
  (Archetype::LargeCavern, 20),
  (Archetype::NarrowPassage, 10),
  (Archetype::Flooded, 10),
  (Archetype::MaterialFilled, 10),
  (Archetype::MassiveComplex, 5),
];

fn roll_archetype(rng: &mut Rng) -> Archetype {
  let roll = rng.next_below(100);
  let mut acc = 0;
  for &(kind, weight) in &ARCHETYPES {
    acc += weight;
    if roll < acc {
      return kind;
    }
  }
  Archetype::Winding
}

/// Carves all caves, then (70% of the time) adds bridge tunnels between
/// cave centers. Caves only ever replace non-Empty cells and only occur
/// below `height / 4`.
pub fn carve(region: &mut [Material], width: i32, height: i32, rng: &mut Rng) {
  let floor = height / 4;
  let count = 15 + width / 150;
  let mut centers = Vec::with_capacity(count as usize);

  for _ in 0..count {
    let cx = rng.range_i32(0, width - 1);
    let cy = rng.range_i32(floor, height - 1);
    centers.push((cx, cy));
    match roll_archetype(rng) {
      Archetype::SmallHoles => small_holes(region, width, height, floor, cx, cy, rng),
      Archetype::Winding => winding_cave(region, width, height, floor, cx, cy, rng),
      Archetype::LargeCavern => large_cavern(region, width, height, floor, cx, cy, rng, None),
      Archetype::NarrowPassage => narrow_passage(region, width, height, floor, cx, cy, rng),
      Archetype::Flooded => large_cavern(region, width, height, floor, cx, cy, rng, Some(CavernFill::Flooded)),
      Archetype::MaterialFilled => {
        large_cavern(region, width, height, floor, cx, cy, rng, Some(CavernFill::Material))
      }
      Archetype::MassiveComplex => massive_complex(region, width, height, floor, cx, cy, rng),
    }
  }

  if rng.chance_pct(70) {
    add_bridges(region, width, height, floor, &centers, rng);
  }
}

fn carve_cell(region: &mut [Material], width: i32, height: i32, floor: i32, x: i32, y: i32, m: Material) {
  if !(0..width).contains(&x) || !(floor..height).contains(&y) {
    return;
  }
  let idx = (y * width + x) as usize;
  if region[idx] != Material::Empty {
    region[idx] = m;
  }
}

fn carve_disc(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, radius: i32, m: Material) {
  for dy in -radius..=radius {
    for dx in -radius..=radius {
      if dx * dx + dy * dy <= radius * radius {
        carve_cell(region, width, height, floor, cx + dx, cy + dy, m);
      }
    }
  }
}

fn small_holes(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rng: &mut Rng) {
  let count = rng.range_i32(3, 8);
  for _ in 0..count {
    let ox = rng.range_i32(-15, 15);
    let oy = rng.range_i32(-15, 15);
    let r = rng.range_i32(2, 6);
    carve_disc(region, width, height, floor, cx + ox, cy + oy, r, Material::Empty);
  }
}

/// Random walk carved as a chain of discs; returns the path endpoints so
/// callers can add chambers or branch from them.
fn walk(
  region: &mut [Material],
  width: i32,
  height: i32,
  floor: i32,
  start: (i32, i32),
  length: i32,
  radius_range: (i32, i32),
  turn_churn: f64,
  rng: &mut Rng,
) -> Vec<(i32, i32)> {
  let mut path = Vec::with_capacity(length as usize);
  let (mut x, mut y) = start;
  let mut angle = rng.range_f64(0.0, std::f64::consts::TAU);
  for _ in 0..length {
    let r = rng.range_i32(radius_range.0, radius_range.1);
    carve_disc(region, width, height, floor, x, y, r, Material::Empty);
    path.push((x, y));
    angle += rng.range_f64(-turn_churn, turn_churn);
    x += (angle.cos() * 2.0).round() as i32;
    y += (angle.sin() * 2.0).round() as i32;
  }
  path
}

fn winding_cave(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rng: &mut Rng) {
  let length = rng.range_i32(50, 150);
  let path = walk(region, width, height, floor, (cx, cy), length, (3, 8), 0.5, rng);
  if let Some(&start) = path.first() {
    carve_disc(region, width, height, floor, start.0, start.1, 10, Material::Empty);
  }
  if let Some(&mid) = path.get(path.len() / 2) {
    carve_disc(region, width, height, floor, mid.0, mid.1, 10, Material::Empty);
  }
  if let Some(&end) = path.last() {
    carve_disc(region, width, height, floor, end.0, end.1, 10, Material::Empty);
  }
  let branches = rng.range_i32(1, 3);
  for _ in 0..branches {
    if let Some(&(bx, by)) = path.get(rng.next_below(path.len().max(1) as u32) as usize) {
      walk(region, width, height, floor, (bx, by), length / 3, (2, 5), 0.8, rng);
    }
  }
}

fn narrow_passage(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rng: &mut Rng) {
  let length = rng.range_i32(100, 300);
  walk(region, width, height, floor, (cx, cy), length, (1, 3), 1.2, rng);
}

enum CavernFill {
  Flooded,
  Material,
}

fn large_cavern(
  region: &mut [Material],
  width: i32,
  height: i32,
  floor: i32,
  cx: i32,
  cy: i32,
  rng: &mut Rng,
  fill: Option<CavernFill>,
) {
  let rx = rng.range_i32(15, 40);
  let ry = rng.range_i32(10, 25);
  for dy in -ry..=ry {
    for dx in -rx..=rx {
      let norm = (dx as f64 / rx as f64).powi(2) + (dy as f64 / ry as f64).powi(2);
      let erosion = (0.3 * dx as f64).sin() * 0.08;
      if norm <= 1.0 + erosion {
        carve_cell(region, width, height, floor, cx + dx, cy + dy, Material::Empty);
      }
    }
  }
  // Stalactites/stalagmites: thin spikes from ceiling and floor of the
  // carved ellipse.
  for dx in (-rx..=rx).step_by(4) {
    if rng.chance_pct(40) {
      let spike_len = rng.range_i32(2, 6);
      for s in 0..spike_len {
        carve_cell(region, width, height, floor, cx + dx, cy - ry + s, Material::Empty);
      }
    }
    if rng.chance_pct(40) {
      let spike_len = rng.range_i32(2, 6);
      for s in 0..spike_len {
        carve_cell(region, width, height, floor, cx + dx, cy + ry - s, Material::Empty);
      }
    }
  }

  match fill {
    Some(CavernFill::Flooded) => flood_fill(region, width, height, floor, cx, cy, rx, ry, rng),
    Some(CavernFill::Material) => material_fill(region, width, height, floor, cx, cy, rx, ry, rng),
    None => {}
  }
}

fn flood_fill(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rx: i32, ry: i32, rng: &mut Rng) {
  let pct = rng.range_f64(0.3, 0.9);
  let liquid = {
    let roll = rng.next_below(100);
    if roll < 60 {
      Material::Water
    } else if roll < 85 {
      Material::Oil
    } else {
      Material::ToxicSludge
    }
  };
  let fill_top = cy + ry - (2.0 * ry as f64 * pct) as i32;
  for dy in -ry..=ry {
    let y = cy + dy;
    if y < fill_top {
      continue;
    }
    for dx in -rx..=rx {
      let idx_x = cx + dx;
      if !(0..width).contains(&idx_x) || !(floor..height).contains(&y) {
        continue;
      }
      let idx = (y * width + idx_x) as usize;
      if region[idx] == Material::Empty {
        region[idx] = liquid;
      }
    }
  }
}

fn material_fill(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rx: i32, ry: i32, rng: &mut Rng) {
  let fills = [Material::Sand, Material::Gravel, Material::Mud, Material::Coal];
  let m = fills[rng.next_below(fills.len() as u32) as usize];
  for dy in -ry..=ry {
    for dx in -rx..=rx {
      let x = cx + dx;
      let y = cy + dy;
      if !(0..width).contains(&x) || !(floor..height).contains(&y) {
        continue;
      }
      let idx = (y * width + x) as usize;
      if region[idx] == Material::Empty && !rng.chance_pct(17) {
        region[idx] = m;
      }
    }
  }
}

fn massive_complex(region: &mut [Material], width: i32, height: i32, floor: i32, cx: i32, cy: i32, rng: &mut Rng) {
  let length = rng.range_i32(120, 250);
  let path = walk(region, width, height, floor, (cx, cy), length, (4, 7), 0.4, rng);
  let branches = rng.range_i32(3, 8);
  for _ in 0..branches {
    if let Some(&(bx, by)) = path.get(rng.next_below(path.len().max(1) as u32) as usize) {
      walk(region, width, height, floor, (bx, by), length / 3, (2, 5), 0.9, rng);
    }
  }
}

fn add_bridges(region: &mut [Material], width: i32, height: i32, floor: i32, centers: &[(i32, i32)], rng: &mut Rng) {
  for pair in centers.windows(2) {
    if !rng.chance_pct(70) {
      continue;
    }
    let (ax, ay) = pair[0];
    let (bx, by) = pair[1];
    let steps = ((ax - bx).abs() + (ay - by).abs()).max(1);
    for i in 0..=steps {
      let t = i as f64 / steps as f64;
      let x = ax as f64 + (bx - ax) as f64 * t;
      let y = ay as f64 + (by - ay) as f64 * t;
      carve_disc(region, width, height, floor, x.round() as i32, y.round() as i32, 2, Material::Empty);
    }
  }
}
