//! Ore veins: branching clusters in the lower third of the world. The
//! three "ore" groups are palette stand-ins mapped onto existing
//! materials (Sand, Gravel, Wood) rather than new ore types, since this
//! material table has no dedicated ore variants.

use crate::hash::Rng;
use crate::material::Material;

const ORE_GROUPS: [Material; 3] = [Material::Sand, Material::Gravel, Material::Wood];

pub fn add_ore_veins(region: &mut [Material], width: i32, height: i32, rng: &mut Rng) {
  let lower_third_start = height * 2 / 3;
  let count = width / 200 + 5;

  for _ in 0..count {
    let ore = ORE_GROUPS[rng.next_below(ORE_GROUPS.len() as u32) as usize];
    let cx = rng.range_i32(0, width - 1);
    let cy = rng.range_i32(lower_third_start, height - 1);
    let branches = rng.range_i32(2, 5);
    for _ in 0..branches {
      carve_branch(region, width, height, cx, cy, ore, rng);
    }
  }

  smooth_edges(region, width, height, rng);
}

fn carve_branch(region: &mut [Material], width: i32, height: i32, cx: i32, cy: i32, ore: Material, rng: &mut Rng) {
  let length = rng.range_i32(3, 8);
  let thickness = rng.range_i32(1, 2);
  let mut angle = rng.range_f64(0.0, std::f64::consts::TAU);
  let (mut x, mut y) = (cx, cy);
  for _ in 0..length {
    for dy in -thickness..=thickness {
      for dx in -thickness..=thickness {
        let nx = x + dx;
        let ny = y + dy;
        if !(0..width).contains(&nx) || !(0..height).contains(&ny) {
          continue;
        }
        let idx = (ny * width + nx) as usize;
        if region[idx] == Material::Stone {
          region[idx] = ore;
        }
      }
    }
    angle += rng.range_f64(-0.6, 0.6);
    x += angle.cos().round() as i32;
    y += angle.sin().round() as i32;
  }
}

/// Edge pixels revert to Stone ~1/7 of the time.
fn smooth_edges(region: &mut [Material], width: i32, height: i32, rng: &mut Rng) {
  let snapshot = region.to_vec();
  for y in 0..height {
    for x in 0..width {
      let idx = (y * width + x) as usize;
      let m = snapshot[idx];
      if !ORE_GROUPS.contains(&m) {
        continue;
      }
      let is_edge = [(-1, 0), (1, 0), (0, -1), (0, 1)].iter().any(|&(dx, dy)| {
        let nx = x + dx;
        let ny = y + dy;
        !(0..width).contains(&nx) || !(0..height).contains(&ny) || snapshot[(ny * width + nx) as usize] != m
      });
      if is_edge && rng.next_below(7) == 0 {
        region[idx] = Material::Stone;
      }
    }
  }
}
