//! Surface heightmap: sine-stacked terrain, smoothing, layer filling, and
//! surface water pools.

use crate::hash::Rng;
use crate::material::Material;
use std::f64::consts::PI;

struct SineTerm {
  freq: f64,
  amp: f64,
  phase: f64,
}

/// Draws the three sine terms and the biome-factor phase once, then
/// produces a smoothed height curve across `width` columns.
/// `base_ground = height / 6`.
pub fn build(rng: &mut Rng, width: i32, height: i32) -> Vec<f64> {
  let base_ground = height as f64 / 6.0;
  let large = SineTerm {
    freq: rng.range_f64(3.0, 5.0),
    amp: rng.range_f64(10.0, 20.0),
    phase: rng.range_f64(0.0, 2.0 * PI),
  };
  let medium = SineTerm {
    freq: rng.range_f64(8.0, 12.0),
    amp: rng.range_f64(4.0, 8.0),
    phase: rng.range_f64(0.0, 2.0 * PI),
  };
  let small = SineTerm {
    freq: rng.range_f64(18.0, 25.0),
    amp: rng.range_f64(1.0, 3.0),
    phase: rng.range_f64(0.0, 2.0 * PI),
  };

  let mut h = vec![0.0f64; width as usize];
  for (x, slot) in h.iter_mut().enumerate() {
    let xf = x as f64;
    let biome = 0.4 + 0.3 * (xf / width as f64 * 1.2).sin();
    let large_term = large.amp * biome * (2.0 * PI * large.freq * xf / width as f64 + large.phase).sin();
    let medium_term = medium.amp * (2.0 * PI * medium.freq * xf / width as f64 + medium.phase).sin();
    let small_term = small.amp * (2.0 * PI * small.freq * xf / width as f64 + small.phase).sin();
    *slot = base_ground + large_term + medium_term + small_term;
  }

  box_blur(&mut h, 5);
  box_blur(&mut h, 5);
  box_blur(&mut h, 5);
  insert_plateaus(&mut h, rng, width);
  box_blur(&mut h, 3);
  box_blur(&mut h, 3);
  h
}

fn box_blur(h: &mut [f64], window: i32) {
  let half = window / 2;
  let orig = h.to_vec();
  for (x, slot) in h.iter_mut().enumerate() {
    let mut sum = 0.0;
    let mut count = 0;
    for d in -half..=half {
      let nx = x as i32 + d;
      if nx >= 0 && (nx as usize) < orig.len() {
        sum += orig[nx as usize];
        count += 1;
      }
    }
    *slot = sum / count as f64;
  }
}

/// Stochastic plateau insertion: flattens a handful of wide bands to
/// their averaged height, blending the edges in over 12 cells so the
/// join isn't a visible seam.
fn insert_plateaus(h: &mut [f64], rng: &mut Rng, width: i32) {
  let count = width / 250 + 2;
  const BLEND: i32 = 12;
  for _ in 0..count {
    let plateau_w = rng.range_i32(30, 80);
    let start = rng.range_i32(0, (width - plateau_w).max(1));
    let end = (start + plateau_w).min(width);
    if end <= start {
      continue;
    }
    let avg = h[start as usize..end as usize].iter().sum::<f64>() / (end - start) as f64;
    for x in start..end {
      h[x as usize] = avg;
    }
    for d in 1..=BLEND {
      let t = d as f64 / BLEND as f64;
      if let Some(slot) = h.get_mut((start - d) as usize..(start - d + 1) as usize).and_then(|s| s.first_mut()) {
        *slot = *slot * t + avg * (1.0 - t);
      }
      if let Some(slot) = h.get_mut((end + d - 1) as usize..(end + d) as usize).and_then(|s| s.first_mut()) {
        *slot = *slot * t + avg * (1.0 - t);
      }
    }
  }
}

/// Gravel-pocket test used while filling the dirt band.
fn in_gravel_pocket(x: i32, y: i32) -> bool {
  let v = (0.008 * x as f64).sin() * (0.01 * y as f64).sin() * 0.6
    + (0.8 * (0.015 * x as f64 + 0.013 * y as f64)).sin() * 0.4;
  (0.25..0.45).contains(&v)
}

/// Fills Air/Grass/TopSoil/Dirt/Stone per column beneath the smoothed
/// heightmap, scattering gravel pockets through the dirt band.
pub fn fill_layers(region: &mut [Material], width: i32, height: i32, heights: &[f64], rng: &mut Rng) {
  for x in 0..width {
    let surface = heights[x as usize].round() as i32;
    let grass_depth = rng.range_i32(0, 2);
    let topsoil_depth = rng.range_i32(2, 6);
    let dirt_depth = rng.range_i32(15, 35);

    let grass_start = surface - grass_depth;
    let topsoil_start = surface;
    let dirt_start = topsoil_start + topsoil_depth;
    let stone_start = dirt_start + dirt_depth;

    for y in 0..height {
      let idx = (y * width + x) as usize;
      region[idx] = if y < grass_start {
        Material::Empty
      } else if y < topsoil_start {
        Material::Grass
      } else if y < dirt_start {
        Material::TopSoil
      } else if y < stone_start {
        if in_gravel_pocket(x, y) {
          if rng.chance_pct(43) {
            Material::Dirt
          } else {
            Material::Gravel
          }
        } else {
          Material::Dirt
        }
      } else {
        Material::Stone
      };
    }
  }
}

/// Surface water pools: a parabolic notch carved into the ground and
/// filled with Water (70%) or Oil (30%).
pub fn add_water_pools(region: &mut [Material], width: i32, height: i32, heights: &[f64], rng: &mut Rng) {
  let count = width / 60 + 8;
  for _ in 0..count {
    let cx = rng.range_i32(0, width - 1);
    let pool_w = rng.range_i32(10, 40);
    let depth = rng.range_i32(3, 10);
    let liquid = if rng.chance_pct(70) {
      Material::Water
    } else {
      Material::Oil
    };
    let half = pool_w / 2;
    for dx in -half..=half {
      let x = cx + dx;
      if !(0..width).contains(&x) {
        continue;
      }
      let t = dx as f64 / half.max(1) as f64;
      let local_depth = (depth as f64 * (1.0 - t * t)).max(0.0).round() as i32;
      if local_depth <= 0 {
        continue;
      }
      let surface = heights[x as usize].round() as i32;
      for y in surface..(surface + local_depth).min(height) {
        if y < 0 {
          continue;
        }
        region[(y * width + x) as usize] = liquid;
      }
    }
  }
}
