//! Stone strata: depth-banded veins of Gravel/Sand/Coal through the stone
//! body.

use crate::hash::Rng;
use crate::material::Material;

struct Band {
  /// Inclusive world-y range this band covers.
  y_range: (i32, i32),
  freq_x: f64,
  freq_y: f64,
  threshold: f64,
  candidates: &'static [(Material, f64)],
}

/// Applies the three depth bands' vein noise over whatever is currently
/// Stone, then smooths vein boundaries by 8-neighbor agreement, randomly
/// reverting edge pixels back to Stone.
pub fn apply(region: &mut [Material], width: i32, height: i32, heights: &[f64], rng: &mut Rng) {
  let avg_surface = heights.iter().sum::<f64>() / heights.len().max(1) as f64;
  let stone_top = (avg_surface + 31.0).clamp(0.0, height as f64 - 1.0);
  let third = (height as f64 - stone_top) / 3.0;

  let bands = [
    Band {
      y_range: (stone_top as i32, (stone_top + third) as i32),
      freq_x: rng.range_f64(0.01, 0.03),
      freq_y: rng.range_f64(0.01, 0.03),
      threshold: 0.55,
      candidates: &[(Material::Gravel, 0.6), (Material::Sand, 0.4)],
    },
    Band {
      y_range: ((stone_top + third) as i32, (stone_top + 2.0 * third) as i32),
      freq_x: rng.range_f64(0.015, 0.035),
      freq_y: rng.range_f64(0.015, 0.035),
      threshold: 0.58,
      candidates: &[(Material::Coal, 0.5), (Material::Gravel, 0.3), (Material::Sand, 0.2)],
    },
    Band {
      y_range: ((stone_top + 2.0 * third) as i32, height),
      freq_x: rng.range_f64(0.02, 0.04),
      freq_y: rng.range_f64(0.02, 0.04),
      threshold: 0.5,
      candidates: &[(Material::Sand, 0.45), (Material::Coal, 0.35), (Material::Gravel, 0.2)],
    },
  ];

  for band in &bands {
    paint_band(region, width, height, band);
  }
  smooth_vein_edges(region, width, height, rng);
}

fn vein_noise(x: i32, y: i32, freq_x: f64, freq_y: f64) -> f64 {
  let v = (x as f64 * freq_x).sin() * (y as f64 * freq_y).sin() * 0.5
    + (x as f64 * freq_x * 1.7 + y as f64 * freq_y * 1.3).cos() * 0.5;
  (v + 1.0) / 2.0
}

fn pick_candidate(rng: &mut Rng, candidates: &[(Material, f64)]) -> Material {
  let roll = rng.next_f64();
  let mut acc = 0.0;
  for &(m, weight) in candidates {
    acc += weight;
    if roll < acc {
      return m;
    }
  }
  candidates.last().map(|&(m, _)| m).unwrap_or(Material::Stone)
}

fn paint_band(region: &mut [Material], width: i32, height: i32, band: &Band) {
  let (y0, y1) = band.y_range;
  let mut rng = Rng::new(((((y0 as i64) << 32) ^ y1 as i64) as u64) ^ 0xA5A5_A5A5);
  for y in y0.max(0)..y1.min(height) {
    for x in 0..width {
      let idx = (y * width + x) as usize;
      if region[idx] != Material::Stone {
        continue;
      }
      let n = vein_noise(x, y, band.freq_x, band.freq_y);
      if n > band.threshold {
        region[idx] = pick_candidate(&mut rng, band.candidates);
      }
    }
  }
}

fn smooth_vein_edges(region: &mut [Material], width: i32, height: i32, rng: &mut Rng) {
  let snapshot = region.to_vec();
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
  for y in 0..height {
    for x in 0..width {
      let idx = (y * width + x) as usize;
      let m = snapshot[idx];
      if m == Material::Stone || m == Material::Empty {
        continue;
      }
      let mut matching = 0;
      for &(dx, dy) in &OFFSETS {
        let nx = x + dx;
        let ny = y + dy;
        if (0..width).contains(&nx) && (0..height).contains(&ny) && snapshot[(ny * width + nx) as usize] == m {
          matching += 1;
        }
      }
      if matching < 5 && rng.chance_pct(35) {
        region[idx] = Material::Stone;
      }
    }
  }
}
