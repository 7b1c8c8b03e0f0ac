//! Material Table: an immutable, globally shared registry mapping each
//! material id to its static properties.

/// Broad physical behavior category for a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
  Empty,
  Solid,
  Powder,
  Liquid,
  Gas,
}

/// Static, immutable properties of a material, shared globally.
#[derive(Clone, Copy, Debug)]
pub struct Properties {
  pub category: Category,
  pub is_flammable: bool,
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub transparency: u8,
}

/// Recognized material variants.
///
/// `Empty = 0`; ids are fixed per-release and only ever appended to, so an
/// older save file's byte values stay meaningful against a newer table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Material {
  Empty = 0,
  Sand = 1,
  Water = 2,
  Stone = 3,
  Wood = 4,
  Fire = 5,
  Oil = 6,
  Grass = 7,
  Dirt = 8,
  Gravel = 9,
  Smoke = 10,
  Steam = 11,
  TopSoil = 12,
  Mud = 13,
  Coal = 14,
  ToxicSludge = 15,
  Bedrock = 16,
}

/// Total number of recognized materials, used to size the static table.
pub const MATERIAL_COUNT: usize = 17;

impl Material {
  /// Converts a raw material id byte into a `Material`.
  ///
  /// Unknown ids fall back to `Empty` rather than panicking, so a chunk
  /// file produced by a newer generator with unfamiliar ids degrades
  /// gracefully instead of crashing the loader.
  pub fn from_id(id: u8) -> Material {
    ALL.get(id as usize).copied().unwrap_or(Material::Empty)
  }

  pub fn id(self) -> u8 {
    self as u8
  }

  /// Looks up this material's static properties in the global table.
  pub fn properties(self) -> Properties {
    properties(self)
  }

  pub fn is_flammable(self) -> bool {
    self.properties().is_flammable
  }

  pub fn category(self) -> Category {
    self.properties().category
  }
}

const ALL: [Material; MATERIAL_COUNT] = [
  Material::Empty,
  Material::Sand,
  Material::Water,
  Material::Stone,
  Material::Wood,
  Material::Fire,
  Material::Oil,
  Material::Grass,
  Material::Dirt,
  Material::Gravel,
  Material::Smoke,
  Material::Steam,
  Material::TopSoil,
  Material::Mud,
  Material::Coal,
  Material::ToxicSludge,
  Material::Bedrock,
];

const fn props(
  category: Category,
  is_flammable: bool,
  r: u8,
  g: u8,
  b: u8,
  transparency: u8,
) -> Properties {
  Properties {
    category,
    is_flammable,
    r,
    g,
    b,
    transparency,
  }
}

/// Looks up static properties for a material. No failure modes: every
/// variant in `Material` has a table entry.
pub fn properties(m: Material) -> Properties {
  use Category::*;
  match m {
    Material::Empty => props(Empty, false, 0, 0, 0, 0),
    Material::Sand => props(Powder, false, 214, 185, 121, 255),
    Material::Water => props(Liquid, false, 64, 130, 214, 200),
    Material::Stone => props(Solid, false, 120, 120, 128, 255),
    Material::Wood => props(Solid, true, 117, 80, 47, 255),
    Material::Fire => props(Gas, false, 226, 88, 34, 255),
    Material::Oil => props(Liquid, true, 54, 44, 34, 230),
    Material::Grass => props(Solid, true, 71, 130, 56, 255),
    Material::Dirt => props(Solid, false, 101, 67, 33, 255),
    Material::Gravel => props(Powder, false, 140, 136, 130, 255),
    Material::Smoke => props(Gas, false, 90, 90, 90, 160),
    Material::Steam => props(Gas, false, 220, 220, 225, 140),
    Material::TopSoil => props(Solid, false, 92, 64, 36, 255),
    Material::Mud => props(Liquid, false, 77, 58, 40, 255),
    Material::Coal => props(Solid, true, 40, 40, 42, 255),
    Material::ToxicSludge => props(Liquid, false, 94, 150, 40, 235),
    Material::Bedrock => props(Solid, false, 54, 54, 58, 255),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_material_round_trips_through_id() {
    for &m in &ALL {
      assert_eq!(Material::from_id(m.id()), m);
    }
  }

  #[test]
  fn empty_is_zero() {
    assert_eq!(Material::Empty.id(), 0);
  }

  #[test]
  fn unknown_id_falls_back_to_empty() {
    assert_eq!(Material::from_id(250), Material::Empty);
  }
}
