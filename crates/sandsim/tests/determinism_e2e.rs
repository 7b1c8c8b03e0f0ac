//! Identical seed plus identical input sequence produces byte-identical
//! results, both for world generation and for the physics tick sequence.

use sandsim::{Material, WorldConfig, WorldPos};

fn run(seed: u64, dir: &std::path::Path) -> Vec<Material> {
  let config = WorldConfig::new(seed).with_storage_root(dir);
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  for x in 0..20i64 {
    world.set(WorldPos::new(x, -50), Material::Sand);
  }
  for _ in 0..500 {
    world.update();
  }

  let mut out = Vec::new();
  for y in -600..600 {
    for x in -600..600 {
      out.push(world.get(WorldPos::new(x, y)));
    }
  }
  out
}

#[test]
fn same_seed_same_input_sequence_reproduces_byte_identical_state() {
  let dir_a = tempfile::tempdir().unwrap();
  let dir_b = tempfile::tempdir().unwrap();
  let a = run(1234, dir_a.path());
  let b = run(1234, dir_b.path());
  assert_eq!(a, b, "identical seed and input sequence diverged");
}

#[test]
fn different_seeds_usually_produce_different_terrain() {
  let dir_a = tempfile::tempdir().unwrap();
  let dir_b = tempfile::tempdir().unwrap();
  let a = run(1, dir_a.path());
  let b = run(2, dir_b.path());
  assert_ne!(a, b, "different seeds produced identical worlds");
}
