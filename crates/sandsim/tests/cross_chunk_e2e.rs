//! A falling cell crosses a chunk boundary through the world facade, not
//! just the chunk-local physics unit tests.

use sandsim::coords::ChunkCoord;
use sandsim::{Material, WorldConfig, WorldPos};

#[test]
fn sand_falls_from_one_chunk_into_the_one_below() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(5).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  // Clear a vertical shaft straddling the boundary between chunk (0,0) and
  // chunk (0,1) so sand has somewhere to fall without the world generator
  // getting in the way.
  for y in -5..520 {
    world.set(WorldPos::new(50, y), Material::Empty);
  }
  world.set(WorldPos::new(50, 510), Material::Sand);

  for _ in 0..50 {
    world.update();
  }

  let found_below = world.get(WorldPos::new(50, 512)) == Material::Sand
    || world.get(WorldPos::new(50, 513)) == Material::Sand
    || world.get(WorldPos::new(50, 514)) == Material::Sand;
  assert!(found_below, "sand never crossed into the chunk below");

  let (upper_coord, _) = WorldPos::new(50, 510).to_chunk_and_local();
  let (lower_coord, _) = WorldPos::new(50, 512).to_chunk_and_local();
  assert_eq!(upper_coord, ChunkCoord::new(0, 0));
  assert_eq!(lower_coord, ChunkCoord::new(0, 1));
}

/// A chunk that just received a cross-boundary write is stepped the same
/// tick, not left one tick behind: once the write lands in the chunk below,
/// that chunk's own movement pass should already have run by the time
/// `update()` returns.
#[test]
fn neighbor_of_a_dirty_chunk_steps_the_same_tick() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(5).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  for y in -5..520 {
    world.set(WorldPos::new(50, y), Material::Empty);
  }
  for _ in 0..20 {
    world.update();
  }

  world.set(WorldPos::new(50, 511), Material::Sand);
  world.update();

  assert_eq!(world.get(WorldPos::new(50, 511)), Material::Empty);
  assert_eq!(world.get(WorldPos::new(50, 512)), Material::Empty);
  assert_eq!(world.get(WorldPos::new(50, 513)), Material::Sand);
}
