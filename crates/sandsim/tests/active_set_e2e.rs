//! The active chunk set never exceeds its cap, regardless of where the
//! viewpoint moves.

use sandsim::{WorldConfig, WorldPos};

#[test]
fn active_set_never_exceeds_cap() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(9).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);

  let viewpoints = [
    WorldPos::new(0, 0),
    WorldPos::new(10_000, 0),
    WorldPos::new(-10_000, 10_000),
    WorldPos::new(3, 3),
    WorldPos::new(1_000_000, -1_000_000),
  ];

  for vp in viewpoints {
    world.update_player_position(vp);
    assert!(
      world.active_chunks().len() <= 12,
      "active set exceeded the documented cap of 12 at {vp:?}"
    );
  }
}

#[test]
fn center_chunk_is_always_active() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(9).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);

  let vp = WorldPos::new(777, -1234);
  world.update_player_position(vp);
  let (center, _) = vp.to_chunk_and_local();
  assert!(world.active_chunks().contains(&center));
}
