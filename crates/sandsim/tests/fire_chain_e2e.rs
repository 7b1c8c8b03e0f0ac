//! Fire adjacent to fuel spreads, and burned-out fire eventually
//! disappears or turns to smoke, never persisting forever.

use sandsim::{Material, WorldConfig, WorldPos};

#[test]
fn fire_spreads_to_wood_and_eventually_burns_out() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(3).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  // A horizontal strip of wood with a single ignition point at one end.
  for x in 0..40i64 {
    world.set(WorldPos::new(x, 100), Material::Wood);
  }
  world.set(WorldPos::new(0, 100), Material::Fire);

  let mut saw_fire_spread = false;
  for _ in 0..4000 {
    world.update();
    let any_other_fire = (1..40).any(|x| world.get(WorldPos::new(x, 100)) == Material::Fire);
    if any_other_fire {
      saw_fire_spread = true;
      break;
    }
  }
  assert!(saw_fire_spread, "fire never reached neighboring wood");

  for _ in 0..6000 {
    world.update();
  }

  let remaining_fire = (0..40)
    .filter(|&x| world.get(WorldPos::new(x, 100)) == Material::Fire)
    .count();
  assert_eq!(remaining_fire, 0, "fire must eventually burn itself out");
}
