//! A block of sand dropped above open air settles into a pile and stops
//! moving, with no material created or destroyed.

use sandsim::{Material, WorldConfig, WorldPos};

fn count_material(world: &mut sandsim::World, m: Material, xs: std::ops::Range<i64>, ys: std::ops::Range<i64>) -> usize {
  let mut n = 0;
  for y in ys.clone() {
    for x in xs.clone() {
      if world.get(WorldPos::new(x, y)) == m {
        n += 1;
      }
    }
  }
  n
}

#[test]
fn sand_settles_without_losing_mass() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(42).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  let dropped = 30usize;
  for x in 0..dropped as i64 {
    world.set(WorldPos::new(x, -100), Material::Sand);
  }

  let before = count_material(&mut world, Material::Sand, 0..dropped as i64, -600..600);
  assert_eq!(before, dropped);

  for _ in 0..2000 {
    world.update();
  }

  let after = count_material(&mut world, Material::Sand, -200..dropped as i64 + 200, -600..600);
  assert_eq!(after, dropped, "sand count must be conserved across settling");
}

#[test]
fn settled_pile_goes_quiet() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(7).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  for x in 0..10i64 {
    world.set(WorldPos::new(x, -200), Material::Sand);
  }
  for _ in 0..2000 {
    world.update();
  }

  let coord = WorldPos::new(0, -200).to_chunk_and_local().0;
  let dirty_before = world.chunk(coord).map(|c| c.dirty).unwrap_or(true);

  // One more tick after the pile has long since settled should not revive
  // activity indefinitely; the activity gate should have already gone
  // quiet well within 2000 ticks for a ten-grain pile over open ground.
  world.update();
  let dirty_after = world.chunk(coord).map(|c| c.dirty).unwrap_or(true);
  assert!(!dirty_before || !dirty_after, "pile never settles");
}
