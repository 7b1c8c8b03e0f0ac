//! Water poured into an uneven basin levels out and conserves its cell
//! count.

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
fn water_conserves_mass_while_leveling() {
  let dir = tempfile::tempdir().unwrap();
  let config = WorldConfig::new(11).with_storage_root(dir.path());
  let mut world = sandsim::World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  // Carve a basin out of a solid floor: a 40-wide, 10-deep walled pit just
  // above the floor, then pour water unevenly into one corner of it.
  let floor_y = 200i64;
  for y in (floor_y - 10)..=floor_y {
    for x in -25..25 {
      world.set(WorldPos::new(x, y), Material::Empty);
    }
  }
  for x in -25..25 {
    world.set(WorldPos::new(x, floor_y), Material::Stone);
  }
  for y in (floor_y - 10)..floor_y {
    world.set(WorldPos::new(-25, y), Material::Stone);
    world.set(WorldPos::new(24, y), Material::Stone);
  }
  let poured = 60usize;
  let mut placed = 0;
  'outer: for y in (floor_y - 9)..floor_y {
    for x in -24..-14 {
      if placed >= poured {
        break 'outer;
      }
      world.set(WorldPos::new(x, y), Material::Water);
      placed += 1;
    }
  }
  assert_eq!(placed, poured);

  for _ in 0..3000 {
    world.update();
  }

  let remaining = count_material(&mut world, Material::Water, -30..30, floor_y - 15..floor_y + 5);
  assert_eq!(remaining, poured, "water cells must be conserved while leveling");
}
