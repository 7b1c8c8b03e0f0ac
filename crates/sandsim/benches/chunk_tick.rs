//! Microbenchmark for one `World::update` tick against a world with a
//! settled sand pile plus some still-active liquid: a realistic
//! pre-populated world, ticked repeatedly, with the mutable world
//! reference kept out of the optimizer's reach via `black_box`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sandsim::{Material, World, WorldConfig, WorldPos};

fn settled_world(seed: u64, dir: &std::path::Path) -> World {
  let config = WorldConfig::new(seed).with_storage_root(dir);
  let mut world = World::new(config);
  world.update_player_position(WorldPos::new(0, 0));

  for x in -100..100i64 {
    world.set(WorldPos::new(x, -300), Material::Sand);
  }
  for x in -40..40i64 {
    world.set(WorldPos::new(x, -100), Material::Water);
  }
  // Warm the pile into a mostly-settled state before timing starts, so
  // the benchmark measures steady-state tick cost rather than the initial
  // burst of falling material.
  for _ in 0..200 {
    world.update();
  }
  world
}

fn bench_settled_tick(c: &mut Criterion) {
  let dir = tempfile::tempdir().unwrap();
  let mut world = settled_world(0xC0FFEE, dir.path());

  c.bench_function("world_update_settled", |b| {
    b.iter(|| {
      world.update();
      black_box(&world);
    });
  });
}

fn bench_active_fall(c: &mut Criterion) {
  let dir = tempfile::tempdir().unwrap();

  c.bench_function("world_update_active_fall", |b| {
    b.iter_batched(
      || {
        let config = WorldConfig::new(0xC0FFEE).with_storage_root(dir.path());
        let mut world = World::new(config);
        world.update_player_position(WorldPos::new(0, 0));
        for x in -100..100i64 {
          world.set(WorldPos::new(x, -300), Material::Sand);
        }
        world
      },
      |mut world| {
        world.update();
        black_box(&world);
      },
      criterion::BatchSize::SmallInput,
    );
  });
}

criterion_group!(benches, bench_settled_tick, bench_active_fall);
criterion_main!(benches);
