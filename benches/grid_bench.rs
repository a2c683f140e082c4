use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use terrain_pathfinding::*;

const WORLD_SIZE: f64 = 100.0;

/// Rolling hills with scattered box obstacles.
fn hilly_terrain(n_obstacles: usize) -> SyntheticTerrain {
    let mut terrain =
        SyntheticTerrain::from_fn(|x, z| Some((x * 0.15).sin() * 2.0 + (z * 0.1).cos() * 3.0));
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..n_obstacles {
        let x = rng.gen_range(-WORLD_SIZE / 2.0..WORLD_SIZE / 2.0);
        let z = rng.gen_range(-WORLD_SIZE / 2.0..WORLD_SIZE / 2.0);
        let y = terrain.height_at(x, z).unwrap_or(0.0);
        terrain.add_obstacle(Aabb::from_center(Vec3::new(x, y, z), Vec3::new(1.0, 2.0, 1.0)));
    }
    terrain
}

fn settings() -> GridSettings {
    GridSettings::new(WORLD_SIZE, WORLD_SIZE, 0.5)
}

fn build_bench(c: &mut Criterion) {
    let terrain = hilly_terrain(200);
    c.bench_function("build 200x200 grid", |b| {
        b.iter(|| black_box(NavGrid::new(settings(), &terrain)))
    });
}

fn repair_bench(c: &mut Criterion) {
    let terrain = hilly_terrain(200);
    let mut grid = NavGrid::new(settings(), &terrain).unwrap();
    c.bench_function("repair 5m window", |b| {
        b.iter(|| black_box(grid.update_grid_area(&terrain, Vec3::new(10.0, 0.0, -5.0), 5.0)))
    });
}

fn path_bench(c: &mut Criterion) {
    let terrain = hilly_terrain(200);
    let grid = NavGrid::new(settings(), &terrain).unwrap();
    let solver = PathFinder::new();
    let mut rng = StdRng::seed_from_u64(1);
    let half = WORLD_SIZE / 2.0;
    let queries = (0..20)
        .map(|_| {
            (
                Vec3::new(rng.gen_range(-half..half), 0.0, rng.gen_range(-half..half)),
                Vec3::new(rng.gen_range(-half..half), 0.0, rng.gen_range(-half..half)),
            )
        })
        .collect::<Vec<_>>();
    c.bench_function("20 random paths on 200x200 grid", |b| {
        b.iter(|| {
            for (start, end) in &queries {
                black_box(solver.find_path(&grid, *start, *end));
            }
        })
    });
}

criterion_group!(benches, build_bench, repair_bench, path_bench);
criterion_main!(benches);
