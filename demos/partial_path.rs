use terrain_pathfinding::{GridSettings, NavGrid, PathFinder, PathResult, SyntheticTerrain, Vec3};

// The target sits on a plateau behind a cliff that is too tall and too steep to climb, so the
// search settles for the reachable node closest to it. The g/h/f costs of the search are
// printed the way a debug overlay would show them.
fn main() {
    let terrain = SyntheticTerrain::from_fn(|x, _| Some(if x > 1.0 { 3.0 } else { 0.0 }));
    let grid = NavGrid::new(GridSettings::new(8.0, 4.0, 0.5), &terrain).unwrap();
    print!("{}", grid);

    let solver = PathFinder::new();
    let search = solver.search(&grid, Vec3::new(-3.5, 0.0, -1.5), Vec3::new(3.5, 3.0, 1.5));
    match search.result() {
        Some(PathResult::Complete(path)) => println!("Reached target in {} steps", path.len()),
        Some(PathResult::Partial(path)) => {
            println!("Target unreachable, stopping at {:?}", path.last().map(|w| w.coord))
        }
        None => println!("Nothing reachable"),
    }
    for (coord, costs) in search.visited() {
        println!(
            "{:?}: g {:.2} h {:.2} f {:.2}",
            coord,
            costs.g,
            costs.h,
            costs.f()
        );
    }
}
