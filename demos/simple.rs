use terrain_pathfinding::{Aabb, GridSettings, NavGrid, PathFinder, SyntheticTerrain, Vec3};

// In this example a path is found across a 10x10 grid with a wall in the middle
// ..........
// ..........
// ..........
// ....#.....
// ....#.....
// ....#.....
// ....#.....
// ..........
// ..........
// ..........
// starting in the bottom-left corner and ending in the top-right one.
fn main() {
    let mut terrain = SyntheticTerrain::flat(0.0);
    terrain.add_obstacle(Aabb::new(
        Vec3::new(-0.7, -1.0, -2.0),
        Vec3::new(-0.3, 1.0, 2.0),
    ));
    let grid = NavGrid::new(GridSettings::new(10.0, 10.0, 0.5), &terrain).unwrap();
    print!("{}", grid);
    let solver = PathFinder::new();
    let start = Vec3::new(-4.5, 0.0, -4.5);
    let end = Vec3::new(4.5, 0.0, 4.5);
    if let Some(result) = solver.find_path(&grid, start, end) {
        println!("A path has been found:");
        for waypoint in result.path().waypoints() {
            println!("{:?} at {}", waypoint.coord, waypoint.position);
        }
    }
}
