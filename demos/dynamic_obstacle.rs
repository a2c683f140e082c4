use terrain_pathfinding::{
    Aabb, DynamicObstacle, GridSettings, NavGrid, PathFinder, SyntheticTerrain, Vec3,
};

// A crate is dropped onto the straight line between two points and removed again. The grid is
// repaired around it each time and the path is recomputed once it has become blocked.
fn main() {
    let mut terrain = SyntheticTerrain::flat(0.0);
    let mut grid = NavGrid::new(GridSettings::new(10.0, 10.0, 0.5), &terrain).unwrap();
    let solver = PathFinder::new();
    let start = Vec3::new(-4.5, 0.0, 0.5);
    let end = Vec3::new(4.5, 0.0, 0.5);

    let path = solver.find_path(&grid, start, end).unwrap().into_path();
    println!("Initial path has {} waypoints", path.len());

    let position = Vec3::new(0.5, 0.0, 0.5);
    let id = terrain.add_obstacle(Aabb::from_center(position, Vec3::new(1.2, 1.0, 1.2)));
    let mut obstacle = DynamicObstacle::new(position).with_update_range(2.0);
    obstacle.enable(&mut grid, &terrain);
    print!("{}", grid);

    if path.is_blocked(&grid) {
        let detour = solver.find_path(&grid, start, end).unwrap().into_path();
        println!("Path blocked, detour:");
        for waypoint in detour.waypoints() {
            println!("{:?}", waypoint.coord);
        }
    }

    terrain.remove_obstacle(id);
    obstacle.disable(&mut grid, &terrain);
    let restored = solver.find_path(&grid, start, end).unwrap().into_path();
    println!("Obstacle removed, path restored: {}", restored == path);
}
