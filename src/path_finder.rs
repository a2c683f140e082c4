use crate::astar::{astar_with_fallback, Reached, SearchTree};
use crate::math::Vec3;
use crate::nav_grid::NavGrid;
use crate::node::Node;
use grid_util::point::Point;
use log::{debug, info, warn};
use smallvec::SmallVec;

/// Cost of a diagonal step in grid units.
pub const DIAGONAL_COST: f64 = 1.414;
/// Multiplier applied to height gained in a step.
pub const UPHILL_COST_FACTOR: f64 = 2.0;

/// One step of a [Path].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub coord: Point,
    pub position: Vec3,
}

/// Nodes to visit in order, from the node after the start up to and including the node that
/// was reached. Empty when the start node is the target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    fn from_coords(grid: &NavGrid, coords: impl IntoIterator<Item = Point>) -> Path {
        Path {
            waypoints: coords
                .into_iter()
                .map(|coord| Waypoint {
                    coord,
                    position: grid.node_at(coord).position(),
                })
                .collect(),
        }
    }
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
    pub fn coords(&self) -> impl Iterator<Item = Point> + '_ {
        self.waypoints.iter().map(|w| w.coord)
    }
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.waypoints.iter().map(|w| w.position)
    }
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }
    /// Whether a waypoint has become unwalkable or unclimbable since the path was computed,
    /// in which case the path should be requested again.
    pub fn is_blocked(&self, grid: &NavGrid) -> bool {
        self.coords()
            .any(|coord| grid.node(coord).map_or(true, |node| !node.traversable()))
    }
}

/// Outcome of a successful [PathFinder::find_path].
#[derive(Clone, Debug, PartialEq)]
pub enum PathResult {
    /// The path ends at the target node.
    Complete(Path),
    /// The target could not be reached; the path ends at the visited node closest to it.
    Partial(Path),
}

impl PathResult {
    pub fn path(&self) -> &Path {
        match self {
            PathResult::Complete(path) | PathResult::Partial(path) => path,
        }
    }
    pub fn into_path(self) -> Path {
        match self {
            PathResult::Complete(path) | PathResult::Partial(path) => path,
        }
    }
    pub fn is_complete(&self) -> bool {
        matches!(self, PathResult::Complete(_))
    }
}

/// Search costs of a node, for debug display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeCosts {
    pub g: f64,
    pub h: f64,
}

impl NodeCosts {
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Full record of one search: the costs of every node it touched and its result.
#[derive(Clone, Debug)]
pub struct Search {
    start: Point,
    target: Point,
    tree: SearchTree<Point, f64>,
    result: Option<PathResult>,
}

impl Search {
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn target(&self) -> Point {
        self.target
    }
    pub fn costs(&self, coord: &Point) -> Option<NodeCosts> {
        self.tree.visit(coord).map(|visit| NodeCosts {
            g: visit.cost,
            h: visit.heuristic,
        })
    }
    /// Every node the search assigned costs to.
    pub fn visited(&self) -> impl Iterator<Item = (Point, NodeCosts)> + '_ {
        self.tree.iter().map(|(p, visit)| {
            (
                *p,
                NodeCosts {
                    g: visit.cost,
                    h: visit.heuristic,
                },
            )
        })
    }
    /// Expanded nodes, in expansion order.
    pub fn closed(&self) -> impl Iterator<Item = Point> + '_ {
        self.tree.closed().copied()
    }
    pub fn result(&self) -> Option<&PathResult> {
        self.result.as_ref()
    }
    pub fn into_result(self) -> Option<PathResult> {
        self.result
    }
}

/// A* over a [NavGrid].
///
/// Steps cost their octile length in grid units plus [UPHILL_COST_FACTOR] times any height
/// gained; descending is free. The heuristic is the straight-line world distance to the
/// target including height, which can overestimate once elevation costs add up, so paths are
/// good but not guaranteed to be optimal.
///
/// All search state is local to a call; any number of searches may share one grid.
#[derive(Clone, Debug)]
pub struct PathFinder {
    pub diagonal_cost: f64,
    pub uphill_cost_factor: f64,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder::new()
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            diagonal_cost: DIAGONAL_COST,
            uphill_cost_factor: UPHILL_COST_FACTOR,
        }
    }

    /// Octile distance between two grid coordinates.
    pub fn distance(&self, p1: &Point, p2: &Point) -> f64 {
        let delta_x = (p1.x - p2.x).abs();
        let delta_y = (p1.y - p2.y).abs();
        let (short, long) = if delta_x < delta_y {
            (delta_x, delta_y)
        } else {
            (delta_y, delta_x)
        };
        self.diagonal_cost * short as f64 + (long - short) as f64
    }

    pub fn elevation_cost(&self, from: &Node, to: &Node) -> f64 {
        ((to.height() - from.height()) * self.uphill_cost_factor).max(0.0)
    }

    pub fn move_cost(&self, from: &Node, to: &Node) -> f64 {
        self.distance(&from.coord(), &to.coord()) + self.elevation_cost(from, to)
    }

    /// Straight-line world distance, height included. Not admissible, see [PathFinder].
    pub fn heuristic(&self, node: &Node, target: &Node) -> f64 {
        node.position().distance(&target.position())
    }

    fn successors(&self, grid: &NavGrid, coord: &Point) -> SmallVec<[(Point, f64); 8]> {
        let current = grid.node_at(*coord);
        grid.neighbours(*coord)
            .into_iter()
            .map(|p| grid.node_at(p))
            .filter(|n| n.traversable())
            .map(|n| (n.coord(), self.move_cost(current, n)))
            .collect()
    }

    /// Runs a search and keeps its full record. The start node is expanded regardless of its
    /// own walkability.
    pub fn search(&self, grid: &NavGrid, start: Vec3, target: Vec3) -> Search {
        let start = grid.coord_from_world_point(start);
        let target = grid.coord_from_world_point(target);
        let target_node = grid.node_at(target);
        let tree = astar_with_fallback(
            &start,
            |coord| self.successors(grid, coord),
            |coord| self.heuristic(grid.node_at(*coord), target_node),
            |coord| *coord == target,
        );
        let result = match tree.reached() {
            Reached::Goal(ix) => {
                let path = Path::from_coords(grid, tree.path_to(ix).into_iter().skip(1));
                debug!(
                    "Found path from {} to {} with {} waypoints",
                    start,
                    target,
                    path.len()
                );
                Some(PathResult::Complete(path))
            }
            Reached::Closest(0) => {
                warn!("No node is reachable from {}", start);
                None
            }
            Reached::Closest(ix) => {
                let coords = tree.path_to(ix);
                info!(
                    "{} is not reachable from {}, pathing to closest node {}",
                    target,
                    start,
                    coords[coords.len() - 1]
                );
                Some(PathResult::Partial(Path::from_coords(
                    grid,
                    coords.into_iter().skip(1),
                )))
            }
        };
        Search {
            start,
            target,
            tree,
            result,
        }
    }

    /// Finds a path between two world positions, both mapped onto the grid. If the target
    /// cannot be reached, a [PathResult::Partial] path to the visited node closest to it is
    /// returned. Returns [None] if nothing beyond the start node is reachable.
    pub fn find_path(&self, grid: &NavGrid, start: Vec3, target: Vec3) -> Option<PathResult> {
        self.search(grid, start, target).into_result()
    }

    /// World positions to walk through; empty when no path exists.
    pub fn find_waypoints(&self, grid: &NavGrid, start: Vec3, target: Vec3) -> Vec<Vec3> {
        self.find_path(grid, start, target)
            .map(|result| result.path().positions().collect())
            .unwrap_or_default()
    }

    /// Total cost of walking `path` from the node at `start`, as the search accounts it.
    pub fn get_path_cost(&self, grid: &NavGrid, start: Point, path: &Path) -> f64 {
        let mut v = grid.node_at(start);
        let mut total_cost = 0.0;
        for coord in path.coords() {
            let next = grid.node_at(coord);
            total_cost += self.move_cost(v, next);
            v = next;
        }
        total_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Aabb, SyntheticTerrain};
    use crate::settings::GridSettings;

    fn flat_terrain_with_blocks(blocked: &[Point]) -> (NavGrid, SyntheticTerrain) {
        let mut terrain = SyntheticTerrain::flat(0.0);
        let settings = GridSettings::new(10.0, 10.0, 0.5);
        let grid = NavGrid::new(settings.clone(), &terrain).unwrap();
        for p in blocked {
            terrain.add_obstacle(Aabb::from_center(
                grid.cell_center(*p),
                Vec3::new(0.1, 0.5, 0.1),
            ));
        }
        (NavGrid::new(settings, &terrain).unwrap(), terrain)
    }

    fn world(grid: &NavGrid, x: i32, y: i32) -> Vec3 {
        grid.cell_center(Point::new(x, y))
    }

    fn assert_valid(grid: &NavGrid, start: Point, path: &Path) {
        let mut previous = start;
        for coord in path.coords() {
            let step = (coord.x - previous.x).abs().max((coord.y - previous.y).abs());
            assert_eq!(step, 1, "{} does not follow {}", coord, previous);
            assert!(grid.node(coord).unwrap().traversable());
            previous = coord;
        }
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let (grid, _) = flat_terrain_with_blocks(&[]);
        let solver = PathFinder::new();
        let result = solver
            .find_path(&grid, world(&grid, 3, 3), world(&grid, 3, 3))
            .unwrap();
        assert_eq!(result, PathResult::Complete(Path::default()));
    }

    #[test]
    fn equal_start_goal_on_blocked_cell() {
        let (grid, _) = flat_terrain_with_blocks(&[Point::new(5, 5)]);
        assert!(!grid.node(Point::new(5, 5)).unwrap().walkable());
        let solver = PathFinder::new();
        let result = solver
            .find_path(&grid, world(&grid, 5, 5), world(&grid, 5, 5))
            .unwrap();
        assert!(result.is_complete());
        assert!(result.path().is_empty());
        assert!(!result.path().is_blocked(&grid));
    }

    #[test]
    fn diagonal_across_flat_grid() {
        let (grid, _) = flat_terrain_with_blocks(&[]);
        let solver = PathFinder::new();
        let result = solver
            .find_path(&grid, world(&grid, 0, 0), world(&grid, 9, 9))
            .unwrap();
        assert!(result.is_complete());
        let path = result.path();
        assert_eq!(path.len(), 9);
        assert_eq!(path.last().unwrap().coord, Point::new(9, 9));
        assert_valid(&grid, Point::new(0, 0), path);
        let cost = solver.get_path_cost(&grid, Point::new(0, 0), path);
        assert!((cost - 9.0 * DIAGONAL_COST).abs() < 1e-9);
    }

    #[test]
    fn detours_around_blocked_cell() {
        let blocked = Point::new(2, 2);
        let (grid, _) = flat_terrain_with_blocks(&[blocked]);
        assert!(!grid.node(blocked).unwrap().walkable());
        let solver = PathFinder::new();
        let path = solver
            .find_path(&grid, world(&grid, 0, 0), world(&grid, 4, 4))
            .unwrap()
            .into_path();
        assert_eq!(path.len(), 5);
        assert!(path.coords().all(|p| p != blocked));
        assert_eq!(path.last().unwrap().coord, Point::new(4, 4));
        assert_valid(&grid, Point::new(0, 0), &path);
    }

    #[test]
    fn uphill_costs_more_than_downhill() {
        let terrain = SyntheticTerrain::from_fn(|x, _| Some(x * 0.25));
        let grid = NavGrid::new(GridSettings::new(10.0, 10.0, 0.5), &terrain).unwrap();
        let solver = PathFinder::new();
        let low = grid.node(Point::new(3, 3)).unwrap();
        let high = grid.node(Point::new(4, 3)).unwrap();
        assert!((solver.move_cost(low, high) - 1.5).abs() < 1e-9);
        assert!((solver.move_cost(high, low) - 1.0).abs() < 1e-9);
        let diagonal = grid.node(Point::new(4, 4)).unwrap();
        assert!((solver.move_cost(low, diagonal) - (DIAGONAL_COST + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn octile_distance() {
        let solver = PathFinder::new();
        assert_eq!(solver.distance(&Point::new(0, 0), &Point::new(3, 0)), 3.0);
        let octile = solver.distance(&Point::new(0, 0), &Point::new(2, 5));
        assert!((octile - (2.0 * DIAGONAL_COST + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_closest_reachable_node() {
        let wall = (0..10).map(|y| Point::new(5, y)).collect::<Vec<_>>();
        let (grid, _) = flat_terrain_with_blocks(&wall);
        let solver = PathFinder::new();
        let search = solver.search(&grid, world(&grid, 0, 0), world(&grid, 9, 9));
        let result = search.result().unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.path().last().unwrap().coord, Point::new(4, 9));
        assert_valid(&grid, Point::new(0, 0), result.path());
        assert_eq!(search.closed().count(), 50);
        assert!(search.closed().all(|p| p.x < 5));
    }

    #[test]
    fn blocked_target_resolves_next_to_it() {
        let target = Point::new(5, 5);
        let (grid, _) = flat_terrain_with_blocks(&[target]);
        let solver = PathFinder::new();
        let path = match solver.find_path(&grid, world(&grid, 0, 0), world(&grid, 5, 5)) {
            Some(PathResult::Partial(path)) => path,
            other => panic!("expected partial path, got {:?}", other),
        };
        let last = path.last().unwrap();
        assert!((last.position.distance(&world(&grid, 5, 5)) - 1.0).abs() < 1e-9);
        assert_valid(&grid, Point::new(0, 0), &path);
    }

    #[test]
    fn enclosed_start_has_no_path() {
        let (grid, _) =
            flat_terrain_with_blocks(&[Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]);
        let solver = PathFinder::new();
        let search = solver.search(&grid, world(&grid, 0, 0), world(&grid, 9, 9));
        assert!(search.result().is_none());
        assert_eq!(search.closed().collect::<Vec<_>>(), vec![Point::new(0, 0)]);
        assert!(solver
            .find_waypoints(&grid, world(&grid, 0, 0), world(&grid, 9, 9))
            .is_empty());
    }

    #[test]
    fn search_exposes_costs() {
        let (grid, _) = flat_terrain_with_blocks(&[]);
        let solver = PathFinder::new();
        let search = solver.search(&grid, world(&grid, 0, 0), world(&grid, 3, 0));
        let costs = search.costs(&Point::new(1, 0)).unwrap();
        assert_eq!(costs.g, 1.0);
        assert!((costs.h - 2.0).abs() < 1e-9);
        assert!((costs.f() - 3.0).abs() < 1e-9);
        assert!(search.costs(&Point::new(9, 9)).is_none());
        assert_eq!(search.start(), Point::new(0, 0));
        assert_eq!(search.target(), Point::new(3, 0));
    }

    #[test]
    fn stale_paths_are_detected() {
        let (mut grid, mut terrain) = flat_terrain_with_blocks(&[]);
        let solver = PathFinder::new();
        let path = solver
            .find_path(&grid, world(&grid, 0, 0), world(&grid, 9, 0))
            .unwrap()
            .into_path();
        assert!(!path.is_blocked(&grid));
        let center = world(&grid, 5, 0);
        terrain.add_obstacle(Aabb::from_center(center, Vec3::new(0.1, 0.5, 0.1)));
        grid.update_grid_area(&terrain, center, 0.0);
        assert!(path.is_blocked(&grid));
    }
}
