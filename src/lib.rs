//! # terrain_pathfinding
//!
//! A navigation grid that follows the terrain, with slope-aware
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on top of it.
//!
//! A [NavGrid] samples a [TerrainSampler] once per cell to place its nodes on the terrain
//! surface and to mark cells blocked by obstacle geometry as unwalkable. Cells next to a step
//! that is both too tall to hop and too steep to walk are marked unclimbable. When obstacles
//! appear or disappear, only the cells around them are re-sampled with
//! [NavGrid::update_grid_area].
//!
//! A [PathFinder] searches the grid on an 8-neighbourhood, charging extra for climbing. If the
//! target cannot be reached it returns a partial path to the visited node closest to it.
//!
//! ```
//! use terrain_pathfinding::{GridSettings, NavGrid, PathFinder, SyntheticTerrain, Vec3};
//!
//! let terrain = SyntheticTerrain::flat(0.0);
//! let grid = NavGrid::new(GridSettings::new(10.0, 10.0, 0.5), &terrain).unwrap();
//! let waypoints = PathFinder::new().find_waypoints(
//!     &grid,
//!     Vec3::new(-4.5, 0.0, -4.5),
//!     Vec3::new(4.5, 0.0, 4.5),
//! );
//! assert_eq!(waypoints.len(), 9);
//! ```
pub mod astar;
pub mod error;
pub mod math;
pub mod nav_grid;
pub mod node;
pub mod obstacle;
pub mod path_finder;
pub mod sampler;
pub mod settings;

pub use error::GridError;
pub use grid_util::point::Point;
pub use math::Vec3;
pub use nav_grid::{GridWindow, NavGrid};
pub use node::Node;
pub use obstacle::{DynamicObstacle, ObstacleListener};
pub use path_finder::{NodeCosts, Path, PathFinder, PathResult, Search, Waypoint};
pub use sampler::{Aabb, ObstacleId, SyntheticTerrain, TerrainHit, TerrainSampler};
pub use settings::GridSettings;
