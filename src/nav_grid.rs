use crate::error::GridError;
use crate::math::Vec3;
use crate::node::Node;
use crate::sampler::TerrainSampler;
use crate::settings::GridSettings;
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, info};
use smallvec::SmallVec;

/// Neighbour pairs closer than this on the XZ plane are not compared for slope.
pub const NEAR_COINCIDENT_DISTANCE: f64 = 0.01;

pub type Neighbours = SmallVec<[Point; 8]>;

/// Inclusive rectangle of grid coordinates, already clipped to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridWindow {
    pub min: Point,
    pub max: Point,
}

impl GridWindow {
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
    pub fn points(&self) -> impl Iterator<Item = Point> {
        iproduct!(self.min.x..=self.max.x, self.min.y..=self.max.y).map(|(x, y)| Point::new(x, y))
    }
}

/// Dense grid of terrain-conforming [Node]s.
///
/// Every coordinate in `[0, size_x) x [0, size_y)` holds exactly one node. The node array is
/// allocated once when the grid is built and afterwards only rewritten in place by
/// [update_grid_area](Self::update_grid_area).
#[derive(Clone, Debug)]
pub struct NavGrid {
    settings: GridSettings,
    size_x: usize,
    size_y: usize,
    node_diameter: f64,
    max_slope_tan: f64,
    nodes: Vec<Node>,
}

impl NavGrid {
    /// Samples the terrain under every cell, then evaluates climbability once all heights
    /// are known.
    pub fn new<S: TerrainSampler + ?Sized>(
        settings: GridSettings,
        sampler: &S,
    ) -> Result<NavGrid, GridError> {
        settings.validate()?;
        let (size_x, size_y) = settings.grid_size();
        let mut grid = NavGrid {
            node_diameter: settings.node_diameter(),
            max_slope_tan: settings.max_slope_tan(),
            size_x,
            size_y,
            nodes: Vec::with_capacity(size_x * size_y),
            settings,
        };
        let clearance = grid.settings.build_clearance_radius();
        for y in 0..size_y as i32 {
            for x in 0..size_x as i32 {
                let coord = Point::new(x, y);
                let center = grid.cell_center(coord);
                let node = match grid.cast_down(sampler, center) {
                    Some(hit) => Node::new(coord, hit, !sampler.is_occupied(hit, clearance)),
                    None => Node::new(coord, center, false),
                };
                grid.nodes.push(node);
            }
        }
        grid.update_climbability(grid.full_window());
        info!(
            "Built {}x{} navigation grid: {} walkable, {} traversable",
            size_x,
            size_y,
            grid.nodes.iter().filter(|n| n.walkable).count(),
            grid.nodes.iter().filter(|n| n.traversable()).count()
        );
        Ok(grid)
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }
    pub fn size_x(&self) -> usize {
        self.size_x
    }
    pub fn size_y(&self) -> usize {
        self.size_y
    }
    pub fn node_diameter(&self) -> f64 {
        self.node_diameter
    }

    /// Read-only view of every node, indexed `y * size_x + x`.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, coord: Point) -> Option<&Node> {
        if self.point_in_bounds(coord) {
            Some(&self.nodes[self.get_ix_point(&coord)])
        } else {
            None
        }
    }

    pub fn point_in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.size_x && (p.y as usize) < self.size_y
    }

    fn get_ix_point(&self, p: &Point) -> usize {
        p.y as usize * self.size_x + p.x as usize
    }

    pub(crate) fn node_at(&self, coord: Point) -> &Node {
        &self.nodes[self.get_ix_point(&coord)]
    }

    /// World position of the bottom-left corner of the grid (at the centre's height).
    pub fn world_bottom_left(&self) -> Vec3 {
        let c = self.settings.center;
        Vec3::new(
            c.x - self.settings.world_size_x / 2.0,
            0.0,
            c.z - self.settings.world_size_y / 2.0,
        )
    }

    /// XZ centre of a cell at height zero.
    pub fn cell_center(&self, coord: Point) -> Vec3 {
        let bottom_left = self.world_bottom_left();
        let r = self.settings.node_radius;
        Vec3::new(
            bottom_left.x + coord.x as f64 * self.node_diameter + r,
            0.0,
            bottom_left.z + coord.y as f64 * self.node_diameter + r,
        )
    }

    fn cast_down<S: TerrainSampler + ?Sized>(&self, sampler: &S, at: Vec3) -> Option<Vec3> {
        let start = self.settings.ray_start_height;
        sampler
            .sample_terrain(Vec3::new(at.x, start, at.z), start * 2.0)
            .map(|hit| hit.point)
    }

    /// The up to 8 in-bounds cells around `coord`. Diagonals are always included, even when
    /// both adjacent orthogonal cells are blocked.
    pub fn neighbours(&self, coord: Point) -> Neighbours {
        let mut neighbours = Neighbours::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = Point::new(coord.x + dx, coord.y + dy);
                if self.point_in_bounds(p) {
                    neighbours.push(p);
                }
            }
        }
        neighbours
    }

    /// Maps a world position to the grid cell it falls in. Positions outside the grid are
    /// clamped to the nearest edge cell.
    pub fn coord_from_world_point(&self, world_position: Vec3) -> Point {
        let s = &self.settings;
        let percent_x = (world_position.x - s.center.x + s.world_size_x / 2.0) / s.world_size_x;
        let percent_y = (world_position.z - s.center.z + s.world_size_y / 2.0) / s.world_size_y;
        let (percent_x, percent_y) = (percent_x.clamp(0.0, 1.0), percent_y.clamp(0.0, 1.0));
        let x = ((self.size_x - 1) as f64 * percent_x).round_ties_even() as i32;
        let y = ((self.size_y - 1) as f64 * percent_y).round_ties_even() as i32;
        Point::new(x, y)
    }

    pub fn node_from_world_point(&self, world_position: Vec3) -> &Node {
        self.node_at(self.coord_from_world_point(world_position))
    }

    fn full_window(&self) -> GridWindow {
        GridWindow {
            min: Point::new(0, 0),
            max: Point::new(self.size_x as i32 - 1, self.size_y as i32 - 1),
        }
    }

    /// Cells within `range_in_nodes` of `center` in both axes, clipped to the grid.
    pub fn window_around(&self, center: Point, range_in_nodes: i32) -> GridWindow {
        let full = self.full_window();
        GridWindow {
            min: Point::new(
                center.x.saturating_sub(range_in_nodes).max(full.min.x),
                center.y.saturating_sub(range_in_nodes).max(full.min.y),
            ),
            max: Point::new(
                center.x.saturating_add(range_in_nodes).min(full.max.x),
                center.y.saturating_add(range_in_nodes).min(full.max.y),
            ),
        }
    }

    /// A walkable node is climbable unless one of its walkable neighbours sits behind a step
    /// that is both taller than `max_climb_height` and steeper than `max_slope_angle`.
    fn evaluate_climbable(&self, coord: Point) -> bool {
        let node = self.node_at(coord);
        let max_climb_height = self.settings.max_climb_height;
        !self
            .neighbours(coord)
            .into_iter()
            .map(|p| self.node_at(p))
            .filter(|neighbour| neighbour.walkable)
            .any(|neighbour| {
                let height_diff = (neighbour.height() - node.height()).abs();
                let horizontal_dist = node.position.planar_distance(&neighbour.position);
                if horizontal_dist < NEAR_COINCIDENT_DISTANCE {
                    return false;
                }
                let slope = height_diff / horizontal_dist;
                height_diff > max_climb_height && slope > self.max_slope_tan
            })
    }

    fn update_climbability(&mut self, window: GridWindow) {
        for p in window.points() {
            let ix = self.get_ix_point(&p);
            if !self.nodes[ix].walkable {
                continue;
            }
            self.nodes[ix].climbable = self.evaluate_climbable(p);
        }
    }

    /// Re-samples the cells around `center` within `range` world units and recomputes their
    /// climbability. Nodes outside that window are left untouched, even if their own
    /// climbability depends on a node inside it.
    ///
    /// Call this whenever an obstacle appears or disappears. Returns the repaired window.
    pub fn update_grid_area<S: TerrainSampler + ?Sized>(
        &mut self,
        sampler: &S,
        center: Vec3,
        range: f64,
    ) -> GridWindow {
        let center_coord = self.coord_from_world_point(center);
        let range_in_nodes = (range / self.node_diameter).round_ties_even() as i32;
        let window = self.window_around(center_coord, range_in_nodes);
        if window.is_empty() {
            return window;
        }
        let clearance = self.settings.repair_clearance_radius();
        for p in window.points() {
            let ix = self.get_ix_point(&p);
            match self.cast_down(sampler, self.nodes[ix].position) {
                Some(hit) => {
                    let node = &mut self.nodes[ix];
                    node.position = hit;
                    node.walkable = !sampler.is_occupied(hit, clearance);
                }
                None => self.nodes[ix].walkable = false,
            }
        }
        self.update_climbability(window);
        debug!(
            "Repaired grid window {} to {} around {}",
            window.min, window.max, center
        );
        window
    }
}

impl fmt::Display for NavGrid {
    /// Renders the grid with north (+Z) up: `.` traversable, `^` walkable but not climbable,
    /// `#` unwalkable.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.size_y as i32).rev() {
            let row = (0..self.size_x as i32)
                .map(|x| {
                    let node = self.node_at(Point::new(x, y));
                    match (node.walkable, node.climbable) {
                        (false, _) => '#',
                        (true, false) => '^',
                        (true, true) => '.',
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
