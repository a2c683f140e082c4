use crate::math::Vec3;
use grid_util::point::Point;

/// One cell of a [NavGrid](crate::NavGrid).
///
/// Nodes are owned by the grid and only rewritten by it while building or repairing.
/// Search costs are kept per search in [Search](crate::Search), not on the node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    coord: Point,
    pub(crate) position: Vec3,
    pub(crate) walkable: bool,
    pub(crate) climbable: bool,
}

impl Node {
    pub(crate) fn new(coord: Point, position: Vec3, walkable: bool) -> Node {
        Node {
            coord,
            position,
            walkable,
            climbable: true,
        }
    }
    pub fn coord(&self) -> Point {
        self.coord
    }
    /// Terrain-sampled world position.
    pub fn position(&self) -> Vec3 {
        self.position
    }
    pub fn height(&self) -> f64 {
        self.position.y
    }
    /// Terrain exists here and is not blocked by obstacle geometry.
    pub fn walkable(&self) -> bool {
        self.walkable
    }
    /// No walkable neighbour lies behind a step that is both too tall and too steep.
    pub fn climbable(&self) -> bool {
        self.climbable
    }
    /// Whether a search may step onto this node.
    pub fn traversable(&self) -> bool {
        self.walkable && self.climbable
    }
}
