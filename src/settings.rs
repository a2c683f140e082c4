use crate::error::GridError;
use crate::math::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest sphere used for the occupancy check while building the grid.
pub const MIN_BUILD_CLEARANCE: f64 = 0.1;
/// Amount the occupancy sphere is shrunk by during the initial build, so geometry of
/// adjacent cells touching the border does not mark a cell as blocked.
pub const BUILD_CLEARANCE_SHRINK: f64 = 0.25;
/// Upper bound on the node count of a grid. Coordinates are `i32`, so no axis may exceed it.
pub const MAX_NODE_COUNT: usize = i32::MAX as usize;

/// Immutable configuration of a [NavGrid](crate::NavGrid).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSettings {
    /// World position of the grid centre. Only `x` and `z` are used.
    pub center: Vec3,
    /// Extent of the grid along world X.
    pub world_size_x: f64,
    /// Extent of the grid along world Z.
    pub world_size_y: f64,
    pub node_radius: f64,
    /// Height the downward terrain ray starts from. Must lie above the highest terrain;
    /// the ray travels twice this distance.
    pub ray_start_height: f64,
    /// Largest step that can be hopped regardless of slope.
    pub max_climb_height: f64,
    /// Steepest walkable slope, in degrees.
    pub max_slope_angle: f64,
}

impl Default for GridSettings {
    fn default() -> GridSettings {
        GridSettings {
            center: Vec3::ZERO,
            world_size_x: 10.0,
            world_size_y: 10.0,
            node_radius: 0.5,
            ray_start_height: 50.0,
            max_climb_height: 0.5,
            max_slope_angle: 45.0,
        }
    }
}

impl GridSettings {
    pub fn new(world_size_x: f64, world_size_y: f64, node_radius: f64) -> GridSettings {
        GridSettings {
            world_size_x,
            world_size_y,
            node_radius,
            ..GridSettings::default()
        }
    }
    pub fn with_center(mut self, center: Vec3) -> GridSettings {
        self.center = center;
        self
    }
    pub fn with_ray_start_height(mut self, height: f64) -> GridSettings {
        self.ray_start_height = height;
        self
    }
    pub fn with_max_climb_height(mut self, height: f64) -> GridSettings {
        self.max_climb_height = height;
        self
    }
    pub fn with_max_slope_angle(mut self, degrees: f64) -> GridSettings {
        self.max_slope_angle = degrees;
        self
    }

    pub fn node_diameter(&self) -> f64 {
        self.node_radius * 2.0
    }

    /// Number of nodes along X and Z.
    pub fn grid_size(&self) -> (usize, usize) {
        let d = self.node_diameter();
        (
            (self.world_size_x / d).round_ties_even() as usize,
            (self.world_size_y / d).round_ties_even() as usize,
        )
    }

    pub fn max_slope_tan(&self) -> f64 {
        self.max_slope_angle.to_radians().tan()
    }

    /// Occupancy sphere radius used when the grid is first built.
    pub fn build_clearance_radius(&self) -> f64 {
        (self.node_radius - BUILD_CLEARANCE_SHRINK).max(MIN_BUILD_CLEARANCE)
    }

    /// Occupancy sphere radius used when a region is repaired.
    // Differs from the build radius; both are kept until it is confirmed which one is wanted.
    pub fn repair_clearance_radius(&self) -> f64 {
        self.node_radius
    }

    /// Checks the settings describe a non-empty, well-formed grid.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.node_radius.is_finite() && self.node_radius > 0.0) {
            return Err(GridError::InvalidNodeRadius(self.node_radius));
        }
        let sizes_ok = [self.world_size_x, self.world_size_y]
            .iter()
            .all(|s| s.is_finite() && *s > 0.0);
        if !sizes_ok {
            return Err(GridError::InvalidWorldSize {
                x: self.world_size_x,
                y: self.world_size_y,
            });
        }
        let (size_x, size_y) = self.grid_size();
        if size_x == 0 || size_y == 0 {
            return Err(GridError::EmptyGrid {
                x: self.world_size_x,
                y: self.world_size_y,
                diameter: self.node_diameter(),
            });
        }
        let too_large = size_x > MAX_NODE_COUNT
            || size_y > MAX_NODE_COUNT
            || size_x.checked_mul(size_y).map_or(true, |count| count > MAX_NODE_COUNT);
        if too_large {
            return Err(GridError::GridTooLarge {
                x: size_x,
                y: size_y,
            });
        }
        if !(self.ray_start_height.is_finite() && self.ray_start_height > 0.0) {
            return Err(GridError::InvalidRayStartHeight(self.ray_start_height));
        }
        if !(self.max_climb_height >= 0.0) {
            return Err(GridError::InvalidClimbHeight(self.max_climb_height));
        }
        if !(0.0..90.0).contains(&self.max_slope_angle) {
            return Err(GridError::InvalidSlopeAngle(self.max_slope_angle));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_rounds_half_to_even() {
        let settings = GridSettings::new(10.0, 2.5, 0.5);
        assert_eq!(settings.grid_size(), (10, 2));
        let settings = GridSettings::new(3.5, 4.4, 0.5);
        assert_eq!(settings.grid_size(), (4, 4));
    }

    #[test]
    fn clearance_radii() {
        let settings = GridSettings::new(10.0, 10.0, 0.5);
        assert_eq!(settings.build_clearance_radius(), 0.25);
        assert_eq!(settings.repair_clearance_radius(), 0.5);
        let small = GridSettings::new(10.0, 10.0, 0.2);
        assert_eq!(small.build_clearance_radius(), MIN_BUILD_CLEARANCE);
    }

    #[test]
    fn rejects_degenerate_settings() {
        assert_eq!(
            GridSettings::new(10.0, 10.0, 0.0).validate(),
            Err(GridError::InvalidNodeRadius(0.0))
        );
        assert!(matches!(
            GridSettings::new(-1.0, 10.0, 0.5).validate(),
            Err(GridError::InvalidWorldSize { .. })
        ));
        assert!(matches!(
            GridSettings::new(0.4, 10.0, 0.5).validate(),
            Err(GridError::EmptyGrid { .. })
        ));
        assert_eq!(
            GridSettings::new(1e12, 1e12, 0.5).validate(),
            Err(GridError::GridTooLarge {
                x: 1_000_000_000_000,
                y: 1_000_000_000_000,
            })
        );
        assert!(matches!(
            GridSettings::new(1e5, 1e5, 0.5).validate(),
            Err(GridError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GridSettings::new(1e10, 1.0, 0.5).validate(),
            Err(GridError::GridTooLarge { .. })
        ));
        assert_eq!(
            GridSettings::default().with_max_slope_angle(90.0).validate(),
            Err(GridError::InvalidSlopeAngle(90.0))
        );
        assert!(GridSettings::default().validate().is_ok());
    }
}
