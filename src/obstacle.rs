use crate::math::Vec3;
use crate::nav_grid::NavGrid;
use crate::sampler::TerrainSampler;
use log::debug;

/// Range repaired around an obstacle when none is given.
pub const DEFAULT_UPDATE_RANGE: f64 = 1.0;

/// Receives obstacle lifecycle events. The obstacle's geometry must already be present in
/// (or removed from) the sampler when the event is delivered.
pub trait ObstacleListener {
    fn on_obstacle_activated(&mut self, sampler: &dyn TerrainSampler, center: Vec3, range: f64);
    fn on_obstacle_deactivated(&mut self, sampler: &dyn TerrainSampler, center: Vec3, range: f64);
}

impl ObstacleListener for NavGrid {
    fn on_obstacle_activated(&mut self, sampler: &dyn TerrainSampler, center: Vec3, range: f64) {
        debug!("Obstacle activated at {}", center);
        self.update_grid_area(sampler, center, range);
    }
    fn on_obstacle_deactivated(&mut self, sampler: &dyn TerrainSampler, center: Vec3, range: f64) {
        debug!("Obstacle deactivated at {}", center);
        self.update_grid_area(sampler, center, range);
    }
}

/// An obstacle that can be switched on and off, notifying a listener on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicObstacle {
    position: Vec3,
    update_range: f64,
    active: bool,
}

impl DynamicObstacle {
    /// A new, inactive obstacle.
    pub fn new(position: Vec3) -> DynamicObstacle {
        DynamicObstacle {
            position,
            update_range: DEFAULT_UPDATE_RANGE,
            active: false,
        }
    }
    /// Range around the obstacle repaired on every change, typically its footprint.
    pub fn with_update_range(mut self, update_range: f64) -> DynamicObstacle {
        self.update_range = update_range;
        self
    }
    pub fn position(&self) -> Vec3 {
        self.position
    }
    pub fn update_range(&self) -> f64 {
        self.update_range
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates the obstacle. Returns false, without notifying, if it already was active.
    pub fn enable<L: ObstacleListener + ?Sized>(
        &mut self,
        listener: &mut L,
        sampler: &dyn TerrainSampler,
    ) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        listener.on_obstacle_activated(sampler, self.position, self.update_range);
        true
    }

    /// Deactivates the obstacle. Returns false, without notifying, if it already was inactive.
    pub fn disable<L: ObstacleListener + ?Sized>(
        &mut self,
        listener: &mut L,
        sampler: &dyn TerrainSampler,
    ) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        listener.on_obstacle_deactivated(sampler, self.position, self.update_range);
        true
    }
}
