//! The terrain and occupancy queries the grid is built from.
//!
//! A host engine implements [TerrainSampler] on top of its physics queries.
//! [SyntheticTerrain] is an in-process implementation over a height function and a set of
//! box obstacles, used for tests, benchmarks and demos.
use crate::math::Vec3;

/// Result of a downward terrain ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainHit {
    pub point: Vec3,
}

impl TerrainHit {
    pub fn height(&self) -> f64 {
        self.point.y
    }
}

/// Synchronous terrain and occupancy queries. Both must be deterministic for a static scene.
pub trait TerrainSampler {
    /// Casts a ray straight down from `origin` for at most `max_distance` and returns where
    /// it hits the terrain surface.
    fn sample_terrain(&self, origin: Vec3, max_distance: f64) -> Option<TerrainHit>;
    /// Whether a sphere around `point` intersects blocking geometry.
    fn is_occupied(&self, point: Vec3, radius: f64) -> bool;
}

/// Axis-aligned box of blocking geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Aabb {
        Aabb { min, max }
    }
    /// Box centred on `center` with the given half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Aabb {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }
    pub fn intersects_sphere(&self, center: Vec3, radius: f64) -> bool {
        let dx = center.x - center.x.clamp(self.min.x, self.max.x);
        let dy = center.y - center.y.clamp(self.min.y, self.max.y);
        let dz = center.z - center.z.clamp(self.min.z, self.max.z);
        dx * dx + dy * dy + dz * dz <= radius * radius
    }
}

/// Handle to an obstacle placed in a [SyntheticTerrain].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObstacleId(usize);

type HeightFn = dyn Fn(f64, f64) -> Option<f64> + Send + Sync;

/// Heightfield given by a function of world `(x, z)`, returning `None` where there is no
/// terrain, plus removable box obstacles.
pub struct SyntheticTerrain {
    height: Box<HeightFn>,
    obstacles: Vec<Option<Aabb>>,
}

impl SyntheticTerrain {
    pub fn from_fn<F>(height: F) -> SyntheticTerrain
    where
        F: Fn(f64, f64) -> Option<f64> + Send + Sync + 'static,
    {
        SyntheticTerrain {
            height: Box::new(height),
            obstacles: Vec::new(),
        }
    }

    /// Infinite plane at the given height.
    pub fn flat(height: f64) -> SyntheticTerrain {
        SyntheticTerrain::from_fn(move |_, _| Some(height))
    }

    pub fn height_at(&self, x: f64, z: f64) -> Option<f64> {
        (self.height)(x, z)
    }

    pub fn add_obstacle(&mut self, obstacle: Aabb) -> ObstacleId {
        self.obstacles.push(Some(obstacle));
        ObstacleId(self.obstacles.len() - 1)
    }

    /// Removes an obstacle, returning it if it was still present.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Aabb> {
        self.obstacles.get_mut(id.0).and_then(Option::take)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Aabb> {
        self.obstacles.iter().flatten()
    }
}

impl TerrainSampler for SyntheticTerrain {
    fn sample_terrain(&self, origin: Vec3, max_distance: f64) -> Option<TerrainHit> {
        let height = self.height_at(origin.x, origin.z)?;
        if height <= origin.y && origin.y - height <= max_distance {
            Some(TerrainHit {
                point: Vec3::new(origin.x, height, origin.z),
            })
        } else {
            None
        }
    }

    fn is_occupied(&self, point: Vec3, radius: f64) -> bool {
        self.obstacles()
            .any(|obstacle| obstacle.intersects_sphere(point, radius))
    }
}
