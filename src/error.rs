use thiserror::Error;

/// Reasons a [NavGrid](crate::NavGrid) cannot be built from a set of
/// [GridSettings](crate::GridSettings).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("node radius must be positive and finite, got {0}")]
    InvalidNodeRadius(f64),
    #[error("world size must be positive and finite, got {x} x {y}")]
    InvalidWorldSize { x: f64, y: f64 },
    #[error("world size {x} x {y} holds no nodes of diameter {diameter}")]
    EmptyGrid { x: f64, y: f64, diameter: f64 },
    #[error("grid of {x} x {y} nodes is too large")]
    GridTooLarge { x: usize, y: usize },
    #[error("ray start height must be positive and finite, got {0}")]
    InvalidRayStartHeight(f64),
    #[error("max climb height must be non-negative, got {0}")]
    InvalidClimbHeight(f64),
    #[error("max slope angle must lie in [0, 90) degrees, got {0}")]
    InvalidSlopeAngle(f64),
}
