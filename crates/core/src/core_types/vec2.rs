//! Vector type alias for 2D positions and directions.

use nalgebra::Vector2;

/// 2D vector type for marker positions, tangents and forces.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`, used throughout
/// the simulation for Lagrangian marker coordinates and per-marker vectors.
pub type Vec2 = Vector2<f64>;
