//! Wall boundary conditions for the staggered velocity
//!
//! The momentum predictor reads one ghost layer around the interior faces. A
//! [`BoundaryCondition`] fills that layer before every predictor evaluation.

use super::domain::Domain;
use super::staggered::StaggeredField;
use serde::{Deserialize, Serialize};

/// Fills ghost-layer velocities before the momentum predictor runs
pub trait BoundaryCondition: Send + Sync {
    /// Populate the ghost faces of `field.u` and `field.v`
    fn apply(&self, domain: &Domain, field: &mut StaggeredField);
}

/// No-slip box: every wall has a prescribed tangential velocity
///
/// Normal velocity on the walls is zero (those faces are never updated by the
/// solver). The tangential ghost value mirrors the adjacent interior value so the
/// average on the wall equals the wall velocity:
///
/// ```text
/// u_ghost = 2·u_wall − u_interior
/// ```
///
/// All-zero wall velocities give a closed box; a non-zero `north` gives a driven lid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoSlipWalls {
    /// Tangential (x) velocity of the bottom wall
    pub south: f64,
    /// Tangential (x) velocity of the top wall
    pub north: f64,
    /// Tangential (y) velocity of the left wall
    pub west: f64,
    /// Tangential (y) velocity of the right wall
    pub east: f64,
}

impl BoundaryCondition for NoSlipWalls {
    fn apply(&self, domain: &Domain, field: &mut StaggeredField) {
        let (nx, ny) = (domain.nx, domain.ny);

        for i in 0..field.u.width {
            field.u[(i, 0)] = 2.0 * self.south - field.u[(i, 1)];
            field.u[(i, ny + 1)] = 2.0 * self.north - field.u[(i, ny)];
        }
        for j in 0..field.v.height {
            field.v[(0, j)] = 2.0 * self.west - field.v[(1, j)];
            field.v[(nx + 1, j)] = 2.0 * self.east - field.v[(nx, j)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mirrored_ghost_values() {
        let domain = Domain::new(1.0, 1.0, 4, 4, Vec2::zeros()).unwrap();
        let mut field = StaggeredField::new(&domain);
        field.u.fill(1.0);
        field.v.fill(-2.0);

        let walls = NoSlipWalls {
            north: 3.0,
            ..Default::default()
        };
        walls.apply(&domain, &mut field);

        for i in 0..field.u.width {
            // Wall average equals the wall velocity
            assert_abs_diff_eq!(0.5 * (field.u[(i, 0)] + field.u[(i, 1)]), 0.0);
            assert_abs_diff_eq!(0.5 * (field.u[(i, 5)] + field.u[(i, 4)]), 3.0);
        }
        for j in 0..field.v.height {
            assert_abs_diff_eq!(field.v[(0, j)], 2.0);
            assert_abs_diff_eq!(field.v[(5, j)], 2.0);
        }
    }

    #[test]
    fn test_interior_untouched() {
        let domain = Domain::new(1.0, 1.0, 4, 4, Vec2::zeros()).unwrap();
        let mut field = StaggeredField::new(&domain);
        field.u[(2, 2)] = 0.7;
        field.v[(2, 2)] = -0.3;
        NoSlipWalls::default().apply(&domain, &mut field);
        assert_eq!(field.u[(2, 2)], 0.7);
        assert_eq!(field.v[(2, 2)], -0.3);
    }
}
