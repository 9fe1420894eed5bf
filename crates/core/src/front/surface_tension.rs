//! Surface tension on the front
//!
//! The force on marker `i` is the difference of the unit tangents of the two
//! segments meeting there, scaled by the surface tension coefficient:
//!
//! ```text
//! f_i = σ · (t_i − t_{i−1}),   t_i = (x_{i+1} − x_i) / |x_{i+1} − x_i|
//! ```
//!
//! This equals `σ κ n` integrated over the marker's share of arclength, so it
//! points towards the centre of curvature. On a closed front the sum telescopes to
//! zero: surface tension injects no net momentum.

use super::transfer::spread_to_grid;
use super::Front;
use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use crate::grid::{Axis, CellField, Domain};

impl Front {
    /// Unit tangent of every segment `i → i+1`, including the closing segment
    ///
    /// # Errors
    ///
    /// Returns `DegenerateFront` if two consecutive markers coincide.
    pub fn tangents(&self) -> SimResult<Vec<Vec2>> {
        (0..self.len())
            .map(|i| {
                let (a, b) = self.segment(i);
                let delta = b - a;
                let length = delta.norm();
                if length > 0.0 && length.is_finite() {
                    Ok(delta / length)
                } else {
                    Err(SimError::DegenerateFront { marker: i })
                }
            })
            .collect()
    }

    /// Surface tension force on every marker
    ///
    /// # Errors
    ///
    /// Returns `DegenerateFront` if two consecutive markers coincide.
    pub fn surface_tension_forces(&self, sigma: f64) -> SimResult<Vec<Vec2>> {
        let tangents = self.tangents()?;
        Ok((0..self.len())
            .map(|i| sigma * (tangents[i] - tangents[self.prev(i)]))
            .collect())
    }

    /// Compute surface tension and spread it onto the Eulerian force arrays
    ///
    /// The x component goes to `cells.force_x` on the u layout and the y component
    /// to `cells.force_y` on the v layout. Values are accumulated, so several
    /// fronts can contribute to the same arrays.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateFront` for a zero-length segment and
    /// `InterfaceLeftDomain` if a marker is outside the domain.
    pub fn spread_surface_tension(
        &self,
        domain: &Domain,
        sigma: f64,
        cells: &mut CellField,
    ) -> SimResult<()> {
        let forces = self.surface_tension_forces(sigma)?;
        for (marker, force) in self.markers().iter().zip(&forces) {
            spread_to_grid(
                domain,
                &mut cells.force_x,
                marker.x,
                marker.y,
                force.x,
                Axis::X,
            )?;
            spread_to_grid(
                domain,
                &mut cells.force_y,
                marker.x,
                marker.y,
                force.y,
                Axis::Y,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tangents_are_unit() {
        let front = Front::circle(Vec2::new(0.5, 0.5), 0.2, 32).unwrap();
        for t in front.tangents().unwrap() {
            assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_square_tangents() {
        let front = Front::from_markers(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ])
        .unwrap();
        let t = front.tangents().unwrap();
        assert_eq!(t[0], Vec2::new(1.0, 0.0));
        assert_eq!(t[1], Vec2::new(0.0, 1.0));
        assert_eq!(t[2], Vec2::new(-1.0, 0.0));
        // Closing segment
        assert_eq!(t[3], Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_degenerate_segment() {
        let front = Front::from_markers(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ])
        .unwrap();
        assert!(matches!(
            front.tangents(),
            Err(SimError::DegenerateFront { marker: 1 })
        ));
    }

    #[test]
    fn test_forces_point_inward_and_cancel() {
        let center = Vec2::new(0.5, 0.5);
        let front = Front::circle(center, 0.2, 64).unwrap();
        let forces = front.surface_tension_forces(10.0).unwrap();

        let total: Vec2 = forces.iter().sum();
        assert_abs_diff_eq!(total.norm(), 0.0, epsilon = 1e-12);

        for (marker, force) in front.markers().iter().zip(&forces) {
            assert!(force.dot(&(center - marker)) > 0.0);
        }

        // Magnitude ≈ σ · κ · Δs = σ · (1/r) · (2πr/N)
        let expected = 10.0 * 2.0 * std::f64::consts::PI / 64.0;
        assert_abs_diff_eq!(forces[0].norm(), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_spread_has_no_net_force() {
        let domain = Domain::new(1.0, 1.0, 32, 32, Vec2::zeros()).unwrap();
        let mut cells = CellField::new(&domain, 1.0, 1.0);
        let front = Front::circle(Vec2::new(0.5, 0.5), 0.15, 100).unwrap();
        front.spread_surface_tension(&domain, 10.0, &mut cells).unwrap();

        let area = domain.cell_area();
        assert!(cells.force_x.max_abs() > 0.0);
        assert_abs_diff_eq!(cells.force_x.sum() * area, 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(cells.force_y.sum() * area, 0.0, epsilon = 1e-10);
    }
}
