//! Marker transport with the interpolated grid velocity

use super::transfer::interpolate_velocity;
use super::Front;
use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use crate::grid::{Axis, Domain, StaggeredField};

impl Front {
    /// Velocity of every marker, interpolated from the face velocities
    ///
    /// # Errors
    ///
    /// Returns `InterfaceLeftDomain` if a marker is outside the domain.
    pub fn marker_velocities(
        &self,
        domain: &Domain,
        velocity: &StaggeredField,
    ) -> SimResult<Vec<Vec2>> {
        self.markers()
            .iter()
            .map(|m| {
                Ok(Vec2::new(
                    interpolate_velocity(domain, &velocity.u, m.x, m.y, Axis::X)?,
                    interpolate_velocity(domain, &velocity.v, m.x, m.y, Axis::Y)?,
                ))
            })
            .collect()
    }

    /// Explicit Euler step of every marker: `x ← x + dt·u(x)`
    ///
    /// All velocities are gathered before any marker moves.
    ///
    /// # Errors
    ///
    /// Returns `InterfaceLeftDomain` if a marker is outside the domain before the
    /// move, or lands outside it afterwards.
    pub fn advect(
        &mut self,
        domain: &Domain,
        velocity: &StaggeredField,
        dt: f64,
    ) -> SimResult<()> {
        let velocities = self.marker_velocities(domain, velocity)?;
        let moved: Vec<Vec2> = self
            .markers()
            .iter()
            .zip(&velocities)
            .map(|(m, u)| m + dt * u)
            .collect();

        if let Some(escaped) = moved.iter().find(|m| !domain.contains(m.x, m.y)) {
            return Err(SimError::InterfaceLeftDomain {
                x: escaped.x,
                y: escaped.y,
            });
        }

        self.set_markers(moved);
        Ok(())
    }
}
