//! Cell-centred scalar state: pressure, material properties and forces

use super::domain::{Axis, Domain};
use super::field::FieldData;

/// Cell-centred arrays, `(nx+2) × (ny+2)` including one ghost layer
///
/// `force_x(i, j)` is co-located with `u(i, j)` and `force_y(i, j)` with `v(i, j)`,
/// so the momentum predictor can read a face force with the face's own index.
#[derive(Debug, Clone, PartialEq)]
pub struct CellField {
    /// Pressure; persists across steps as the SOR initial guess
    pub pressure: FieldData,
    /// Density, rebuilt from the front geometry every sub-step
    pub density: FieldData,
    /// Dynamic viscosity, rebuilt alongside density
    pub viscosity: FieldData,
    /// Spread surface-tension force density, x component
    pub force_x: FieldData,
    /// Spread surface-tension force density, y component
    pub force_y: FieldData,
}

impl CellField {
    /// Allocate cell arrays with uniform density and viscosity
    #[must_use]
    pub fn new(domain: &Domain, density: f64, viscosity: f64) -> Self {
        let (w, h) = domain.cell_shape();
        Self {
            pressure: FieldData::new(w, h),
            density: FieldData::with_value(w, h, density),
            viscosity: FieldData::with_value(w, h, viscosity),
            force_x: FieldData::new(w, h),
            force_y: FieldData::new(w, h),
        }
    }

    /// Zero the force accumulators before a new spreading pass
    pub fn reset_forces(&mut self) {
        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
    }

    /// Force accumulator for the velocity component `axis`
    pub fn force_mut(&mut self, axis: Axis) -> &mut FieldData {
        match axis {
            Axis::X => &mut self.force_x,
            Axis::Y => &mut self.force_y,
        }
    }

    /// Force accumulator for the velocity component `axis`
    #[must_use]
    pub fn force(&self, axis: Axis) -> &FieldData {
        match axis {
            Axis::X => &self.force_x,
            Axis::Y => &self.force_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec2;

    #[test]
    fn test_cell_field_creation() {
        let domain = Domain::new(1.0, 1.0, 8, 4, Vec2::zeros()).unwrap();
        let cells = CellField::new(&domain, 2.0, 0.01);
        assert_eq!((cells.pressure.width, cells.pressure.height), (10, 6));
        assert!(cells.density.data.iter().all(|&r| r == 2.0));
        assert!(cells.viscosity.data.iter().all(|&m| m == 0.01));
    }

    #[test]
    fn test_reset_forces() {
        let domain = Domain::new(1.0, 1.0, 4, 4, Vec2::zeros()).unwrap();
        let mut cells = CellField::new(&domain, 1.0, 1.0);
        cells.force_mut(Axis::X).set(2, 2, 5.0);
        cells.force_mut(Axis::Y).set(1, 3, -1.0);
        cells.reset_forces();
        assert_eq!(cells.force(Axis::X).max_abs(), 0.0);
        assert_eq!(cells.force(Axis::Y).max_abs(), 0.0);
    }
}
