//! Face-centred velocity state
//!
//! Each velocity component lives on its own face layout (see [`Domain`]). Besides
//! the current velocity the struct owns the snapshot used by the second-order
//! scheme (`*_old`) and the pressure-free prediction (`*_temp`).

use super::domain::{Axis, Domain};
use super::field::FieldData;
use rayon::prelude::*;

/// Staggered velocity arrays with their old and temporary copies
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredField {
    /// x-velocity on vertical faces, `(nx+1) × (ny+2)`
    pub u: FieldData,
    /// y-velocity on horizontal faces, `(nx+2) × (ny+1)`
    pub v: FieldData,
    /// Snapshot of `u` taken at the start of a time step
    pub u_old: FieldData,
    /// Snapshot of `v` taken at the start of a time step
    pub v_old: FieldData,
    /// Predicted x-velocity before the pressure correction
    pub u_temp: FieldData,
    /// Predicted y-velocity before the pressure correction
    pub v_temp: FieldData,
}

impl StaggeredField {
    /// Allocate a quiescent velocity field for `domain`
    #[must_use]
    pub fn new(domain: &Domain) -> Self {
        let (uw, uh) = domain.face_shape(Axis::X);
        let (vw, vh) = domain.face_shape(Axis::Y);
        Self {
            u: FieldData::new(uw, uh),
            v: FieldData::new(vw, vh),
            u_old: FieldData::new(uw, uh),
            v_old: FieldData::new(vw, vh),
            u_temp: FieldData::new(uw, uh),
            v_temp: FieldData::new(vw, vh),
        }
    }

    /// Current velocity component for `axis`
    #[must_use]
    pub fn component(&self, axis: Axis) -> &FieldData {
        match axis {
            Axis::X => &self.u,
            Axis::Y => &self.v,
        }
    }

    /// Deep-copy the current velocity into the old snapshot
    pub fn store_old(&mut self) {
        self.u_old.copy_from(&self.u);
        self.v_old.copy_from(&self.v);
    }

    /// Discard the current velocity and return to the old snapshot
    pub fn restore_old(&mut self) {
        self.u.copy_from(&self.u_old);
        self.v.copy_from(&self.v_old);
    }

    /// Second-order average: `u = ½(u + u_old)`
    pub fn average_with_old(&mut self) {
        for (cur, old) in self.u.data.iter_mut().zip(&self.u_old.data) {
            *cur = 0.5 * (*cur + old);
        }
        for (cur, old) in self.v.data.iter_mut().zip(&self.v_old.data) {
            *cur = 0.5 * (*cur + old);
        }
    }

    /// Largest face speed of either component
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.u
            .as_slice()
            .par_iter()
            .chain(self.v.as_slice().par_iter())
            .map(|&value| value.abs())
            .reduce(|| 0.0, f64::max)
    }
}
