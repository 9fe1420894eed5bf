//! Lagrangian interface tracking
//!
//! A [`Front`] is one closed interface stored as an ordered cyclic sequence of
//! marker points. Neighbour access wraps modulo the marker count, so the first
//! and last markers are joined by a segment without any duplicated storage.
//!
//! Submodules add the coupling with the Eulerian grid:
//! - [`transfer`]: bilinear spreading and interpolation on the staggered layouts
//! - [`surface_tension`]: tangents and the curvature force
//! - [`advection`]: explicit marker transport
//! - [`restructure`]: marker insertion/deletion to keep spacing near the grid size

pub mod advection;
pub mod restructure;
pub mod surface_tension;
pub mod transfer;

pub use restructure::{RestructureParams, RestructureReport};
pub use transfer::{interpolate_velocity, spread_to_grid};

use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use std::f64::consts::PI;

/// Minimum number of markers for a closed polyline
pub const MIN_MARKERS: usize = 3;

/// One closed interface as a cyclic polyline of markers
#[derive(Debug, Clone, PartialEq)]
pub struct Front {
    markers: Vec<Vec2>,
    markers_old: Vec<Vec2>,
}

impl Front {
    /// Create a front from marker positions in traversal order
    ///
    /// # Errors
    ///
    /// Returns `FrontCollapsed` if fewer than three markers are given.
    pub fn from_markers(markers: Vec<Vec2>) -> SimResult<Self> {
        if markers.len() < MIN_MARKERS {
            return Err(SimError::FrontCollapsed {
                markers: markers.len(),
            });
        }
        let markers_old = markers.clone();
        Ok(Self {
            markers,
            markers_old,
        })
    }

    /// Circular front with `points` markers evenly spaced by angle
    ///
    /// Marker `k` sits at `(xc − r·sin(2πk/N), yc + r·cos(2πk/N))`: the first marker
    /// is at the top and the traversal is counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a non-positive radius or fewer than three points.
    pub fn circle(center: Vec2, radius: f64, points: usize) -> SimResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::invalid_config(
                "radius",
                format!("must be finite and positive, got {radius}"),
            ));
        }
        if points < MIN_MARKERS {
            return Err(SimError::invalid_config(
                "points",
                format!("must be at least {MIN_MARKERS}, got {points}"),
            ));
        }

        let markers = (0..points)
            .map(|k| {
                let theta = 2.0 * PI * k as f64 / points as f64;
                Vec2::new(
                    center.x - radius * theta.sin(),
                    center.y + radius * theta.cos(),
                )
            })
            .collect();
        Self::from_markers(markers)
    }

    /// Number of markers
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// A valid front is never empty; provided for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker positions in traversal order
    #[must_use]
    pub fn markers(&self) -> &[Vec2] {
        &self.markers
    }

    /// Marker `i`, wrapping modulo the marker count
    #[inline]
    #[must_use]
    pub fn marker(&self, i: usize) -> Vec2 {
        self.markers[i % self.markers.len()]
    }

    /// Index of the marker after `i`
    #[inline]
    #[must_use]
    pub fn next(&self, i: usize) -> usize {
        (i + 1) % self.markers.len()
    }

    /// Index of the marker before `i`
    #[inline]
    #[must_use]
    pub fn prev(&self, i: usize) -> usize {
        (i + self.markers.len() - 1) % self.markers.len()
    }

    /// Segment from marker `i` to its successor
    #[inline]
    #[must_use]
    pub fn segment(&self, i: usize) -> (Vec2, Vec2) {
        (self.markers[i], self.markers[self.next(i)])
    }

    /// Deep-copy the marker positions for the second-order average
    pub fn store_old(&mut self) {
        self.markers_old.clone_from(&self.markers);
    }

    /// Return the markers to the stored copy
    pub fn restore_old(&mut self) {
        self.markers.clone_from(&self.markers_old);
    }

    /// Second-order average of marker positions with the stored copy
    ///
    /// Restructuring runs after the average, so both sequences have the same length.
    pub fn average_with_old(&mut self) {
        debug_assert_eq!(self.markers.len(), self.markers_old.len());
        for (cur, old) in self.markers.iter_mut().zip(&self.markers_old) {
            *cur = 0.5 * (*cur + old);
        }
    }

    /// Signed enclosed area (positive for counter-clockwise traversal)
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        0.5 * (0..self.len())
            .map(|i| {
                let (a, b) = self.segment(i);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
    }

    /// Enclosed area
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Total polyline length
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        (0..self.len())
            .map(|i| {
                let (a, b) = self.segment(i);
                (b - a).norm()
            })
            .sum()
    }

    /// Area centroid of the enclosed polygon
    ///
    /// Falls back to the marker mean when the polygon has no area.
    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        let signed_area = self.signed_area();
        if signed_area.abs() <= f64::EPSILON {
            let sum: Vec2 = self.markers.iter().sum();
            return sum / self.len() as f64;
        }

        let mut c = Vec2::zeros();
        for i in 0..self.len() {
            let (a, b) = self.segment(i);
            let cross = a.x * b.y - b.x * a.y;
            c += (a + b) * cross;
        }
        c / (6.0 * signed_area)
    }

    /// Replace the markers after restructuring
    pub(crate) fn set_markers(&mut self, markers: Vec<Vec2>) {
        self.markers = markers;
    }
}
