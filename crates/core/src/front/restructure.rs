//! Front restructuring
//!
//! Keeps marker spacing close to the grid size. A single greedy pass walks the
//! markers in traversal order and compares each one with the last marker already
//! accepted (initially the last marker of the old front, which closes the loop):
//!
//! - spacing above `max_spacing` cells: insert the midpoint, then the marker
//! - spacing in `[min_spacing, max_spacing]`: keep the marker
//! - spacing below `min_spacing`: drop the marker
//!
//! Spacing is measured in local cell units, `√((Δx/dx)² + (Δy/dy)²)`. The pass is
//! order-dependent and does not remesh globally.

use super::{Front, MIN_MARKERS};
use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use crate::grid::Domain;
use serde::{Deserialize, Serialize};

/// Spacing thresholds for restructuring, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestructureParams {
    /// Segments longer than this get a midpoint inserted
    pub max_spacing: f64,
    /// Markers closer than this to their predecessor are removed
    pub min_spacing: f64,
}

impl Default for RestructureParams {
    fn default() -> Self {
        Self {
            max_spacing: 0.5,
            min_spacing: 0.25,
        }
    }
}

impl RestructureParams {
    /// Check that the thresholds are positive and ordered
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `0 < min_spacing ≤ max_spacing` does not hold.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.min_spacing > 0.0 && self.min_spacing <= self.max_spacing) {
            return Err(SimError::invalid_config(
                "restructure",
                format!(
                    "need 0 < min_spacing <= max_spacing, got {} and {}",
                    self.min_spacing, self.max_spacing
                ),
            ));
        }
        Ok(())
    }
}

/// Marker bookkeeping of one restructuring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestructureReport {
    /// Marker count before the pass
    pub before: usize,
    /// Marker count after the pass
    pub after: usize,
    /// Midpoints inserted
    pub inserted: usize,
    /// Markers dropped
    pub removed: usize,
}

impl RestructureReport {
    /// Whether the pass changed the front at all
    #[must_use]
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.removed > 0
    }
}

impl Front {
    /// Insert and delete markers to keep spacing within the thresholds
    ///
    /// # Errors
    ///
    /// Returns `FrontCollapsed` if fewer than three markers would remain; the front
    /// is left unchanged in that case.
    pub fn restructure(
        &mut self,
        domain: &Domain,
        params: &RestructureParams,
    ) -> SimResult<RestructureReport> {
        let old = self.markers();
        let mut resampled: Vec<Vec2> = Vec::with_capacity(2 * old.len());
        let mut inserted = 0;
        let mut removed = 0;

        let closing = old[old.len() - 1];
        for &marker in old {
            let last = resampled.last().copied().unwrap_or(closing);
            let spacing = (((marker.x - last.x) / domain.dx).powi(2)
                + ((marker.y - last.y) / domain.dy).powi(2))
            .sqrt();

            if spacing > params.max_spacing {
                resampled.push(0.5 * (marker + last));
                resampled.push(marker);
                inserted += 1;
            } else if spacing >= params.min_spacing {
                resampled.push(marker);
            } else {
                removed += 1;
            }
        }

        if resampled.len() < MIN_MARKERS {
            return Err(SimError::FrontCollapsed {
                markers: resampled.len(),
            });
        }

        let report = RestructureReport {
            before: old.len(),
            after: resampled.len(),
            inserted,
            removed,
        };
        self.set_markers(resampled);
        Ok(report)
    }
}
