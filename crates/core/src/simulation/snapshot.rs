//! Serializable simulation output
//!
//! A [`Snapshot`] holds the front geometry at one instant plus, optionally, the
//! cell-centred pressure and density. Snapshots are written as JSON so they can be
//! post-processed by any plotting tool.

use super::Simulation;
use crate::core_types::Vec2;
use crate::error::SimResult;
use crate::grid::FieldData;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Geometry of one front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontSnapshot {
    /// Marker positions in traversal order
    pub markers: Vec<Vec2>,
    pub centroid: Vec2,
    pub area: f64,
    pub perimeter: f64,
}

/// State of a simulation at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed steps
    pub step: usize,
    /// Simulated time
    pub time: f64,
    pub fronts: Vec<FrontSnapshot>,
    /// Cell-centred pressure, ghosts included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<FieldData>,
    /// Cell-centred density, ghosts included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<FieldData>,
}

impl Snapshot {
    /// Copy the state of `simulation`; fields are included only when asked for
    #[must_use]
    pub fn capture(simulation: &Simulation, include_fields: bool) -> Self {
        let fronts = simulation
            .fronts()
            .iter()
            .map(|front| FrontSnapshot {
                markers: front.markers().to_vec(),
                centroid: front.centroid(),
                area: front.area(),
                perimeter: front.perimeter(),
            })
            .collect();

        let cells = simulation.cells();
        Self {
            step: simulation.step_count(),
            time: simulation.time(),
            fronts,
            pressure: include_fields.then(|| cells.pressure.clone()),
            density: include_fields.then(|| cells.density.clone()),
        }
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is not a snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the snapshot as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
