//! Run configuration
//!
//! Everything a run needs is collected in [`SimulationConfig`]: domain extents and
//! resolution, the two fluids, time stepping, pressure solver and restructuring
//! parameters, wall velocities and the initial bubbles. All sections implement
//! `Default` with the classic rising-bubble case and deserialize with
//! `#[serde(default)]`, so a JSON file only needs the values it changes.

use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use crate::front::{Front, RestructureParams};
use crate::grid::{Domain, NoSlipWalls};
use crate::properties::PropertyParams;
use crate::solver::PressureParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Domain extents, resolution and gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Extent along x
    pub lx: f64,
    /// Extent along y
    pub ly: f64,
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// Gravitational acceleration, x component
    pub gravity_x: f64,
    /// Gravitational acceleration, y component
    pub gravity_y: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            lx: 1.0,
            ly: 1.0,
            nx: 32,
            ny: 32,
            gravity_x: 0.0,
            gravity_y: -100.0,
        }
    }
}

impl DomainConfig {
    /// Build the validated [`Domain`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-positive extents or too few cells.
    pub fn build(&self) -> SimResult<Domain> {
        Domain::new(
            self.lx,
            self.ly,
            self.nx,
            self.ny,
            Vec2::new(self.gravity_x, self.gravity_y),
        )
    }
}

/// Material properties of the two phases
///
/// The liquid is the continuous phase filling the box; the gas fills the bubbles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidProperties {
    /// Density of the continuous (liquid) phase
    pub liquid_density: f64,
    /// Density inside the fronts (gas)
    pub gas_density: f64,
    /// Dynamic viscosity of the liquid
    pub liquid_viscosity: f64,
    /// Dynamic viscosity of the gas
    pub gas_viscosity: f64,
    /// Surface tension coefficient σ
    pub surface_tension: f64,
    /// Density subtracted in the buoyancy term; hydrostatic pressure of this
    /// density is removed from the solve
    pub reference_density: f64,
}

impl Default for FluidProperties {
    fn default() -> Self {
        Self {
            liquid_density: 2.0,
            gas_density: 1.0,
            liquid_viscosity: 0.01,
            gas_viscosity: 0.05,
            surface_tension: 10.0,
            reference_density: 2.0,
        }
    }
}

impl FluidProperties {
    /// Check that densities and viscosities are positive and σ is non-negative
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending property.
    pub fn validate(&self) -> SimResult<()> {
        for (name, value) in [
            ("liquid_density", self.liquid_density),
            ("gas_density", self.gas_density),
            ("reference_density", self.reference_density),
            ("liquid_viscosity", self.liquid_viscosity),
            ("gas_viscosity", self.gas_viscosity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::invalid_config(
                    name,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        if !(self.surface_tension.is_finite() && self.surface_tension >= 0.0) {
            return Err(SimError::invalid_config(
                "surface_tension",
                format!("must be finite and non-negative, got {}", self.surface_tension),
            ));
        }
        Ok(())
    }
}

/// Time stepping and output cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeParams {
    /// Time step
    pub dt: f64,
    /// Number of steps for a full run
    pub steps: usize,
    /// Snapshot every this many steps (0 disables snapshots)
    pub output_interval: usize,
    /// Abort the run when a pressure solve runs out of iterations
    pub fail_on_nonconvergence: bool,
}

impl Default for TimeParams {
    fn default() -> Self {
        Self {
            dt: 0.00125,
            steps: 250,
            output_interval: 25,
            fail_on_nonconvergence: false,
        }
    }
}

/// Initial circular bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    /// Centre, x
    pub center_x: f64,
    /// Centre, y
    pub center_y: f64,
    /// Radius
    pub radius: f64,
    /// Number of markers
    pub points: usize,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            center_y: 0.7,
            radius: 0.15,
            points: 100,
        }
    }
}

impl BubbleConfig {
    /// Build the initial front
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bad radius or marker count.
    pub fn build(&self) -> SimResult<Front> {
        Front::circle(
            Vec2::new(self.center_x, self.center_y),
            self.radius,
            self.points,
        )
    }
}

/// Complete configuration of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub domain: DomainConfig,
    pub fluid: FluidProperties,
    pub time: TimeParams,
    pub pressure: PressureParams,
    pub restructure: RestructureParams,
    pub properties: PropertyParams,
    pub walls: NoSlipWalls,
    pub bubbles: Vec<BubbleConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            fluid: FluidProperties::default(),
            time: TimeParams::default(),
            pressure: PressureParams::default(),
            restructure: RestructureParams::default(),
            properties: PropertyParams::default(),
            walls: NoSlipWalls::default(),
            bubbles: vec![BubbleConfig::default()],
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the text is not valid configuration JSON.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn to_json_string(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidConfig` found.
    pub fn validate(&self) -> SimResult<()> {
        let domain = self.domain.build()?;
        self.fluid.validate()?;

        if !(self.time.dt.is_finite() && self.time.dt > 0.0) {
            return Err(SimError::invalid_config(
                "dt",
                format!("must be finite and positive, got {}", self.time.dt),
            ));
        }
        self.pressure.validate()?;
        self.restructure.validate()?;
        self.properties.validate()?;

        for bubble in &self.bubbles {
            bubble.build()?;
            let inside = bubble.center_x - bubble.radius > 0.0
                && bubble.center_x + bubble.radius < domain.lx
                && bubble.center_y - bubble.radius > 0.0
                && bubble.center_y + bubble.radius < domain.ly;
            if !inside {
                return Err(SimError::invalid_config(
                    "bubbles",
                    format!(
                        "bubble at ({}, {}) with radius {} does not fit in the domain",
                        bubble.center_x, bubble.center_y, bubble.radius
                    ),
                ));
            }
        }
        Ok(())
    }
}
