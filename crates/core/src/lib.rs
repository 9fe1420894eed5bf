//! Front-Tracking Bubble Simulation Core Library
//!
//! Two-dimensional incompressible two-phase flow (a gas bubble rising through
//! liquid) with a front-tracking method. An Eulerian staggered grid carries the
//! variable-density Navier-Stokes equations; Lagrangian marker polylines track the
//! gas-liquid interface, carry surface tension and move with the interpolated flow.
//!
//! ## Structure
//!
//! - [`grid`]: domain geometry, staggered fields, wall boundary conditions
//! - [`front`]: marker fronts, spreading/interpolation, surface tension, restructuring
//! - [`solver`]: projection method (predictor, SOR pressure solve, corrector)
//! - [`properties`]: density and viscosity from the front geometry
//! - [`simulation`]: the second-order time integrator and snapshot output
//! - [`config`]: serde configuration with the classic rising-bubble defaults

// Core types and utilities
pub mod core_types;
pub mod error;

// Eulerian and Lagrangian meshes
pub mod front;
pub mod grid;

// Physics
pub mod properties;
pub mod solver;

// Time integration and configuration
pub mod config;
pub mod simulation;

pub use config::{
    BubbleConfig, DomainConfig, FluidProperties, SimulationConfig, TimeParams,
};
pub use core_types::Vec2;
pub use error::{SimError, SimResult};
pub use front::{Front, RestructureParams, RestructureReport};
pub use grid::{
    Axis, BoundaryCondition, CellField, Domain, FieldData, NoSlipWalls, StaggeredField,
};
pub use properties::{PropertyModel, PropertyParams, SmoothedIndicator};
pub use simulation::{FrontId, RunSummary, Simulation, Snapshot, StepReport};
pub use solver::{PressureParams, PressureSolveReport, SorSweep};
