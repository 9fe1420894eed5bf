//! Projection solver for the two-phase Navier-Stokes equations
//!
//! One projection is three stateless stages over the field structs:
//!
//! 1. [`compute_temporary_velocity`]: explicit predictor without pressure
//! 2. [`PressureSystem`] + [`solve_pressure`]: variable-density Poisson solve (SOR)
//! 3. [`correct_velocity`]: subtract the pressure gradient
//!
//! [`project`] runs all three in order; the integrator calls it once per sub-step.

pub mod correction;
pub mod momentum;
pub mod pressure;
pub mod profiler;

pub use correction::{correct_velocity, max_divergence};
pub use momentum::compute_temporary_velocity;
pub use pressure::{solve_pressure, PressureParams, PressureSolveReport, PressureSystem, SorSweep};
pub use profiler::ProfilerScope;

use crate::config::FluidProperties;
use crate::grid::{CellField, Domain, StaggeredField};

/// Predictor, pressure solve and corrector for one time step of size `dt`
///
/// Boundary conditions must already be applied to `velocity`. The pressure in
/// `cells` is used as the initial guess and holds the new pressure afterwards.
/// Non-convergence is returned in the report, not raised.
pub fn project(
    domain: &Domain,
    fluid: &FluidProperties,
    pressure_params: &PressureParams,
    dt: f64,
    cells: &mut CellField,
    velocity: &mut StaggeredField,
) -> PressureSolveReport {
    {
        let _scope = ProfilerScope::new("temporary_velocity");
        compute_temporary_velocity(domain, fluid, dt, cells, velocity);
    }

    let report = {
        let _scope = ProfilerScope::new("pressure");
        let system = PressureSystem::assemble(
            domain,
            &cells.density,
            velocity,
            dt,
            pressure_params.boundary_density,
        );
        solve_pressure(&system, &mut cells.pressure, pressure_params)
    };

    {
        let _scope = ProfilerScope::new("correct_velocity");
        correct_velocity(domain, dt, cells, velocity);
    }
    report
}
