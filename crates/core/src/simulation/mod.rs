//! Two-phase front-tracking simulation
//!
//! `Simulation` owns the grid state and the fronts and advances them with a
//! second-order predictor-corrector (Heun) scheme:
//!
//! 1. Store velocities and marker positions
//! 2. Two identical sub-steps, each: surface tension → boundary conditions →
//!    projection → front advection → property update
//! 3. Average velocities and markers with the stored copies
//! 4. Rebuild properties from the averaged fronts
//! 5. Restructure every front
//!
//! A step that returns an error is rolled back: velocities, markers and material
//! properties are restored to their values at the start of the step and the clock
//! does not advance. The pressure keeps its last iterate as the next warm start.

pub mod snapshot;

pub use snapshot::{FrontSnapshot, Snapshot};

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::front::{Front, RestructureReport};
use crate::grid::{BoundaryCondition, CellField, Domain, StaggeredField};
use crate::properties::{PropertyModel, SmoothedIndicator};
use crate::solver::{max_divergence, project, PressureSolveReport, ProfilerScope};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Handle of a front owned by a [`Simulation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrontId(pub usize);

/// Diagnostics of one completed time step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Number of completed steps, this one included
    pub step: usize,
    /// Simulated time after the step
    pub time: f64,
    /// Pressure solve of the predictor sub-step
    pub predictor: PressureSolveReport,
    /// Pressure solve of the corrector sub-step
    pub corrector: PressureSolveReport,
    /// Restructuring outcome per front
    pub restructure: Vec<RestructureReport>,
    /// Largest discrete divergence of the averaged velocity
    pub max_divergence: f64,
    /// Largest face speed of the averaged velocity
    pub max_speed: f64,
}

impl StepReport {
    /// Whether both pressure solves met the tolerance
    #[must_use]
    pub fn converged(&self) -> bool {
        self.predictor.converged && self.corrector.converged
    }
}

/// Totals over a [`Simulation::run`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    /// Steps taken
    pub steps: usize,
    /// Simulated time at the end of the run
    pub time: f64,
    /// Pressure solves that hit the iteration cap
    pub nonconverged_solves: usize,
    /// Largest SOR iteration count of any solve
    pub max_pressure_iterations: usize,
}

/// Front-tracking two-phase flow in a rectangular box
pub struct Simulation {
    config: SimulationConfig,
    domain: Domain,
    velocity: StaggeredField,
    cells: CellField,
    fronts: Vec<Front>,
    boundary: Box<dyn BoundaryCondition>,
    properties: Box<dyn PropertyModel>,
    step: usize,
    time: f64,
}

impl Simulation {
    /// Create a simulation with the configured walls and smoothed properties
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        let boundary = Box::new(config.walls);
        let properties = Box::new(SmoothedIndicator::new(config.properties));
        Self::with_models(config, boundary, properties)
    }

    /// Create a simulation with custom boundary and property models
    ///
    /// # Arguments
    ///
    /// * `config` - Validated run configuration; `walls` and `properties` are ignored
    /// * `boundary` - Fills the velocity ghost layer before each projection
    /// * `properties` - Rebuilds density and viscosity from the fronts
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn with_models(
        config: SimulationConfig,
        boundary: Box<dyn BoundaryCondition>,
        properties: Box<dyn PropertyModel>,
    ) -> SimResult<Self> {
        config.validate()?;
        let domain = config.domain.build()?;
        info!("Creating front-tracking simulation");

        let velocity = StaggeredField::new(&domain);
        let cells = CellField::new(
            &domain,
            config.fluid.liquid_density,
            config.fluid.liquid_viscosity,
        );

        let mut simulation = Self {
            config,
            domain,
            velocity,
            cells,
            fronts: Vec::new(),
            boundary,
            properties,
            step: 0,
            time: 0.0,
        };

        let bubbles = simulation.config.bubbles.clone();
        for bubble in &bubbles {
            simulation.add_front(bubble.build()?)?;
        }

        info!(
            "Simulation initialized: {}x{} grid, dx={:.4}, dy={:.4}, {} front(s), dt={:.2e}",
            simulation.domain.nx,
            simulation.domain.ny,
            simulation.domain.dx,
            simulation.domain.dy,
            simulation.fronts.len(),
            simulation.config.time.dt
        );
        Ok(simulation)
    }

    /// Add a front and rebuild the material properties
    ///
    /// # Errors
    ///
    /// Returns `InterfaceLeftDomain` if a marker lies outside the domain.
    pub fn add_front(&mut self, front: Front) -> SimResult<FrontId> {
        if let Some(m) = front
            .markers()
            .iter()
            .find(|m| !self.domain.contains(m.x, m.y))
        {
            return Err(SimError::InterfaceLeftDomain { x: m.x, y: m.y });
        }

        let id = FrontId(self.fronts.len());
        info!(
            "Adding front {}: {} markers, area {:.4e}",
            id.0,
            front.len(),
            front.area()
        );
        self.fronts.push(front);
        self.update_properties();
        Ok(id)
    }

    /// Advance one full predictor-corrector step
    ///
    /// On error the step is rolled back, so a recoverable error (see
    /// [`SimError::is_recoverable`]) can be followed by another call to `step`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage: degenerate or collapsed fronts, a
    /// marker leaving the domain, or pressure non-convergence when
    /// `fail_on_nonconvergence` is set.
    pub fn step(&mut self) -> SimResult<StepReport> {
        let _scope = ProfilerScope::new("step");
        let dt = self.config.time.dt;

        self.velocity.store_old();
        for front in &mut self.fronts {
            front.store_old();
        }

        let (predictor, corrector, restructure) = match self.advance() {
            Ok(stages) => stages,
            Err(e) => {
                self.roll_back();
                warn!("Step {} rolled back: {e}", self.step + 1);
                return Err(e);
            }
        };

        self.step += 1;
        self.time += dt;

        let report = StepReport {
            step: self.step,
            time: self.time,
            predictor,
            corrector,
            restructure,
            max_divergence: max_divergence(&self.domain, &self.velocity),
            max_speed: self.velocity.max_speed(),
        };
        debug!(
            "Step {}: t={:.5}, SOR iterations {}/{}, max |div u|={:.3e}, max |u|={:.3e}, markers={:?}",
            report.step,
            report.time,
            report.predictor.iterations,
            report.corrector.iterations,
            report.max_divergence,
            report.max_speed,
            self.fronts.iter().map(Front::len).collect::<Vec<_>>()
        );
        Ok(report)
    }

    /// Both sub-steps, the average and restructuring, from the stored state
    fn advance(
        &mut self,
    ) -> SimResult<(PressureSolveReport, PressureSolveReport, Vec<RestructureReport>)> {
        let predictor = self.sub_step()?;
        let corrector = self.sub_step()?;

        self.velocity.average_with_old();
        for front in &mut self.fronts {
            front.average_with_old();
        }
        self.update_properties();

        let restructure = self.restructure_fronts()?;
        Ok((predictor, corrector, restructure))
    }

    /// Return velocities, markers and properties to the start of the step
    fn roll_back(&mut self) {
        self.velocity.restore_old();
        for front in &mut self.fronts {
            front.restore_old();
        }
        self.update_properties();
    }

    /// Advance `steps` steps, calling `observer` every `output_interval` steps
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from [`Simulation::step`] or the observer.
    pub fn run<F>(&mut self, steps: usize, mut observer: F) -> SimResult<RunSummary>
    where
        F: FnMut(&Simulation, &StepReport) -> SimResult<()>,
    {
        info!(
            "Starting run: {} steps from t={:.5} (step {})",
            steps, self.time, self.step
        );
        let interval = self.config.time.output_interval;
        let mut summary = RunSummary {
            steps: 0,
            time: self.time,
            nonconverged_solves: 0,
            max_pressure_iterations: 0,
        };

        for _ in 0..steps {
            let report = self.step()?;
            summary.steps += 1;
            summary.time = report.time;
            for solve in [&report.predictor, &report.corrector] {
                if !solve.converged {
                    summary.nonconverged_solves += 1;
                }
                summary.max_pressure_iterations =
                    summary.max_pressure_iterations.max(solve.iterations);
            }
            if report.step.checked_rem(interval) == Some(0) {
                observer(self, &report)?;
            }
        }

        info!(
            "Run finished: {} steps, t={:.5}, {} non-converged pressure solve(s)",
            summary.steps, summary.time, summary.nonconverged_solves
        );
        Ok(summary)
    }

    fn sub_step(&mut self) -> SimResult<PressureSolveReport> {
        let dt = self.config.time.dt;
        let sigma = self.config.fluid.surface_tension;

        {
            let _scope = ProfilerScope::new("surface_tension");
            self.cells.reset_forces();
            for (id, front) in self.fronts.iter().enumerate() {
                front
                    .spread_surface_tension(&self.domain, sigma, &mut self.cells)
                    .inspect_err(|e| warn!("Surface tension failed on front {id}: {e}"))?;
            }
        }

        self.boundary.apply(&self.domain, &mut self.velocity);
        let report = project(
            &self.domain,
            &self.config.fluid,
            &self.config.pressure,
            dt,
            &mut self.cells,
            &mut self.velocity,
        );
        if self.config.time.fail_on_nonconvergence {
            report.into_result()?;
        } else if !report.converged {
            warn!(
                "Pressure solve did not converge at step {}: {} iterations, max change {:.3e} (tolerance {:.3e})",
                self.step + 1,
                report.iterations,
                report.max_change,
                report.tolerance
            );
        }

        {
            let _scope = ProfilerScope::new("advect");
            for (id, front) in self.fronts.iter_mut().enumerate() {
                front
                    .advect(&self.domain, &self.velocity, dt)
                    .inspect_err(|e| warn!("Advection failed on front {id}: {e}"))?;
            }
        }
        self.update_properties();
        Ok(report)
    }

    fn restructure_fronts(&mut self) -> SimResult<Vec<RestructureReport>> {
        let _scope = ProfilerScope::new("restructure");
        let params = self.config.restructure;
        let mut reports = Vec::with_capacity(self.fronts.len());
        for (id, front) in self.fronts.iter_mut().enumerate() {
            let report = front
                .restructure(&self.domain, &params)
                .inspect_err(|e| warn!("Restructuring failed on front {id}: {e}"))?;
            if report.after.abs_diff(report.before) * 4 > report.before {
                warn!(
                    "Front {} resampled from {} to {} markers ({} inserted, {} removed)",
                    id, report.before, report.after, report.inserted, report.removed
                );
            }
            reports.push(report);
        }
        Ok(reports)
    }

    fn update_properties(&mut self) {
        let _scope = ProfilerScope::new("properties");
        self.properties.update(
            &self.domain,
            &self.config.fluid,
            &self.fronts,
            &mut self.cells,
        );
    }

    /// Capture the current state for output
    #[must_use]
    pub fn snapshot(&self, include_fields: bool) -> Snapshot {
        Snapshot::capture(self, include_fields)
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Face velocities
    #[must_use]
    pub fn velocity(&self) -> &StaggeredField {
        &self.velocity
    }

    /// Pressure, properties and forces
    #[must_use]
    pub fn cells(&self) -> &CellField {
        &self.cells
    }

    #[must_use]
    pub fn fronts(&self) -> &[Front] {
        &self.fronts
    }

    #[must_use]
    pub fn front(&self, id: FrontId) -> Option<&Front> {
        self.fronts.get(id.0)
    }

    #[must_use]
    pub fn front_count(&self) -> usize {
        self.fronts.len()
    }

    /// Simulated time
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Completed steps
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.step
    }
}
