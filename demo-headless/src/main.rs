use bubble_sim_core::{Front, SimResult, Simulation, SimulationConfig, SorSweep};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Rising bubble simulation with front tracking
#[derive(Parser, Debug)]
#[command(name = "bubble-sim-demo")]
#[command(about = "Two-phase front-tracking bubble simulation", long_about = None)]
struct Args {
    /// JSON configuration file (defaults to the classic rising bubble)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of time steps (overrides the configuration)
    #[arg(short, long)]
    steps: Option<usize>,

    /// Time step (overrides the configuration)
    #[arg(long)]
    dt: Option<f64>,

    /// Grid cells per direction (overrides the configuration)
    #[arg(long)]
    cells: Option<usize>,

    /// SOR sweep order
    #[arg(long, value_enum)]
    sweep: Option<SweepArg>,

    /// Write a snapshot every N steps (overrides the configuration, 0 disables)
    #[arg(short = 'i', long)]
    output_interval: Option<usize>,

    /// Directory for snapshot files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Include pressure and density fields in the snapshots
    #[arg(long)]
    fields: bool,

    /// Abort when a pressure solve does not converge
    #[arg(long)]
    strict: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SweepArg {
    RedBlack,
    Lexicographic,
}

impl From<SweepArg> for SorSweep {
    fn from(arg: SweepArg) -> Self {
        match arg {
            SweepArg::RedBlack => SorSweep::RedBlack,
            SweepArg::Lexicographic => SorSweep::Lexicographic,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> SimResult<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(steps) = args.steps {
        config.time.steps = steps;
    }
    if let Some(dt) = args.dt {
        config.time.dt = dt;
    }
    if let Some(cells) = args.cells {
        config.domain.nx = cells;
        config.domain.ny = cells;
    }
    if let Some(sweep) = args.sweep {
        config.pressure.sweep = sweep.into();
    }
    if let Some(interval) = args.output_interval {
        config.time.output_interval = interval;
    }
    if args.strict {
        config.time.fail_on_nonconvergence = true;
    }
    config.validate()?;
    Ok(config)
}

/// Create the output directory and remove snapshots from earlier runs
fn prepare_output_dir(dir: &Path) -> SimResult<()> {
    fs::create_dir_all(dir)?;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_snapshot = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("bubble_") && name.ends_with(".json"));
        if is_snapshot {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn run(args: &Args) -> SimResult<()> {
    let config = load_config(args)?;
    if args.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    println!("=== Front-Tracking Bubble Simulation ===\n");
    println!(
        "Domain {:.2} x {:.2}, grid {}x{}, dt {:.2e}, {} steps",
        config.domain.lx,
        config.domain.ly,
        config.domain.nx,
        config.domain.ny,
        config.time.dt,
        config.time.steps
    );
    println!(
        "Liquid rho={:.3} mu={:.3}, gas rho={:.3} mu={:.3}, sigma={:.3}\n",
        config.fluid.liquid_density,
        config.fluid.gas_density,
        config.fluid.liquid_viscosity,
        config.fluid.gas_viscosity,
        config.fluid.surface_tension
    );

    let steps = config.time.steps;
    let interval = config.time.output_interval;
    if interval > 0 {
        prepare_output_dir(&args.output_dir)?;
    }

    let mut sim = Simulation::new(config)?;
    if interval > 0 {
        sim.snapshot(args.fields)
            .save(args.output_dir.join("bubble_000000.json"))?;
    }

    println!(" Step |   Time   | SOR iters | max |div u| | Markers | Centroid y");
    println!("------|----------|-----------|------------|---------|-----------");

    let summary = sim.run(steps, |sim, report| {
        let markers: usize = sim.fronts().iter().map(Front::len).sum();
        let centroid_y = sim
            .fronts()
            .first()
            .map_or(f64::NAN, |f| f.centroid().y);
        println!(
            "{:5} | {:8.5} | {:4}/{:<4} | {:10.3e} | {:7} | {:9.5}",
            report.step,
            report.time,
            report.predictor.iterations,
            report.corrector.iterations,
            report.max_divergence,
            markers,
            centroid_y
        );
        let path = args
            .output_dir
            .join(format!("bubble_{:06}.json", report.step));
        sim.snapshot(args.fields).save(path)
    })?;

    println!("\n=== Simulation Complete ===");
    println!("Final time: {:.5}", summary.time);
    println!("Steps: {}", summary.steps);
    println!(
        "Pressure solves not converged: {} (max {} iterations)",
        summary.nonconverged_solves, summary.max_pressure_iterations
    );
    for (id, front) in sim.fronts().iter().enumerate() {
        let c = front.centroid();
        println!(
            "Front {id}: {} markers, centroid ({:.5}, {:.5}), area {:.5e}",
            front.len(),
            c.x,
            c.y,
            front.area()
        );
    }
    Ok(())
}
