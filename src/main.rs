use anyhow::Context;
use clap::Parser;
use hazard_locator::display::{format_beliefs, write_solution};
use hazard_locator::{parse_problem, HazardSolver, SolverConfig};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hazard-locator")]
#[command(about = "Finds the location most likely to be hazardous from noisy sensor readings")]
#[command(version)]
struct Args {
    /// Facility description to solve
    input: PathBuf,

    /// Print the solution and the belief table to stdout
    #[arg(long)]
    show: bool,

    /// Print the full resolution as JSON to stdout
    #[arg(long)]
    json: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the solution file is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Hazard probability of every location at step 0
    #[arg(long)]
    prior: Option<f64>,

    /// Query locations in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(prior) = args.prior {
        config.initial_hazard_probability = prior;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    config.parallel |= args.parallel;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let problem = parse_problem(&text).with_context(|| format!("failed to parse {}", args.input.display()))?;

    let output_dir = config.output_dir.clone();
    let solver = HazardSolver::new(config)?;
    let resolution = solver.solve(&problem).with_context(|| format!("failed to solve {}", args.input.display()))?;

    if args.show {
        println!("{}", resolution);
        print!("{}", format_beliefs(&resolution));
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    }

    let path = write_solution(&output_dir, &args.input, &resolution)
        .with_context(|| format!("failed to write solution into {}", output_dir.display()))?;
    info!(path = %path.display(), "solution written");
    Ok(())
}
