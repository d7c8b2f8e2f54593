// scripts/simulate.rs
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gld_engine::report::{format_audit_block, ConsoleReporter, NullReporter, TracingReporter};
use gld_engine::{simulate, SimulationConfig, SimulationOutcome};
use serde::Serialize;
use std::io;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gld-sim")]
#[command(author, version, about = "Deterministic momentum-driven price simulation with risk audit")]
struct Args {
    /// Master seed for the noise stream
    #[arg(long, default_value_t = SimulationConfig::default().seed)]
    seed: u64,

    /// Number of simulation steps
    #[arg(long, default_value_t = SimulationConfig::default().step_count)]
    steps: usize,

    /// Starting price level
    #[arg(long, default_value_t = SimulationConfig::default().initial_price)]
    initial_price: f64,

    /// Integration step for momentum → price
    #[arg(long, default_value_t = SimulationConfig::default().time_step)]
    dt: f64,

    /// Momentum gain on the target gap
    #[arg(short, long, default_value_t = SimulationConfig::default().momentum_gain)]
    k: f64,

    /// Symmetric momentum clamp
    #[arg(long, default_value_t = SimulationConfig::default().momentum_bound)]
    momentum_bound: f64,

    /// Target oscillation baseline
    #[arg(long, default_value_t = SimulationConfig::default().target_baseline)]
    baseline: f64,

    /// Target oscillation amplitude
    #[arg(long, default_value_t = SimulationConfig::default().target_amplitude)]
    amplitude: f64,

    /// Target oscillation frequency (radians per step)
    #[arg(long, default_value_t = SimulationConfig::default().target_frequency)]
    frequency: f64,

    /// Amplitude of the uniform noise added to the target
    #[arg(long, default_value_t = SimulationConfig::default().noise_amplitude)]
    noise: f64,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Draw the trajectory as a sparkline (text format only)
    #[arg(long)]
    plot: bool,

    /// Width of the sparkline in cells
    #[arg(long, default_value = "72")]
    plot_width: usize,

    /// Suppress the progress table
    #[arg(short, long)]
    quiet: bool,

    /// Include every price in JSON output
    #[arg(long)]
    with_trajectory: bool,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

impl Args {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            seed: self.seed,
            step_count: self.steps,
            initial_price: self.initial_price,
            time_step: self.dt,
            momentum_gain: self.k,
            momentum_bound: self.momentum_bound,
            target_baseline: self.baseline,
            target_amplitude: self.amplitude,
            target_frequency: self.frequency,
            noise_amplitude: self.noise,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a SimulationConfig,
    final_price: f64,
    annualized_volatility: f64,
    max_drawdown: f64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trajectory: Option<&'a [f64]>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.config();
    let started = Instant::now();

    let outcome = match args.format {
        OutputFormat::Json => {
            let outcome = simulate(&config, &mut TracingReporter)?;
            print_json(&config, &outcome, args.with_trajectory)?;
            outcome
        }
        OutputFormat::Text if args.quiet => {
            let outcome = simulate(&config, &mut NullReporter)?;
            for line in format_audit_block(&outcome.report) {
                println!("{}", line);
            }
            outcome
        }
        OutputFormat::Text => {
            let mut console = ConsoleReporter::new(io::stdout().lock());
            if args.plot {
                console = console.with_chart(args.plot_width);
            }
            let outcome = simulate(&config, &mut console)?;
            console.finish().context("failed to write report to stdout")?;
            outcome
        }
    };

    info!(
        steps = outcome.trajectory.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "simulation finished"
    );
    Ok(())
}

fn print_json(config: &SimulationConfig, outcome: &SimulationOutcome, with_trajectory: bool) -> Result<()> {
    let report = JsonReport {
        config,
        final_price: outcome.report.final_price,
        annualized_volatility: outcome.report.annualized_volatility,
        max_drawdown: outcome.report.max_drawdown,
        status: "VERIFIED",
        trajectory: with_trajectory.then(|| outcome.trajectory.as_slice()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
