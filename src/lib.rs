//! # gld-engine: Deterministic Momentum-Driven Price Simulation
//!
//! A small research/backtesting utility that grows a synthetic price path from
//! a seed and audits it for risk.
//!
//! ## Key Features
//!
//! - **Reproducible**: Same seed and configuration → bit-identical trajectory
//! - **Bounded dynamics**: Momentum is clamped to a symmetric bound every step
//! - **Risk audit**: Annualized volatility and maximum drawdown
//! - **Pluggable reporting**: Progress and results flow through a `Reporter`
//!
//! ## Quick Start
//!
//! ```rust
//! use gld_engine::{simulate, SimulationConfig};
//! use gld_engine::report::NullReporter;
//!
//! let config = SimulationConfig::default().with_steps(500);
//! let outcome = simulate(&config, &mut NullReporter).expect("Valid configuration");
//!
//! assert_eq!(outcome.trajectory.len(), 500);
//! assert!(outcome.report.max_drawdown <= 0.0);
//! ```
//!
//! ## Pipeline
//!
//! Generation runs to completion first; the audit then reads the finished
//! trajectory. Each run owns its random generator, so independent runs never
//! share state.

// Module declarations
pub mod audit;
pub mod config;
pub mod error;
pub mod generator;
pub mod report;
pub mod rng;

// Re-export commonly used types for convenience
pub use audit::{audit, AuditReport};
pub use config::SimulationConfig;
pub use error::{SimError, SimResult};
pub use generator::{generate, generate_with_reporter, ProgressSnapshot, SimulationState, Trajectory};

use rand::RngCore;
use report::Reporter;
use serde::Serialize;

/// Everything a successful run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub trajectory: Trajectory,
    pub report: AuditReport,
}

/// Run generation and audit with the canonical generator seeded from `config.seed`
pub fn simulate<P: Reporter + ?Sized>(
    config: &SimulationConfig,
    reporter: &mut P,
) -> SimResult<SimulationOutcome> {
    let mut rng = rng::seed_rng_from_u64(config.seed);
    simulate_with_rng(config, &mut rng, reporter)
}

/// Run generation and audit with a caller-owned generator
///
/// No partial output is returned: any failure discards the run.
pub fn simulate_with_rng<R, P>(
    config: &SimulationConfig,
    rng: &mut R,
    reporter: &mut P,
) -> SimResult<SimulationOutcome>
where
    R: RngCore + ?Sized,
    P: Reporter + ?Sized,
{
    let trajectory = generate_with_reporter(config, rng, reporter)?;
    reporter.on_trajectory(&trajectory);

    let report = audit(&trajectory)?;
    reporter.on_audit(&report);

    Ok(SimulationOutcome { trajectory, report })
}
