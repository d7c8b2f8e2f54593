// src/config.rs
use crate::error::{validation::*, SimResult};
use serde::Serialize;

/// Immutable parameters of a single simulation run
///
/// The target price oscillates around `target_baseline`:
/// ```text
/// target(i) = baseline + amplitude * sin(i * frequency) + noise_amplitude * u_i
/// ```
/// where `u_i ∈ [-1, 1]` is the step's random draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub seed: u64,
    pub step_count: usize,
    pub initial_price: f64,
    pub time_step: f64,
    pub momentum_gain: f64,
    pub momentum_bound: f64,
    pub target_baseline: f64,
    pub target_amplitude: f64,
    pub target_frequency: f64,
    pub noise_amplitude: f64,
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_steps(mut self, step_count: usize) -> Self {
        self.step_count = step_count;
        self
    }

    /// Validate the simulation configuration
    pub fn validate(&self) -> SimResult<()> {
        validate_steps(self.step_count)?;
        validate_finite_positive("initial_price", self.initial_price)?;
        validate_finite_positive("time_step", self.time_step)?;
        validate_finite_positive("momentum_bound", self.momentum_bound)?;
        validate_finite("momentum_gain", self.momentum_gain)?;
        validate_finite("target_baseline", self.target_baseline)?;
        validate_finite("target_amplitude", self.target_amplitude)?;
        validate_finite("target_frequency", self.target_frequency)?;
        validate_finite("noise_amplitude", self.noise_amplitude)?;
        Ok(())
    }

    /// Steps between two progress snapshots
    pub fn report_interval(&self) -> usize {
        (self.step_count / 10).max(1)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 888,
            step_count: 1000,
            initial_price: 100.0,
            time_step: 0.05,
            momentum_gain: 0.15,
            momentum_bound: 20.0,
            target_baseline: 100.0,
            target_amplitude: 15.0,
            target_frequency: 0.1,
            noise_amplitude: 10.0,
        }
    }
}
