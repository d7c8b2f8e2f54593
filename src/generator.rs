// src/generator.rs
//! Momentum-Driven Trajectory Generator
//!
//! # Mathematical Framework
//!
//! Price is pulled toward an oscillating, noisy target through a bounded
//! momentum term. For each step `i = 1..=N`:
//! ```text
//! u_i      ~ U[-1, 1]
//! target_i = B + A sin(i f) + σ u_i
//! m_i      = clamp(m_{i-1} + (target_i - P_{i-1}) k Δt, -M, M)
//! P_i      = P_{i-1} + m_i Δt
//! ```
//!
//! Where:
//! - B, A, f: target baseline, amplitude and angular frequency
//! - σ: noise amplitude
//! - k: momentum gain
//! - M: momentum bound
//!
//! # Determinism
//!
//! Exactly one draw is taken per step, in step order. The update order above
//! is fixed; reordering it, or taking an extra draw, shifts every later price.

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::report::{NullReporter, Reporter};
use crate::rng;
use rand::RngCore;
use serde::Serialize;
use tracing::{debug, warn};

/// Mutable generator state, created fresh for every run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub price: f64,
    pub momentum: f64,
    /// 1-based index of the last completed step (0 before the first step)
    pub step_index: usize,
}

impl SimulationState {
    pub fn new(cfg: &SimulationConfig) -> Self {
        SimulationState {
            price: cfg.initial_price,
            momentum: 0.0,
            step_index: 0,
        }
    }

    /// Oscillating target for `step` given the step's draw `u`
    pub fn target(cfg: &SimulationConfig, step: usize, u: f64) -> f64 {
        cfg.target_baseline
            + (step as f64 * cfg.target_frequency).sin() * cfg.target_amplitude
            + u * cfg.noise_amplitude
    }

    /// Advance one step using the draw `u`
    ///
    /// Returns `true` when the momentum clamp engaged on this step.
    pub fn advance(&mut self, cfg: &SimulationConfig, u: f64) -> bool {
        self.step_index += 1;
        let target = Self::target(cfg, self.step_index, u);

        let unclamped =
            self.momentum + (target - self.price) * cfg.momentum_gain * cfg.time_step;
        self.momentum = unclamped.clamp(-cfg.momentum_bound, cfg.momentum_bound);
        self.price += self.momentum * cfg.time_step;

        self.momentum != unclamped
    }
}

/// Ordered price path, one entry per completed step
///
/// Index 0 holds the price after step 1; the initial price is not recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    prices: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(capacity: usize) -> Self {
        Trajectory {
            prices: Vec::with_capacity(capacity),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.prices.iter()
    }

    pub fn final_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

impl From<Vec<f64>> for Trajectory {
    fn from(prices: Vec<f64>) -> Self {
        Trajectory { prices }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.iter()
    }
}

/// Progress snapshot emitted every `report_interval()` steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub step: usize,
    pub percent_complete: f64,
    pub price: f64,
    /// Price rounded half-to-even, as displayed
    pub rounded_price: i64,
    pub abs_momentum: f64,
}

impl ProgressSnapshot {
    fn capture(state: &SimulationState, step_count: usize) -> Self {
        ProgressSnapshot {
            step: state.step_index,
            percent_complete: state.step_index as f64 / step_count as f64 * 100.0,
            price: state.price,
            rounded_price: state.price.round_ties_even() as i64,
            abs_momentum: state.momentum.abs(),
        }
    }
}

/// Generate a trajectory without progress reporting
///
/// # Errors
///
/// Returns `SimError::InvalidConfig` before any step runs when the
/// configuration is rejected by [`SimulationConfig::validate`].
pub fn generate<R: RngCore + ?Sized>(cfg: &SimulationConfig, rng: &mut R) -> SimResult<Trajectory> {
    generate_with_reporter(cfg, rng, &mut NullReporter)
}

/// Generate a trajectory, emitting progress snapshots to `reporter`
///
/// The reporter only observes; it cannot influence the produced prices.
///
/// # Errors
///
/// - `SimError::InvalidConfig` before any step runs
/// - `SimError::NonFinitePrice` as soon as a step overflows to an infinite
///   or NaN price; the index is the trajectory slot it would have filled
pub fn generate_with_reporter<R, P>(
    cfg: &SimulationConfig,
    rng: &mut R,
    reporter: &mut P,
) -> SimResult<Trajectory>
where
    R: RngCore + ?Sized,
    P: Reporter + ?Sized,
{
    cfg.validate()?;
    debug!(
        seed = cfg.seed,
        steps = cfg.step_count,
        initial_price = cfg.initial_price,
        "starting trajectory generation"
    );
    reporter.on_start(cfg);

    let interval = cfg.report_interval();
    let mut state = SimulationState::new(cfg);
    let mut trajectory = Trajectory::with_capacity(cfg.step_count);
    let mut clamped_steps = 0usize;

    for _ in 0..cfg.step_count {
        let u = rng::symmetric_draw(rng);
        if state.advance(cfg, u) {
            clamped_steps += 1;
        }
        if !state.price.is_finite() {
            warn!(
                step = state.step_index,
                price = state.price,
                "price diverged, aborting generation"
            );
            return Err(SimError::NonFinitePrice {
                index: state.step_index - 1,
                value: state.price,
            });
        }
        trajectory.prices.push(state.price);

        if state.step_index % interval == 0 {
            reporter.on_progress(&ProgressSnapshot::capture(&state, cfg.step_count));
        }
    }

    if clamped_steps > 0 {
        warn!(
            clamped_steps,
            bound = cfg.momentum_bound,
            "momentum clamp engaged during generation"
        );
    }
    debug!(
        points = trajectory.len(),
        final_price = state.price,
        final_momentum = state.momentum,
        "trajectory generation complete"
    );

    Ok(trajectory)
}

/// Generate with the canonical generator seeded from `cfg.seed`
pub fn generate_seeded(cfg: &SimulationConfig) -> SimResult<Trajectory> {
    let mut rng = rng::seed_rng_from_u64(cfg.seed);
    generate(cfg, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_state_update_order() {
        let cfg = SimulationConfig {
            target_amplitude: 0.0,
            noise_amplitude: 0.0,
            target_baseline: 110.0,
            ..Default::default()
        };
        let mut state = SimulationState::new(&cfg);
        let clamped = state.advance(&cfg, 0.0);

        // m = 0 + (110 - 100) * 0.15 * 0.05, then P = 100 + m * 0.05
        let expected_momentum = 10.0 * 0.15 * 0.05;
        assert!(!clamped);
        assert_eq!(state.step_index, 1);
        assert_eq!(state.momentum, expected_momentum);
        assert_eq!(state.price, 100.0 + expected_momentum * 0.05);
    }

    #[test]
    fn test_momentum_clamp_engages() {
        let cfg = SimulationConfig {
            momentum_bound: 0.01,
            target_baseline: 1_000.0,
            ..Default::default()
        };
        let mut state = SimulationState::new(&cfg);
        assert!(state.advance(&cfg, 0.0));
        assert_eq!(state.momentum, 0.01);
        assert_eq!(state.price, 100.0 + 0.01 * 0.05);
    }

    #[test]
    fn test_generate_length_and_determinism() {
        let cfg = SimulationConfig::default().with_steps(250);
        let a = generate_seeded(&cfg).expect("Valid configuration");
        let b = generate_seeded(&cfg).expect("Valid configuration");

        assert_eq!(a.len(), 250);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_accepts_any_rng() {
        let cfg = SimulationConfig::default().with_steps(100);
        let a = generate(&cfg, &mut StdRng::seed_from_u64(3)).expect("Valid configuration");
        let b = generate(&cfg, &mut StdRng::seed_from_u64(3)).expect("Valid configuration");
        let c = generate(&cfg, &mut StdRng::seed_from_u64(4)).expect("Valid configuration");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_config_runs_no_steps() {
        let cfg = SimulationConfig::default().with_steps(0);
        let mut reporter = RecordingReporter::new();
        let result = generate_with_reporter(&cfg, &mut rng::seed_rng_from_u64(1), &mut reporter);

        assert!(matches!(result, Err(SimError::InvalidConfig { .. })));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_reporting_does_not_change_trajectory() {
        let cfg = SimulationConfig::default().with_steps(300);
        let mut reporter = RecordingReporter::new();
        let reported =
            generate_with_reporter(&cfg, &mut rng::seed_rng_from_u64(cfg.seed), &mut reporter)
                .expect("Valid configuration");
        let silent = generate_seeded(&cfg).expect("Valid configuration");

        assert_eq!(reported, silent);

        let snapshots = reporter.snapshots();
        assert_eq!(snapshots.len(), 10);
        assert_eq!(snapshots[0].step, 30);
        assert_eq!(snapshots[9].percent_complete, 100.0);
        assert_eq!(snapshots[9].price, silent.as_slice()[299]);
    }

    #[test]
    fn test_overflowing_step_is_an_error() {
        // Finite constants whose product overflows on the first step
        let cfg = SimulationConfig {
            time_step: 1e308,
            target_baseline: 1e6,
            ..SimulationConfig::default().with_steps(20)
        };
        let mut reporter = RecordingReporter::new();
        let result = generate_with_reporter(&cfg, &mut rng::seed_rng_from_u64(cfg.seed), &mut reporter);

        assert_eq!(
            result,
            Err(SimError::NonFinitePrice {
                index: 0,
                value: f64::INFINITY
            })
        );
        assert!(reporter.snapshots().is_empty());
    }

    #[test]
    fn test_short_run_reports_every_step() {
        let cfg = SimulationConfig::default().with_steps(4);
        let mut reporter = RecordingReporter::new();
        generate_with_reporter(&cfg, &mut rng::seed_rng_from_u64(cfg.seed), &mut reporter)
            .expect("Valid configuration");

        let steps: Vec<usize> = reporter.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
    }
}
