// src/audit.rs
//! Risk Audit of a Finished Trajectory
//!
//! # Metrics
//!
//! Simple per-step returns over the recorded path:
//! ```text
//! r_i = P_i / P_{i-1} - 1,    i = 1..n-1
//! ```
//!
//! Annualized volatility uses the zero-mean (uncentered) second moment:
//! ```text
//! σ_ann = sqrt( Σ r_i² / (n-1) ) * sqrt(252)
//! ```
//!
//! Maximum drawdown is the worst relative decline from a running peak:
//! ```text
//! peak_i = max(peak_{i-1}, P_i),   peak_0 = P_0
//! MDD    = min(0, min_i (P_i - peak_i) / peak_i)
//! ```
//!
//! The audit is a pure function of the trajectory: it takes no configuration
//! and draws no randomness.

use crate::error::{SimError, SimResult};
use crate::generator::Trajectory;
use serde::Serialize;
use tracing::debug;

/// Trading days used to annualize per-step volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Risk metrics derived from a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuditReport {
    pub annualized_volatility: f64,
    /// Non-positive; exactly 0 when the path never falls below a prior peak
    pub max_drawdown: f64,
    pub final_price: f64,
}

/// Audit a trajectory
///
/// # Errors
///
/// - `SimError::NonFinitePrice` when any price is NaN or infinite
/// - `SimError::InsufficientData` when fewer than two prices are recorded
/// - `SimError::DivisionDegenerate` when a return denominator or a running
///   peak is not positive
pub fn audit(trajectory: &Trajectory) -> SimResult<AuditReport> {
    let prices = trajectory.as_slice();
    ensure_finite(prices)?;
    let returns = simple_returns(prices)?;
    let annualized_volatility = annualized_volatility(&returns);
    let max_drawdown = max_drawdown(prices)?;
    let final_price = prices[prices.len() - 1];

    debug!(
        annualized_volatility,
        max_drawdown, final_price, "trajectory audit complete"
    );

    Ok(AuditReport {
        annualized_volatility,
        max_drawdown,
        final_price,
    })
}

/// Reject NaN and infinite prices with their index
pub fn ensure_finite(prices: &[f64]) -> SimResult<()> {
    match prices.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(SimError::NonFinitePrice {
            index,
            value: prices[index],
        }),
        None => Ok(()),
    }
}

/// Simple returns `P_i / P_{i-1} - 1` over consecutive prices
pub fn simple_returns(prices: &[f64]) -> SimResult<Vec<f64>> {
    if prices.len() < 2 {
        return Err(SimError::InsufficientData { len: prices.len() });
    }

    prices
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            if !(pair[0] > 0.0) {
                Err(SimError::DivisionDegenerate {
                    index: i,
                    value: pair[0],
                })
            } else {
                Ok(pair[1] / pair[0] - 1.0)
            }
        })
        .collect()
}

/// Annualized volatility from the uncentered second moment of `returns`
///
/// Returns 0 for an empty slice.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let second_moment = returns.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64;
    second_moment.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Maximum drawdown against the running peak, seeded at 0
pub fn max_drawdown(prices: &[f64]) -> SimResult<f64> {
    let Some(&first) = prices.first() else {
        return Err(SimError::InsufficientData { len: 0 });
    };

    let mut peak = first;
    let mut worst = 0.0_f64;
    for (i, &price) in prices.iter().enumerate() {
        if !price.is_finite() {
            return Err(SimError::NonFinitePrice { index: i, value: price });
        }
        peak = peak.max(price);
        if !(peak > 0.0) {
            return Err(SimError::DivisionDegenerate {
                index: i,
                value: peak,
            });
        }
        worst = worst.min((price - peak) / peak);
    }
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traj(prices: &[f64]) -> Trajectory {
        Trajectory::from(prices.to_vec())
    }

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_is_uncentered() {
        // Constant growth has zero centered variance but a non-zero second moment
        let returns = [0.01, 0.01, 0.01];
        let expected = 0.01 * TRADING_DAYS_PER_YEAR.sqrt();
        assert!((annualized_volatility(&returns) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_flat_path_has_zero_metrics() {
        let report = audit(&traj(&[50.0, 50.0, 50.0])).unwrap();
        assert_eq!(report.annualized_volatility, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.final_price, 50.0);
    }

    #[test]
    fn test_drawdown_from_running_peak() {
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 130.0, 117.0]).unwrap();
        assert!((dd - (90.0 - 120.0) / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_decreasing_path_has_zero_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 2.0, 3.5, 3.5]).unwrap(), 0.0);
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            audit(&traj(&[100.0])),
            Err(SimError::InsufficientData { len: 1 })
        );
        assert_eq!(
            audit(&traj(&[])),
            Err(SimError::InsufficientData { len: 0 })
        );
    }

    #[test]
    fn test_non_positive_denominator() {
        assert_eq!(
            audit(&traj(&[100.0, 0.0, 5.0])),
            Err(SimError::DivisionDegenerate {
                index: 1,
                value: 0.0
            })
        );
    }

    #[test]
    fn test_nan_price_is_rejected() {
        // NaN slips past `<= 0.0` comparisons, so it has to be caught by value
        let result = audit(&traj(&[1.0, f64::NAN, 2.0]));
        assert!(
            matches!(result, Err(SimError::NonFinitePrice { index: 1, value }) if value.is_nan()),
            "got {:?}",
            result
        );
        assert!(matches!(
            simple_returns(&[f64::NAN, 2.0]),
            Err(SimError::DivisionDegenerate { index: 0, .. })
        ));
    }

    #[test]
    fn test_infinite_price_is_rejected() {
        assert_eq!(
            audit(&traj(&[100.0, f64::INFINITY])),
            Err(SimError::NonFinitePrice {
                index: 1,
                value: f64::INFINITY
            })
        );
        assert_eq!(
            max_drawdown(&[100.0, f64::NEG_INFINITY]),
            Err(SimError::NonFinitePrice {
                index: 1,
                value: f64::NEG_INFINITY
            })
        );
    }

    #[test]
    fn test_non_positive_peak() {
        assert_eq!(
            max_drawdown(&[-3.0, -2.0]),
            Err(SimError::DivisionDegenerate {
                index: 0,
                value: -3.0
            })
        );
    }
}
