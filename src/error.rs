// src/error.rs
use thiserror::Error;

/// Error types for the gld-engine library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Bad construction parameters; raised before any simulation step runs
    #[error("Invalid configuration '{parameter}' = {value}: {constraint}")]
    InvalidConfig {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Audit requested on a trajectory too short to form a return series
    #[error("Insufficient data: trajectory has {len} point(s), at least 2 are required")]
    InsufficientData { len: usize },

    /// NaN or infinite price, produced by a diverging run or handed to the audit
    #[error("Non-finite price at trajectory index {index}: {value}")]
    NonFinitePrice { index: usize, value: f64 },

    /// Non-positive price or peak met while computing returns or drawdown
    #[error("Degenerate division at trajectory index {index}: denominator {value} is not positive")]
    DivisionDegenerate { index: usize, value: f64 },
}

/// Result type alias for gld-engine operations
pub type SimResult<T> = Result<T, SimError>;

/// Validation utilities
pub mod validation {
    use super::{SimError, SimResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SimResult<()> {
        if value <= 0.0 {
            Err(SimError::InvalidConfig {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            Err(SimError::InvalidConfig {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_finite_positive(name: &str, value: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        validate_positive(name, value)
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SimResult<()> {
        if steps == 0 {
            Err(SimError::InvalidConfig {
                parameter: "step_count".to_string(),
                value: 0.0,
                constraint: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
