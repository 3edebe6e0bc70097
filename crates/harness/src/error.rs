//! Error types for the harness crate.

use sett_harness_sim::SimError;
use thiserror::Error;

/// Errors raised while snapshotting or confirming operations.
///
/// [`HarnessError::InvariantViolated`] is the single fatal kind the hooks
/// produce; it is never caught or retried, it aborts the enclosing test case.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A post-condition on an operation did not hold
    #[error("Invariant violated: {invariant}")]
    InvariantViolated { invariant: String },

    /// Snapshot has no balance for this token/holder pair
    #[error("Snapshot has no balance for token '{token}' and holder '{holder}'")]
    MissingBalance { token: String, holder: String },

    /// Snapshot has no metric at this dotted path
    #[error("Snapshot has no metric at '{path}'")]
    MissingMetric { path: String },

    /// Metric exists but holds the other value kind
    #[error("Metric at '{path}' is not a {expected}")]
    MetricType {
        path: String,
        expected: &'static str,
    },

    /// A simulated transaction failed
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Configuration file could not be read
    #[error("Failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Fail with [`HarnessError::InvariantViolated`] unless `condition` holds.
pub fn ensure(condition: bool, invariant: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::InvariantViolated {
            invariant: invariant.to_string(),
        })
    }
}
