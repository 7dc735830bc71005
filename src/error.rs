//! Error types.
//!
//! Configuration problems are reported before any sampling happens
//! ([`ConfigError`]). Degenerate data discovered while aggregating a finished
//! run is reported as [`AnalysisError`]. Neither is retryable.

use crate::risk::Driver;

/// Invalid simulation configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("at least one scenario is required")]
    EmptyScenarios,

    #[error("duplicate scenario label `{label}`")]
    DuplicateScenario { label: String },

    #[error("rework perturbation range [{min}, {max}] is malformed")]
    InvalidPerturbationRange { min: f64, max: f64 },

    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Degenerate data encountered while summarizing a dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no trials for scenario(s): {}", labels.join(", "))]
    EmptyGroup { labels: Vec<String> },

    #[error("correlation of total cost with {driver} is undefined: {reason}")]
    UndefinedCorrelation { driver: Driver, reason: String },

    #[error("cost threshold must be finite, got {threshold}")]
    InvalidThreshold { threshold: f64 },

    #[error("dataset has no scenarios or no finite cost values")]
    EmptyDataset,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

pub type Result<T> = std::result::Result<T, Error>;
