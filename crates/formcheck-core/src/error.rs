//! Error types for analyzer construction.
//!
//! Frame processing never fails; low-quality input is absorbed by
//! confidence gating. Errors only surface when building analyzers from
//! invalid configuration.

use formcheck_models::ExerciseKindParseError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while configuring an analyzer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid phase thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Invalid analyzer config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    UnknownExercise(#[from] ExerciseKindParseError),
}

impl CoreError {
    /// Create an invalid thresholds error.
    pub fn invalid_thresholds(message: impl Into<String>) -> Self {
        Self::InvalidThresholds(message.into())
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
