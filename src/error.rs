//! Crate-wide error types.
//!
//! The pipeline distinguishes startup failures (missing or malformed source
//! data, bad configuration) from per-request failures (no data for a
//! category, tensor shape disagreements). Startup failures should abort
//! initialization; per-request failures are returned to the caller as values
//! and translated into a structured failure response by the serving layer.
//!
//! Unseen categories are deliberately NOT an error: they resolve to the
//! `UNKNOWN` sentinel with a warning attached to the response (see
//! [`crate::labels`]).

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error type for the forecasting pipeline.
#[derive(Debug)]
pub enum ForecastError {
    /// Source file is missing or unreadable. Fatal at startup.
    DataUnavailable {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O description
        reason: String,
    },

    /// Source is readable but lacks required columns. Fatal at startup.
    SchemaError {
        /// Names of the missing columns
        missing: Vec<String>,
    },

    /// Filtering the history by category produced zero rows. Recoverable;
    /// surfaced to clients as a not-found condition.
    NoDataForCategory {
        /// Normalized category that matched nothing
        category: String,
    },

    /// Fewer timesteps than the model needs, even after padding. A
    /// configuration error between the feature pipeline and the model.
    InsufficientFeatures {
        /// Timesteps the model expects
        expected: usize,
        /// Timesteps actually produced
        actual: usize,
    },

    /// Tensor shape disagrees with the model's declared input shape.
    ShapeMismatch {
        /// Model's declared per-sample shape
        expected: Vec<usize>,
        /// Shape actually produced
        actual: Vec<usize>,
    },

    /// Invalid pipeline configuration.
    InvalidConfig(String),

    /// Catch-all for conditions without a dedicated variant.
    Generic(String),
}

impl ForecastError {
    /// Create a generic error from any displayable message.
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        ForecastError::Generic(msg.into())
    }

    /// Whether this error is a per-request condition rather than a fatal
    /// configuration/startup problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ForecastError::NoDataForCategory { .. })
    }
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { path, reason } => {
                write!(f, "source data unavailable at {}: {}", path.display(), reason)
            }
            Self::SchemaError { missing } => {
                write!(f, "source data missing required column(s): {}", missing.join(", "))
            }
            Self::NoDataForCategory { category } => {
                write!(f, "no data found for category: {category}")
            }
            Self::InsufficientFeatures { expected, actual } => {
                write!(
                    f,
                    "expected at least {expected} timesteps after padding, got {actual}"
                )
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "tensor shape {actual:?} does not match model input shape {expected:?}"
                )
            }
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ForecastError {}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Generic(format!("I/O error: {err}"))
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Generic(format!("CSV error: {err}"))
    }
}
