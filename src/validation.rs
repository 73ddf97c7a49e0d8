//! Shape enforcement and data-quality checks.
//!
//! Two concerns live here:
//!
//! 1. **Shape enforcement** ([`ShapeValidator`]): the hard contract between
//!    the feature pipeline and the model. Padding already happened in
//!    [`crate::tensor`]; this stage only truncates oversized tensors or
//!    fails. A second implicit pad here would hide upstream configuration
//!    errors, so an undersized tensor is always an error.
//! 2. **Data-quality scans** ([`scan_missing`], [`scan_features`]): soft
//!    checks that produce warnings rather than failures: missing sales
//!    values about to be filled with zero, NaN/Inf leaking into feature rows.
//!
//! The two-stage soft-pad / hard-truncate-or-fail split is deliberate:
//! padding corrects for naturally-varying feature counts across categories,
//! while truncation and failure guard against configuration drift between
//! the pipeline and the model.

use crate::error::{ForecastError, Result};
use crate::loader::SalesRecord;
use ndarray::{s, Array4};
use std::fmt;

// ============================================================================
// Shape enforcement
// ============================================================================

/// Enforces the model's declared per-sample input shape on feature tensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeValidator {
    expected: (usize, usize, usize),
}

impl ShapeValidator {
    /// Create a validator for a declared `(sub_size, timesteps, channels)`
    /// per-sample shape.
    pub fn new(expected: (usize, usize, usize)) -> Self {
        Self { expected }
    }

    /// The declared per-sample shape this validator enforces.
    pub fn expected_shape(&self) -> (usize, usize, usize) {
        self.expected
    }

    /// Validate a tensor against the declared shape.
    ///
    /// - timestep axis larger than declared: truncate from the end (the
    ///   trailing slices are the most-padded, least-informative ones)
    /// - timestep axis smaller than declared:
    ///   [`ForecastError::InsufficientFeatures`]
    /// - any remaining disagreement with the declared per-sample shape:
    ///   [`ForecastError::ShapeMismatch`] naming both shapes
    ///
    /// Idempotent: enforcing an already-conformant tensor returns it
    /// unchanged.
    pub fn enforce(&self, tensor: Array4<f64>) -> Result<Array4<f64>> {
        let (_, sub, timesteps, channels) = tensor.dim();
        let (exp_sub, exp_timesteps, exp_channels) = self.expected;

        let tensor = if timesteps > exp_timesteps {
            tensor.slice(s![.., .., ..exp_timesteps, ..]).to_owned()
        } else if timesteps < exp_timesteps {
            return Err(ForecastError::InsufficientFeatures {
                expected: exp_timesteps,
                actual: timesteps,
            });
        } else {
            tensor
        };

        if sub != exp_sub || channels != exp_channels {
            return Err(ForecastError::ShapeMismatch {
                expected: vec![exp_sub, exp_timesteps, exp_channels],
                actual: vec![sub, timesteps.min(exp_timesteps), channels],
            });
        }

        Ok(tensor)
    }
}

// ============================================================================
// Data-quality checks
// ============================================================================

/// Severity of a single data-quality check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Check passed
    Valid,
    /// Minor issue; processing continues with a warning
    Warning(String),
    /// Serious issue; the data should not be used as-is
    Error(String),
}

impl ValidationLevel {
    /// Check passed cleanly.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    /// Check produced a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    /// Check produced an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated outcome of a set of data-quality checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check's outcome.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// All checks passed with neither warnings nor errors.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    /// At least one check errored.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    /// At least one check warned.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// Warning messages, prefixed with their check name.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Warning(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// Error messages, prefixed with their check name.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Error(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// Number of checks recorded.
    pub fn check_count(&self) -> usize {
        self.results.len()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.results.iter().filter(|(_, l)| l.is_valid()).count();
        writeln!(f, "Validation: {passed}/{} checks passed", self.check_count())?;
        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }
        Ok(())
    }
}

/// Count missing sales values about to be filled with zero.
///
/// This is the observable side of the documented fill policy: the
/// orchestrator replaces missing values with zero and attaches this warning
/// to the response, rather than filling silently.
pub fn scan_missing(records: &[SalesRecord]) -> ValidationResult {
    let mut result = ValidationResult::new();
    let missing = records.iter().filter(|r| r.sales.is_nan()).count();

    if missing > 0 {
        result.add(
            "missing_sales",
            ValidationLevel::Warning(format!(
                "{missing} missing sales value(s) will be filled with 0"
            )),
        );
    } else {
        result.add("missing_sales", ValidationLevel::Valid);
    }

    result
}

/// Scan a feature row for NaN/Inf values.
///
/// Non-finite features at this stage mean the fill policy was skipped or the
/// source data is corrupt; either way the tensor must not reach the model.
pub fn scan_features(features: &[f64]) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut clean = true;

    for (i, &value) in features.iter().enumerate() {
        if value.is_nan() {
            result.add(
                &format!("feature_{i}"),
                ValidationLevel::Error(format!("NaN value at index {i}")),
            );
            clean = false;
        } else if value.is_infinite() {
            result.add(
                &format!("feature_{i}"),
                ValidationLevel::Error(format!("infinite value at index {i}")),
            );
            clean = false;
        }
    }

    if clean {
        result.add("finite_features", ValidationLevel::Valid);
    }

    result
}
