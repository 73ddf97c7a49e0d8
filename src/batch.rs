//! Parallel forecasting across many categories.
//!
//! A forecast sweep (every category in the vocabulary, a dashboard refresh)
//! is embarrassingly parallel: requests share nothing but the read-only
//! history/model and the resolver, which serializes its own single mutation.
//! Rayon's work-stealing pool runs one request per task through
//! [`Forecaster::predict`]'s `&self` path.
//!
//! # Error handling modes
//!
//! - [`ErrorMode::CollectErrors`] (default): every category is attempted;
//!   failures are collected alongside successes in the outcome.
//! - [`ErrorMode::FailFast`]: the sweep returns the first failure instead of
//!   an outcome. In-flight tasks still run to completion before the error is
//!   returned.

use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastRequest, ForecastResponse, Forecaster};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// How a sweep reacts to per-category failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Attempt every category; report failures in the outcome
    #[default]
    CollectErrors,

    /// Return the first failure
    FailFast,
}

/// Configuration for a forecast sweep.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Worker threads; `None` uses rayon's global pool
    pub threads: Option<usize>,

    /// Failure handling mode
    pub error_mode: ErrorMode,
}

impl BatchConfig {
    /// Create a configuration with defaults (global pool, collect errors).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a dedicated worker-thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the failure handling mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }
}

/// Result of a forecast sweep.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successful responses, in input category order
    pub responses: Vec<ForecastResponse>,

    /// Failed categories with their errors, in input category order
    pub failures: Vec<(String, ForecastError)>,

    /// Wall-clock time for the sweep
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// Number of categories that produced a forecast.
    pub fn successful_count(&self) -> usize {
        self.responses.len()
    }

    /// Number of categories that failed.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Forecast a set of categories in parallel.
pub fn forecast_categories(
    forecaster: &Forecaster,
    categories: &[String],
    config: &BatchConfig,
) -> Result<BatchOutcome> {
    let started = Instant::now();

    let run = || {
        categories
            .par_iter()
            .map(|category| {
                (
                    category.clone(),
                    forecaster.predict(&ForecastRequest::new(category.clone())),
                )
            })
            .collect::<Vec<_>>()
    };

    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ForecastError::generic(format!("failed to build thread pool: {e}")))?
            .install(run),
        None => run(),
    };

    let mut responses = Vec::new();
    let mut failures = Vec::new();
    for (category, result) in results {
        match result {
            Ok(response) => responses.push(response),
            Err(err) => {
                if config.error_mode == ErrorMode::FailFast {
                    return Err(err);
                }
                log::warn!("forecast for '{category}' failed: {err}");
                failures.push((category, err));
            }
        }
    }

    Ok(BatchOutcome {
        responses,
        failures,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, TensorConfig, WindowConfig};
    use crate::error::Result;
    use crate::labels::CategoryVocabulary;
    use crate::loader::SalesRecord;
    use crate::model::SequenceModel;
    use chrono::NaiveDate;
    use ndarray::{Array1, Array4};
    use std::sync::Arc;

    struct ZeroModel;

    impl SequenceModel for ZeroModel {
        fn input_shape(&self) -> (usize, usize, usize) {
            (2, 3, 1)
        }

        fn predict(&self, input: &Array4<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(input.dim().0))
        }
    }

    fn forecaster_with(items: &[&str]) -> Forecaster {
        let mut history = Vec::new();
        for item in items {
            for i in 0..20usize {
                history.push(SalesRecord {
                    item: item.to_string(),
                    store: "1".to_string(),
                    date: NaiveDate::from_ymd_opt(2013, 1, 1)
                        .expect("static date")
                        .checked_add_days(chrono::Days::new(i as u64))
                        .expect("date in range"),
                    sales: i as f64,
                });
            }
        }

        let config = PipelineConfig::default()
            .with_window(WindowConfig {
                window: 5,
                lag: 1,
                drop_incomplete: true,
            })
            .with_tensor(TensorConfig {
                sub_size: 2,
                expected_timesteps: 3,
            })
            .with_horizon(crate::config::HorizonConfig {
                start: NaiveDate::from_ymd_opt(2013, 2, 1).expect("static date"),
                end: NaiveDate::from_ymd_opt(2013, 2, 5).expect("static date"),
                frequency: crate::calendar::Frequency::Daily,
            });

        Forecaster::new(
            config,
            history,
            CategoryVocabulary::from_classes(items.iter().copied()),
            Arc::new(ZeroModel),
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_all_succeed() {
        let f = forecaster_with(&["BEAUTY", "GROCERY", "DAIRY"]);
        let categories: Vec<String> = ["BEAUTY", "GROCERY", "DAIRY"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let outcome = forecast_categories(&f, &categories, &BatchConfig::new()).unwrap();

        assert_eq!(outcome.successful_count(), 3);
        assert_eq!(outcome.failure_count(), 0);
    }

    #[test]
    fn test_sweep_collects_failures_in_isolation() {
        let f = forecaster_with(&["BEAUTY"]);
        let categories: Vec<String> = ["BEAUTY", "NON_EXISTENT"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let outcome = forecast_categories(&f, &categories, &BatchConfig::new()).unwrap();

        assert_eq!(outcome.successful_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
        assert_eq!(outcome.failures[0].0, "NON_EXISTENT");
        assert!(matches!(
            outcome.failures[0].1,
            ForecastError::NoDataForCategory { .. }
        ));
    }

    #[test]
    fn test_fail_fast_returns_error() {
        let f = forecaster_with(&["BEAUTY"]);
        let categories: Vec<String> = ["NON_EXISTENT", "BEAUTY"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = BatchConfig::new().with_error_mode(ErrorMode::FailFast);
        assert!(forecast_categories(&f, &categories, &config).is_err());
    }

    #[test]
    fn test_dedicated_pool() {
        let f = forecaster_with(&["BEAUTY", "GROCERY"]);
        let categories: Vec<String> =
            ["BEAUTY", "GROCERY"].iter().map(|s| s.to_string()).collect();

        let config = BatchConfig::new().with_threads(2);
        let outcome = forecast_categories(&f, &categories, &config).unwrap();
        assert_eq!(outcome.successful_count(), 2);
    }
}
