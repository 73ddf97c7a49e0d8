//! Forecast orchestration.
//!
//! One request flows through the whole pipeline in strict sequence:
//!
//! ```text
//! category ──► normalize ──► filter history ──► fill missing with 0
//!                                                     │
//!                            window (supervised) ◄────┘
//!                                   │
//!                            reshape (tensor)
//!                                   │
//!                            enforce (shape validator)
//!                                   │
//!                            model.predict ──► zip with date axis
//! ```
//!
//! Label resolution runs independently of the prediction path and is
//! attached to the response for traceability; an unrecognized category warns
//! but never gates the forecast.
//!
//! # Missing-value policy
//!
//! Missing sales values in the filtered series are filled with zero before
//! windowing. This is a named policy: the response carries a
//! warning with the fill count so it is never a silent default.
//!
//! Per-request structures are freshly allocated and discarded together; the
//! only cross-request side effect is the resolver's one-time `UNKNOWN`
//! append.

use crate::calendar::{date_range, Frequency};
use crate::config::PipelineConfig;
use crate::error::{ForecastError, Result};
use crate::labels::{normalize, CategoryResolver, CategoryVocabulary};
use crate::loader::SalesRecord;
use crate::model::SequenceModel;
use crate::supervised::to_supervised;
use crate::tensor::to_model_tensor;
use crate::validation::{scan_missing, ShapeValidator};
use chrono::NaiveDate;
use ndarray::s;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Caller-supplied forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First forecast date
    pub start: NaiveDate,
    /// Last forecast date (inclusive)
    pub end: NaiveDate,
    /// Step frequency
    pub frequency: Frequency,
}

/// One forecast request as received from the serving layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Free-text category to forecast
    pub category: String,

    /// Lookback override; defaults to the pipeline configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,

    /// Lag override; defaults to the pipeline configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<usize>,

    /// Horizon override; defaults to the pipeline configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl ForecastRequest {
    /// A request for one category with all pipeline defaults.
    pub fn new<S: Into<String>>(category: S) -> Self {
        Self {
            category: category.into(),
            window: None,
            lag: None,
            date_range: None,
        }
    }
}

/// One forecast timestamp with its predicted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast date, `%Y-%m-%d`
    pub date: String,
    /// Predicted sales
    pub value: f64,
}

/// The response produced for the serving layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Normalized category the forecast was produced for
    pub category: String,

    /// Stable integer label from the vocabulary (the `UNKNOWN` sentinel's
    /// position for unrecognized categories)
    pub resolved_label: i64,

    /// Predicted values, one per generated future timestamp
    pub forecast: Vec<ForecastPoint>,

    /// Warning-level signals accumulated along the way (unrecognized
    /// category, missing-value fills)
    pub warnings: Vec<String>,
}

/// Composes the pipeline stages for serving-time inference.
///
/// The history and model are read-only after construction; the resolver is
/// the only shared mutable state and serializes its own access, so one
/// `Forecaster` can serve concurrent requests through `&self`.
pub struct Forecaster {
    config: PipelineConfig,
    history: Vec<SalesRecord>,
    resolver: CategoryResolver,
    model: Arc<dyn SequenceModel>,
    validator: ShapeValidator,
}

impl Forecaster {
    /// Build a forecaster over a loaded history, a fitted vocabulary, and a
    /// model.
    ///
    /// # Errors
    ///
    /// [`ForecastError::InvalidConfig`] when the configuration fails
    /// validation; the service must not accept requests with a drifted
    /// pipeline.
    pub fn new(
        config: PipelineConfig,
        history: Vec<SalesRecord>,
        vocabulary: CategoryVocabulary,
        model: Arc<dyn SequenceModel>,
    ) -> Result<Self> {
        config.validate().map_err(ForecastError::InvalidConfig)?;
        let validator = ShapeValidator::new(model.input_shape());

        Ok(Self {
            config,
            history,
            resolver: CategoryResolver::new(vocabulary),
            model,
            validator,
        })
    }

    /// Produce a forecast for one request.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::NoDataForCategory`] when the filtered history is
    ///   empty (surfaced as a not-found condition, not an empty forecast)
    /// - [`ForecastError::InsufficientFeatures`] /
    ///   [`ForecastError::ShapeMismatch`] on pipeline/model disagreement
    /// - any error the model itself reports
    pub fn predict(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        let category = normalize(&request.category);
        let mut warnings = Vec::new();

        // Label resolution is independent of the prediction path; it only
        // contributes the label and, for unseen categories, a warning.
        let resolution = self.resolver.resolve(&request.category);
        if let Some(warning) = &resolution.warning {
            warnings.push(warning.clone());
        }

        let mut series: Vec<SalesRecord> = self
            .history
            .iter()
            .filter(|r| r.item == category)
            .cloned()
            .collect();
        if series.is_empty() {
            return Err(ForecastError::NoDataForCategory { category });
        }

        // Fill-with-zero policy for missing values, surfaced as a warning.
        let missing_scan = scan_missing(&series);
        if missing_scan.has_warnings() {
            warnings.extend(missing_scan.warnings());
            for record in &mut series {
                if record.sales.is_nan() {
                    record.sales = 0.0;
                }
            }
        }

        let window = request.window.unwrap_or(self.config.window.window);
        let lag = request.lag.unwrap_or(self.config.window.lag);

        let (frame, _targets) = to_supervised(&series, window, lag, true)?;
        let tensor = to_model_tensor(&frame, self.config.tensor.sub_size)?;
        let tensor = self.validator.enforce(tensor)?;

        let dates = match &request.date_range {
            Some(range) => date_range(range.start, range.end, range.frequency),
            None => date_range(
                self.config.horizon.start,
                self.config.horizon.end,
                self.config.horizon.frequency,
            ),
        };
        if dates.is_empty() {
            return Err(ForecastError::generic(
                "forecast horizon contains no timestamps",
            ));
        }

        // One subsequence per forecast timestamp; surplus rows are unused.
        let take = dates.len().min(tensor.dim().0);
        let batch = tensor.slice(s![..take, .., .., ..]).to_owned();
        let output = self.model.predict(&batch)?;

        let forecast = dates
            .iter()
            .zip(output.iter())
            .map(|(date, &value)| ForecastPoint {
                date: date.format("%Y-%m-%d").to_string(),
                value,
            })
            .collect();

        Ok(ForecastResponse {
            category,
            resolved_label: resolution.label,
            forecast,
            warnings,
        })
    }

    /// The label resolver, for vocabulary snapshots by the surrounding
    /// service.
    pub fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    /// The loaded history.
    pub fn history(&self) -> &[SalesRecord] {
        &self.history
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
