//! Demand Forecast Pipeline
//!
//! Feature engineering and tensor shaping for retail demand forecasting with
//! a pre-trained sequence model.
//!
//! # Overview
//!
//! This library turns raw per-item, per-store daily sales records into the
//! fixed-shape numeric tensors a sequence model consumes, and resolves
//! free-text categories into the stable integer labels the model was fitted
//! with, including an explicit `UNKNOWN` fallback for categories never seen
//! during fitting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Demand Forecast Pipeline                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  loader/      - CSV ingestion, (item, store, date) aggregation  │
//! │  supervised/  - windowed supervised-learning framing            │
//! │  tensor/      - (N, sub_size, timesteps, 1) reshaping + padding │
//! │  validation/  - model input-shape contract, quality scans       │
//! │  labels/      - category vocabulary with UNKNOWN fallback       │
//! │  forecast/    - per-request orchestration                       │
//! │  batch/       - parallel multi-category sweeps                  │
//! │  export/      - .npy dataset preparation for offline training   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows `loader → supervised → tensor → validation → model`;
//! independently, `category → labels → integer label`. The
//! [`forecast::Forecaster`] joins both paths into one response.
//!
//! # Example
//!
//! ```ignore
//! use demand_forecast::prelude::*;
//! use std::sync::Arc;
//!
//! let history = read_sales("sales.csv")?;
//! let vocabulary = CategoryVocabulary::from_classes(["BEAUTY", "GROCERY"]);
//!
//! let forecaster = Forecaster::new(
//!     PipelineConfig::default(),
//!     history,
//!     vocabulary,
//!     Arc::new(model),
//! )?;
//!
//! let response = forecaster.predict(&ForecastRequest::new("beauty"))?;
//! for point in &response.forecast {
//!     println!("{} -> {:.2}", point.date, point.value);
//! }
//! ```

pub mod batch;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod labels;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod supervised;
pub mod tensor;
pub mod validation;

// Re-exports - Errors
pub use error::{ForecastError, Result};

// Re-exports - Loading
pub use loader::{read_sales, read_sales_from_reader, SalesRecord};

// Re-exports - Supervised framing
pub use supervised::{to_supervised, SeriesKey, SupervisedFrame};

// Re-exports - Tensor shaping
pub use tensor::{timesteps_for, to_model_tensor};

// Re-exports - Validation
pub use validation::{scan_features, scan_missing, ShapeValidator, ValidationLevel, ValidationResult};

// Re-exports - Labels
pub use labels::{normalize, CategoryResolver, CategoryVocabulary, Resolution, UNKNOWN_CATEGORY};

// Re-exports - Model boundary
pub use model::SequenceModel;

// Re-exports - Calendar
pub use calendar::{date_range, Frequency};

// Re-exports - Config
pub use config::{
    ExperimentMetadata, HorizonConfig, PipelineConfig, TensorConfig, WindowConfig,
};

// Re-exports - Forecasting
pub use forecast::{DateRange, ForecastPoint, ForecastRequest, ForecastResponse, Forecaster};

// Re-exports - Batch
pub use batch::{forecast_categories, BatchConfig, BatchOutcome, ErrorMode};

// Re-exports - Export
pub use export::{DatasetExporter, ExportMetadata, ExportResult};
