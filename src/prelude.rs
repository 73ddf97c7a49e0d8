//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types so a consumer can write
//! `use demand_forecast::prelude::*;` and have the whole serving path in
//! scope.
//!
//! # Usage
//!
//! ```ignore
//! use demand_forecast::prelude::*;
//!
//! let history = read_sales("sales.csv")?;
//! let forecaster = Forecaster::new(config, history, vocabulary, model)?;
//! let response = forecaster.predict(&ForecastRequest::new("beauty"))?;
//! ```

pub use crate::batch::{forecast_categories, BatchConfig, BatchOutcome, ErrorMode};
pub use crate::calendar::{date_range, Frequency};
pub use crate::config::{
    ExperimentMetadata, HorizonConfig, PipelineConfig, TensorConfig, WindowConfig,
};
pub use crate::error::{ForecastError, Result};
pub use crate::export::{DatasetExporter, ExportMetadata, ExportResult};
pub use crate::forecast::{
    DateRange, ForecastPoint, ForecastRequest, ForecastResponse, Forecaster,
};
pub use crate::labels::{CategoryResolver, CategoryVocabulary, UNKNOWN_CATEGORY};
pub use crate::loader::{read_sales, read_sales_from_reader, SalesRecord};
pub use crate::model::SequenceModel;
pub use crate::supervised::{to_supervised, SupervisedFrame};
pub use crate::tensor::to_model_tensor;
pub use crate::validation::{scan_missing, ShapeValidator};
