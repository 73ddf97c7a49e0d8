//! Pipeline configuration management.
//!
//! A single serializable struct carries every constant the pipeline depends
//! on: the supervised window, the tensor decomposition, and the default
//! forecast horizon. Configurations round-trip through TOML or JSON so an
//! experiment is reproducible from a checked-in file.
//!
//! Validation is front-loaded: [`PipelineConfig::validate`] cross-checks the
//! window against the tensor decomposition, so drift between the feature
//! pipeline and the model surfaces at startup instead of as a per-request
//! shape error.
//!
//! # Example
//!
//! ```ignore
//! use demand_forecast::config::PipelineConfig;
//!
//! let config = PipelineConfig::load_toml("experiment.toml")?;
//! let forecaster = Forecaster::new(config, history, vocabulary, model)?;
//! ```

use crate::calendar::Frequency;
use crate::tensor::timesteps_for;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Supervised windowing parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowConfig {
    /// Lookback steps per supervised row
    pub window: usize,

    /// Steps ahead the target is drawn from
    pub lag: usize,

    /// Remove rows lacking a full window or lag horizon.
    ///
    /// Must stay `true` for inference: partial windows cannot be fed to a
    /// fixed-shape tensor.
    pub drop_incomplete: bool,
}

impl Default for WindowConfig {
    /// Matches the fitted model: 129 lookback steps, one-step-ahead target.
    fn default() -> Self {
        Self {
            window: 129,
            lag: 1,
            drop_incomplete: true,
        }
    }
}

impl WindowConfig {
    /// Feature columns a row produces: lookback plus the current timestep.
    pub fn feature_count(&self) -> usize {
        self.window + 1
    }

    /// Validate the windowing parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.lag == 0 {
            return Err("lag must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Tensor decomposition parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TensorConfig {
    /// Subsequences per sample; a pipeline-wide constant, never inferred
    /// per request
    pub sub_size: usize,

    /// Timesteps the model's declared input shape expects
    pub expected_timesteps: usize,
}

impl Default for TensorConfig {
    /// Matches the fitted model's `(2, 65, 1)` input.
    fn default() -> Self {
        Self {
            sub_size: 2,
            expected_timesteps: 65,
        }
    }
}

impl TensorConfig {
    /// Validate the decomposition parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.sub_size == 0 {
            return Err("sub_size must be > 0".to_string());
        }
        if self.expected_timesteps == 0 {
            return Err("expected_timesteps must be > 0".to_string());
        }
        Ok(())
    }
}

/// Default forecast horizon used when a request carries no date range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HorizonConfig {
    /// First forecast date
    pub start: NaiveDate,

    /// Last forecast date (inclusive)
    pub end: NaiveDate,

    /// Step frequency
    pub frequency: Frequency,
}

impl Default for HorizonConfig {
    /// The horizon the service originally shipped with: two-week steps over
    /// 2013-03-01 .. 2014-09-30.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2013, 3, 1).expect("static date"),
            end: NaiveDate::from_ymd_opt(2014, 9, 30).expect("static date"),
            frequency: Frequency::BiWeekly,
        }
    }
}

impl HorizonConfig {
    /// Validate the horizon.
    pub fn validate(&self) -> Result<(), String> {
        if self.start > self.end {
            return Err(format!(
                "horizon start {} is after end {}",
                self.start, self.end
            ));
        }
        Ok(())
    }
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Version or git commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Unified pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Supervised windowing
    pub window: WindowConfig,

    /// Tensor decomposition
    pub tensor: TensorConfig,

    /// Default forecast horizon
    pub horizon: HorizonConfig,

    /// Experiment metadata (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

impl PipelineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the windowing configuration.
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set the tensor configuration.
    pub fn with_tensor(mut self, tensor: TensorConfig) -> Self {
        self.tensor = tensor;
        self
    }

    /// Set the default horizon.
    pub fn with_horizon(mut self, horizon: HorizonConfig) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set experiment metadata.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validate the configuration, including the cross-check between the
    /// window and the tensor decomposition.
    pub fn validate(&self) -> Result<(), String> {
        self.window.validate()?;
        self.tensor.validate()?;
        self.horizon.validate()?;

        let produced = timesteps_for(self.window.feature_count(), self.tensor.sub_size);
        if produced != self.tensor.expected_timesteps {
            return Err(format!(
                "window/tensor drift: window {} produces {} feature(s), which split into {} timestep(s) of sub_size {}, but the model expects {}",
                self.window.window,
                self.window.feature_count(),
                produced,
                self.tensor.sub_size,
                self.tensor.expected_timesteps
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
