//! Dataset export for offline training.
//!
//! Model training happens outside this crate (Python-side), so the prepared
//! supervised matrix is exported in NumPy's `.npy` format alongside a JSON
//! metadata file describing its provenance:
//!
//! - `features.npy` - `[N_rows, N_features]` float64 matrix
//! - `targets.npy` - `[N_rows]` float64 vector, positionally aligned
//! - `metadata.json` - shapes, column names, windowing parameters, and an
//!   RFC3339 export timestamp
//!
//! See `tools/prepare_dataset.rs` for the command-line entry point.

use crate::config::WindowConfig;
use crate::error::{ForecastError, Result};
use crate::supervised::SupervisedFrame;
use ndarray::{Array1, Array2};
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Provenance recorded next to the exported arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Exported row count
    pub rows: usize,

    /// Features per row
    pub feature_count: usize,

    /// Feature column names, oldest lookback first
    pub columns: Vec<String>,

    /// Lookback window the frame was built with
    pub window: usize,

    /// Target lag the frame was built with
    pub lag: usize,

    /// RFC3339 timestamp of the export
    pub export_timestamp: String,
}

/// Paths produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Feature matrix file
    pub features_path: PathBuf,
    /// Target vector file
    pub targets_path: PathBuf,
    /// Metadata file
    pub metadata_path: PathBuf,
    /// Exported row count
    pub rows: usize,
}

/// Writes prepared supervised datasets to a directory.
#[derive(Debug, Clone)]
pub struct DatasetExporter {
    output_dir: PathBuf,
}

impl DatasetExporter {
    /// Create an exporter targeting a directory (created on first export).
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Export a supervised frame and its aligned targets.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Generic`] when the frame and targets disagree in
    /// length or any file cannot be written.
    pub fn export(
        &self,
        frame: &SupervisedFrame,
        targets: &[f64],
        window_config: &WindowConfig,
    ) -> Result<ExportResult> {
        if frame.n_rows() != targets.len() {
            return Err(ForecastError::generic(format!(
                "frame has {} row(s) but {} target(s); they must be positionally aligned",
                frame.n_rows(),
                targets.len()
            )));
        }

        fs::create_dir_all(&self.output_dir)?;

        let rows = frame.n_rows();
        let feature_count = frame.n_features();

        let mut flat = Vec::with_capacity(rows * feature_count);
        for row in frame.rows() {
            flat.extend_from_slice(row);
        }
        let features = Array2::from_shape_vec((rows, feature_count), flat)
            .map_err(|e| ForecastError::generic(format!("failed to shape feature matrix: {e}")))?;
        let targets = Array1::from_vec(targets.to_vec());

        let features_path = self.output_dir.join("features.npy");
        let targets_path = self.output_dir.join("targets.npy");
        let metadata_path = self.output_dir.join("metadata.json");

        features
            .write_npy(File::create(&features_path)?)
            .map_err(|e| ForecastError::generic(format!("failed to write features.npy: {e}")))?;
        targets
            .write_npy(File::create(&targets_path)?)
            .map_err(|e| ForecastError::generic(format!("failed to write targets.npy: {e}")))?;

        let metadata = ExportMetadata {
            rows,
            feature_count,
            columns: frame.columns().to_vec(),
            window: window_config.window,
            lag: window_config.lag,
            export_timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&metadata)
            .map_err(|e| ForecastError::generic(format!("failed to serialize metadata: {e}")))?;
        fs::write(&metadata_path, json)?;

        log::info!(
            "exported {} row(s) x {} feature(s) to {}",
            rows,
            feature_count,
            self.output_dir.display()
        );

        Ok(ExportResult {
            features_path,
            targets_path,
            metadata_path,
            rows,
        })
    }
}
