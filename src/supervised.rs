//! Supervised-learning framing of a sales time series.
//!
//! A sequence model cannot consume a raw time series directly; it needs
//! `(features, target)` pairs. This module reframes a chronological slice of
//! [`SalesRecord`]s into a supervised matrix: for every surviving timestep
//! `t`, the lookback values `sales(t-window) … sales(t-1)`, the current value
//! `sales(t)`, and a target drawn `lag` steps ahead.
//!
//! # Row accounting
//!
//! With `drop_incomplete = true` (the default, required for inference:
//! partial windows cannot be fed to a fixed-shape tensor), leading rows
//! without a full lookback window and trailing rows without a full lag
//! horizon are removed, so for an input of `n` complete rows the output has
//! exactly `n - (window + lag)` rows. Mid-series missing values also drop
//! their rows under this policy; the orchestrator fills them with zero
//! beforehand, so at inference time only the edges are removed.
//!
//! # Identifiers
//!
//! `item`, `store`, and `date` are never shifted into features or targets.
//! Each surviving row carries the identity of its current timestep in a
//! [`SeriesKey`].
//!
//! Output row order matches the input chronological order of survivors.

use crate::error::{ForecastError, Result};
use crate::loader::SalesRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Carried-through identity of one supervised row: the current timestep's
/// identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Product category
    pub item: String,
    /// Store identifier
    pub store: String,
    /// Date of the row's current timestep
    pub date: NaiveDate,
}

/// A time series reframed as a feature matrix.
///
/// Rows are positionally aligned with the target vector returned alongside
/// the frame by [`to_supervised`].
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisedFrame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
    keys: Vec<SeriesKey>,
}

impl SupervisedFrame {
    /// Feature column names, oldest lookback first: `sales(t-w) … sales(t)`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Feature rows, one per surviving timestep.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Carried-through identifiers, positionally aligned with `rows()`.
    pub fn keys(&self) -> &[SeriesKey] {
        &self.keys
    }

    /// Number of surviving rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns (`window + 1`).
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reframe a chronological record slice into `(features, targets)`.
///
/// The slice is treated as one series in its given order; callers filter to
/// the entity they care about before windowing.
///
/// # Arguments
///
/// * `records` - chronologically ordered observations
/// * `window` - lookback steps per row (`0` degenerates to current-timestep
///   features only, still with a valid target)
/// * `lag` - steps ahead the target is drawn from; must be ≥ 1
/// * `drop_incomplete` - remove rows whose window or target contains missing
///   values (required for inference)
///
/// # Errors
///
/// [`ForecastError::InvalidConfig`] when `lag == 0`.
pub fn to_supervised(
    records: &[SalesRecord],
    window: usize,
    lag: usize,
    drop_incomplete: bool,
) -> Result<(SupervisedFrame, Vec<f64>)> {
    if lag == 0 {
        return Err(ForecastError::InvalidConfig(
            "lag must be >= 1: the target is drawn from a future timestep".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(window + 1);
    for i in (1..=window).rev() {
        columns.push(format!("sales(t-{i})"));
    }
    columns.push("sales(t)".to_string());

    let n = records.len();
    let mut rows = Vec::new();
    let mut keys = Vec::new();
    let mut targets = Vec::new();

    for t in 0..n {
        let mut row = Vec::with_capacity(window + 1);
        for i in (1..=window).rev() {
            row.push(if t >= i { records[t - i].sales } else { f64::NAN });
        }
        row.push(records[t].sales);

        let target = if t + lag < n {
            records[t + lag].sales
        } else {
            f64::NAN
        };

        if drop_incomplete && (target.is_nan() || row.iter().any(|v| v.is_nan())) {
            continue;
        }

        rows.push(row);
        keys.push(SeriesKey {
            item: records[t].item.clone(),
            store: records[t].store.clone(),
            date: records[t].date,
        });
        targets.push(target);
    }

    Ok((SupervisedFrame { columns, rows, keys }, targets))
}
