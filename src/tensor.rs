//! Tensor shaping for the sequence model.
//!
//! The downstream model expects a fixed subsequence/timestep decomposition
//! regardless of how many lag features were generated upstream: each row's
//! flat feature vector of length `F` becomes a `(sub_size, timesteps, 1)`
//! block, and rows stack into `(N, sub_size, timesteps, 1)`.
//!
//! When `F` is not a multiple of `sub_size`, the vector is right-padded with
//! zeros until it is, a neutral filler that does not bias early timesteps
//! disproportionately when `sub_size` is small. `timesteps` is therefore
//! always `ceil(F / sub_size)`, the smallest multiple relationship satisfying
//! `sub_size * timesteps >= F`.
//!
//! `sub_size` is a pipeline-wide constant carried in
//! [`crate::config::TensorConfig`], never inferred per request. Padding
//! happens here and only here; the shape validator downstream truncates or
//! fails but never pads again (see [`crate::validation`]).

use crate::error::{ForecastError, Result};
use crate::supervised::SupervisedFrame;
use ndarray::Array4;

/// Number of timesteps produced for `feature_count` features split into
/// subsequences of `sub_size`.
#[inline]
pub fn timesteps_for(feature_count: usize, sub_size: usize) -> usize {
    feature_count.div_ceil(sub_size)
}

/// Reshape a supervised frame into the model's rank-4 input tensor.
///
/// # Errors
///
/// - [`ForecastError::InvalidConfig`] when `sub_size == 0`
/// - [`ForecastError::Generic`] when the frame has no rows (an empty tensor
///   has no defined shape)
pub fn to_model_tensor(frame: &SupervisedFrame, sub_size: usize) -> Result<Array4<f64>> {
    if sub_size == 0 {
        return Err(ForecastError::InvalidConfig(
            "sub_size must be > 0".to_string(),
        ));
    }
    if frame.is_empty() {
        return Err(ForecastError::generic(
            "cannot build a tensor from an empty frame: not enough history for the configured window and lag",
        ));
    }

    let n = frame.n_rows();
    let feature_count = frame.n_features();
    let timesteps = timesteps_for(feature_count, sub_size);
    let padded = sub_size * timesteps;

    let mut data = vec![0.0f64; n * padded];
    for (row_idx, row) in frame.rows().iter().enumerate() {
        let base = row_idx * padded;
        data[base..base + feature_count].copy_from_slice(row);
        // data[base + feature_count .. base + padded] stays zero: the pad.
    }

    Array4::from_shape_vec((n, sub_size, timesteps, 1), data)
        .map_err(|e| ForecastError::generic(format!("failed to shape feature tensor: {e}")))
}
