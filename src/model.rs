//! The sequence-model boundary.
//!
//! The core never loads model artifacts; it depends on a narrow capability:
//! declare an input shape, accept a rank-4 tensor, return a flat prediction
//! per batch row. Anything satisfying that (a native inference runtime, an
//! RPC client, a test fake) plugs in behind [`SequenceModel`].

use crate::error::Result;
use ndarray::{Array1, Array4};

/// A pre-trained sequence model the pipeline feeds tensors to.
///
/// Implementations must be thread-safe: the orchestrator shares one model
/// across concurrent requests and treats it as read-only after construction.
pub trait SequenceModel: Send + Sync {
    /// Declared per-sample input shape `(sub_size, timesteps, channels)`,
    /// excluding the batch dimension.
    fn input_shape(&self) -> (usize, usize, usize);

    /// Run inference on a validated `(N, sub_size, timesteps, channels)`
    /// batch, returning one value per batch row.
    fn predict(&self, input: &Array4<f64>) -> Result<Array1<f64>>;
}
