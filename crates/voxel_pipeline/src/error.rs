//! Construction-time configuration errors.
//!
//! The pipeline has no runtime error channel: capabilities are trusted
//! to always return a value (a degenerate one if need be), and queue
//! operations on empty queues are defined no-ops. Everything that can
//! go wrong is rejected when a worker is built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
  /// Block size exponent out of range for `1 << pow2` voxels per axis.
  #[error("invalid block size exponent {pow2} (expected 1..={max})", max = crate::block_worker::MAX_BLOCK_SIZE_POW2)]
  InvalidBlockSize { pow2: u32 },

  /// A mesh worker needs at least one mesher capability.
  #[error("mesh worker configured with no mesher capability")]
  NoMesherConfigured,

  /// The background thread could not be spawned.
  #[error("failed to spawn worker thread: {0}")]
  ThreadSpawn(#[from] std::io::Error),
}
