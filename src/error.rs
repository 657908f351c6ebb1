//! Error taxonomy for the persistence layer.
//!
//! None of these errors ever reach the host: the store catches them at the
//! call site, logs a warning, and degrades to in-memory operation. They are
//! typed so adapters and tests can be precise about what failed.

use thiserror::Error;

/// A storage adapter read or write failed (quota exceeded, storage
/// disabled, private browsing mode).
#[derive(Debug, Clone, Error)]
#[error("storage unavailable: {0}")]
pub struct StorageError(pub String);

impl StorageError {
  /// Creates a storage error with the given detail.
  pub fn new(detail: impl Into<String>) -> Self {
    Self(detail.into())
  }
}

/// A persistence operation failed.
#[derive(Debug, Error)]
pub enum StateError {
  /// The underlying storage adapter failed; the operation degrades to a
  /// no-op and the engine continues in memory.
  #[error(transparent)]
  Storage(#[from] StorageError),
  /// A stored blob failed to parse; treated identically to no stored
  /// state.
  #[error("malformed stored state: {0}")]
  MalformedState(#[from] serde_json::Error),
}
