//! Adapter traits for the persistence backends.
//!
//! The store never touches browser-global state directly: the session
//! storage and the URL bar are reached through these traits, injected at
//! mount. This keeps the whole persistence layer testable against
//! in-memory fakes.

use crate::error::StorageError;

/// A key-value store with session-storage semantics.
///
/// Implementations are expected to be cheap and synchronous. Any failure
/// (quota exceeded, storage disabled, private mode) is reported as a
/// [`StorageError`]; the caller degrades to in-memory operation and never
/// propagates it.
pub trait StorageAdapter {
  /// Reads the value stored under `key`, if any.
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

  /// Stores `value` under `key`, replacing any previous value.
  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

  /// Removes the value stored under `key`. Removing a missing key is not
  /// an error.
  fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Access to the current page's URL query string.
///
/// The query string is exchanged without its leading `?`. The mounted page
/// owns the URL exclusively; `replace_query` must replace the current
/// history entry rather than push a new one, so keystroke-driven updates do
/// not pollute browser history.
pub trait UrlAdapter {
  /// The current query string, without the leading `?`.
  fn query(&self) -> String;

  /// Replaces the current query string in place.
  fn replace_query(&mut self, query: &str);
}
