//! In-memory adapter implementations.
//!
//! `MemoryStorage` and `MemoryUrl` are shared-handle fakes: clones point at
//! the same underlying data, so a test (or host) can keep one handle while
//! the store owns a boxed clone. `MemoryStorage` can also be switched into
//! a failing mode to exercise the degradation paths.

use crate::error::StorageError;
use crate::state::adapter::{StorageAdapter, UrlAdapter};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct StorageInner {
    entries: HashMap<String, String>,
    failing: bool,
}

/// In-memory session-storage stand-in.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<StorageInner>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// When `failing` is true, every operation returns a [`StorageError`],
    /// mimicking disabled or quota-exhausted storage.
    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    /// Reads a raw entry, bypassing the failing mode. Test helper.
    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.inner.borrow().failing {
            Err(StorageError::new("session storage disabled"))
        } else {
            Ok(())
        }
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct UrlInner {
    query: String,
    replace_count: usize,
}

/// In-memory URL bar stand-in.
#[derive(Clone, Default)]
pub struct MemoryUrl {
    inner: Rc<RefCell<UrlInner>>,
}

impl MemoryUrl {
    /// Creates a URL with an empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a URL seeded with the given query string (no leading `?`).
    pub fn with_query(query: impl Into<String>) -> Self {
        let url = Self::default();
        url.inner.borrow_mut().query = query.into();
        url
    }

    /// The current query string. Test helper mirroring [`UrlAdapter::query`].
    pub fn current(&self) -> String {
        self.inner.borrow().query.clone()
    }

    /// How many times the query has been replaced.
    pub fn replace_count(&self) -> usize {
        self.inner.borrow().replace_count
    }
}

impl UrlAdapter for MemoryUrl {
    fn query(&self) -> String {
        self.inner.borrow().query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.query = query.to_string();
        inner.replace_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let mut handle = storage.clone();
        handle.set("k", "v").unwrap();
        assert_eq!(storage.raw_get("k"), Some("v".to_string()));
    }

    #[test]
    fn failing_mode_errors_every_operation() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        storage.set_failing(true);
        assert!(storage.get("k").is_err());
        assert!(storage.set("k", "w").is_err());
        assert!(storage.remove("k").is_err());
        // Raw access still sees the earlier write.
        assert_eq!(storage.raw_get("k"), Some("v".to_string()));
    }

    #[test]
    fn url_counts_replacements() {
        let url = MemoryUrl::with_query("a=1");
        let mut handle = url.clone();
        handle.replace_query("a=2");
        assert_eq!(url.current(), "a=2");
        assert_eq!(url.replace_count(), 1);
    }
}
