//! Canonical search state, mirrored to the URL and session storage.
//!
//! One store owns one page's [`SearchState`]. Reads at mount follow a
//! strict priority (URL, then storage, then defaults); every mutation is
//! synchronously written back to both representations, with the URL
//! replaced only when its serialized form actually changed. Storage
//! failures are logged and swallowed; the store then keeps working purely
//! in memory while still attempting URL synchronization.

use crate::error::StateError;
use crate::state::adapter::{StorageAdapter, UrlAdapter};
use crate::state::codec;
use crate::types::SearchState;
use tracing::warn;

/// Prefix shared by all storage keys, namespaced per page key.
const STORAGE_PREFIX: &str = "searchState_";
/// Suffix of the transient external-navigation snapshot key.
const EXTERNAL_SUFFIX: &str = "_beforeExternal";

/// How the state was obtained at mount. Useful for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountSource {
  /// No URL parameters and no stored blob; defaults loaded.
  Defaults,
  /// The URL carried recognized non-default parameters.
  Url,
  /// A stored blob was found and parsed.
  Storage,
}

/// Keeps one page's search state consistent across memory, the URL, and
/// session storage, including the save-before-navigate/restore-on-focus
/// round trip for external links.
pub struct PersistentStateStore {
  page_key: String,
  state: SearchState,
  source: MountSource,
  storage: Box<dyn StorageAdapter>,
  url: Box<dyn UrlAdapter>,
}

impl PersistentStateStore {
  /// Mounts the store for `page_key`, resolving the initial state.
  ///
  /// Priority: URL query parameters win when any recognized one is
  /// non-default; otherwise a stored blob under `searchState_<pageKey>` is
  /// used; otherwise everything defaults. A malformed blob is treated
  /// exactly like an absent one. The resolved state is synchronized back
  /// out immediately.
  pub fn mount(
    page_key: impl Into<String>,
    storage: Box<dyn StorageAdapter>,
    url: Box<dyn UrlAdapter>,
  ) -> Self {
    let page_key = page_key.into();
    let mut store = Self {
      page_key,
      state: SearchState::default(),
      source: MountSource::Defaults,
      storage,
      url,
    };

    let query = store.url.query();
    if codec::has_recognized_params(&query) {
      store.state = codec::from_query_string(&query);
      store.source = MountSource::Url;
    } else {
      match store.read_blob(&store.storage_key()) {
        Ok(Some(state)) => {
          store.state = state;
          store.source = MountSource::Storage;
        }
        Ok(None) => {}
        Err(error) => warn!(page_key = %store.page_key, %error, "failed to read saved search state"),
      }
    }

    store.sync();
    store
  }

  /// The page key namespacing this store's persistence.
  pub fn page_key(&self) -> &str {
    &self.page_key
  }

  /// The canonical state.
  pub fn state(&self) -> &SearchState {
    &self.state
  }

  /// Where the mounted state came from.
  pub fn mount_source(&self) -> MountSource {
    self.source
  }

  /// Applies one coalesced mutation and synchronizes both mirrors.
  ///
  /// All field changes belonging to one logical update must go through a
  /// single call, so the URL is replaced at most once per mutation.
  pub fn update(&mut self, mutate: impl FnOnce(&mut SearchState)) {
    mutate(&mut self.state);
    self.sync();
  }

  /// Resets to the default state and removes the stored blob.
  pub fn clear(&mut self) {
    self.state = SearchState::default();
    let key = self.storage_key();
    if let Err(error) = self.storage.remove(&key) {
      warn!(page_key = %self.page_key, %error, "failed to clear saved search state");
    }
    self.sync_url();
  }

  /// Snapshots the current state ahead of an external navigation.
  ///
  /// The snapshot lives under `searchState_<pageKey>_beforeExternal` until
  /// [`restore_after_external`](Self::restore_after_external) consumes it.
  pub fn snapshot_before_external(&mut self) {
    let key = self.snapshot_key();
    if let Err(error) = self.write_blob(&key, &self.state.clone()) {
      warn!(page_key = %self.page_key, %error, "failed to save search state before external navigation");
    }
  }

  /// Restores the pre-navigation snapshot, if one is pending.
  ///
  /// Returns true when a snapshot was consumed and the state replaced;
  /// calling again afterwards is a no-op. Invoked by the controller on
  /// window focus.
  pub fn restore_after_external(&mut self) -> bool {
    let key = self.snapshot_key();
    match self.read_blob(&key) {
      Ok(Some(state)) => {
        self.state = state;
        if let Err(error) = self.storage.remove(&key) {
          warn!(page_key = %self.page_key, %error, "failed to drop external-navigation snapshot");
        }
        self.sync();
        true
      }
      Ok(None) => false,
      Err(error) => {
        warn!(page_key = %self.page_key, %error, "failed to restore search state after external navigation");
        false
      }
    }
  }

  fn storage_key(&self) -> String {
    format!("{}{}", STORAGE_PREFIX, self.page_key)
  }

  fn snapshot_key(&self) -> String {
    format!("{}{}{}", STORAGE_PREFIX, self.page_key, EXTERNAL_SUFFIX)
  }

  fn read_blob(&self, key: &str) -> Result<Option<SearchState>, StateError> {
    match self.storage.get(key)? {
      Some(blob) => Ok(Some(codec::from_storage_blob(&blob)?)),
      None => Ok(None),
    }
  }

  fn write_blob(&mut self, key: &str, state: &SearchState) -> Result<(), StateError> {
    let blob = codec::to_storage_blob(state)?;
    self.storage.set(key, &blob)?;
    Ok(())
  }

  /// Writes the blob and refreshes the URL.
  fn sync(&mut self) {
    let key = self.storage_key();
    if let Err(error) = self.write_blob(&key, &self.state.clone()) {
      warn!(page_key = %self.page_key, %error, "failed to save search state");
    }
    self.sync_url();
  }

  /// Replaces the URL query only when its serialized form changed;
  /// unrecognized parameters are carried over untouched.
  fn sync_url(&mut self) {
    let current = self.url.query();
    let next = codec::merge_query_string(&self.state, &current);
    if next != current {
      self.url.replace_query(&next);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::memory::{MemoryStorage, MemoryUrl};

  fn mounted(storage: &MemoryStorage, url: &MemoryUrl) -> PersistentStateStore {
    PersistentStateStore::mount("tools", Box::new(storage.clone()), Box::new(url.clone()))
  }

  #[test]
  fn mount_prefers_url_over_storage() {
    let storage = MemoryStorage::new();
    let mut handle = storage.clone();
    handle
      .set(
        "searchState_tools",
        r#"{"search_term":"saved","selected_category":"","selected_level":"","selected_type":"","show_filters":false}"#,
      )
      .unwrap();

    let url = MemoryUrl::with_query("search=from%20url");
    let store = mounted(&storage, &url);
    assert_eq!(store.state().search_term, "from url");
    assert_eq!(store.mount_source(), MountSource::Url);
  }

  #[test]
  fn mount_falls_back_to_storage_then_defaults() {
    let storage = MemoryStorage::new();
    let mut handle = storage.clone();
    handle
      .set(
        "searchState_tools",
        r#"{"search_term":"saved","selected_category":"","selected_level":"","selected_type":"","show_filters":false}"#,
      )
      .unwrap();
    let store = mounted(&storage, &MemoryUrl::new());
    assert_eq!(store.state().search_term, "saved");
    assert_eq!(store.mount_source(), MountSource::Storage);

    let empty = mounted(&MemoryStorage::new(), &MemoryUrl::new());
    assert!(empty.state().is_default());
    assert_eq!(empty.mount_source(), MountSource::Defaults);
  }

  #[test]
  fn malformed_blob_is_treated_as_absent() {
    let storage = MemoryStorage::new();
    let mut handle = storage.clone();
    handle.set("searchState_tools", "{not json").unwrap();
    let store = mounted(&storage, &MemoryUrl::new());
    assert!(store.state().is_default());
    assert_eq!(store.mount_source(), MountSource::Defaults);
  }

  #[test]
  fn update_syncs_storage_and_url_once() {
    let storage = MemoryStorage::new();
    let url = MemoryUrl::new();
    let mut store = mounted(&storage, &url);
    let replaces_after_mount = url.replace_count();

    store.update(|state| {
      state.search_term = "tax".into();
      state.selected_level = "Advanced".into();
    });

    assert_eq!(url.current(), "search=tax&level=Advanced");
    assert_eq!(url.replace_count(), replaces_after_mount + 1);
    let blob = storage.raw_get("searchState_tools").unwrap();
    assert_eq!(
      codec::from_storage_blob(&blob).unwrap(),
      *store.state()
    );
  }

  #[test]
  fn unchanged_serialization_skips_url_replace() {
    let url = MemoryUrl::new();
    let mut store = mounted(&MemoryStorage::new(), &url);
    let before = url.replace_count();
    store.update(|state| state.search_term = String::new());
    assert_eq!(url.replace_count(), before);
  }

  #[test]
  fn storage_failure_degrades_to_memory_only() {
    let storage = MemoryStorage::new();
    storage.set_failing(true);
    let url = MemoryUrl::new();
    let mut store = mounted(&storage, &url);

    store.update(|state| state.selected_category = "STEM".into());
    assert_eq!(store.state().selected_category, "STEM");
    // URL synchronization keeps working.
    assert_eq!(url.current(), "category=STEM");
    assert!(storage.is_empty());
  }

  #[test]
  fn clear_removes_the_stored_blob() {
    let storage = MemoryStorage::new();
    let url = MemoryUrl::new();
    let mut store = mounted(&storage, &url);
    store.update(|state| state.search_term = "tax".into());
    assert!(storage.raw_get("searchState_tools").is_some());

    store.clear();
    assert!(store.state().is_default());
    assert_eq!(storage.raw_get("searchState_tools"), None);
    assert_eq!(url.current(), "");
  }
}
