//! The search controller: debouncing, filtering, scoring, and emission.

use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::intent::{self, SearchIntent};
use crate::scorer;
use crate::state::adapter::{StorageAdapter, UrlAdapter};
use crate::state::memory::{MemoryStorage, MemoryUrl};
use crate::state::store::PersistentStateStore;
use crate::types::{FilterOption, SearchState, SearchableItem};
use std::time::Duration;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default debounce delay between the last keystroke and recomputation.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Callback receiving the ranked, filtered result list on every change.
pub type ResultsCallback = Box<dyn FnMut(&[SearchableItem])>;
/// Callback performing the actual external navigation (e.g. a new tab).
pub type ExternalNavCallback = Box<dyn FnMut(&str)>;

/// The derivation input tuple. Results are recomputed wholesale whenever
/// this key changes; nothing partial is ever retained between
/// recomputations.
#[derive(Clone, PartialEq, Eq)]
struct DerivationKey {
  items_rev: u64,
  term: String,
  category: String,
  level: String,
  content_type: String,
}

/// Drives one resource-directory page's search.
///
/// The controller owns the item snapshot, the debounced search term, and
/// the [`PersistentStateStore`]; it derives the result list as a pure
/// function of `(items, debounced term, category, level, type)` and
/// notifies the host whenever that tuple changes.
///
/// Everything is single-threaded: the host forwards keystrokes and filter
/// toggles, and calls [`tick`](Self::tick) to let the debounce deadline
/// elapse. Create one with [`SearchController::builder`].
///
/// # Examples
///
/// ```rust
/// use relevo::prelude::*;
///
/// let items = vec![
///     SearchableItem::new("1", "Budget Planner").category("Tools"),
///     SearchableItem::new("2", "Stock Basics").category("Investing"),
/// ];
///
/// let mut controller = SearchController::builder()
///     .items(items)
///     .page_key("tools")
///     .build();
///
/// controller.set_category("Investing");
/// assert_eq!(controller.results().len(), 1);
/// ```
pub struct SearchController {
  items: Vec<SearchableItem>,
  items_rev: u64,
  categories: Vec<FilterOption>,
  levels: Vec<FilterOption>,
  types: Vec<FilterOption>,
  store: PersistentStateStore,
  debouncer: Debouncer,
  debounced_term: String,
  clock: Box<dyn Clock>,
  intent_detection: bool,
  on_results: ResultsCallback,
  on_external_nav: Option<ExternalNavCallback>,
  last_key: Option<DerivationKey>,
  last_results: Vec<SearchableItem>,
  closed: bool,
}

impl SearchController {
  /// Creates a new [`SearchControllerBuilder`].
  pub fn builder() -> SearchControllerBuilder {
    SearchControllerBuilder::new()
  }

  /// The canonical search state.
  pub fn state(&self) -> &SearchState {
    self.store.state()
  }

  /// The most recently derived result list.
  pub fn results(&self) -> &[SearchableItem] {
    &self.last_results
  }

  /// Category filter vocabulary supplied by the host.
  pub fn categories(&self) -> &[FilterOption] {
    &self.categories
  }

  /// Level filter vocabulary supplied by the host.
  pub fn levels(&self) -> &[FilterOption] {
    &self.levels
  }

  /// Type filter vocabulary supplied by the host.
  pub fn types(&self) -> &[FilterOption] {
    &self.types
  }

  /// Number of active discrete filters, for filter-badge display.
  pub fn active_filter_count(&self) -> usize {
    self.state().active_filter_count()
  }

  /// True while a keystroke is waiting out the debounce delay.
  pub fn is_searching(&self) -> bool {
    self.debouncer.is_pending()
  }

  /// The intent classified from the committed (debounced) term, for the
  /// host's indicator display. All-false when intent detection is off.
  pub fn current_intent(&self) -> SearchIntent {
    if self.intent_detection {
      intent::classify(&self.debounced_term)
    } else {
      SearchIntent::default()
    }
  }

  /// Records a keystroke. The state is persisted immediately; the result
  /// list only recomputes once the debounce delay elapses without another
  /// keystroke, via [`tick`](Self::tick).
  pub fn set_search_term(&mut self, term: impl Into<String>) {
    if self.closed {
      return;
    }
    let term = term.into();
    self.store.update(|state| state.search_term = term.clone());
    self.debouncer.schedule(term, self.clock.now());
  }

  /// Sets the category filter and recomputes immediately.
  pub fn set_category(&mut self, category: impl Into<String>) {
    let category = category.into();
    self.apply(|state| state.selected_category = category);
  }

  /// Sets the level filter and recomputes immediately.
  pub fn set_level(&mut self, level: impl Into<String>) {
    let level = level.into();
    self.apply(|state| state.selected_level = level);
  }

  /// Sets the type filter and recomputes immediately.
  pub fn set_type(&mut self, content_type: impl Into<String>) {
    let content_type = content_type.into();
    self.apply(|state| state.selected_type = content_type);
  }

  /// Shows or hides the filter panel. Display state only; never triggers a
  /// recomputation.
  pub fn set_show_filters(&mut self, show: bool) {
    if self.closed {
      return;
    }
    self.store.update(|state| state.show_filters = show);
  }

  /// Applies one coalesced state mutation: a single storage write, at most
  /// one URL replace, and at most one recomputation.
  ///
  /// A changed search term goes through the debounce window as if typed;
  /// filter changes take effect right away.
  pub fn apply(&mut self, mutate: impl FnOnce(&mut SearchState)) {
    if self.closed {
      return;
    }
    let term_before = self.state().search_term.clone();
    self.store.update(mutate);
    let term_after = self.state().search_term.clone();
    if term_after != term_before {
      self.debouncer.schedule(term_after, self.clock.now());
    }
    self.recompute();
  }

  /// Advances the debounce timer. Returns true when a pending term was
  /// committed and the result list recomputed.
  pub fn tick(&mut self) -> bool {
    if self.closed {
      return false;
    }
    match self.debouncer.poll(self.clock.now()) {
      Some(term) => {
        self.debounced_term = term;
        self.recompute();
        true
      }
      None => false,
    }
  }

  /// Replaces the item collection wholesale and recomputes.
  pub fn set_items(&mut self, items: Vec<SearchableItem>) {
    if self.closed {
      return;
    }
    self.items = items;
    self.items_rev += 1;
    self.recompute();
  }

  /// Clears the search term and every filter, removes the stored state,
  /// and recomputes against the full item list.
  pub fn clear(&mut self) {
    if self.closed {
      return;
    }
    self.store.clear();
    self.debouncer.cancel();
    self.debounced_term.clear();
    self.recompute();
  }

  /// Snapshots the current state, then delegates navigation to the host's
  /// external-navigation callback.
  pub fn open_external(&mut self, url: &str) {
    if self.closed {
      return;
    }
    self.store.snapshot_before_external();
    if let Some(on_nav) = &mut self.on_external_nav {
      on_nav(url);
    }
  }

  /// Window-focus handler. Restores the pre-navigation snapshot when one
  /// is pending; a second call finds the snapshot gone and is a no-op.
  /// Returns true when state was restored.
  pub fn handle_focus(&mut self) -> bool {
    if self.closed {
      return false;
    }
    if !self.store.restore_after_external() {
      return false;
    }
    // The restored term re-enters through the debounce window, exactly as
    // if it had been typed; filters apply on the next recomputation.
    let term = self.state().search_term.clone();
    self.debouncer.schedule(term, self.clock.now());
    self.recompute();
    true
  }

  /// Tears the controller down: cancels any in-flight debounce so no
  /// result callback can fire into a destroyed consumer. Further calls on
  /// the controller are no-ops.
  pub fn close(&mut self) {
    self.debouncer.cancel();
    self.closed = true;
  }

  /// Recomputes the derived result list and emits it when the derivation
  /// key changed.
  fn recompute(&mut self) {
    let key = DerivationKey {
      items_rev: self.items_rev,
      term: self.debounced_term.clone(),
      category: self.state().selected_category.clone(),
      level: self.state().selected_level.clone(),
      content_type: self.state().selected_type.clone(),
    };
    if self.last_key.as_ref() == Some(&key) {
      return;
    }

    let results = self.derive(&key);
    self.last_key = Some(key);
    self.last_results = results;
    (self.on_results)(&self.last_results);
  }

  /// Pure re-derivation from the key tuple; never an incremental patch.
  fn derive(&self, key: &DerivationKey) -> Vec<SearchableItem> {
    if key.term.trim().is_empty() {
      // No term: discrete filters only, original relative order.
      return self
        .items
        .iter()
        .filter(|item| Self::matches_filters(item, key))
        .cloned()
        .collect();
    }

    let intent = if self.intent_detection {
      intent::classify(&key.term)
    } else {
      SearchIntent::default()
    };

    #[cfg(feature = "parallel")]
    let scored_iter = self.items.par_iter();
    #[cfg(not(feature = "parallel"))]
    let scored_iter = self.items.iter();

    let mut scored: Vec<(i64, &SearchableItem)> = scored_iter
      .map(|item| (scorer::score(item, &key.term, &intent), item))
      .filter(|(score, item)| *score > 0 && Self::matches_filters(item, key))
      .collect();

    // Score descending, ties by ascending title; the sort is stable, so
    // items equal on both keep their original relative order.
    scored.sort_by(|(score_a, item_a), (score_b, item_b)| {
      score_b
        .cmp(score_a)
        .then_with(|| item_a.title.cmp(&item_b.title))
    });

    scored.into_iter().map(|(_, item)| item.clone()).collect()
  }

  /// Exact-match discrete filters; an empty filter is a wildcard.
  fn matches_filters(item: &SearchableItem, key: &DerivationKey) -> bool {
    (key.category.is_empty() || item.category == key.category)
      && (key.level.is_empty() || item.level.as_deref() == Some(key.level.as_str()))
      && (key.content_type.is_empty()
        || item.content_type.as_deref() == Some(key.content_type.as_str()))
  }
}

impl Drop for SearchController {
  fn drop(&mut self) {
    self.close();
  }
}

/// A builder for [`SearchController`] instances.
///
/// Everything is optional except what the host actually uses: with no
/// adapters supplied the controller persists into in-memory fakes, which
/// is also the right configuration for tests.
pub struct SearchControllerBuilder {
  items: Vec<SearchableItem>,
  categories: Vec<FilterOption>,
  levels: Vec<FilterOption>,
  types: Vec<FilterOption>,
  page_key: String,
  delay: Duration,
  storage: Option<Box<dyn StorageAdapter>>,
  url: Option<Box<dyn UrlAdapter>>,
  clock: Option<Box<dyn Clock>>,
  intent_detection: bool,
  on_results: Option<ResultsCallback>,
  on_external_nav: Option<ExternalNavCallback>,
}

impl SearchControllerBuilder {
  /// Creates a builder with defaults: 300 ms delay, intent detection on,
  /// in-memory persistence, system clock.
  pub fn new() -> Self {
    Self {
      items: Vec::new(),
      categories: Vec::new(),
      levels: Vec::new(),
      types: Vec::new(),
      page_key: "page".to_string(),
      delay: DEFAULT_SEARCH_DELAY,
      storage: None,
      url: None,
      clock: None,
      intent_detection: true,
      on_results: None,
      on_external_nav: None,
    }
  }

  /// Supplies the searchable item collection.
  pub fn items(mut self, items: Vec<SearchableItem>) -> Self {
    self.items = items;
    self
  }

  /// Supplies the category filter vocabulary.
  pub fn categories(mut self, categories: Vec<FilterOption>) -> Self {
    self.categories = categories;
    self
  }

  /// Supplies the level filter vocabulary.
  pub fn levels(mut self, levels: Vec<FilterOption>) -> Self {
    self.levels = levels;
    self
  }

  /// Supplies the type filter vocabulary.
  pub fn types(mut self, types: Vec<FilterOption>) -> Self {
    self.types = types;
    self
  }

  /// Sets the persistence namespace. Two concurrently mounted pages must
  /// never share a page key.
  pub fn page_key(mut self, page_key: impl Into<String>) -> Self {
    self.page_key = page_key.into();
    self
  }

  /// Sets the debounce delay.
  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  /// Injects the storage backend.
  pub fn storage(mut self, storage: Box<dyn StorageAdapter>) -> Self {
    self.storage = Some(storage);
    self
  }

  /// Injects the URL backend.
  pub fn url(mut self, url: Box<dyn UrlAdapter>) -> Self {
    self.url = Some(url);
    self
  }

  /// Injects the clock driving the debounce deadline.
  pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
    self.clock = Some(clock);
    self
  }

  /// Enables or disables intent classification.
  pub fn intent_detection(mut self, enabled: bool) -> Self {
    self.intent_detection = enabled;
    self
  }

  /// Registers the result callback.
  pub fn on_results(mut self, on_results: ResultsCallback) -> Self {
    self.on_results = Some(on_results);
    self
  }

  /// Registers the external-navigation callback.
  pub fn on_external_nav(mut self, on_external_nav: ExternalNavCallback) -> Self {
    self.on_external_nav = Some(on_external_nav);
    self
  }

  /// Mounts the store, seeds the debounced term from the restored state,
  /// and emits the initial result list.
  pub fn build(self) -> SearchController {
    let storage = self
      .storage
      .unwrap_or_else(|| Box::new(MemoryStorage::new()));
    let url = self.url.unwrap_or_else(|| Box::new(MemoryUrl::new()));
    let store = PersistentStateStore::mount(self.page_key, storage, url);
    let debounced_term = store.state().search_term.clone();

    let mut controller = SearchController {
      items: self.items,
      items_rev: 0,
      categories: self.categories,
      levels: self.levels,
      types: self.types,
      store,
      debouncer: Debouncer::new(self.delay),
      debounced_term,
      clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
      intent_detection: self.intent_detection,
      on_results: self.on_results.unwrap_or_else(|| Box::new(|_| {})),
      on_external_nav: self.on_external_nav,
      last_key: None,
      last_results: Vec::new(),
      closed: false,
    };
    controller.recompute();
    controller
  }
}

impl Default for SearchControllerBuilder {
  fn default() -> Self {
    Self::new()
  }
}
