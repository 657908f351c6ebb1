//! Core data types for the relevo search engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier type for searchable items.
///
/// An alias rather than a newtype: ids come straight from host catalogs and
/// are only ever compared and cloned.
pub type EntityId = String;

/// One searchable entry in a resource directory.
///
/// The fixed fields are the only ones the scorer and filters ever look at.
/// Anything else the host carries for display purposes lives in `extra`,
/// which is captured opaquely and round-trips through serialization
/// untouched.
///
/// `id` uniqueness is a precondition supplied by the host; the engine does
/// not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableItem {
  /// Stable, unique identifier for the item.
  pub id: EntityId,
  /// Display title; the highest-weighted field in scoring.
  pub title: String,
  /// Longer descriptive text; the lowest-weighted scored field.
  #[serde(default)]
  pub description: String,
  /// Topical category the item belongs to.
  #[serde(default)]
  pub category: String,
  /// Optional difficulty level (e.g. "Beginner", "Advanced").
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub level: Option<String>,
  /// Optional content type (e.g. "video", "website").
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,
  /// Optional target URL. Used only for video-platform detection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  /// Host-specific extension attributes, carried but never inspected.
  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_json::Value>,
}

impl SearchableItem {
  /// Creates an item with the required fields; the optional ones default to
  /// empty.
  pub fn new(id: impl Into<EntityId>, title: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      description: String::new(),
      category: String::new(),
      level: None,
      content_type: None,
      url: None,
      extra: BTreeMap::new(),
    }
  }

  /// Sets the description.
  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  /// Sets the category.
  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = category.into();
    self
  }

  /// Sets the difficulty level.
  pub fn level(mut self, level: impl Into<String>) -> Self {
    self.level = Some(level.into());
    self
  }

  /// Sets the content type.
  pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
    self.content_type = Some(content_type.into());
    self
  }

  /// Sets the target URL.
  pub fn url(mut self, url: impl Into<String>) -> Self {
    self.url = Some(url.into());
    self
  }

  /// Adds a host-specific extension attribute.
  pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.extra.insert(key.into(), value);
    self
  }
}

/// One entry in a filter vocabulary supplied by the host.
///
/// Vocabularies enumerate candidate values for the category/level/type
/// filters. They are display metadata only: the engine never validates that
/// item field values appear in them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
  /// The filter value matched against item fields.
  pub value: String,
  /// Human-readable label.
  pub label: String,
  /// Optional item count shown next to the label.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub count: Option<usize>,
}

impl FilterOption {
  /// Creates a filter option without a count.
  pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      label: label.into(),
      count: None,
    }
  }

  /// Sets the item count.
  pub fn count(mut self, count: usize) -> Self {
    self.count = Some(count);
    self
  }
}

/// The canonical search/filter state for one directory page.
///
/// Must round-trip to a URL query string and to a JSON storage blob with no
/// information loss for non-default fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
  /// The raw (pre-debounce) free-text search term.
  #[serde(default)]
  pub search_term: String,
  /// Selected category filter; empty means no filter.
  #[serde(default)]
  pub selected_category: String,
  /// Selected level filter; empty means no filter.
  #[serde(default)]
  pub selected_level: String,
  /// Selected type filter; empty means no filter.
  #[serde(default)]
  pub selected_type: String,
  /// Whether the filter panel is expanded.
  #[serde(default)]
  pub show_filters: bool,
}

impl SearchState {
  /// Returns true when every field holds its default value.
  pub fn is_default(&self) -> bool {
    self == &Self::default()
  }

  /// Number of active discrete filters (category, level, type).
  pub fn active_filter_count(&self) -> usize {
    [
      &self.selected_category,
      &self.selected_level,
      &self.selected_type,
    ]
    .iter()
    .filter(|f| !f.is_empty())
    .count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extra_fields_round_trip_through_serde() {
    let item = SearchableItem::new("a1", "Compound Interest Calculator")
      .category("Tools")
      .extra("icon", serde_json::json!("calculator"))
      .extra("featured", serde_json::json!(true));

    let json = serde_json::to_string(&item).unwrap();
    let back: SearchableItem = serde_json::from_str(&json).unwrap();
    assert_eq!(back, item);
    assert_eq!(back.extra["icon"], serde_json::json!("calculator"));
  }

  #[test]
  fn content_type_serializes_as_type() {
    let item = SearchableItem::new("a1", "Intro").content_type("video");
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["type"], serde_json::json!("video"));
  }

  #[test]
  fn active_filter_count_ignores_search_term() {
    let state = SearchState {
      search_term: "budget".into(),
      selected_category: "Finance".into(),
      selected_type: "video".into(),
      ..Default::default()
    };
    assert_eq!(state.active_filter_count(), 2);
    assert!(!state.is_default());
    assert!(SearchState::default().is_default());
  }
}
