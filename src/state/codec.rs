//! Encoding of [`SearchState`] into its two external representations: the
//! URL query string and the JSON storage blob.
//!
//! The query string carries only non-default fields, so a default state
//! encodes to the empty string. Unknown parameters present in a current
//! query string are never removed; they are carried through rewrites
//! verbatim, after the recognized ones.

use crate::types::SearchState;
use std::borrow::Cow;

pub(crate) const PARAM_SEARCH: &str = "search";
pub(crate) const PARAM_CATEGORY: &str = "category";
pub(crate) const PARAM_LEVEL: &str = "level";
pub(crate) const PARAM_TYPE: &str = "type";
pub(crate) const PARAM_FILTERS: &str = "filters";

const RECOGNIZED: &[&str] = &[
    PARAM_SEARCH,
    PARAM_CATEGORY,
    PARAM_LEVEL,
    PARAM_TYPE,
    PARAM_FILTERS,
];

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| part.to_string())
}

fn split_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(segment), String::new()),
        })
}

/// Encodes the non-default fields of `state` as a query string, without a
/// leading `?`.
pub fn to_query_string(state: &SearchState) -> String {
    merge_query_string(state, "")
}

/// Encodes `state` while preserving unrecognized parameters of `current`.
///
/// Recognized parameters come first in a fixed order; unknown segments keep
/// their relative order and their original (still-encoded) spelling.
pub fn merge_query_string(state: &SearchState, current: &str) -> String {
    let mut segments: Vec<String> = Vec::new();

    let mut push = |name: &str, value: &str| {
        if !value.is_empty() {
            segments.push(format!("{}={}", name, urlencoding::encode(value)));
        }
    };
    push(PARAM_SEARCH, &state.search_term);
    push(PARAM_CATEGORY, &state.selected_category);
    push(PARAM_LEVEL, &state.selected_level);
    push(PARAM_TYPE, &state.selected_type);
    if state.show_filters {
        segments.push(format!("{}=true", PARAM_FILTERS));
    }

    for segment in current.split('&').filter(|segment| !segment.is_empty()) {
        let key = match segment.split_once('=') {
            Some((key, _)) => decode(key),
            None => decode(segment),
        };
        if !RECOGNIZED.contains(&key.as_str()) {
            segments.push(segment.to_string());
        }
    }

    segments.join("&")
}

/// Parses a query string into a [`SearchState`].
///
/// The first occurrence of each recognized parameter wins; unknown
/// parameters are ignored. Absent parameters leave their field at the
/// default.
pub fn from_query_string(query: &str) -> SearchState {
    let mut state = SearchState::default();
    let mut filters_seen = false;
    for (key, value) in split_pairs(query) {
        match key.as_str() {
            PARAM_SEARCH if state.search_term.is_empty() => state.search_term = value,
            PARAM_CATEGORY if state.selected_category.is_empty() => {
                state.selected_category = value
            }
            PARAM_LEVEL if state.selected_level.is_empty() => state.selected_level = value,
            PARAM_TYPE if state.selected_type.is_empty() => state.selected_type = value,
            PARAM_FILTERS if !filters_seen => {
                filters_seen = true;
                state.show_filters = value == "true";
            }
            _ => {}
        }
    }
    state
}

/// True when the query string carries any recognized, non-default
/// parameter; such a URL takes priority over stored state at mount.
pub fn has_recognized_params(query: &str) -> bool {
    split_pairs(query).any(|(key, value)| match key.as_str() {
        PARAM_SEARCH | PARAM_CATEGORY | PARAM_LEVEL | PARAM_TYPE => !value.is_empty(),
        PARAM_FILTERS => value == "true",
        _ => false,
    })
}

/// Serializes `state` for session storage.
pub fn to_storage_blob(state: &SearchState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parses a session-storage blob. A parse failure is treated by callers
/// exactly like an absent blob.
pub fn from_storage_blob(blob: &str) -> Result<SearchState, serde_json::Error> {
    serde_json::from_str(blob)
}
