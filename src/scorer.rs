//! Tiered additive relevance scoring.
//!
//! Every tier whose condition holds contributes its points; tiers never
//! short-circuit each other. A score of `0` means the item is excluded from
//! results; any positive score means it is included. Intent adjustments are
//! applied only after at least one lexical tier has fired, and they may be
//! negative.

use crate::intent::SearchIntent;
use crate::types::SearchableItem;

const EXACT_TITLE: i64 = 1000;
const EXACT_CATEGORY: i64 = 800;
const TITLE_PREFIX_PHRASE: i64 = 600;
const TITLE_PHRASE: i64 = 400;
const CATEGORY_PHRASE: i64 = 300;
const DESCRIPTION_PHRASE: i64 = 200;
const TITLE_WORD: i64 = 150;
const TITLE_WORD_PARTIAL: i64 = 100;
const CATEGORY_WORD: i64 = 80;
const DESCRIPTION_WORD: i64 = 50;

const VIDEO_MATCH_BOOST: i64 = 500;
const VIDEO_MISMATCH_PENALTY: i64 = -100;
const WEBSITE_MATCH_BOOST: i64 = 400;
const WEBSITE_MISMATCH_PENALTY: i64 = -50;
const EDUCATION_BOOST: i64 = 300;
const GOVERNMENT_BOOST: i64 = 350;
const LEVEL_BOOST: i64 = 200;
const CATEGORY_INTENT_BOOST: i64 = 150;
const MULTI_WORD_BONUS: i64 = 25;

/// Video platforms recognized in item URLs.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// True when the item is video content: hosted on a known video platform or
/// explicitly typed as such.
pub fn is_video_item(item: &SearchableItem) -> bool {
  let hosted = item
    .url
    .as_deref()
    .map(|url| VIDEO_HOSTS.iter().any(|host| url.contains(host)))
    .unwrap_or(false);
  hosted || item.content_type.as_deref() == Some("video")
}

/// True when the item is website content: anything that is not a video, or
/// anything explicitly typed as a website.
pub fn is_website_item(item: &SearchableItem) -> bool {
  !is_video_item(item) || item.content_type.as_deref() == Some("website")
}

/// Scores one item against a query and its classified intent.
///
/// Lexical tiers are additive and independent: an exact title match also
/// earns the title phrase tier, and every query word of two or more
/// characters is scored on its own against title, category, and
/// description. If no lexical tier fires the result is `0` and intent
/// adjustments are skipped entirely.
///
/// No floor is applied below the match boundary: negative content-type
/// adjustments can push a lexically matching item to zero or below, at
/// which point it is dropped by the caller's positive-score filter. This
/// preserves the observed behavior of the additive model.
pub fn score(item: &SearchableItem, query: &str, intent: &SearchIntent) -> i64 {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return 0;
  }

  let title = item.title.to_lowercase();
  let description = item.description.to_lowercase();
  let category = item.category.to_lowercase();
  let words: Vec<&str> = query.split_whitespace().collect();

  let mut score = 0;
  let mut has_match = false;

  // Exact matches (highest priority).
  if title == query {
    score += EXACT_TITLE;
    has_match = true;
  }
  if category == query {
    score += EXACT_CATEGORY;
    has_match = true;
  }

  // Phrase matches.
  if title.contains(&query) {
    score += if title.starts_with(&query) {
      TITLE_PREFIX_PHRASE
    } else {
      TITLE_PHRASE
    };
    has_match = true;
  }
  if category.contains(&query) {
    score += CATEGORY_PHRASE;
    has_match = true;
  }
  if description.contains(&query) {
    score += DESCRIPTION_PHRASE;
    has_match = true;
  }

  // Individual word matches.
  for word in scored_words(&words) {
    if title.contains(word) {
      let whole_word = title.split_whitespace().any(|title_word| title_word == word);
      score += if whole_word { TITLE_WORD } else { TITLE_WORD_PARTIAL };
      has_match = true;
    }
    if category.contains(word) {
      score += CATEGORY_WORD;
      has_match = true;
    }
    if description.contains(word) {
      score += DESCRIPTION_WORD;
      has_match = true;
    }
  }

  if !has_match {
    return 0;
  }

  // Content-type prioritization.
  let is_video = is_video_item(item);
  let is_website = is_website_item(item);

  if intent.is_video_search && is_video {
    score += VIDEO_MATCH_BOOST;
  } else if intent.is_video_search && is_website {
    score += VIDEO_MISMATCH_PENALTY;
  }

  if intent.is_website_search && is_website {
    score += WEBSITE_MATCH_BOOST;
  } else if intent.is_website_search && is_video {
    score += WEBSITE_MISMATCH_PENALTY;
  }

  // Domain boosts.
  if intent.is_education_search
    && ["educational", "academic", "university"]
      .iter()
      .any(|term| category.contains(term))
  {
    score += EDUCATION_BOOST;
  }
  if intent.is_government_search
    && ["government", "official", "federal"]
      .iter()
      .any(|term| category.contains(term))
  {
    score += GOVERNMENT_BOOST;
  }

  // Difficulty boosts.
  if intent.is_beginner_search && item.level.as_deref() == Some("Beginner") {
    score += LEVEL_BOOST;
  } else if intent.is_advanced_search && item.level.as_deref() == Some("Advanced") {
    score += LEVEL_BOOST;
  }

  // Topical tag bonus, cumulative across tags.
  for tag in &intent.category_intent {
    if category.contains(tag.as_str()) || title.contains(tag.as_str()) {
      score += CATEGORY_INTENT_BOOST;
    }
  }

  // Bonus for matching more than one query word anywhere.
  let matched_words = scored_words(&words)
    .filter(|word| title.contains(*word) || category.contains(*word) || description.contains(*word))
    .count() as i64;
  if matched_words > 1 {
    score += matched_words * MULTI_WORD_BONUS;
  }

  score
}

/// Query words that participate in per-word tiers: two or more characters.
fn scored_words<'a>(words: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
  words
    .iter()
    .copied()
    .filter(|word| word.chars().count() >= 2)
}
