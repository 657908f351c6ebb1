//! Free-text query intent classification.
//!
//! A query like "beginner investing video" carries more than its literal
//! words: it names a content type, a difficulty level, and a topic. The
//! classifier turns those hints into a [`SearchIntent`] that the scorer
//! uses to re-weight results. Classification is pure substring matching
//! against fixed keyword tables; there is no tokenization or stemming.

use serde::{Deserialize, Serialize};

/// Non-exclusive intent signals classified from a free-text query.
///
/// Produced fresh per query and never mutated afterwards. Any combination
/// of flags may be set at once; a query can be a video search and an
/// education search simultaneously.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
  /// The query asks for video content.
  pub is_video_search: bool,
  /// The query asks for websites/tools.
  pub is_website_search: bool,
  /// The query asks for educational content.
  pub is_education_search: bool,
  /// The query asks for government/official resources.
  pub is_government_search: bool,
  /// The query asks for beginner-level material.
  pub is_beginner_search: bool,
  /// The query asks for advanced material.
  pub is_advanced_search: bool,
  /// Topical tags whose keyword group matched, in table declaration order.
  pub category_intent: Vec<String>,
}

const VIDEO_KEYWORDS: &[&str] = &[
  "video", "watch", "tutorial", "lesson", "course", "lecture", "webinar",
  "presentation", "demo", "demonstration", "youtube", "channel",
];

const WEBSITE_KEYWORDS: &[&str] = &[
  "website", "site", "portal", "platform", "tool", "calculator", "resource",
  "guide", "article", "blog", "page",
];

const EDUCATION_KEYWORDS: &[&str] = &[
  "learn", "education", "educational", "teaching", "study", "academic",
  "school", "university", "college", "institution",
];

const GOVERNMENT_KEYWORDS: &[&str] = &[
  "government", "official", "federal", "state", "agency", "department",
  "bureau", "administration", "treasury", "irs",
];

const BEGINNER_KEYWORDS: &[&str] = &[
  "beginner", "basic", "intro", "introduction", "start", "starting",
  "fundamentals", "basics", "simple", "easy",
];

const ADVANCED_KEYWORDS: &[&str] = &[
  "advanced", "expert", "professional", "complex", "sophisticated",
  "detailed", "comprehensive", "in-depth",
];

/// Keyword groups mapped to topical tags, in declaration order.
const CATEGORY_INTENTS: &[(&[&str], &str)] = &[
  (
    &["investing", "investment", "stocks", "bonds", "portfolio", "market"],
    "investing",
  ),
  (
    &["budget", "budgeting", "money management", "spending", "saving"],
    "budgeting",
  ),
  (
    &["credit", "credit score", "credit card", "debt", "loan"],
    "credit",
  ),
  (
    &["retirement", "pension", "401k", "ira", "social security"],
    "retirement",
  ),
  (
    &["insurance", "health insurance", "life insurance", "coverage"],
    "insurance",
  ),
  (&["tax", "taxes", "irs", "filing", "deduction"], "taxes"),
  (
    &["business", "entrepreneur", "startup", "small business"],
    "business",
  ),
  (
    &["real estate", "mortgage", "home buying", "property"],
    "real estate",
  ),
  (
    &["stem", "science", "technology", "engineering", "mathematics", "math"],
    "stem",
  ),
  (&["textbook", "book", "reading", "literature"], "textbooks"),
  (&["career", "job", "employment", "work"], "career"),
];

fn any_keyword(query: &str, keywords: &[&str]) -> bool {
  keywords.iter().any(|k| query.contains(k))
}

/// Classifies a free-text query into a [`SearchIntent`].
///
/// The query is trimmed and lowercased; each keyword group fires when at
/// least one of its keywords appears as a substring. An empty or
/// whitespace-only query yields the default (all-false, no tags) intent.
pub fn classify(query: &str) -> SearchIntent {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return SearchIntent::default();
  }

  SearchIntent {
    is_video_search: any_keyword(&query, VIDEO_KEYWORDS),
    is_website_search: any_keyword(&query, WEBSITE_KEYWORDS),
    is_education_search: any_keyword(&query, EDUCATION_KEYWORDS),
    is_government_search: any_keyword(&query, GOVERNMENT_KEYWORDS),
    is_beginner_search: any_keyword(&query, BEGINNER_KEYWORDS),
    is_advanced_search: any_keyword(&query, ADVANCED_KEYWORDS),
    category_intent: CATEGORY_INTENTS
      .iter()
      .filter(|(keywords, _)| any_keyword(&query, keywords))
      .map(|(_, tag)| (*tag).to_string())
      .collect(),
  }
}
