use proptest::prelude::*;
use relevo::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(300);

fn catalog() -> Vec<SearchableItem> {
  vec![
    SearchableItem::new("1", "Mathematics")
      .category("STEM")
      .description("Algebra and geometry"),
    SearchableItem::new("2", "Budget Planner")
      .category("Finance")
      .description("Track monthly spending"),
    SearchableItem::new("3", "Physics Lab")
      .category("STEM")
      .description("Mechanics experiments")
      .level("Advanced"),
    SearchableItem::new("4", "History Atlas")
      .category("Humanities")
      .description("Maps of the ancient world"),
  ]
}

/// Captures each emission as a list of item ids.
fn recording() -> (Rc<RefCell<Vec<Vec<String>>>>, ResultsCallback) {
  let emissions: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
  let sink = emissions.clone();
  let callback: ResultsCallback = Box::new(move |results: &[SearchableItem]| {
    sink
      .borrow_mut()
      .push(results.iter().map(|item| item.id.clone()).collect());
  });
  (emissions, callback)
}

fn controller_with(
  items: Vec<SearchableItem>,
  clock: &ManualClock,
  callback: ResultsCallback,
) -> SearchController {
  SearchController::builder()
    .items(items)
    .page_key("test")
    .delay(DELAY)
    .clock(Box::new(clock.clone()))
    .on_results(callback)
    .build()
}

#[test]
fn empty_term_applies_filters_in_original_order() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  // Initial emission: full list, original order.
  assert_eq!(emissions.borrow().len(), 1);
  assert_eq!(emissions.borrow()[0], vec!["1", "2", "3", "4"]);

  controller.set_category("STEM");
  assert_eq!(emissions.borrow().len(), 2);
  assert_eq!(emissions.borrow()[1], vec!["1", "3"]);

  controller.set_level("Advanced");
  assert_eq!(emissions.borrow().last().unwrap(), &vec!["3"]);
}

#[test]
fn debounce_commits_only_the_final_term() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  for term in ["b", "bu", "budget"] {
    controller.set_search_term(term);
    assert!(controller.is_searching());
    clock.advance(Duration::from_millis(50));
    assert!(!controller.tick());
  }

  // The raw term is persisted immediately, but no recomputation happened.
  assert_eq!(controller.state().search_term, "budget");
  assert_eq!(emissions.borrow().len(), 1);

  clock.advance(DELAY);
  assert!(controller.tick());
  assert!(!controller.is_searching());

  // Exactly one recomputation, from the final value only.
  assert_eq!(emissions.borrow().len(), 2);
  assert_eq!(emissions.borrow()[1], vec!["2"]);
}

#[test]
fn scored_results_sort_by_score_then_title() {
  let items = vec![
    SearchableItem::new("weak", "Course Notes").description("A budget appendix"),
    SearchableItem::new("zeta", "Zeta Budget"),
    SearchableItem::new("alpha", "Alpha Budget"),
    SearchableItem::new("exact", "Budget"),
    SearchableItem::new("prefix", "Budget Planner"),
  ];
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(items, &clock, callback);

  controller.set_search_term("budget");
  clock.advance(DELAY);
  controller.tick();

  // exact: 1000 + 600 + 150; prefix: 600 + 150; alpha/zeta: 400 + 150
  // each, tied, broken by title; weak: description only, 200 + 50.
  let last = emissions.borrow().last().unwrap().clone();
  assert_eq!(last, vec!["exact", "prefix", "alpha", "zeta", "weak"]);
}

#[test]
fn equal_scores_and_titles_keep_original_relative_order() {
  let items = vec![
    SearchableItem::new("first", "Budget Planner"),
    SearchableItem::new("second", "Budget Planner"),
  ];
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(items, &clock, callback);

  controller.set_search_term("budget planner");
  clock.advance(DELAY);
  controller.tick();

  assert_eq!(
    emissions.borrow().last().unwrap(),
    &vec!["first", "second"]
  );
}

#[test]
fn every_emitted_item_scores_positive() {
  let clock = ManualClock::new();
  let (_, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  controller.set_search_term("stem mechanics");
  clock.advance(DELAY);
  controller.tick();

  let intent = classify("stem mechanics");
  for item in controller.results() {
    assert!(score(item, "stem mechanics", &intent) > 0);
  }
}

#[test]
fn transitions_between_branches_emit() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  controller.set_search_term("physics");
  clock.advance(DELAY);
  controller.tick();
  assert_eq!(emissions.borrow().last().unwrap(), &vec!["3"]);

  // Clearing flips back to the filtered-passthrough branch immediately,
  // with no debounce wait.
  controller.clear();
  assert_eq!(emissions.borrow().last().unwrap(), &vec!["1", "2", "3", "4"]);
  assert!(controller.state().is_default());
}

#[test]
fn unchanged_tuple_does_not_emit() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  controller.set_category("STEM");
  let count = emissions.borrow().len();

  // Same value again: tuple unchanged.
  controller.set_category("STEM");
  // Panel visibility is not part of the derivation tuple.
  controller.set_show_filters(true);
  // A keystroke alone does not recompute until committed.
  controller.set_search_term("phys");

  assert_eq!(emissions.borrow().len(), count);
}

#[test]
fn replacing_items_recomputes_wholesale() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  controller.set_items(vec![SearchableItem::new("9", "New Entry").category("STEM")]);
  assert_eq!(emissions.borrow().last().unwrap(), &vec!["9"]);
}

#[test]
fn close_cancels_the_inflight_debounce() {
  let clock = ManualClock::new();
  let (emissions, callback) = recording();
  let mut controller = controller_with(catalog(), &clock, callback);

  controller.set_search_term("physics");
  controller.close();

  clock.advance(DELAY * 2);
  assert!(!controller.tick());
  assert_eq!(emissions.borrow().len(), 1);
}

#[test]
fn external_round_trip_restores_prior_state() {
  let storage = MemoryStorage::new();
  let url = MemoryUrl::new();
  let clock = ManualClock::new();
  let visited: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
  let visited_sink = visited.clone();

  let mut controller = SearchController::builder()
    .items(catalog())
    .page_key("tools")
    .delay(DELAY)
    .clock(Box::new(clock.clone()))
    .storage(Box::new(storage.clone()))
    .url(Box::new(url.clone()))
    .on_external_nav(Box::new(move |link: &str| {
      visited_sink.borrow_mut().push(link.to_string());
    }))
    .build();

  controller.set_category("STEM");
  controller.set_search_term("algebra");
  let before = controller.state().clone();

  controller.open_external("https://example.com/resource");
  assert_eq!(visited.borrow().as_slice(), ["https://example.com/resource"]);
  assert!(storage.raw_get("searchState_tools_beforeExternal").is_some());

  // The user keeps interacting before the tab regains focus.
  controller.set_category("Humanities");
  controller.set_search_term("maps");
  assert_ne!(controller.state(), &before);

  assert!(controller.handle_focus());
  assert_eq!(controller.state(), &before);
  assert_eq!(storage.raw_get("searchState_tools_beforeExternal"), None);

  // Snapshot already consumed: a second focus changes nothing.
  assert!(!controller.handle_focus());
  assert_eq!(controller.state(), &before);
}

#[test]
fn intent_detection_can_be_disabled() {
  let clock = ManualClock::new();
  let mut controller = SearchController::builder()
    .items(catalog())
    .delay(DELAY)
    .clock(Box::new(clock.clone()))
    .intent_detection(false)
    .build();

  controller.set_search_term("video tutorial");
  clock.advance(DELAY);
  controller.tick();
  assert_eq!(controller.current_intent(), SearchIntent::default());
}

#[test]
fn vocabularies_and_filter_badge_are_exposed() {
  let controller = SearchController::builder()
    .items(catalog())
    .categories(vec![
      FilterOption::new("STEM", "STEM").count(2),
      FilterOption::new("Finance", "Finance & Money"),
    ])
    .levels(vec![FilterOption::new("Advanced", "Advanced")])
    .build();

  assert_eq!(controller.categories().len(), 2);
  assert_eq!(controller.categories()[0].count, Some(2));
  assert_eq!(controller.levels()[0].value, "Advanced");
  assert!(controller.types().is_empty());
  assert_eq!(controller.active_filter_count(), 0);
}

proptest! {
  #[test]
  fn classify_is_pure_and_idempotent(query in ".{0,64}") {
    let first = classify(&query);
    let second = classify(&query);
    prop_assert_eq!(first, second);
  }
}
