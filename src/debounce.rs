//! Cancellable debounce timer for the search term.
//!
//! The debouncer is the one cooperatively-scheduled piece of an otherwise
//! synchronous engine. It never spawns threads: a schedule records a value
//! and a deadline against an injected [`Clock`], and the owner polls for the
//! committed value. Each schedule captures a cancellation token; scheduling
//! again or cancelling invalidates any outstanding token, so only the final
//! pending value can ever commit.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A source of monotonic time, injected so tests can drive it manually.
pub trait Clock {
  /// The current instant.
  fn now(&self) -> Instant;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// A hand-advanced clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// while the controller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
  now: Rc<Cell<Instant>>,
}

impl ManualClock {
  /// Creates a clock frozen at the current instant.
  pub fn new() -> Self {
    Self {
      now: Rc::new(Cell::new(Instant::now())),
    }
  }

  /// Advances the clock by `delta`.
  pub fn advance(&self, delta: Duration) {
    self.now.set(self.now.get() + delta);
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    self.now.get()
  }
}

struct Pending {
  value: String,
  deadline: Instant,
  token: u64,
}

/// Debounces a stream of values down to the last one seen before a quiet
/// period of `delay`.
pub struct Debouncer {
  delay: Duration,
  generation: u64,
  pending: Option<Pending>,
}

impl Debouncer {
  /// Creates a debouncer with the given quiet-period delay.
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      generation: 0,
      pending: None,
    }
  }

  /// The configured delay.
  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// True while a value is waiting for its deadline.
  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }

  /// Schedules `value` to commit once `delay` elapses from `now`.
  ///
  /// Any previously pending value is superseded: its token is invalidated
  /// and it will never commit.
  pub fn schedule(&mut self, value: String, now: Instant) {
    self.generation += 1;
    self.pending = Some(Pending {
      value,
      deadline: now + self.delay,
      token: self.generation,
    });
  }

  /// Commits the pending value if its deadline has passed.
  ///
  /// Returns `None` when nothing is pending or the deadline has not yet
  /// been reached.
  pub fn poll(&mut self, now: Instant) -> Option<String> {
    let due = match &self.pending {
      Some(pending) => pending.deadline <= now && pending.token == self.generation,
      None => false,
    };
    if due {
      self.pending.take().map(|pending| pending.value)
    } else {
      None
    }
  }

  /// Drops any pending value without committing it.
  pub fn cancel(&mut self) {
    self.generation += 1;
    self.pending = None;
  }
}
