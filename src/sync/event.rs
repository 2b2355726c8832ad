use std::time::Duration;

use crate::sync::Mutex;
use crate::sync::MutexGuard;

/// An auto-reset signal.
///
/// [`signal`] sets the event; the next [`wait`] consumes it. Signals raised
/// while the event is already set coalesce into one.
///
/// [`signal`]: Self::signal
/// [`wait`]: Self::wait
#[derive(Debug, Default)]
pub struct Event {
  state: Mutex<bool>,
}

impl Event {
  /// Creates a new, unset event.
  #[inline]
  pub fn new() -> Self {
    Self {
      state: Mutex::new(false),
    }
  }

  /// Sets the event, waking one pending or future waiter.
  #[inline]
  pub fn signal(&self) {
    *self.state.lock() = true;
  }

  /// Returns `true` if the event is set.
  #[inline]
  pub fn is_set(&self) -> bool {
    *self.state.lock()
  }

  /// Blocks until the event is set, then resets it.
  pub fn wait(&self) {
    let mut guard: MutexGuard<'_, bool> = self.state.lock();
    guard.await_until(|set| *set);
    *guard = false;
  }

  /// Blocks until the event is set or `timeout` elapses.
  ///
  /// Returns `true` (and resets the event) if it was set.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let mut guard: MutexGuard<'_, bool> = self.state.lock();

    if guard.await_timeout(|set| *set, timeout) {
      *guard = false;
      true
    } else {
      false
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
