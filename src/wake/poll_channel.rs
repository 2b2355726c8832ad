use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use triomphe::Arc;

use crate::loom::sync::atomic::AtomicUsize;
use crate::loom::sync::atomic::Ordering;
use crate::wake::WakeChannel;

/// Passive wake channel for hosts that poll.
///
/// Counts signals instead of waking anything; the host checks
/// [`take_signals`] from its own loop and delivers with
/// [`dispatch_pending`]. Clones share the same counter.
///
/// [`take_signals`]: Self::take_signals
/// [`dispatch_pending`]: crate::queue::ThreadMessageQueue::dispatch_pending
#[derive(Clone)]
pub struct PollChannel {
  signals: Arc<AtomicUsize>,
}

impl PollChannel {
  /// Creates a new channel with no recorded signals.
  #[inline]
  pub fn new() -> Self {
    Self {
      signals: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Returns the number of signals raised since the last [`take_signals`].
  ///
  /// [`take_signals`]: Self::take_signals
  #[inline]
  pub fn pending_signals(&self) -> usize {
    self.signals.load(Ordering::Acquire)
  }

  /// Returns and clears the number of recorded signals.
  #[inline]
  pub fn take_signals(&self) -> usize {
    self.signals.swap(0, Ordering::AcqRel)
  }
}

impl Default for PollChannel {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl WakeChannel for PollChannel {
  #[inline]
  fn signal(&self) {
    self.signals.fetch_add(1, Ordering::AcqRel);
  }
}

impl Debug for PollChannel {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_tuple("PollChannel")
      .field(&self.pending_signals())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
