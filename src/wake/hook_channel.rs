use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::wake::WakeChannel;

/// Passive wake channel for an externally driven host loop.
///
/// The host installs a hook that rouses its own loop (posting a window
/// message, scheduling a run-loop source, ...). When that loop runs on the
/// owning thread it calls [`dispatch_one`] or [`dispatch_pending`].
///
/// [`dispatch_one`]: crate::queue::ThreadMessageQueue::dispatch_one
/// [`dispatch_pending`]: crate::queue::ThreadMessageQueue::dispatch_pending
pub struct HookChannel {
  hook: Box<dyn Fn() + Send + Sync>,
}

impl HookChannel {
  /// Creates a channel invoking `hook` on every signal.
  ///
  /// The hook runs on the sending thread and must not block.
  #[inline]
  pub fn new<F>(hook: F) -> Self
  where
    F: Fn() + Send + Sync + 'static,
  {
    Self {
      hook: Box::new(hook),
    }
  }
}

impl WakeChannel for HookChannel {
  #[inline]
  fn signal(&self) {
    (self.hook)();
  }
}

impl Debug for HookChannel {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str("HookChannel(..)")
  }
}
