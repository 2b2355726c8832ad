use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use triomphe::Arc;

use crate::wake::WakeChannel;

/// Passive wake channel for a tokio event loop.
///
/// Signals are stored as a permit, so a signal raised while the loop is busy
/// is observed by its next [`notified`] await. Drive it with [`pump`] on a
/// current-thread runtime of the owning thread.
///
/// [`notified`]: Self::notified
/// [`pump`]: crate::queue::ThreadMessageQueue::pump
#[derive(Clone, Default)]
pub struct NotifyChannel {
  notify: Arc<Notify>,
}

impl NotifyChannel {
  /// Creates a new, unsignalled channel.
  #[inline]
  pub fn new() -> Self {
    Self {
      notify: Arc::new(Notify::new()),
    }
  }

  /// Waits for the next signal.
  #[inline]
  pub fn notified(&self) -> Notified<'_> {
    self.notify.notified()
  }
}

impl WakeChannel for NotifyChannel {
  #[inline]
  fn signal(&self) {
    self.notify.notify_one();
  }

  #[inline]
  fn as_notify(&self) -> Option<&Notify> {
    Some(&*self.notify)
  }
}

impl Debug for NotifyChannel {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str("NotifyChannel(..)")
  }
}
