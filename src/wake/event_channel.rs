use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::time::Duration;

use crate::sync::Event;
use crate::wake::WakeChannel;

/// Active wake channel for threads whose loop is run by the queue.
///
/// This is the channel installed by [`init_thread`].
///
/// [`init_thread`]: crate::queue::ThreadMessageQueue::init_thread
#[derive(Default)]
pub struct EventChannel {
  event: Event,
}

impl EventChannel {
  /// Creates a new, unsignalled channel.
  #[inline]
  pub fn new() -> Self {
    Self {
      event: Event::new(),
    }
  }
}

impl WakeChannel for EventChannel {
  #[inline]
  fn signal(&self) {
    self.event.signal();
  }

  #[inline]
  fn is_blocking(&self) -> bool {
    true
  }

  #[inline]
  fn wait(&self) {
    self.event.wait();
  }

  #[inline]
  fn wait_timeout(&self, timeout: Duration) -> bool {
    self.event.wait_timeout(timeout)
  }
}

impl Debug for EventChannel {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str("EventChannel(..)")
  }
}
