use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Message;
use crate::core::ThreadId;
use crate::sync::Mutex;
use crate::sync::MutexGuard;
use crate::wake::WakeChannel;

/// A thread's FIFO of pending messages plus the channel that wakes it.
///
/// Inboxes are owned by the [`Registry`]. Once closed an inbox rejects new
/// messages and reports itself empty; senders still holding a reference
/// observe the closure as a routing failure.
///
/// [`Registry`]: crate::queue::Registry
pub struct Inbox {
  owner: ThreadId,
  state: Mutex<InboxState>,
  wake: Box<dyn WakeChannel>,
}

struct InboxState {
  messages: VecDeque<Message>,
  closed: bool,
}

impl Inbox {
  pub(crate) fn new(owner: ThreadId, wake: Box<dyn WakeChannel>, capacity: usize) -> Self {
    Self {
      owner,
      state: Mutex::new(InboxState {
        messages: VecDeque::with_capacity(capacity),
        closed: false,
      }),
      wake,
    }
  }

  /// Returns the thread that owns this inbox.
  #[inline]
  pub fn owner(&self) -> ThreadId {
    self.owner
  }

  /// Returns the channel used to wake the owner.
  #[inline]
  pub fn wake(&self) -> &dyn WakeChannel {
    &*self.wake
  }

  /// Returns the number of pending messages.
  #[inline]
  pub fn len(&self) -> usize {
    self.state.lock().messages.len()
  }

  /// Returns `true` if no messages are pending.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the inbox has been closed.
  #[inline]
  pub fn is_closed(&self) -> bool {
    self.state.lock().closed
  }

  /// Appends `message` and signals the owner.
  ///
  /// The signal is raised before the lock is released, so a consumer woken
  /// by it always finds the message. Returns the message back if the inbox
  /// is closed.
  pub(crate) fn push(&self, message: Message) -> std::result::Result<(), Message> {
    let mut state: MutexGuard<'_, InboxState> = self.state.lock();

    if state.closed {
      return Err(message);
    }

    state.messages.push_back(message);
    self.wake.signal();

    Ok(())
  }

  /// Removes the oldest message.
  ///
  /// Returns the message and whether more remain. The wake channel is
  /// re-armed in the latter case so hosts that coalesce signals do not stall.
  pub(crate) fn pop(&self) -> Option<(Message, bool)> {
    let mut state: MutexGuard<'_, InboxState> = self.state.lock();
    let message: Message = state.messages.pop_front()?;
    let more: bool = !state.messages.is_empty();

    if more {
      self.wake.signal();
    }

    Some((message, more))
  }

  /// Closes the inbox and returns whatever was still pending.
  ///
  /// The owner is signalled once more so a loop blocked on the channel
  /// observes the closure. The caller drops the returned messages outside of
  /// every queue lock.
  pub(crate) fn close(&self) -> VecDeque<Message> {
    let mut state: MutexGuard<'_, InboxState> = self.state.lock();

    state.closed = true;
    self.wake.signal();

    std::mem::take(&mut state.messages)
  }
}

impl Debug for Inbox {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Inbox")
      .field("owner", &self.owner)
      .field("len", &self.len())
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
