//! Pluggable wakeup capability binding an inbox to its thread's loop.
//!
//! A [`WakeChannel`] is created on the thread that owns an inbox and signalled
//! by senders on any thread. Two integration styles exist:
//!
//! - **Active**: the queue runs the loop itself, blocking on the channel
//!   ([`EventChannel`], used by [`run_loop`]).
//! - **Passive**: an externally driven host loop is roused by the signal and
//!   calls back into [`dispatch_one`] or [`dispatch_pending`]
//!   ([`HookChannel`], [`NotifyChannel`], [`PollChannel`]).
//!
//! [`run_loop`]: crate::queue::ThreadMessageQueue::run_loop
//! [`dispatch_one`]: crate::queue::ThreadMessageQueue::dispatch_one
//! [`dispatch_pending`]: crate::queue::ThreadMessageQueue::dispatch_pending

mod event_channel;
mod hook_channel;
mod notify_channel;
mod poll_channel;

use std::time::Duration;
use tokio::sync::Notify;

pub use self::event_channel::EventChannel;
pub use self::hook_channel::HookChannel;
pub use self::notify_channel::NotifyChannel;
pub use self::poll_channel::PollChannel;

/// Rouses a specific thread's dispatch loop.
pub trait WakeChannel: Send + Sync + 'static {
  /// Signals the owning thread that its inbox has messages.
  ///
  /// Callable concurrently from any thread; must not block. The queue calls
  /// this while holding the inbox lock, so implementations must not call
  /// back into the queue.
  fn signal(&self);

  /// Returns `true` if the queue may block on this channel in a loop it
  /// runs itself.
  #[inline]
  fn is_blocking(&self) -> bool {
    false
  }

  /// Blocks until the channel is signalled.
  ///
  /// Only called when [`is_blocking`] returns `true`.
  ///
  /// [`is_blocking`]: Self::is_blocking
  #[inline]
  fn wait(&self) {}

  /// Blocks until the channel is signalled or `timeout` elapses.
  ///
  /// Returns `true` if a signal was consumed.
  #[inline]
  fn wait_timeout(&self, _timeout: Duration) -> bool {
    false
  }

  /// Returns the tokio [`Notify`] this channel signals, if any.
  ///
  /// Used by [`pump`] to check it awaits the inbox's own channel.
  ///
  /// [`pump`]: crate::queue::ThreadMessageQueue::pump
  #[inline]
  fn as_notify(&self) -> Option<&Notify> {
    None
  }
}
