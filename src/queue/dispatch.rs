use crate::core::MessageType;

/// Outcome of delivering at most one message.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Dispatch {
  /// The inbox was empty (or the thread has none).
  Empty,
  /// A message was delivered to its handler.
  Handled(MessageType),
  /// A message was dropped because no handler is registered for it.
  Unhandled(MessageType),
  /// A [`LOOP_STOP`] message was consumed.
  ///
  /// [`LOOP_STOP`]: MessageType::LOOP_STOP
  Stop,
}

impl Dispatch {
  /// Returns `true` if a message was consumed.
  #[inline]
  pub const fn is_consumed(&self) -> bool {
    !matches!(self, Self::Empty)
  }
}
