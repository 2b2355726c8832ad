use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::MessageType;
use crate::core::Payload;
use crate::core::ThreadId;

/// A message queued for delivery to a thread.
///
/// Messages are immutable once enqueued; handlers receive them by reference.
pub struct Message {
  kind: MessageType,
  payload: Payload,
  sender: Option<ThreadId>,
}

impl Message {
  #[inline]
  pub(crate) const fn new(kind: MessageType, payload: Payload, sender: Option<ThreadId>) -> Self {
    Self {
      kind,
      payload,
      sender,
    }
  }

  /// Returns the message type.
  #[inline]
  pub const fn kind(&self) -> MessageType {
    self.kind
  }

  /// Returns the message payload.
  #[inline]
  pub const fn payload(&self) -> &Payload {
    &self.payload
  }

  /// Returns the sending thread, if it could be identified.
  #[inline]
  pub const fn sender(&self) -> Option<ThreadId> {
    self.sender
  }
}

impl Debug for Message {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Message")
      .field("kind", &self.kind)
      .field("payload", &self.payload)
      .field("sender", &self.sender)
      .finish()
  }
}
