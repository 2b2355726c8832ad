use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::consts::RESERVED_MESSAGE_TYPES;

/// Identifies the kind of a message and selects its handler.
///
/// The space is flat: the queue reserves `0..RESERVED_MESSAGE_TYPES` for its
/// own bookkeeping, collaborators share the rest and must agree among
/// themselves not to collide.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MessageType(u32);

impl MessageType {
  /// Stops an active message loop on the receiving thread.
  pub const LOOP_STOP: Self = Self(0);

  /// Carries a task notification to its listener thread.
  pub const TASK_EVENT: Self = Self(1);

  /// The first value available to collaborators.
  pub const FIRST_USER: Self = Self(RESERVED_MESSAGE_TYPES);

  /// Creates a new `MessageType`.
  #[inline]
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  /// Returns the raw value.
  #[inline]
  pub const fn get(&self) -> u32 {
    self.0
  }

  /// Returns `true` if this type belongs to the queue's reserved range.
  #[inline]
  pub const fn is_reserved(&self) -> bool {
    self.0 < RESERVED_MESSAGE_TYPES
  }
}

impl Display for MessageType {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match *self {
      Self::LOOP_STOP => f.write_str("loop_stop"),
      Self::TASK_EVENT => f.write_str("task_event"),
      Self(value) => Display::fmt(&value, f),
    }
  }
}

impl From<u32> for MessageType {
  #[inline]
  fn from(other: u32) -> Self {
    Self(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::MessageType;

  #[test]
  fn test_reserved_range() {
    assert!(MessageType::LOOP_STOP.is_reserved());
    assert!(MessageType::TASK_EVENT.is_reserved());
    assert!(MessageType::new(15).is_reserved());
    assert!(!MessageType::FIRST_USER.is_reserved());
    assert!(!MessageType::new(1000).is_reserved());
  }

  #[test]
  fn test_display() {
    assert_eq!(MessageType::LOOP_STOP.to_string(), "loop_stop");
    assert_eq!(MessageType::new(42).to_string(), "42");
  }
}
