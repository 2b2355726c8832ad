use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::ExceptionClass;
use crate::error::ExceptionGroup;

/// A structured panic payload carrying class, group, message, and backtrace.
///
/// Exceptions are raised via the [`raise!`] macro when a failure cannot be
/// returned to the caller: broken queue invariants, and API misuse in debug
/// builds.
///
/// # Display Format
///
/// Exceptions format as: `[threadmq] {class}:{group} - {message}`
///
/// [`raise!`]: crate::raise
pub struct Exception {
  class: ExceptionClass,
  group: ExceptionGroup,
  error: String,
  trace: Backtrace,
}

impl Exception {
  /// Creates a new exception and captures a backtrace at the call site.
  #[inline]
  pub fn new<T>(class: ExceptionClass, group: ExceptionGroup, error: T) -> Self
  where
    T: Display,
  {
    Self {
      class,
      group,
      error: error.to_string(),
      trace: Backtrace::capture(),
    }
  }

  /// Returns the exception's severity class.
  #[inline]
  pub const fn class(&self) -> ExceptionClass {
    self.class
  }

  /// Returns the exception's error category.
  #[inline]
  pub const fn group(&self) -> ExceptionGroup {
    self.group
  }

  /// Returns the human-readable error message.
  #[inline]
  pub const fn error(&self) -> &str {
    self.error.as_str()
  }

  /// Returns the captured backtrace.
  ///
  /// Backtrace availability depends on `RUST_BACKTRACE`.
  #[inline]
  pub const fn trace(&self) -> &Backtrace {
    &self.trace
  }
}

impl Debug for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "[threadmq] {}:{} - {}", self.class, self.group, self.error)
  }
}

impl Error for Exception {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::Exception;
  use crate::error::ExceptionClass;
  use crate::error::ExceptionGroup;

  #[test]
  fn test_display() {
    let exception: Exception = Exception::new(
      ExceptionClass::Assert,
      ExceptionGroup::Misuse,
      "task initialized twice",
    );

    assert_eq!(
      exception.to_string(),
      "[threadmq] assert:misuse - task initialized twice",
    );
    assert_eq!(exception.error(), "task initialized twice");
    assert_eq!(exception.group(), ExceptionGroup::Misuse);
  }
}
