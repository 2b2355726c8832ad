use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Exception severity classification.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExceptionClass {
  /// A runtime failure that cannot be reported through a return value.
  Error,
  /// A debug-build assertion on the caller's use of the API.
  ///
  /// Release builds report the same conditions through typed errors instead.
  Assert,
}

impl Display for ExceptionClass {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Error => f.write_str("error"),
      Self::Assert => f.write_str("assert"),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::ExceptionClass;

  #[test]
  fn test_display() {
    assert_eq!(format!("{}", ExceptionClass::Error), "error");
    assert_eq!(format!("{}", ExceptionClass::Assert), "assert");
  }
}
