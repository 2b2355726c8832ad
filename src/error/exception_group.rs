use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Exception category indicating the nature of the error.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExceptionGroup {
  /// The API was used out of order or from the wrong thread.
  ///
  /// Double initialization, starting an uninitialized task, re-entrant
  /// locking and registering handlers for reserved message types.
  Misuse,
  /// A host capability could not be configured.
  ///
  /// Raised when a wake channel cannot be created for the calling thread.
  Config,
  /// A system capacity limit was exceeded.
  SysCap,
  /// A queue invariant was found broken.
  SysInv,
}

impl ExceptionGroup {
  #[inline]
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::Misuse => "misuse",
      Self::Config => "config",
      Self::SysCap => "syscap",
      Self::SysInv => "sysinv",
    }
  }
}

impl Display for ExceptionGroup {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.label())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::ExceptionGroup;

  #[test]
  fn test_display() {
    assert_eq!(format!("{}", ExceptionGroup::Misuse), "misuse");
    assert_eq!(format!("{}", ExceptionGroup::Config), "config");
    assert_eq!(format!("{}", ExceptionGroup::SysCap), "syscap");
    assert_eq!(format!("{}", ExceptionGroup::SysInv), "sysinv");
  }
}
