use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

// -----------------------------------------------------------------------------
// Wake Error
// -----------------------------------------------------------------------------

/// Error returned when a [`WakeChannel`] cannot be created.
///
/// [`WakeChannel`]: crate::wake::WakeChannel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WakeError {
  reason: String,
}

impl WakeError {
  /// Creates a new `WakeError` describing why the channel is unavailable.
  #[inline]
  pub fn new<T>(reason: T) -> Self
  where
    T: Display,
  {
    Self {
      reason: reason.to_string(),
    }
  }

  /// Returns the reason the channel could not be created.
  #[inline]
  pub fn reason(&self) -> &str {
    self.reason.as_str()
  }
}

impl Display for WakeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "wake channel unavailable: {}", self.reason)
  }
}

impl Error for WakeError {}

// -----------------------------------------------------------------------------
// Init Error
// -----------------------------------------------------------------------------

/// Error returned when the calling thread's inbox cannot be initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InitError {
  /// The host wake channel could not be created.
  Wake(WakeError),
}

impl Display for InitError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Wake(error) => write!(f, "failed to initialize inbox: {error}"),
    }
  }
}

impl Error for InitError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Wake(error) => Some(error),
    }
  }
}

impl From<WakeError> for InitError {
  #[inline]
  fn from(other: WakeError) -> Self {
    Self::Wake(other)
  }
}
