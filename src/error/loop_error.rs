use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Error returned when a message loop cannot run on the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoopError {
  /// The calling thread has no inbox.
  NotInitialized,
  /// The inbox's wake channel is driven by a host loop and cannot block.
  NotBlocking,
  /// The channel handed to the loop is not the inbox's wake channel.
  ChannelMismatch,
}

impl Display for LoopError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::NotInitialized => f.write_str("message loop requires an initialized inbox"),
      Self::NotBlocking => f.write_str("message loop requires a blocking wake channel"),
      Self::ChannelMismatch => f.write_str("message pump requires the inbox's own wake channel"),
    }
  }
}

impl Error for LoopError {}
