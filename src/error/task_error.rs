use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::io;

use crate::error::InitError;

/// Error returned from invalid [`Task`] lifecycle operations.
///
/// [`Task`]: crate::task::Task
#[derive(Debug)]
#[non_exhaustive]
pub enum TaskError {
  /// [`Task::init`] was called more than once.
  ///
  /// [`Task::init`]: crate::task::Task::init
  AlreadyInitialized,
  /// The operation requires [`Task::init`] to have succeeded first.
  ///
  /// [`Task::init`]: crate::task::Task::init
  NotInitialized,
  /// [`Task::start`] was called on a task that already has a worker.
  ///
  /// [`Task::start`]: crate::task::Task::start
  AlreadyStarted,
  /// The operation must run on the thread that initialized the task.
  WrongThread,
  /// The listener thread's inbox could not be initialized.
  Inbox(InitError),
  /// The operating system refused to create the worker thread.
  Spawn(io::Error),
}

impl Display for TaskError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::AlreadyInitialized => f.write_str("task already initialized"),
      Self::NotInitialized => f.write_str("task not initialized"),
      Self::AlreadyStarted => f.write_str("task already started"),
      Self::WrongThread => f.write_str("task accessed from a foreign thread"),
      Self::Inbox(error) => Display::fmt(error, f),
      Self::Spawn(error) => write!(f, "failed to spawn task thread: {error}"),
    }
  }
}

impl Error for TaskError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Inbox(error) => Some(error),
      Self::Spawn(error) => Some(error),
      _ => None,
    }
  }
}

impl From<InitError> for TaskError {
  #[inline]
  fn from(other: InitError) -> Self {
    Self::Inbox(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
