use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use triomphe::Arc;

use crate::queue::ThreadMessageQueue;
use crate::task::TaskId;
use crate::task::task_shared::TaskShared;

/// Requests abortion of a task from any thread.
///
/// Outlives the task it came from; aborting a finished task has no effect.
#[derive(Clone)]
pub struct AbortHandle {
  shared: Arc<TaskShared>,
  queue: Arc<ThreadMessageQueue>,
}

impl AbortHandle {
  pub(crate) fn new(shared: Arc<TaskShared>, queue: Arc<ThreadMessageQueue>) -> Self {
    Self { shared, queue }
  }

  /// Returns the identifier of the task.
  #[inline]
  pub fn id(&self) -> TaskId {
    self.shared.id
  }

  /// Requests abortion; returns `true` only for the first request.
  #[inline]
  pub fn abort(&self) -> bool {
    self.shared.abort(&self.queue)
  }

  /// Returns `true` once abort has been requested.
  #[inline]
  pub fn is_aborted(&self) -> bool {
    self.shared.is_aborted()
  }
}

impl Debug for AbortHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("AbortHandle")
      .field("id", &self.shared.id)
      .finish_non_exhaustive()
  }
}
