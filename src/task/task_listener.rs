use std::sync::Arc as StdArc;
use tracing::trace;
use triomphe::Arc;

use crate::core::Message;
use crate::queue::DynHandler;
use crate::task::TaskId;
use crate::task::task_shared::TaskShared;

// -----------------------------------------------------------------------------
// Task Event
// -----------------------------------------------------------------------------

/// A notification posted by a running task to its listener.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct TaskEvent {
  pub task: TaskId,
  pub code: i32,
  pub param: i64,
}

impl TaskEvent {
  /// Code posted by the worker when the task body panics.
  pub const PANICKED: i32 = i32::MIN;

  /// Returns `true` if this event reports a panicked task body.
  #[inline]
  pub const fn is_panic(&self) -> bool {
    self.code == Self::PANICKED
  }
}

// -----------------------------------------------------------------------------
// Task Listener
// -----------------------------------------------------------------------------

/// Receives [`TaskEvent`]s on the thread that initialized the task.
pub trait TaskListener: Send + Sync + 'static {
  fn handle_event(&self, event: &TaskEvent);
}

impl<F> TaskListener for F
where
  F: Fn(&TaskEvent) + Send + Sync + 'static,
{
  #[inline]
  fn handle_event(&self, event: &TaskEvent) {
    self(event)
  }
}

// -----------------------------------------------------------------------------
// Routing
// -----------------------------------------------------------------------------

/// Payload of a `TASK_EVENT` message.
pub(crate) struct TaskNotice {
  pub(crate) shared: Arc<TaskShared>,
  pub(crate) event: TaskEvent,
}

/// Builds the handler that delivers `TASK_EVENT` messages.
///
/// The listener is read at delivery time: events of a task whose listener
/// was cleared in the meantime are dropped.
pub(crate) fn router() -> DynHandler {
  StdArc::new(|message: &Message| {
    let Some(notice) = message.payload().downcast_ref::<TaskNotice>() else {
      trace!(target: "threadmq", "task event without notice");
      return;
    };

    let listener: Option<StdArc<dyn TaskListener>> = notice.shared.control.lock().listener.clone();

    match listener {
      Some(listener) => listener.handle_event(&notice.event),
      None => trace!(target: "threadmq", task = %notice.event.task, "task event dropped"),
    }
  })
}
