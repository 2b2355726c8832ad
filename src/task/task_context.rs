use std::marker::PhantomData;
use std::time::Duration;
use tracing::trace;
use triomphe::Arc;

use crate::consts::TASK_LOOP_POLL;
use crate::core::MessageType;
use crate::core::Payload;
use crate::core::ThreadId;
use crate::error::LoopError;
use crate::queue::ThreadMessageQueue;
use crate::sync::MutexGuard;
use crate::task::TaskEvent;
use crate::task::TaskId;
use crate::task::task_listener::TaskNotice;
use crate::task::task_shared::TaskControl;
use crate::task::task_shared::TaskShared;
use crate::task::task_state::TaskFlags;

/// The worker-side view of a running task.
///
/// Only available inside [`AsyncTask::run`], on the worker thread.
///
/// [`AsyncTask::run`]: crate::task::AsyncTask::run
pub struct TaskContext<'a> {
  shared: &'a Arc<TaskShared>,
  queue: &'a Arc<ThreadMessageQueue>,
  phantom: PhantomData<*const ()>,
}

impl<'a> TaskContext<'a> {
  pub(crate) fn new(shared: &'a Arc<TaskShared>, queue: &'a Arc<ThreadMessageQueue>) -> Self {
    Self {
      shared,
      queue,
      phantom: PhantomData,
    }
  }

  /// Returns the task identifier.
  #[inline]
  pub fn id(&self) -> TaskId {
    self.shared.id
  }

  /// Returns the queue the task reports through.
  #[inline]
  pub fn queue(&self) -> &Arc<ThreadMessageQueue> {
    self.queue
  }

  /// Returns `true` once abort has been requested.
  #[inline]
  pub fn is_aborted(&self) -> bool {
    self.shared.is_aborted()
  }

  /// Blocks until abort is requested or `timeout` elapses.
  ///
  /// Returns `true` if the task was aborted.
  pub fn wait_for_abort(&self, timeout: Duration) -> bool {
    let mut control: MutexGuard<'_, TaskControl> = self.shared.control.lock();

    control.await_timeout(|control| control.flags.contains(TaskFlags::ABORTED), timeout)
  }

  /// Posts an event to the task's listener thread.
  ///
  /// Returns `false` if no listener is set or its thread is gone.
  pub fn notify_listener(&self, code: i32, param: i64) -> bool {
    let target: Option<ThreadId> = {
      let control: MutexGuard<'_, TaskControl> = self.shared.control.lock();

      control.listener.as_ref().and(control.listener_thread)
    };

    let Some(target) = target else {
      trace!(target: "threadmq", task = %self.shared.id, code, "no listener");
      return false;
    };

    let notice: TaskNotice = TaskNotice {
      shared: Arc::clone(self.shared),
      event: TaskEvent {
        task: self.shared.id,
        code,
        param,
      },
    };

    self.queue.send(target, MessageType::TASK_EVENT, Payload::new(notice))
  }

  /// Runs a message loop on the worker thread until the task is aborted or
  /// a `LOOP_STOP` message arrives.
  #[inline]
  pub fn run_loop(&self) -> Result<(), LoopError> {
    self.queue.run_loop_until(Some(TASK_LOOP_POLL), || self.is_aborted())
  }
}
