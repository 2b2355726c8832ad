use std::any::Any;
use std::sync::Arc as StdArc;
use tracing::debug;

use crate::core::ThreadId;
use crate::loom::thread::JoinHandle;
use crate::queue::ThreadMessageQueue;
use crate::sync::Mutex;
use crate::sync::MutexGuard;
use crate::task::TaskId;
use crate::task::TaskListener;
use crate::task::task_state::TaskFlags;

/// State shared by a task handle, its worker, its abort handles, and the
/// events it has in flight.
pub(crate) struct TaskShared {
  pub(crate) id: TaskId,
  pub(crate) control: Mutex<TaskControl>,
}

/// Everything the owner, the worker, and `abort` race on.
pub(crate) struct TaskControl {
  pub(crate) flags: TaskFlags,
  pub(crate) listener: Option<StdArc<dyn TaskListener>>,
  pub(crate) listener_thread: Option<ThreadId>,
  pub(crate) worker_thread: Option<ThreadId>,
  pub(crate) thread: Option<JoinHandle<()>>,
  /// The task itself while it waits to be deleted by its worker.
  pub(crate) parked: Option<Box<dyn Any + Send>>,
}

impl TaskShared {
  pub(crate) fn new() -> Self {
    Self {
      id: TaskId::next(),
      control: Mutex::new(TaskControl {
        flags: TaskFlags::empty(),
        listener: None,
        listener_thread: None,
        worker_thread: None,
        thread: None,
        parked: None,
      }),
    }
  }

  #[inline]
  pub(crate) fn is_aborted(&self) -> bool {
    self.control.lock().flags.contains(TaskFlags::ABORTED)
  }

  /// Sets the abort flag and wakes a worker blocked in its message loop.
  ///
  /// Returns `true` only for the call that set the flag.
  pub(crate) fn abort(&self, queue: &ThreadMessageQueue) -> bool {
    let mut control: MutexGuard<'_, TaskControl> = self.control.lock();

    if control.flags.contains(TaskFlags::ABORTED) {
      return false;
    }

    control.flags.insert(TaskFlags::ABORTED);

    let worker: Option<ThreadId> = control.worker_thread;

    drop(control);

    debug!(target: "threadmq", task = %self.id, "task aborted");

    if let Some(worker) = worker {
      queue.stop_loop(worker);
    }

    true
  }
}
