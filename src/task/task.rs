use std::any::Any;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc as StdArc;
use tracing::Span;
use tracing::debug;
use tracing::debug_span;
use tracing::error;
use triomphe::Arc;

use crate::core::MessageType;
use crate::core::ThreadId;
use crate::error::TaskError;
use crate::error::misuse;
use crate::loom::thread::Builder;
use crate::loom::thread::JoinHandle;
use crate::queue::ThreadMessageQueue;
use crate::sync::MutexGuard;
use crate::task::AbortHandle;
use crate::task::AsyncTask;
use crate::task::Disposal;
use crate::task::TaskContext;
use crate::task::TaskEvent;
use crate::task::TaskId;
use crate::task::TaskListener;
use crate::task::TaskState;
use crate::task::task_listener;
use crate::task::task_shared::TaskControl;
use crate::task::task_shared::TaskShared;
use crate::task::task_state::TaskFlags;

// -----------------------------------------------------------------------------
// Task
// -----------------------------------------------------------------------------

/// Owned handle to an [`AsyncTask`] running on a dedicated worker thread.
///
/// # Lifecycle
///
/// 1. [`init`] on the thread that wants to hear from the task. That thread
///    becomes the listener thread and gets an inbox if it had none.
/// 2. Optionally [`set_listener`] on the same thread.
/// 3. [`start`] spawns the worker, which runs [`AsyncTask::run`].
/// 4. Dispose of the handle in one of three ways:
///    - drop it: abort is requested and the drop blocks until the worker
///      exits,
///    - [`join`] it: block until the body returns on its own,
///    - [`delete_when_done`]: return immediately and let the worker delete
///      the task once the body returns.
///
/// [`init`]: Self::init
/// [`set_listener`]: Self::set_listener
/// [`start`]: Self::start
/// [`join`]: Self::join
/// [`delete_when_done`]: Self::delete_when_done
pub struct Task<T>
where
  T: AsyncTask,
{
  core: Option<Arc<TaskCore<T>>>,
}

struct TaskCore<T> {
  shared: Arc<TaskShared>,
  queue: Arc<ThreadMessageQueue>,
  job: T,
}

impl<T> Task<T>
where
  T: AsyncTask,
{
  /// Wraps `job` in a task reporting through the global queue.
  #[inline]
  pub fn new(job: T) -> Self {
    Self::with_queue(job, ThreadMessageQueue::instance())
  }

  /// Wraps `job` in a task reporting through `queue`.
  pub fn with_queue(job: T, queue: &Arc<ThreadMessageQueue>) -> Self {
    Self {
      core: Some(Arc::new(TaskCore {
        shared: Arc::new(TaskShared::new()),
        queue: Arc::clone(queue),
        job,
      })),
    }
  }

  #[inline]
  fn core(&self) -> &Arc<TaskCore<T>> {
    match self.core.as_ref() {
      Some(core) => core,
      None => crate::raise!(Error, SysInv, "task handle used after disposal"),
    }
  }

  /// Returns the task identifier.
  #[inline]
  pub fn id(&self) -> TaskId {
    self.core().shared.id
  }

  /// Returns the wrapped job.
  #[inline]
  pub fn job(&self) -> &T {
    &self.core().job
  }

  /// Returns the current lifecycle phase.
  #[inline]
  pub fn state(&self) -> TaskState {
    TaskState::from_flags(self.core().shared.control.lock().flags)
  }

  /// Returns `true` once abort has been requested.
  #[inline]
  pub fn is_aborted(&self) -> bool {
    self.core().shared.is_aborted()
  }

  /// Returns a handle that can abort the task from any thread.
  #[inline]
  pub fn abort_handle(&self) -> AbortHandle {
    let core: &Arc<TaskCore<T>> = self.core();

    AbortHandle::new(Arc::clone(&core.shared), Arc::clone(&core.queue))
  }

  /// Prepares the task and binds its listener thread to the caller.
  ///
  /// Creates an inbox for the calling thread if it has none. Initializing
  /// twice is misuse.
  pub fn init(&self) -> Result<(), TaskError> {
    let core: &Arc<TaskCore<T>> = self.core();
    let mut control: MutexGuard<'_, TaskControl> = core.shared.control.lock();

    if control.flags.contains(TaskFlags::INITIALIZED) {
      drop(control);
      misuse!(TaskError::AlreadyInitialized);
      return Err(TaskError::AlreadyInitialized);
    }

    control.flags.insert(TaskFlags::INITIALIZED);
    drop(control);

    if let Err(error) = core.queue.init_thread() {
      core.shared.control.lock().flags.remove(TaskFlags::INITIALIZED);
      return Err(error.into());
    }

    if !core.queue.has_handler(MessageType::TASK_EVENT) {
      core.queue.register_reserved(MessageType::TASK_EVENT, task_listener::router());
    }

    core.shared.control.lock().listener_thread = Some(ThreadId::current());

    debug!(target: "threadmq", task = %core.shared.id, "task initialized");

    Ok(())
  }

  /// Installs the listener receiving [`TaskEvent`]s.
  ///
  /// Must be called on the thread that called [`init`].
  ///
  /// [`init`]: Self::init
  pub fn set_listener<L>(&self, listener: L) -> Result<(), TaskError>
  where
    L: TaskListener,
  {
    let core: &Arc<TaskCore<T>> = self.core();
    let mut control: MutexGuard<'_, TaskControl> = core.shared.control.lock();

    let error: TaskError = match control.listener_thread {
      Some(thread) if thread == ThreadId::current() => {
        let previous: Option<StdArc<dyn TaskListener>> = control.listener.replace(StdArc::new(listener));

        drop(control);
        drop(previous);

        return Ok(());
      }
      Some(_) => TaskError::WrongThread,
      None => TaskError::NotInitialized,
    };

    drop(control);
    misuse!(error);

    Err(error)
  }

  /// Removes the listener; events still in flight are dropped.
  #[inline]
  pub fn clear_listener(&self) {
    let listener: Option<StdArc<dyn TaskListener>> = self.core().shared.control.lock().listener.take();

    drop(listener);
  }

  /// Spawns the worker thread.
  ///
  /// Starting before [`init`], or twice, is misuse. Failure to spawn the
  /// thread is returned and leaves the task startable.
  ///
  /// [`init`]: Self::init
  pub fn start(&self) -> Result<(), TaskError> {
    let core: &Arc<TaskCore<T>> = self.core();
    let mut control: MutexGuard<'_, TaskControl> = core.shared.control.lock();

    let error: TaskError = if !control.flags.contains(TaskFlags::INITIALIZED) {
      TaskError::NotInitialized
    } else if control.flags.contains(TaskFlags::STARTED) {
      TaskError::AlreadyStarted
    } else {
      // The lock is held until the handle is stored; the worker cannot mark
      // itself finished before that.
      let worker: Arc<TaskCore<T>> = Arc::clone(core);
      let config: _ = core.queue.config();

      let spawned: Result<JoinHandle<()>, _> = Builder::new()
        .name(format!("{}-{}", config.task_thread_prefix, core.shared.id.as_u64()))
        .stack_size(config.task_stack_size)
        .spawn(move || worker_main(worker));

      match spawned {
        Ok(thread) => {
          control.flags.insert(TaskFlags::STARTED);
          control.thread = Some(thread);

          debug!(target: "threadmq", task = %core.shared.id, "task started");

          return Ok(());
        }
        Err(error) => {
          drop(control);
          error!(target: "threadmq", task = %core.shared.id, %error, "failed to spawn task thread");
          return Err(TaskError::Spawn(error));
        }
      }
    };

    drop(control);
    misuse!(error);

    Err(error)
  }

  /// Requests cooperative abortion.
  ///
  /// Returns `true` only for the call that set the flag. Aborting before
  /// [`start`] makes the body observe the flag as soon as it runs.
  ///
  /// [`start`]: Self::start
  #[inline]
  pub fn abort(&self) -> bool {
    let core: &Arc<TaskCore<T>> = self.core();

    core.shared.abort(&core.queue)
  }

  /// Blocks until the worker exits, without requesting abortion.
  pub fn join(mut self) {
    let Some(core) = self.core.take() else {
      return;
    };

    let thread: Option<JoinHandle<()>> = core.shared.control.lock().thread.take();

    join_worker(&core.shared, thread);
  }

  /// Gives up ownership; the task is deleted as soon as its worker is done.
  ///
  /// The listener is cleared first, so no further events are delivered.
  /// Returns immediately in both cases: the worker had finished (or never
  /// started) and the task was deleted here, or the worker deletes it after
  /// the body returns.
  pub fn delete_when_done(mut self) -> Disposal {
    let Some(core) = self.core.take() else {
      return Disposal::Immediate;
    };

    let mut control: MutexGuard<'_, TaskControl> = core.shared.control.lock();
    let listener: Option<StdArc<dyn TaskListener>> = control.listener.take();
    let flags: TaskFlags = control.flags;

    let disposal: Disposal =
      if !flags.contains(TaskFlags::STARTED) || flags.contains(TaskFlags::FINISHED) {
        let thread: Option<JoinHandle<()>> = control.thread.take();

        drop(control);

        // The worker has already marked itself finished; this only reaps it.
        join_worker(&core.shared, thread);

        Disposal::Immediate
      } else {
        control.flags.insert(TaskFlags::DELETE_WHEN_DONE);
        control.parked = Some(Box::new(Arc::clone(&core)));

        // Detach.
        drop(control.thread.take());
        drop(control);

        Disposal::Deferred
      };

    debug!(target: "threadmq", task = %core.shared.id, ?disposal, "task released");

    drop(listener);
    drop(core);

    disposal
  }
}

impl<T> Drop for Task<T>
where
  T: AsyncTask,
{
  fn drop(&mut self) {
    let Some(core) = self.core.take() else {
      return;
    };

    let mut control: MutexGuard<'_, TaskControl> = core.shared.control.lock();
    let thread: Option<JoinHandle<()>> = control.thread.take();
    let running: bool = thread.is_some() && !control.flags.contains(TaskFlags::FINISHED);

    drop(control);

    if running {
      core.shared.abort(&core.queue);
    }

    join_worker(&core.shared, thread);
  }
}

impl<T> Debug for Task<T>
where
  T: AsyncTask,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self.core.as_ref() {
      Some(core) => f
        .debug_struct("Task")
        .field("id", &core.shared.id)
        .field("state", &TaskState::from_flags(core.shared.control.lock().flags))
        .finish_non_exhaustive(),
      None => f.write_str("Task(<released>)"),
    }
  }
}

fn join_worker(shared: &TaskShared, thread: Option<JoinHandle<()>>) {
  let Some(thread) = thread else {
    return;
  };

  let worker: Option<ThreadId> = shared.control.lock().worker_thread;

  // A handle dropped on its own worker cannot wait for itself.
  if worker.is_some() && worker == ThreadId::try_current().ok() {
    drop(thread);
    return;
  }

  if thread.join().is_err() {
    error!(target: "threadmq", task = %shared.id, "task thread terminated abnormally");
  }
}

// -----------------------------------------------------------------------------
// Worker
// -----------------------------------------------------------------------------

fn worker_main<T>(core: Arc<TaskCore<T>>)
where
  T: AsyncTask,
{
  let thread: ThreadId = ThreadId::current();
  let shared: &Arc<TaskShared> = &core.shared;
  let span: Span = debug_span!(target: "threadmq", "task", id = %shared.id);
  let entered: _ = span.enter();

  match core.queue.init_thread() {
    Ok(()) => shared.control.lock().worker_thread = Some(thread),
    Err(error) => error!(target: "threadmq", %error, "task runs without an inbox"),
  }

  debug!(target: "threadmq", "task running");

  let context: TaskContext<'_> = TaskContext::new(shared, &core.queue);

  if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| core.job.run(&context))) {
    error!(target: "threadmq", panic = describe(&*payload), "task body panicked");
    context.notify_listener(TaskEvent::PANICKED, 0);
  }

  shared.control.lock().flags.insert(TaskFlags::COMPLETING);

  if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| core.job.clean_up())) {
    error!(target: "threadmq", panic = describe(&*payload), "task clean up panicked");
  }

  core.queue.deregister_thread(thread);

  let parked: Option<Box<dyn Any + Send>> = {
    let mut control: MutexGuard<'_, TaskControl> = shared.control.lock();

    control.flags.remove(TaskFlags::COMPLETING);
    control.flags.insert(TaskFlags::FINISHED);

    debug_assert_eq!(
      control.parked.is_some(),
      control.flags.contains(TaskFlags::DELETE_WHEN_DONE),
    );

    if control.flags.contains(TaskFlags::DELETE_WHEN_DONE) {
      control.parked.take()
    } else {
      None
    }
  };

  debug!(target: "threadmq", deleting = parked.is_some(), "task finished");

  drop(entered);
  drop(parked);
  drop(core);
}

fn describe(payload: &(dyn Any + Send)) -> &str {
  if let Some(message) = payload.downcast_ref::<&'static str>() {
    message
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.as_str()
  } else {
    "<unknown>"
  }
}
