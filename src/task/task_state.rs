use bitflags::bitflags;

bitflags! {
  /// Lifecycle bits guarded by the task lock.
  #[derive(Clone, Copy, Debug, PartialEq, Eq)]
  pub(crate) struct TaskFlags: u8 {
    const INITIALIZED = 1 << 0;
    const STARTED = 1 << 1;
    const ABORTED = 1 << 2;
    const COMPLETING = 1 << 3;
    const FINISHED = 1 << 4;
    const DELETE_WHEN_DONE = 1 << 5;
  }
}

/// Observable lifecycle phase of a task.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TaskState {
  /// Constructed but not yet initialized.
  Unconstructed,
  /// Initialized; the worker has not been started.
  Initialized,
  /// The worker is executing the task body.
  Running,
  /// Abort was requested while the body runs.
  Aborting,
  /// The body returned; the worker is cleaning up.
  Completing,
  /// The worker is done.
  Finished,
}

impl TaskState {
  pub(crate) fn from_flags(flags: TaskFlags) -> Self {
    if !flags.contains(TaskFlags::INITIALIZED) {
      Self::Unconstructed
    } else if !flags.contains(TaskFlags::STARTED) {
      Self::Initialized
    } else if flags.contains(TaskFlags::FINISHED) {
      Self::Finished
    } else if flags.contains(TaskFlags::COMPLETING) {
      Self::Completing
    } else if flags.contains(TaskFlags::ABORTED) {
      Self::Aborting
    } else {
      Self::Running
    }
  }

  /// Returns `true` if the worker has exited or was never started.
  #[inline]
  pub const fn is_idle(&self) -> bool {
    !matches!(self, Self::Running | Self::Aborting | Self::Completing)
  }
}

/// Who deletes a task handed to [`Task::delete_when_done`].
///
/// [`Task::delete_when_done`]: crate::task::Task::delete_when_done
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Disposal {
  /// The worker was done or never started; the task was deleted by the
  /// caller before returning.
  Immediate,
  /// The worker still runs and deletes the task when the body returns.
  ///
  /// The released handle parks its share of the task with the worker; the
  /// worker drops it after marking itself finished.
  Deferred,
}
