use crate::task::TaskContext;

/// A unit of work run on its own worker thread by a [`Task`].
///
/// [`run`] should check [`TaskContext::is_aborted`] regularly; abortion is
/// cooperative and a body that never checks it never stops.
///
/// [`Task`]: crate::task::Task
/// [`run`]: Self::run
pub trait AsyncTask: Send + Sync + 'static {
  /// The task body, executed once on the worker thread.
  fn run(&self, context: &TaskContext<'_>);

  /// Runs on the worker thread after [`run`] returns (or panics).
  ///
  /// [`run`]: Self::run
  #[inline]
  fn clean_up(&self) {}
}
