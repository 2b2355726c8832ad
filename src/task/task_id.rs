use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// A process-unique task identifier.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TaskId {
  inner: NonZeroU64,
}

impl TaskId {
  pub(crate) fn next() -> Self {
    static ID: AtomicU64 = AtomicU64::new(1);

    match NonZeroU64::new(ID.fetch_add(1, Ordering::Relaxed)) {
      Some(inner) => Self { inner },
      None => crate::raise!(Error, SysCap, "task identifiers exhausted"),
    }
  }

  /// Returns this `TaskId` as a numeric identifier.
  #[inline]
  pub const fn as_u64(&self) -> NonZeroU64 {
    self.inner
  }
}

impl Display for TaskId {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "<task.{}>", self.inner)
  }
}
