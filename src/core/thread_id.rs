use std::cell::Cell;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread::AccessError;

use crate::loom::thread::thread_local;
use crate::raise;

thread_local! {
  static CURRENT: Cell<Option<ThreadId>> = Cell::new(None);
}

/// A unique identifier for a running thread, used as an inbox address.
///
/// Identifiers are assigned lazily on first use and are never reused, so a
/// stale `ThreadId` cannot accidentally address a newer thread. The 64-bit
/// space is not bounded by any thread limit; a process spawning a billion
/// threads per second would need centuries to exhaust it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ThreadId {
  inner: NonZeroU64,
}

impl ThreadId {
  /// Returns the unique identifier of the calling thread.
  ///
  /// # Panics
  ///
  /// Panics if called while the thread's locals are being destroyed.
  #[inline]
  pub fn current() -> Self {
    match Self::try_current() {
      Ok(id) => id,
      Err(_) => raise!(Error, SysInv, "thread id accessed during thread teardown"),
    }
  }

  /// Returns the unique identifier of the calling thread, failing if the
  /// thread's locals have already been destroyed.
  #[inline]
  pub fn try_current() -> Result<Self, AccessError> {
    CURRENT.try_with(|thread| {
      thread.get().unwrap_or_else(
        #[cold]
        || {
          let id: ThreadId = next_thread_id();
          thread.set(Some(id));
          id
        },
      )
    })
  }

  /// Returns this `ThreadId` as a numeric identifier.
  #[inline]
  pub const fn as_u64(&self) -> NonZeroU64 {
    self.inner
  }
}

impl Display for ThreadId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "<thread.{}>", self.inner)
  }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_thread_id() -> ThreadId {
  let id: u64 = NEXT_ID.fetch_add(1, Ordering::Relaxed);

  match NonZeroU64::new(id) {
    Some(inner) => ThreadId { inner },
    None => raise!(Error, SysCap, "thread identifiers exhausted"),
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
