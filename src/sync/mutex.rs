use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::ops::Deref;
use std::ops::DerefMut;
use std::time::Duration;
use std::time::Instant;

use crate::core::ThreadId;
use crate::error::fatal;
use crate::loom::sync;
use crate::loom::sync::Condvar;
use crate::loom::sync::RawGuard;
use crate::loom::sync::RawMutex;
use crate::loom::sync::atomic::AtomicU64;
use crate::loom::sync::atomic::AtomicUsize;
use crate::loom::sync::atomic::Ordering;
use crate::raise;

/// Holder value of an unlocked mutex.
const UNLOCKED: u64 = 0;

// -----------------------------------------------------------------------------
// Mutex
// -----------------------------------------------------------------------------

/// A non-reentrant mutex with condition waits.
///
/// At most one thread holds the lock at a time. A thread that tries to lock
/// a mutex it already holds raises a `Misuse` exception instead of
/// deadlocking.
///
/// # Conditions
///
/// [`MutexGuard::await_until`] releases the lock until a condition over the
/// protected value holds. The condition is re-evaluated, with the lock held,
/// every time any guard of the same mutex is released, so it must be a pure
/// function of the protected state.
pub struct Mutex<T> {
  holder: AtomicU64,
  waiters: AtomicUsize,
  condvar: Condvar,
  raw: RawMutex<T>,
}

impl<T> Mutex<T> {
  /// Creates a new mutex protecting `value`.
  #[inline]
  pub fn new(value: T) -> Self {
    Self {
      holder: AtomicU64::new(UNLOCKED),
      waiters: AtomicUsize::new(0),
      condvar: Condvar::new(),
      raw: RawMutex::new(value),
    }
  }

  /// Acquires the lock, blocking the current thread until it is available.
  ///
  /// # Panics
  ///
  /// Panics if the calling thread already holds the lock, in release builds
  /// as well as debug builds. Other misuse in this crate only fails loudly
  /// under `debug_assertions`; a re-entrant lock cannot degrade to a return
  /// value because the alternative is a deadlock.
  #[inline]
  pub fn lock(&self) -> MutexGuard<'_, T> {
    let caller: u64 = caller_id();

    if caller != UNLOCKED && self.holder.load(Ordering::Relaxed) == caller {
      tracing::error!(target: "threadmq", "re-entrant mutex lock");
      raise!(Assert, Misuse, "re-entrant lock of a non-recursive mutex");
    }

    self.acquired(sync::lock(&self.raw), caller)
  }

  /// Attempts to acquire the lock without blocking.
  ///
  /// Returns `None` if the lock is held, including by the calling thread.
  #[inline]
  pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
    let caller: u64 = caller_id();

    sync::try_lock(&self.raw).map(|raw| self.acquired(raw, caller))
  }

  #[inline]
  fn acquired<'a>(&'a self, raw: RawGuard<'a, T>, caller: u64) -> MutexGuard<'a, T> {
    self.holder.store(caller, Ordering::Relaxed);

    MutexGuard {
      mutex: self,
      raw: Some(raw),
      caller,
    }
  }
}

impl<T> Debug for Mutex<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Mutex")
      .field("locked", &(self.holder.load(Ordering::Relaxed) != UNLOCKED))
      .finish_non_exhaustive()
  }
}

impl<T> Default for Mutex<T>
where
  T: Default,
{
  #[inline]
  fn default() -> Self {
    Self::new(T::default())
  }
}

// -----------------------------------------------------------------------------
// Mutex Guard
// -----------------------------------------------------------------------------

/// Scoped lock of a [`Mutex`]; the lock is released on drop.
pub struct MutexGuard<'a, T> {
  mutex: &'a Mutex<T>,
  raw: Option<RawGuard<'a, T>>,
  caller: u64,
}

impl<'a, T> MutexGuard<'a, T> {
  /// Releases and reacquires the lock until `condition` holds.
  ///
  /// `condition` is always invoked with the lock held.
  pub fn await_until<F>(&mut self, mut condition: F)
  where
    F: FnMut(&T) -> bool,
  {
    while !condition(&**self) {
      self.park(None);
    }
  }

  /// Like [`await_until`], but gives up after `timeout`.
  ///
  /// Returns `true` if the condition holds on return.
  ///
  /// [`await_until`]: Self::await_until
  pub fn await_timeout<F>(&mut self, mut condition: F, timeout: Duration) -> bool
  where
    F: FnMut(&T) -> bool,
  {
    let deadline: Instant = Instant::now() + timeout;

    'wait: loop {
      if condition(&**self) {
        break 'wait true;
      }

      let now: Instant = Instant::now();

      if now >= deadline {
        break 'wait false;
      }

      self.park(Some(deadline - now));
    }
  }

  fn park(&mut self, timeout: Option<Duration>) {
    let Some(raw) = self.raw.take() else {
      fatal!("mutex guard parked twice");
    };

    self.mutex.waiters.fetch_add(1, Ordering::Relaxed);
    self.mutex.holder.store(UNLOCKED, Ordering::Relaxed);

    let raw: RawGuard<'a, T> = match timeout {
      Some(timeout) => sync::wait_timeout(&self.mutex.condvar, raw, timeout),
      None => sync::wait(&self.mutex.condvar, raw),
    };

    self.mutex.waiters.fetch_sub(1, Ordering::Relaxed);
    self.mutex.holder.store(self.caller, Ordering::Relaxed);
    self.raw = Some(raw);
  }
}

impl<T> Deref for MutexGuard<'_, T> {
  type Target = T;

  #[inline]
  fn deref(&self) -> &Self::Target {
    match self.raw.as_deref() {
      Some(value) => value,
      None => fatal!("mutex guard accessed while parked"),
    }
  }
}

impl<T> DerefMut for MutexGuard<'_, T> {
  #[inline]
  fn deref_mut(&mut self) -> &mut Self::Target {
    match self.raw.as_deref_mut() {
      Some(value) => value,
      None => fatal!("mutex guard accessed while parked"),
    }
  }
}

impl<T> Drop for MutexGuard<'_, T> {
  fn drop(&mut self) {
    let Some(raw) = self.raw.take() else {
      return;
    };

    // Waiters register while holding the lock, so this read is exact.
    let notify: bool = self.mutex.waiters.load(Ordering::Relaxed) != 0;

    self.mutex.holder.store(UNLOCKED, Ordering::Relaxed);

    drop(raw);

    if notify {
      self.mutex.condvar.notify_all();
    }
  }
}

impl<T> Debug for MutexGuard<'_, T>
where
  T: Debug,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&**self, f)
  }
}

#[inline]
fn caller_id() -> u64 {
  ThreadId::try_current().map_or(UNLOCKED, |id| id.as_u64().get())
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(all(test, not(loom)))]
mod tests {
  use std::panic;
  use std::panic::AssertUnwindSafe;
  use std::thread;
  use std::time::Duration;
  use triomphe::Arc;

  use crate::sync::Mutex;
  use crate::sync::MutexGuard;

  #[test]
  fn test_lock_and_mutate() {
    let mutex: Mutex<Vec<u32>> = Mutex::new(Vec::new());

    mutex.lock().push(1);
    mutex.lock().push(2);

    assert_eq!(*mutex.lock(), vec![1, 2]);
  }

  #[test]
  fn test_reentrant_lock_panics() {
    let mutex: Mutex<u32> = Mutex::new(0);
    let guard: MutexGuard<'_, u32> = mutex.lock();

    let result: _ = panic::catch_unwind(AssertUnwindSafe(|| {
      let _nested: MutexGuard<'_, u32> = mutex.lock();
    }));

    assert!(result.is_err());
    drop(guard);

    // The mutex is still usable after the rejected attempt.
    assert_eq!(*mutex.lock(), 0);
  }

  #[test]
  fn test_try_lock_held() {
    let mutex: Mutex<u32> = Mutex::new(0);
    let guard: MutexGuard<'_, u32> = mutex.lock();

    assert!(mutex.try_lock().is_none());
    drop(guard);
    assert!(mutex.try_lock().is_some());
  }

  #[test]
  fn test_await_until() {
    let mutex: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));

    let producer = {
      let mutex: Arc<Mutex<u32>> = Arc::clone(&mutex);

      thread::spawn(move || {
        for _ in 0..10 {
          *mutex.lock() += 1;
        }
      })
    };

    let mut guard: MutexGuard<'_, u32> = mutex.lock();
    guard.await_until(|count| *count == 10);
    assert_eq!(*guard, 10);
    drop(guard);

    producer.join().unwrap();
  }

  #[test]
  fn test_await_timeout_expires() {
    let mutex: Mutex<bool> = Mutex::new(false);
    let mut guard: MutexGuard<'_, bool> = mutex.lock();

    assert!(!guard.await_timeout(|flag| *flag, Duration::from_millis(20)));

    // The lock is held again after the timeout.
    *guard = true;
    assert!(guard.await_timeout(|flag| *flag, Duration::from_millis(20)));
  }
}
