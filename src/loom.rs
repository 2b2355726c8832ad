//! Concurrency primitives, swapped for their `loom` models under `--cfg loom`.
//!
//! The lock APIs of `parking_lot` and `loom` differ (poisoning, condition
//! variable signatures), so the shim exposes small adapter functions in
//! addition to the re-exported types.

#[cfg(not(loom))]
pub(crate) mod export {
  pub(crate) mod sync {
    use std::time::Duration;

    pub(crate) use parking_lot::Condvar;
    pub(crate) use parking_lot::Mutex as RawMutex;
    pub(crate) use parking_lot::MutexGuard as RawGuard;
    pub(crate) use parking_lot::RwLock;
    pub(crate) use parking_lot::RwLockReadGuard;
    pub(crate) use parking_lot::RwLockWriteGuard;

    pub(crate) mod atomic {
      pub(crate) use std::sync::atomic::AtomicU64;
      pub(crate) use std::sync::atomic::AtomicUsize;
      pub(crate) use std::sync::atomic::Ordering;
    }

    #[inline]
    pub(crate) fn lock<T>(mutex: &RawMutex<T>) -> RawGuard<'_, T> {
      mutex.lock()
    }

    #[inline]
    pub(crate) fn try_lock<T>(mutex: &RawMutex<T>) -> Option<RawGuard<'_, T>> {
      mutex.try_lock()
    }

    #[inline]
    pub(crate) fn wait<'a, T>(condvar: &Condvar, mut guard: RawGuard<'a, T>) -> RawGuard<'a, T> {
      condvar.wait(&mut guard);
      guard
    }

    #[inline]
    pub(crate) fn wait_timeout<'a, T>(
      condvar: &Condvar,
      mut guard: RawGuard<'a, T>,
      timeout: Duration,
    ) -> RawGuard<'a, T> {
      let _ignore: _ = condvar.wait_for(&mut guard, timeout);
      guard
    }

    #[inline]
    pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
      lock.read()
    }

    #[inline]
    pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
      lock.write()
    }
  }

  pub(crate) mod thread {
    pub(crate) use std::thread::Builder;
    pub(crate) use std::thread::JoinHandle;
    pub(crate) use std::thread_local;
  }
}

#[cfg(loom)]
pub(crate) mod export {
  pub(crate) mod sync {
    use std::sync::PoisonError;
    use std::time::Duration;

    pub(crate) use loom::sync::Condvar;
    pub(crate) use loom::sync::Mutex as RawMutex;
    pub(crate) use loom::sync::MutexGuard as RawGuard;
    pub(crate) use loom::sync::RwLock;
    pub(crate) use loom::sync::RwLockReadGuard;
    pub(crate) use loom::sync::RwLockWriteGuard;

    pub(crate) mod atomic {
      pub(crate) use loom::sync::atomic::AtomicU64;
      pub(crate) use loom::sync::atomic::AtomicUsize;
      pub(crate) use loom::sync::atomic::Ordering;
    }

    #[inline]
    pub(crate) fn lock<T>(mutex: &RawMutex<T>) -> RawGuard<'_, T> {
      mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn try_lock<T>(mutex: &RawMutex<T>) -> Option<RawGuard<'_, T>> {
      mutex.try_lock().ok()
    }

    #[inline]
    pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: RawGuard<'a, T>) -> RawGuard<'a, T> {
      condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn wait_timeout<'a, T>(
      condvar: &Condvar,
      guard: RawGuard<'a, T>,
      timeout: Duration,
    ) -> RawGuard<'a, T> {
      match condvar.wait_timeout(guard, timeout) {
        Ok((guard, _)) => guard,
        Err(error) => error.into_inner().0,
      }
    }

    #[inline]
    pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
      lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
      lock.write().unwrap_or_else(PoisonError::into_inner)
    }
  }

  pub(crate) mod thread {
    pub(crate) use loom::thread::Builder;
    pub(crate) use loom::thread::JoinHandle;
    pub(crate) use loom::thread_local;
  }
}

#[doc(inline)]
pub(crate) use self::export::*;
