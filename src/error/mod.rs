//! Error types and failure macros.
//!
//! Failures fall into three tiers:
//!
//! 1. **Recoverable outcomes** are returned as values: [`send`] reports a
//!    routing failure as `false`, initialization and task operations return
//!    [`InitError`], [`TaskError`] or [`LoopError`].
//! 2. **Misuse** (double initialization, starting before initialization,
//!    re-entrant locking) is logged and, in debug builds, raised as an
//!    [`Exception`] of group [`Misuse`]. Release builds return the typed error.
//! 3. **Broken invariants** inside the queue panic with a [`SysInv`]
//!    exception, or abort via `fatal!` when unwinding is unsafe.
//!
//! No error ever crosses a thread boundary as a panic: task bodies that panic
//! are caught on their worker thread.
//!
//! [`send`]: crate::queue::ThreadMessageQueue::send
//! [`Misuse`]: ExceptionGroup::Misuse
//! [`SysInv`]: ExceptionGroup::SysInv

mod exception;
mod exception_class;
mod exception_group;
mod loop_error;
mod task_error;
mod wake_error;

pub use self::exception::Exception;
pub use self::exception_class::ExceptionClass;
pub use self::exception_group::ExceptionGroup;
pub use self::loop_error::LoopError;
pub use self::task_error::TaskError;
pub use self::wake_error::InitError;
pub use self::wake_error::WakeError;

// -----------------------------------------------------------------------------
// raise!
// -----------------------------------------------------------------------------

/// Raises an exception with the specified class, group, and message.
///
/// # Examples
///
/// ```
/// # use threadmq::raise;
/// fn checked_depth(depth: usize) -> usize {
///   if depth > 64 {
///     raise!(Error, SysCap, "dispatch nested too deeply");
///   }
///   depth
/// }
/// ```
#[macro_export]
macro_rules! raise {
  ($class:ident, $group:ident, $error:expr $(,)?) => {
    ::std::panic!(
      "{}",
      $crate::error::Exception::new(
        $crate::error::ExceptionClass::$class,
        $crate::error::ExceptionGroup::$group,
        $error,
      ),
    )
  };
}

// -----------------------------------------------------------------------------
// fatal!
// -----------------------------------------------------------------------------

/// Displays a system error message and aborts the program.
///
/// Reserved for states where unwinding would leave shared queue state
/// corrupted.
macro_rules! fatal {
  ($error:expr) => {{
    ::std::eprintln!(
      "{}:{}: (SysInv) a system invariant has been broken: {}",
      ::std::file!(),
      ::std::line!(),
      $error,
    );

    ::std::process::abort();
  }};
}

// -----------------------------------------------------------------------------
// misuse!
// -----------------------------------------------------------------------------

/// Reports API misuse.
///
/// Always logs; debug builds additionally raise an `assert:misuse`
/// exception. The caller is expected to return its typed error afterwards.
macro_rules! misuse {
  ($error:expr $(,)?) => {{
    let error: &dyn ::std::fmt::Display = &$error;

    ::tracing::error!(target: "threadmq", %error, "api misuse");

    if ::std::cfg!(debug_assertions) {
      $crate::raise!(Assert, Misuse, error);
    }
  }};
}

pub(crate) use fatal;
pub(crate) use misuse;

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
