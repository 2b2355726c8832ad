//! Mutual exclusion and signalling primitives used throughout the queue.
//!
//! - [`Mutex`]: non-reentrant lock with condition waits
//! - [`Event`]: auto-reset signal built on [`Mutex`]

mod event;
mod mutex;

pub use self::event::Event;
pub use self::mutex::Mutex;
pub use self::mutex::MutexGuard;
