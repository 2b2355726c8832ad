use std::time::Duration;

// -----------------------------------------------------------------------------
// Message Types
// -----------------------------------------------------------------------------

/// Number of message types reserved for the queue's own bookkeeping.
///
/// Types `0..RESERVED_MESSAGE_TYPES` belong to the core; collaborators pick
/// their values from the remainder of the space.
pub const RESERVED_MESSAGE_TYPES: u32 = 16;

// -----------------------------------------------------------------------------
// Async Tasks
// -----------------------------------------------------------------------------

/// Stack size (in bytes) for task worker threads.
pub const DEFAULT_TASK_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Name prefix for task worker threads.
pub const DEFAULT_TASK_THREAD_PREFIX: &str = "tmq-task";

/// Poll interval used by [`TaskContext::run_loop`] to re-check the abort flag.
///
/// [`TaskContext::run_loop`]: crate::task::TaskContext::run_loop
pub const TASK_LOOP_POLL: Duration = Duration::from_millis(50);

// -----------------------------------------------------------------------------
// Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated message slots in a new inbox.
pub const CAP_INBOX_MESSAGES: usize = 16;

/// Number of pre-allocated registry entries.
pub const CAP_REGISTERED_THREADS: usize = 32;

/// Number of pre-allocated handler table entries.
pub const CAP_REGISTERED_HANDLERS: usize = 32;
