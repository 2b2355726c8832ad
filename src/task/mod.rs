//! Worker-thread tasks that report back through the message queue.
//!
//! A [`Task`] runs an [`AsyncTask`] on a dedicated thread. The body posts
//! [`TaskEvent`]s with [`TaskContext::notify_listener`]; they are delivered
//! as `TASK_EVENT` messages to the thread that initialized the task and
//! handed to its [`TaskListener`]. Abortion is cooperative: the body polls
//! [`TaskContext::is_aborted`] or blocks in [`TaskContext::run_loop`] /
//! [`TaskContext::wait_for_abort`].
//!
//! Ownership is explicit: the [`Task`] handle owns the task until it is
//! dropped (abort and join), joined, or handed to the worker with
//! [`Task::delete_when_done`].

mod abort_handle;
mod async_task;
mod task;
mod task_context;
mod task_id;
mod task_listener;
mod task_shared;
mod task_state;

pub use self::abort_handle::AbortHandle;
pub use self::async_task::AsyncTask;
pub use self::task::Task;
pub use self::task_context::TaskContext;
pub use self::task_id::TaskId;
pub use self::task_listener::TaskEvent;
pub use self::task_listener::TaskListener;
pub use self::task_state::Disposal;
pub use self::task_state::TaskState;
