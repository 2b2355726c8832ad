//! Threadmq - A typed cross-thread message queue with worker-thread tasks.
//!
//! Threads register an inbox with a [`ThreadMessageQueue`] and receive
//! messages from any other thread. Delivery always happens on the receiving
//! thread, either in a loop run by the queue or in a host event loop roused
//! through a pluggable [`WakeChannel`]. [`Task`] builds cancellable worker
//! threads on top, reporting progress back to the thread that created them.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::thread;
//! use threadmq::core::Message;
//! use threadmq::core::MessageType;
//! use threadmq::core::Payload;
//! use threadmq::queue::ThreadMessageQueue;
//!
//! const GREETING: MessageType = MessageType::new(100);
//!
//! let queue = ThreadMessageQueue::instance();
//!
//! queue.init_thread().unwrap();
//! queue.register_handler(GREETING, |message: &Message| {
//!   println!("{:?}", message.payload().downcast_ref::<&str>());
//! });
//!
//! let main = queue.current_thread_id();
//!
//! thread::spawn(move || {
//!   let queue = ThreadMessageQueue::instance();
//!   queue.send(main, GREETING, Payload::new("Hello!"));
//!   queue.stop_loop(main);
//! });
//!
//! queue.run_loop().unwrap();
//! ```
//!
//! # Core Modules
//!
//! - [`queue`]: Inboxes, handlers, and the queue façade
//! - [`task`]: Worker-thread tasks with listeners and cooperative abort
//! - [`wake`]: Wake channels binding inboxes to event loops
//! - [`sync`]: Non-reentrant mutex with condition waits
//! - [`core`]: Core types (thread ids, message types, payloads)
//! - [`error`]: Exception system and typed errors
//! - [`config`] / [`consts`]: Configuration and defaults
//!
//! [`ThreadMessageQueue`]: crate::queue::ThreadMessageQueue
//! [`WakeChannel`]: crate::wake::WakeChannel
//! [`Task`]: crate::task::Task

mod loom;

pub mod config;
pub mod consts;
pub mod core;
pub mod error;
pub mod init;
pub mod queue;
pub mod sync;
pub mod task;
pub mod wake;
