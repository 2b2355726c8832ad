//! Thread registry, inboxes, handler table, and the queue façade.

mod dispatch;
mod handler;
mod inbox;
mod registry;
mod thread_message_queue;

pub use self::dispatch::Dispatch;
pub use self::handler::DynHandler;
pub use self::handler::Handler;
pub use self::handler::HandlerTable;
pub use self::inbox::Inbox;
pub use self::registry::Registry;
pub use self::thread_message_queue::ThreadMessageQueue;
