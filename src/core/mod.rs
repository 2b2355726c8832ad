//! Core value types: thread identifiers, message types, payloads.

mod message;
mod message_type;
mod payload;
mod thread_id;

pub use self::message::Message;
pub use self::message_type::MessageType;
pub use self::payload::Payload;
pub use self::thread_id::ThreadId;
