use hashbrown::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::sync::Arc;

use crate::core::Message;
use crate::core::MessageType;
use crate::loom::sync;
use crate::loom::sync::RwLock;

// -----------------------------------------------------------------------------
// Handler
// -----------------------------------------------------------------------------

/// Consumes messages of one type on the receiving thread.
///
/// Any `Fn(&Message) + Send + Sync` closure is a handler. The message, and
/// its payload, is dropped as soon as `handle` returns.
pub trait Handler: Send + Sync + 'static {
  fn handle(&self, message: &Message);
}

impl<F> Handler for F
where
  F: Fn(&Message) + Send + Sync + 'static,
{
  #[inline]
  fn handle(&self, message: &Message) {
    self(message)
  }
}

/// A shared, type-erased handler.
pub type DynHandler = Arc<dyn Handler>;

// -----------------------------------------------------------------------------
// Handler Table
// -----------------------------------------------------------------------------

/// Maps message types to handlers.
///
/// Registration overwrites; there is no unregistration.
pub struct HandlerTable {
  handlers: RwLock<HashMap<MessageType, DynHandler>>,
}

impl HandlerTable {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      handlers: RwLock::new(HashMap::with_capacity(capacity)),
    }
  }

  /// Returns the number of registered handlers.
  #[inline]
  pub fn len(&self) -> usize {
    sync::read(&self.handlers).len()
  }

  /// Returns `true` if no handler is registered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the handler for `kind`.
  ///
  /// The reference is cloned out so the lock is released before invocation.
  #[inline]
  pub fn get(&self, kind: MessageType) -> Option<DynHandler> {
    sync::read(&self.handlers).get(&kind).cloned()
  }

  /// Installs `handler` for `kind`, returning the handler it replaced.
  #[inline]
  pub(crate) fn insert(&self, kind: MessageType, handler: DynHandler) -> Option<DynHandler> {
    sync::write(&self.handlers).insert(kind, handler)
  }

  pub(crate) fn clear(&self) -> Vec<DynHandler> {
    sync::write(&self.handlers)
      .drain()
      .map(|(_, handler)| handler)
      .collect()
  }
}

impl Debug for HandlerTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("HandlerTable")
      .field("len", &self.len())
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
