use hashbrown::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use triomphe::Arc;

use crate::core::ThreadId;
use crate::loom::sync;
use crate::loom::sync::RwLock;
use crate::loom::sync::RwLockWriteGuard;
use crate::queue::Inbox;

/// Maps thread identifiers to their inboxes.
///
/// Lookups take the read side of the lock and clone the inbox reference, so
/// no registry lock is held while a message is enqueued or dispatched.
pub struct Registry {
  inboxes: RwLock<HashMap<ThreadId, Arc<Inbox>>>,
}

impl Registry {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      inboxes: RwLock::new(HashMap::with_capacity(capacity)),
    }
  }

  /// Returns the number of registered threads.
  #[inline]
  pub fn len(&self) -> usize {
    sync::read(&self.inboxes).len()
  }

  /// Returns `true` if no thread is registered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if `id` has an inbox.
  #[inline]
  pub fn contains(&self, id: ThreadId) -> bool {
    sync::read(&self.inboxes).contains_key(&id)
  }

  /// Returns the inbox of `id`, if registered.
  #[inline]
  pub fn get(&self, id: ThreadId) -> Option<Arc<Inbox>> {
    sync::read(&self.inboxes).get(&id).cloned()
  }

  /// Registers `inbox` under its owner unless the owner already has one.
  ///
  /// Returns `false` (dropping `inbox`) if the owner was registered.
  pub(crate) fn insert(&self, inbox: Inbox) -> bool {
    let mut guard: RwLockWriteGuard<'_, HashMap<ThreadId, Arc<Inbox>>> = sync::write(&self.inboxes);

    if guard.contains_key(&inbox.owner()) {
      return false;
    }

    guard.insert(inbox.owner(), Arc::new(inbox));

    true
  }

  /// Unregisters `id`, returning its inbox.
  #[inline]
  pub(crate) fn remove(&self, id: ThreadId) -> Option<Arc<Inbox>> {
    sync::write(&self.inboxes).remove(&id)
  }

  /// Unregisters every thread, returning the removed inboxes.
  pub(crate) fn drain(&self) -> Vec<Arc<Inbox>> {
    sync::write(&self.inboxes)
      .drain()
      .map(|(_, inbox)| inbox)
      .collect()
  }
}

impl Debug for Registry {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Registry")
      .field("len", &self.len())
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
