use crossbeam_utils::CachePadded;
use std::cell::Cell;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ptr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use tracing::trace;
use triomphe::Arc;

use crate::config::QueueConfig;
use crate::core::Message;
use crate::core::MessageType;
use crate::core::Payload;
use crate::core::ThreadId;
use crate::error::InitError;
use crate::error::LoopError;
use crate::error::WakeError;
use crate::error::misuse;
use crate::loom::thread::thread_local;
use crate::queue::Dispatch;
use crate::queue::DynHandler;
use crate::queue::Handler;
use crate::queue::HandlerTable;
use crate::queue::Inbox;
use crate::queue::Registry;
use crate::wake::EventChannel;
use crate::wake::NotifyChannel;
use crate::wake::WakeChannel;

static INSTANCE: OnceLock<Arc<ThreadMessageQueue>> = OnceLock::new();

thread_local! {
  static EXIT_HOOK: ExitHook = ExitHook::new();
}

// -----------------------------------------------------------------------------
// Thread Message Queue
// -----------------------------------------------------------------------------

/// Routes typed messages between threads.
///
/// Each participating thread owns an [`Inbox`], created by [`init_thread`].
/// Any thread may [`send`] to a registered thread; delivery happens on the
/// receiving thread, either in a loop run by the queue ([`run_loop`],
/// [`pump`]) or in a host loop calling [`dispatch_one`] when its
/// [`WakeChannel`] fires.
///
/// The process-wide queue is available through [`instance`]; independent
/// queues can be built with [`new`] for isolation in tests.
///
/// [`init_thread`]: Self::init_thread
/// [`send`]: Self::send
/// [`run_loop`]: Self::run_loop
/// [`pump`]: Self::pump
/// [`dispatch_one`]: Self::dispatch_one
/// [`instance`]: Self::instance
/// [`new`]: Self::new
pub struct ThreadMessageQueue {
  registry: CachePadded<Registry>,
  handlers: CachePadded<HandlerTable>,
  config: QueueConfig,
  global: bool,
}

impl ThreadMessageQueue {
  /// Returns the process-wide queue, creating it on first use.
  ///
  /// Threads registered with this queue are deregistered automatically
  /// when they exit.
  #[inline]
  pub fn instance() -> &'static Arc<Self> {
    INSTANCE.get_or_init(|| Arc::new(Self::build(QueueConfig::new(), true)))
  }

  /// Creates an independent queue with the default configuration.
  #[inline]
  pub fn new() -> Arc<Self> {
    Self::with_config(QueueConfig::new())
  }

  /// Creates an independent queue with the given configuration.
  #[inline]
  pub fn with_config(config: QueueConfig) -> Arc<Self> {
    Arc::new(Self::build(config, false))
  }

  fn build(config: QueueConfig, global: bool) -> Self {
    Self {
      registry: CachePadded::new(Registry::new(config.registry_capacity)),
      handlers: CachePadded::new(HandlerTable::new(config.handler_capacity)),
      config,
      global,
    }
  }

  /// Returns the queue configuration.
  #[inline]
  pub fn config(&self) -> &QueueConfig {
    &self.config
  }

  /// Returns the identifier of the calling thread.
  #[inline]
  pub fn current_thread_id(&self) -> ThreadId {
    ThreadId::current()
  }

  /// Drops every inbox and handler.
  ///
  /// Intended for tests sharing the global queue. Pending payloads are
  /// dropped; loops blocked on a removed inbox return.
  #[doc(hidden)]
  pub fn reset(&self) {
    let inboxes: Vec<Arc<Inbox>> = self.registry.drain();
    let handlers: Vec<DynHandler> = self.handlers.clear();

    debug!(target: "threadmq", threads = inboxes.len(), handlers = handlers.len(), "queue reset");

    for inbox in inboxes {
      drop(inbox.close());
    }

    drop(handlers);
  }

  // ---------------------------------------------------------------------------
  // Registration
  // ---------------------------------------------------------------------------

  /// Creates an inbox for the calling thread, woken by an [`EventChannel`].
  ///
  /// Does nothing if the thread already has an inbox.
  #[inline]
  pub fn init_thread(&self) -> Result<(), InitError> {
    self.init_thread_with(|| Ok(EventChannel::new()))
  }

  /// Creates an inbox for the calling thread, woken by the channel `factory`
  /// builds.
  ///
  /// Does nothing, and does not call `factory`, if the thread already has
  /// an inbox.
  pub fn init_thread_with<W, F>(&self, factory: F) -> Result<(), InitError>
  where
    W: WakeChannel,
    F: FnOnce() -> Result<W, WakeError>,
  {
    let id: ThreadId = ThreadId::current();

    if self.registry.contains(id) {
      return Ok(());
    }

    let wake: W = factory()?;
    let inbox: Inbox = Inbox::new(id, Box::new(wake), self.config.inbox_capacity);

    if self.registry.insert(inbox) {
      debug!(target: "threadmq", thread = %id, "inbox created");

      if self.global {
        let _ignore: _ = EXIT_HOOK.try_with(|hook| hook.arm(id));
      }
    }

    Ok(())
  }

  /// Removes the inbox of `id`, dropping any pending messages.
  ///
  /// Returns `false` if `id` had no inbox. Later sends to `id` fail.
  pub fn deregister_thread(&self, id: ThreadId) -> bool {
    let Some(inbox) = self.registry.remove(id) else {
      return false;
    };

    let pending: _ = inbox.close();

    debug!(target: "threadmq", thread = %id, pending = pending.len(), "inbox removed");

    drop(pending);
    drop(inbox);

    true
  }

  /// Removes the inbox of the calling thread.
  #[inline]
  pub fn deregister_current(&self) -> bool {
    self.deregister_thread(ThreadId::current())
  }

  /// Returns `true` if `id` has an inbox.
  #[inline]
  pub fn is_registered(&self, id: ThreadId) -> bool {
    self.registry.contains(id)
  }

  /// Returns the number of messages waiting in the inbox of `id`.
  #[inline]
  pub fn pending(&self, id: ThreadId) -> usize {
    self.registry.get(id).map_or(0, |inbox| inbox.len())
  }

  /// Returns the number of threads with an inbox.
  #[inline]
  pub fn thread_count(&self) -> usize {
    self.registry.len()
  }

  /// Installs `handler` for messages of type `kind`, replacing any previous
  /// handler.
  ///
  /// Registering a handler for a reserved type is misuse and is ignored.
  pub fn register_handler<H>(&self, kind: MessageType, handler: H)
  where
    H: Handler,
  {
    if kind.is_reserved() {
      misuse!(format!("message type {kind} is reserved"));
      return;
    }

    self.insert_handler(kind, std::sync::Arc::new(handler));
  }

  #[inline]
  pub(crate) fn has_handler(&self, kind: MessageType) -> bool {
    self.handlers.get(kind).is_some()
  }

  pub(crate) fn register_reserved(&self, kind: MessageType, handler: DynHandler) {
    self.insert_handler(kind, handler);
  }

  fn insert_handler(&self, kind: MessageType, handler: DynHandler) {
    if let Some(previous) = self.handlers.insert(kind, handler) {
      debug!(target: "threadmq", %kind, "handler replaced");
      drop(previous);
    }
  }

  // ---------------------------------------------------------------------------
  // Delivery
  // ---------------------------------------------------------------------------

  /// Enqueues a message for `target` and wakes it.
  ///
  /// Returns `false` if `target` has no inbox; the payload is dropped
  /// either way once it can no longer be delivered.
  pub fn send(&self, target: ThreadId, kind: MessageType, payload: Payload) -> bool {
    let message: Message = Message::new(kind, payload, ThreadId::try_current().ok());

    let Some(inbox) = self.registry.get(target) else {
      debug!(target: "threadmq", thread = %target, %kind, "send to unregistered thread");
      drop(message);
      return false;
    };

    match inbox.push(message) {
      Ok(()) => {
        trace!(target: "threadmq", thread = %target, %kind, "send");
        true
      }
      Err(message) => {
        drop(inbox);
        debug!(target: "threadmq", thread = %target, %kind, "send to closed inbox");
        drop(message);
        false
      }
    }
  }

  /// Posts a [`LOOP_STOP`] message to `target`.
  ///
  /// [`LOOP_STOP`]: MessageType::LOOP_STOP
  #[inline]
  pub fn stop_loop(&self, target: ThreadId) -> bool {
    self.send(target, MessageType::LOOP_STOP, Payload::empty())
  }

  /// Delivers at most one pending message of the calling thread.
  ///
  /// An empty inbox (a spurious wake) is not an error.
  #[inline]
  pub fn dispatch_one(&self) -> Dispatch {
    match self.registry.get(ThreadId::current()) {
      Some(inbox) => self.dispatch_from(&inbox),
      None => Dispatch::Empty,
    }
  }

  /// Delivers the messages pending at the time of the call.
  ///
  /// Messages sent by the handlers themselves are left for the next call.
  /// [`LOOP_STOP`] messages are consumed without effect. Returns the number
  /// of messages consumed.
  ///
  /// [`LOOP_STOP`]: MessageType::LOOP_STOP
  pub fn dispatch_pending(&self) -> usize {
    let Some(inbox) = self.registry.get(ThreadId::current()) else {
      return 0;
    };

    let mut count: usize = 0;

    for _ in 0..inbox.len() {
      if !self.dispatch_from(&inbox).is_consumed() {
        break;
      }

      count += 1;
    }

    count
  }

  fn dispatch_from(&self, inbox: &Inbox) -> Dispatch {
    let Some((message, _more)) = inbox.pop() else {
      return Dispatch::Empty;
    };

    let kind: MessageType = message.kind();

    if kind == MessageType::LOOP_STOP {
      return Dispatch::Stop;
    }

    let Some(handler) = self.handlers.get(kind) else {
      debug!(target: "threadmq", %kind, "no handler registered");
      return Dispatch::Unhandled(kind);
    };

    trace!(target: "threadmq", %kind, "dispatch");

    handler.handle(&message);

    drop(message);

    Dispatch::Handled(kind)
  }

  // ---------------------------------------------------------------------------
  // Message Loops
  // ---------------------------------------------------------------------------

  /// Runs a message loop on the calling thread until a [`LOOP_STOP`]
  /// message arrives or the thread is deregistered.
  ///
  /// Requires an inbox with a blocking channel, as created by
  /// [`init_thread`].
  ///
  /// [`LOOP_STOP`]: MessageType::LOOP_STOP
  /// [`init_thread`]: Self::init_thread
  #[inline]
  pub fn run_loop(&self) -> Result<(), LoopError> {
    self.run_loop_until(None, || false)
  }

  /// Like [`run_loop`], but also returns once `stop` holds, checking it
  /// after every wake and at least once per `poll` interval.
  ///
  /// [`run_loop`]: Self::run_loop
  pub(crate) fn run_loop_until<F>(&self, poll: Option<Duration>, stop: F) -> Result<(), LoopError>
  where
    F: Fn() -> bool,
  {
    let id: ThreadId = ThreadId::current();
    let inbox: Arc<Inbox> = self.registry.get(id).ok_or(LoopError::NotInitialized)?;

    if !inbox.wake().is_blocking() {
      return Err(LoopError::NotBlocking);
    }

    debug!(target: "threadmq", thread = %id, "message loop started");

    'run: loop {
      'drain: loop {
        match self.dispatch_from(&inbox) {
          Dispatch::Empty => break 'drain,
          Dispatch::Stop => break 'run,
          Dispatch::Handled(_) | Dispatch::Unhandled(_) => {}
        }
      }

      if inbox.is_closed() || stop() {
        break 'run;
      }

      match poll {
        Some(timeout) => {
          let _signalled: bool = inbox.wake().wait_timeout(timeout);
        }
        None => inbox.wake().wait(),
      }
    }

    debug!(target: "threadmq", thread = %id, "message loop stopped");

    Ok(())
  }

  /// Runs a message loop on the calling thread inside a tokio runtime.
  ///
  /// `channel` must be (a clone of) the channel the thread's inbox was
  /// created with, and the future must be polled on that thread, e.g. by a
  /// current-thread runtime's `block_on`. Returns once a [`LOOP_STOP`]
  /// message arrives or the thread is deregistered.
  ///
  /// Fails with [`LoopError::ChannelMismatch`] if the inbox was created with
  /// any other channel, since awaiting it would never wake.
  ///
  /// [`LOOP_STOP`]: MessageType::LOOP_STOP
  pub async fn pump(&self, channel: &NotifyChannel) -> Result<(), LoopError> {
    let id: ThreadId = ThreadId::current();
    let inbox: Arc<Inbox> = self.registry.get(id).ok_or(LoopError::NotInitialized)?;

    let shared: bool = match (inbox.wake().as_notify(), channel.as_notify()) {
      (Some(own), Some(given)) => ptr::eq(own, given),
      _ => false,
    };

    if !shared {
      return Err(LoopError::ChannelMismatch);
    }

    debug!(target: "threadmq", thread = %id, "message pump started");

    'run: loop {
      'drain: loop {
        match self.dispatch_from(&inbox) {
          Dispatch::Empty => break 'drain,
          Dispatch::Stop => break 'run,
          Dispatch::Handled(_) | Dispatch::Unhandled(_) => {}
        }
      }

      if inbox.is_closed() {
        break 'run;
      }

      channel.notified().await;
    }

    debug!(target: "threadmq", thread = %id, "message pump stopped");

    Ok(())
  }
}

impl Debug for ThreadMessageQueue {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("ThreadMessageQueue")
      .field("registry", &*self.registry)
      .field("handlers", &*self.handlers)
      .field("global", &self.global)
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Exit Hook
// -----------------------------------------------------------------------------

/// Deregisters a thread from the global queue when its locals are destroyed.
struct ExitHook {
  id: Cell<Option<ThreadId>>,
}

impl ExitHook {
  #[inline]
  const fn new() -> Self {
    Self {
      id: Cell::new(None),
    }
  }

  #[inline]
  fn arm(&self, id: ThreadId) {
    self.id.set(Some(id));
  }
}

impl Drop for ExitHook {
  fn drop(&mut self) {
    let Some(id) = self.id.take() else {
      return;
    };

    if let Some(queue) = INSTANCE.get() {
      queue.deregister_thread(id);
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(all(test, not(loom)))]
mod tests {
  use std::sync::Arc as StdArc;
  use std::sync::Mutex as StdMutex;
  use std::thread;
  use std::time::Duration;
  use triomphe::Arc;

  use crate::core::Message;
  use crate::core::MessageType;
  use crate::core::Payload;
  use crate::core::ThreadId;
  use crate::error::LoopError;
  use crate::error::WakeError;
  use crate::queue::Dispatch;
  use crate::queue::ThreadMessageQueue;
  use crate::wake::PollChannel;

  const PING: MessageType = MessageType::new(100);

  #[test]
  fn test_dispatch_order() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let seen: StdArc<StdMutex<Vec<u32>>> = StdArc::default();

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();
    queue.register_handler(PING, {
      let seen: StdArc<StdMutex<Vec<u32>>> = StdArc::clone(&seen);
      move |message: &Message| {
        seen.lock().unwrap().push(*message.payload().downcast_ref::<u32>().unwrap());
      }
    });

    let me: ThreadId = queue.current_thread_id();

    for value in 0..5_u32 {
      assert!(queue.send(me, PING, Payload::new(value)));
    }

    assert_eq!(queue.pending(me), 5);
    assert_eq!(queue.dispatch_one(), Dispatch::Handled(PING));
    assert_eq!(queue.dispatch_pending(), 4);
    assert_eq!(queue.dispatch_one(), Dispatch::Empty);
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn test_unhandled_and_stop() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();

    let me: ThreadId = ThreadId::current();

    queue.send(me, PING, Payload::empty());
    queue.stop_loop(me);

    assert_eq!(queue.dispatch_one(), Dispatch::Unhandled(PING));
    assert_eq!(queue.dispatch_one(), Dispatch::Stop);
    assert_eq!(queue.dispatch_one(), Dispatch::Empty);
  }

  #[test]
  fn test_sender_recorded() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let seen: StdArc<StdMutex<Option<ThreadId>>> = StdArc::default();

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();
    queue.register_handler(PING, {
      let seen: StdArc<StdMutex<Option<ThreadId>>> = StdArc::clone(&seen);
      move |message: &Message| *seen.lock().unwrap() = message.sender()
    });

    let me: ThreadId = ThreadId::current();
    let sender: ThreadId = {
      let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
      thread::spawn(move || {
        assert!(queue.send(me, PING, Payload::empty()));
        ThreadId::current()
      })
      .join()
      .unwrap()
    };

    queue.dispatch_pending();

    assert_eq!(*seen.lock().unwrap(), Some(sender));
  }

  #[test]
  fn test_init_idempotent() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();

    queue.init_thread().unwrap();
    queue
      .init_thread_with(|| Err::<PollChannel, _>(WakeError::new("factory called twice")))
      .unwrap();

    assert_eq!(queue.thread_count(), 1);
    assert!(queue.deregister_current());
    assert!(!queue.deregister_current());
  }

  #[test]
  fn test_loop_requires_blocking_channel() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();

    assert_eq!(queue.run_loop(), Err(LoopError::NotInitialized));

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();

    assert_eq!(queue.run_loop(), Err(LoopError::NotBlocking));
  }

  #[test]
  fn test_spurious_wake_is_noop() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let me: ThreadId = ThreadId::current();

    queue.init_thread().unwrap();

    // Consumed outside the loop, leaving the channel signalled with nothing
    // queued.
    assert!(queue.send(me, PING, Payload::empty()));
    assert_eq!(queue.dispatch_one(), Dispatch::Unhandled(PING));

    let stopper = {
      let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
      thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        assert!(queue.stop_loop(me));
      })
    };

    assert_eq!(queue.run_loop(), Ok(()));
    stopper.join().unwrap();
  }

  #[test]
  #[cfg_attr(debug_assertions, should_panic(expected = "assert:misuse"))]
  fn test_reserved_handler_rejected() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();

    queue.register_handler(MessageType::TASK_EVENT, |_: &Message| {});
  }

  #[test]
  fn test_reset() {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let me: ThreadId = ThreadId::current();

    queue.init_thread().unwrap();
    queue.register_handler(PING, |_: &Message| {});
    queue.send(me, PING, Payload::empty());
    queue.reset();

    assert!(!queue.is_registered(me));
    assert!(!queue.send(me, PING, Payload::empty()));
    assert_eq!(queue.dispatch_one(), Dispatch::Empty);
  }
}
