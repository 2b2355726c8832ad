use std::sync::Arc as StdArc;
use std::sync::Barrier;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use threadmq::core::Message;
use threadmq::core::MessageType;
use threadmq::core::Payload;
use threadmq::core::ThreadId;
use threadmq::error::InitError;
use threadmq::error::WakeError;
use threadmq::queue::Dispatch;
use threadmq::queue::ThreadMessageQueue;
use threadmq::wake::PollChannel;
use triomphe::Arc;

const SEVEN: MessageType = MessageType::new(7);

/// Counts its own drops.
struct Tracked {
  drops: StdArc<AtomicUsize>,
}

impl Tracked {
  fn new(drops: &StdArc<AtomicUsize>) -> Self {
    Self {
      drops: StdArc::clone(drops),
    }
  }
}

impl Drop for Tracked {
  fn drop(&mut self) {
    self.drops.fetch_add(1, Ordering::SeqCst);
  }
}

fn recorder(seen: &StdArc<StdMutex<Vec<(ThreadId, String)>>>) -> impl Fn(&Message) + Send + Sync + 'static {
  let seen: StdArc<StdMutex<Vec<(ThreadId, String)>>> = StdArc::clone(seen);

  move |message: &Message| {
    let text: &String = message.payload().downcast_ref().unwrap();
    seen.lock().unwrap().push((ThreadId::current(), text.clone()));
  }
}

#[test]
fn send_from_worker_runs_handler_on_receiver() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let seen: StdArc<StdMutex<Vec<(ThreadId, String)>>> = StdArc::default();

  queue.init_thread().unwrap();
  queue.register_handler(SEVEN, recorder(&seen));

  let main: ThreadId = queue.current_thread_id();

  let worker = {
    let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);

    thread::spawn(move || {
      assert!(queue.send(main, SEVEN, Payload::new(String::from("X"))));
      assert!(queue.stop_loop(main));
    })
  };

  queue.run_loop().unwrap();
  worker.join().unwrap();

  assert_eq!(*seen.lock().unwrap(), vec![(main, String::from("X"))]);
}

#[test]
fn send_to_unregistered_thread_drops_payload() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let drops: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));
  let calls: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));

  queue.register_handler(SEVEN, {
    let calls: StdArc<AtomicUsize> = StdArc::clone(&calls);
    move |_: &Message| {
      calls.fetch_add(1, Ordering::SeqCst);
    }
  });

  let target: ThreadId = thread::spawn(ThreadId::current).join().unwrap();

  for round in 1..=10 {
    assert!(!queue.send(target, SEVEN, Payload::new(Tracked::new(&drops))));
    assert_eq!(drops.load(Ordering::SeqCst), round);
  }

  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn send_preserves_order_per_sender() {
  const SENDERS: usize = 4;
  const COUNT: usize = 250;

  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let seen: StdArc<StdMutex<Vec<(usize, usize)>>> = StdArc::default();
  let barrier: StdArc<Barrier> = StdArc::new(Barrier::new(SENDERS));

  queue.init_thread().unwrap();
  queue.register_handler(SEVEN, {
    let seen: StdArc<StdMutex<Vec<(usize, usize)>>> = StdArc::clone(&seen);
    move |message: &Message| {
      seen.lock().unwrap().push(*message.payload().downcast_ref().unwrap());
    }
  });

  let main: ThreadId = ThreadId::current();

  let senders: Vec<_> = (0..SENDERS)
    .map(|sender| {
      let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
      let barrier: StdArc<Barrier> = StdArc::clone(&barrier);

      thread::spawn(move || {
        barrier.wait();

        for index in 0..COUNT {
          assert!(queue.send(main, SEVEN, Payload::new((sender, index))));
        }
      })
    })
    .collect();

  for sender in senders {
    sender.join().unwrap();
  }

  queue.stop_loop(main);
  queue.run_loop().unwrap();

  let seen: Vec<(usize, usize)> = seen.lock().unwrap().clone();

  assert_eq!(seen.len(), SENDERS * COUNT);

  for sender in 0..SENDERS {
    let order: Vec<usize> = seen
      .iter()
      .filter(|(from, _)| *from == sender)
      .map(|(_, index)| *index)
      .collect();

    assert_eq!(order, (0..COUNT).collect::<Vec<usize>>());
  }
}

#[test]
fn deregister_frees_pending_exactly_once() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let drops: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));
  let calls: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));

  queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();
  queue.register_handler(SEVEN, {
    let calls: StdArc<AtomicUsize> = StdArc::clone(&calls);
    move |_: &Message| {
      calls.fetch_add(1, Ordering::SeqCst);
    }
  });

  let main: ThreadId = ThreadId::current();

  for _ in 0..3 {
    assert!(queue.send(main, SEVEN, Payload::new(Tracked::new(&drops))));
  }

  assert_eq!(queue.dispatch_one(), Dispatch::Handled(SEVEN));
  assert_eq!(drops.load(Ordering::SeqCst), 1);

  assert!(queue.deregister_thread(main));
  assert_eq!(drops.load(Ordering::SeqCst), 3);

  assert_eq!(queue.dispatch_one(), Dispatch::Empty);
  assert!(!queue.send(main, SEVEN, Payload::new(Tracked::new(&drops))));
  assert_eq!(drops.load(Ordering::SeqCst), 4);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn later_registration_replaces_handler() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let seen: StdArc<StdMutex<Vec<&'static str>>> = StdArc::default();

  queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();

  for name in ["A", "B"] {
    let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
    let seen: StdArc<StdMutex<Vec<&'static str>>> = StdArc::clone(&seen);

    thread::spawn(move || {
      queue.register_handler(SEVEN, move |_: &Message| seen.lock().unwrap().push(name));
    })
    .join()
    .unwrap();
  }

  queue.send(ThreadId::current(), SEVEN, Payload::empty());
  queue.send(ThreadId::current(), SEVEN, Payload::empty());

  assert_eq!(queue.dispatch_pending(), 2);
  assert_eq!(*seen.lock().unwrap(), vec!["B", "B"]);
}

#[test]
fn global_queue_deregisters_exited_threads() {
  let queue: &Arc<ThreadMessageQueue> = ThreadMessageQueue::instance();

  let worker: ThreadId = thread::spawn(|| {
    let queue: &Arc<ThreadMessageQueue> = ThreadMessageQueue::instance();

    queue.init_thread().unwrap();
    assert!(queue.is_registered(ThreadId::current()));

    ThreadId::current()
  })
  .join()
  .unwrap();

  assert!(!queue.is_registered(worker));
  assert!(!queue.send(worker, SEVEN, Payload::empty()));
}

#[test]
fn handler_may_send_to_own_thread() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let calls: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));

  queue.init_thread().unwrap();
  queue.register_handler(SEVEN, {
    let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
    let calls: StdArc<AtomicUsize> = StdArc::clone(&calls);

    move |message: &Message| {
      let hops: u32 = *message.payload().downcast_ref().unwrap();

      calls.fetch_add(1, Ordering::SeqCst);

      if hops == 0 {
        queue.stop_loop(ThreadId::current());
      } else {
        queue.send(ThreadId::current(), SEVEN, Payload::new(hops - 1));
      }
    }
  });

  queue.send(ThreadId::current(), SEVEN, Payload::new(5_u32));
  queue.run_loop().unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[test]
fn failed_wake_channel_leaves_thread_unregistered() {
  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let drops: StdArc<AtomicUsize> = StdArc::new(AtomicUsize::new(0));

  let (worker, result): (ThreadId, Result<(), InitError>) = {
    let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);

    thread::spawn(move || {
      let result: Result<(), InitError> =
        queue.init_thread_with(|| Err::<PollChannel, _>(WakeError::new("no host loop")));

      (ThreadId::current(), result)
    })
    .join()
    .unwrap()
  };

  assert_eq!(result, Err(InitError::Wake(WakeError::new("no host loop"))));
  assert!(!queue.is_registered(worker));
  assert_eq!(queue.thread_count(), 0);

  assert!(!queue.send(worker, SEVEN, Payload::new(Tracked::new(&drops))));
  assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn short_lived_senders_do_not_exhaust_ids() {
  const THREADS: usize = 2_000;

  let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
  let target: ThreadId = thread::spawn(ThreadId::current).join().unwrap();
  let mut last: ThreadId = target;

  for _ in 0..THREADS {
    let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);

    let (sender, sent): (ThreadId, bool) = thread::spawn(move || {
      (ThreadId::current(), queue.send(target, SEVEN, Payload::empty()))
    })
    .join()
    .unwrap();

    assert!(!sent);
    assert!(sender > last);

    last = sender;
  }

  assert!(last.as_u64().get() - target.as_u64().get() >= THREADS as u64);
}
