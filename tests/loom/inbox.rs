#![cfg(loom)]

use loom::sync::Arc as LoomArc;
use loom::sync::atomic::AtomicUsize;
use loom::sync::atomic::Ordering;
use loom::thread;
use threadmq::core::Message;
use threadmq::core::MessageType;
use threadmq::core::Payload;
use threadmq::core::ThreadId;
use threadmq::queue::Dispatch;
use threadmq::queue::ThreadMessageQueue;
use threadmq::wake::PollChannel;
use triomphe::Arc;

const KIND: MessageType = MessageType::new(64);

struct Tracked(LoomArc<AtomicUsize>);

impl Drop for Tracked {
  fn drop(&mut self) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }
}

#[test]
fn send_during_deregister_frees_payload_once() {
  loom::model(|| {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let drops: LoomArc<AtomicUsize> = LoomArc::new(AtomicUsize::new(0));

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();

    let main: ThreadId = ThreadId::current();

    let sender = {
      let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
      let drops: LoomArc<AtomicUsize> = LoomArc::clone(&drops);

      thread::spawn(move || queue.send(main, KIND, Payload::new(Tracked(drops))))
    };

    assert!(queue.deregister_thread(main));

    let _sent: bool = sender.join().unwrap();

    assert_eq!(queue.dispatch_one(), Dispatch::Empty);
    assert_eq!(drops.load(Ordering::SeqCst), 1, "payload leaked or freed twice");
  });
}

#[test]
fn concurrent_dispatch_delivers_once() {
  loom::model(|| {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let drops: LoomArc<AtomicUsize> = LoomArc::new(AtomicUsize::new(0));
    let calls: LoomArc<AtomicUsize> = LoomArc::new(AtomicUsize::new(0));

    queue.init_thread_with(|| Ok(PollChannel::new())).unwrap();
    queue.register_handler(KIND, {
      let calls: LoomArc<AtomicUsize> = LoomArc::clone(&calls);
      move |_: &Message| {
        calls.fetch_add(1, Ordering::SeqCst);
      }
    });

    let main: ThreadId = ThreadId::current();

    let sender = {
      let queue: Arc<ThreadMessageQueue> = Arc::clone(&queue);
      let drops: LoomArc<AtomicUsize> = LoomArc::clone(&drops);

      thread::spawn(move || assert!(queue.send(main, KIND, Payload::new(Tracked(drops)))))
    };

    let first: Dispatch = queue.dispatch_one();

    sender.join().unwrap();

    let second: Dispatch = queue.dispatch_one();

    assert_eq!(
      [first, second].iter().filter(|dispatch| dispatch.is_consumed()).count(),
      1,
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
  });
}
