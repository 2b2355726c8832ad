#![cfg(loom)]

use loom::sync::Arc as LoomArc;
use loom::sync::atomic::AtomicUsize;
use loom::sync::atomic::Ordering;
use loom::thread;
use threadmq::queue::ThreadMessageQueue;
use threadmq::task::AbortHandle;
use threadmq::task::AsyncTask;
use threadmq::task::Disposal;
use threadmq::task::Task;
use threadmq::task::TaskContext;
use triomphe::Arc;

/// Returns as soon as it has looked at the abort flag once.
struct Quick {
  drops: LoomArc<AtomicUsize>,
}

impl AsyncTask for Quick {
  fn run(&self, context: &TaskContext<'_>) {
    let _aborted: bool = context.is_aborted();
  }
}

impl Drop for Quick {
  fn drop(&mut self) {
    let previous: usize = self.drops.fetch_add(1, Ordering::SeqCst);
    assert_eq!(previous, 0, "task deleted twice");
  }
}

fn model<F>(f: F)
where
  F: Fn() + Sync + Send + 'static,
{
  let mut builder: loom::model::Builder = loom::model::Builder::new();
  builder.preemption_bound = Some(2);
  builder.check(f);
}

#[test]
fn delete_when_done_races_worker_completion() {
  model(|| {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let drops: LoomArc<AtomicUsize> = LoomArc::new(AtomicUsize::new(0));
    let task: Task<Quick> = Task::with_queue(
      Quick {
        drops: LoomArc::clone(&drops),
      },
      &queue,
    );

    task.init().unwrap();
    task.start().unwrap();

    let handle: AbortHandle = task.abort_handle();
    let aborter = thread::spawn(move || handle.abort());

    if task.delete_when_done() == Disposal::Immediate {
      assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    assert!(aborter.join().unwrap());

    while drops.load(Ordering::SeqCst) == 0 {
      thread::yield_now();
    }
  });
}

#[test]
fn drop_races_worker_completion() {
  model(|| {
    let queue: Arc<ThreadMessageQueue> = ThreadMessageQueue::new();
    let drops: LoomArc<AtomicUsize> = LoomArc::new(AtomicUsize::new(0));
    let task: Task<Quick> = Task::with_queue(
      Quick {
        drops: LoomArc::clone(&drops),
      },
      &queue,
    );

    task.init().unwrap();
    task.start().unwrap();

    drop(task);

    assert_eq!(drops.load(Ordering::SeqCst), 1);
  });
}
