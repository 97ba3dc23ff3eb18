use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use deferred::{BoxedTask, method, moved, wrap};
use tokio::sync::{mpsc, oneshot};

struct Ledger {
    balance: AtomicI64,
}

impl Ledger {
    fn credit(&self, amount: i64) -> i64 {
        self.balance.fetch_add(amount, Ordering::SeqCst) + amount
    }
}

fn spawn_worker(mut queue: mpsc::UnboundedReceiver<BoxedTask>) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut ran = 0;
        while let Some(mut task) = queue.recv().await {
            if task.run().is_ok() {
                ran += 1;
            }
        }
        ran
    })
}

#[tokio::test]
async fn units_handed_to_a_worker_run_there() {
    let ledger = Arc::new(Ledger {
        balance: AtomicI64::new(0),
    });
    let (sender, queue) = mpsc::unbounded_channel();
    let worker = spawn_worker(queue);

    for amount in 1..=4_i64 {
        let unit = wrap(method!(Ledger::credit), (Arc::clone(&ledger), amount));
        assert!(sender.send(unit.into_task()).is_ok(), "worker alive");
    }
    drop(sender);

    assert_eq!(worker.await.expect("worker finished"), 4);
    assert_eq!(ledger.balance.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn results_come_back_through_a_captured_channel() {
    let (sender, queue) = mpsc::unbounded_channel();
    let worker = spawn_worker(queue);

    let (reply, answer) = oneshot::channel();
    let unit = wrap(
        |reply: oneshot::Sender<String>, words: Vec<&'static str>| {
            let _ = reply.send(words.join(" "));
        },
        (moved(reply), moved(vec!["handed", "over"])),
    );
    assert!(sender.send(unit.into_task()).is_ok(), "worker alive");
    drop(sender);

    assert_eq!(answer.await.expect("task ran"), "handed over");
    assert_eq!(worker.await.expect("worker finished"), 1);
}

#[tokio::test]
async fn spent_units_do_not_take_the_worker_down() {
    let (sender, queue) = mpsc::unbounded_channel();
    let worker = spawn_worker(queue);

    let mut unit = wrap(|bytes: Vec<u8>| bytes.len(), (moved(vec![1_u8, 2]),));
    assert_eq!(unit.invoke(), 2);
    assert!(sender.send(unit.into_task()).is_ok(), "worker alive");

    let fresh = wrap(|bytes: Vec<u8>| bytes.len(), (moved(vec![3_u8]),));
    assert!(sender.send(fresh.into_task()).is_ok(), "worker alive");
    drop(sender);

    assert_eq!(worker.await.expect("worker survived"), 1);
}

#[tokio::test]
async fn many_producers_share_one_worker() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (sender, queue) = mpsc::unbounded_channel::<BoxedTask>();
    let worker = spawn_worker(queue);

    let producers = (0..3_u32).map(|id| {
        let sender = sender.clone();
        let seen = Arc::clone(&seen);
        tokio::spawn(async move {
            let unit = wrap(
                move |id: u32| seen.lock().expect("not poisoned").push(id),
                (id,),
            );
            assert!(sender.send(unit.into_task()).is_ok(), "worker alive");
        })
    });
    for result in futures::future::join_all(producers).await {
        result.expect("producer finished");
    }
    drop(sender);

    assert_eq!(worker.await.expect("worker finished"), 3);
    let mut ids = seen.lock().expect("not poisoned").clone();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2]);
}
