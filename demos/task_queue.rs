use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use deferred::{BoxedTask, method, moved, wrap};
use tokio::sync::{mpsc, oneshot};

struct Meter {
    total: AtomicU64,
}

impl Meter {
    fn record(&self, amount: u64) -> u64 {
        self.total.fetch_add(amount, Ordering::Relaxed) + amount
    }
}

fn square(x: u64, reply: oneshot::Sender<u64>) {
    let _ = reply.send(x * x);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Starting deferred task queue example");

    let (sender, mut queue) = mpsc::unbounded_channel::<BoxedTask>();

    let worker = tokio::spawn(async move {
        while let Some(mut task) = queue.recv().await {
            println!("⚙️  Running {}", task.name());
            if let Err(err) = task.run() {
                eprintln!("⚠️  {err}");
            }
        }
    });

    // A bound method on a shared receiver
    let meter = Arc::new(Meter {
        total: AtomicU64::new(0),
    });
    for amount in [5, 10, 20] {
        let unit = wrap(method!(Meter::record), (Arc::clone(&meter), amount));
        sender
            .send(unit.into_task())
            .map_err(|_| "worker stopped")?;
    }

    // Free functions reporting back over their own channel
    println!("\n🔄 Running batch tasks...");
    let answers: Vec<_> = (1..=3)
        .map(|i| {
            let (reply, answer) = oneshot::channel();
            let unit = wrap(square, (i, moved(reply)));
            sender
                .send(unit.into_task())
                .map(|()| answer)
                .map_err(|_| "worker stopped")
        })
        .collect::<Result<_, _>>()?;

    drop(sender);

    let results = futures::future::join_all(answers).await;
    for (i, result) in results.into_iter().enumerate() {
        println!("Task {}: {:?}", i + 1, result);
    }

    worker.await?;
    println!("✅ Meter total: {}", meter.total.load(Ordering::Relaxed));

    Ok(())
}
