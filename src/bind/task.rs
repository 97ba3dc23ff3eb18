use std::any::type_name;

use crate::bind::dispatch::Callable;
use crate::bind::error::Result;
use crate::bind::wrapper::Deferred;

// The contract a worker pool relies on: "I am a piece of work you now own
// and can run on any thread". Results are dropped; a task that needs to
// report back captures its own channel.
pub trait Task: Send {
    /// Runs the unit once.
    ///
    /// Never panics on a spent unit: it returns [`Error::Spent`](crate::Error::Spent)
    /// and leaves the decision to the worker.
    fn run(&mut self) -> Result<()>;

    fn is_ready(&self) -> bool;

    fn name(&self) -> &'static str;
}

/// An erased unit, ready to go into a queue.
pub type BoxedTask = Box<dyn Task>;

impl<F, A> Task for Deferred<F, A>
where
    F: Callable<A> + Send,
    A: Send,
{
    fn run(&mut self) -> Result<()> {
        let _span = tracing::trace_span!("deferred", callable = type_name::<F>()).entered();
        self.try_invoke().map(|_| ())
    }

    fn is_ready(&self) -> bool {
        Deferred::is_ready(self)
    }

    fn name(&self) -> &'static str {
        type_name::<F>()
    }
}

impl<F, A> Deferred<F, A>
where
    F: Callable<A> + Send + 'static,
    A: Send + 'static,
{
    /// Erases the unit into a [`BoxedTask`] for a scheduler.
    pub fn into_task(self) -> BoxedTask {
        Box::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, method_mut, moved, wrap};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tally {
        total: usize,
    }

    impl Tally {
        fn add(&mut self, amount: usize) {
            self.total += amount;
        }
    }

    #[test]
    fn tasks_run_their_unit_and_drop_the_result() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let mut task = wrap(
            move |amount: usize| counter.fetch_add(amount, Ordering::SeqCst),
            (3_usize,),
        )
        .into_task();

        task.run().expect("first run");
        task.run().expect("second run");
        assert_eq!(seen.load(Ordering::SeqCst), 6);
        assert!(task.is_ready());
        assert!(task.name().contains("closure"));
    }

    #[test]
    fn boxed_receivers_travel_with_the_task() {
        let mut task = wrap(method_mut!(Tally::add), (Box::new(Tally { total: 1 }), moved(2_usize))).into_task();
        assert!(task.is_ready());
        task.run().expect("first run");
        assert!(!task.is_ready());
    }

    #[test]
    fn spent_tasks_report_instead_of_panicking() {
        let mut task = wrap(|bytes: Vec<u8>| bytes.len(), (moved(vec![1_u8]),)).into_task();
        assert!(task.run().is_ok());
        assert!(!task.is_ready());

        let err = task.run().unwrap_err();
        assert!(matches!(err, Error::Spent { callable } if callable == task.name()));
        assert!(task.run().is_err());
    }
}
