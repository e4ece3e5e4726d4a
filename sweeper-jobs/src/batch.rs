//! Run one async operation per item concurrently and collect the outcomes.
//!
//! [`run_batch`] always waits for every operation. What a failure means is up
//! to the caller, through one of two policies on [`BatchReport`]:
//!
//! - [`BatchReport::into_tolerant`]: success count plus the errors, never fails
//! - [`BatchReport::into_strict`]: the success count, or the first error
use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct BatchReport<E> {
    pub attempted: usize,
    pub succeeded: usize,
    /// Failures in item order.
    pub failures: Vec<E>,
}

impl<E> BatchReport<E> {
    pub fn into_tolerant(self) -> (usize, Vec<E>) {
        (self.succeeded, self.failures)
    }

    pub fn into_strict(self) -> Result<usize, E> {
        match self.failures.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(self.succeeded),
        }
    }
}

pub async fn run_batch<I, F, Fut, O, E>(items: I, op: F) -> BatchReport<E>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<O, E>>,
{
    let succeeded = AtomicUsize::new(0);
    let counter = &succeeded;

    let pending = items.into_iter().map(|item| {
        let fut = op(item);
        async move {
            let outcome = fut.await;
            if outcome.is_ok() {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            outcome
        }
    });
    let outcomes = join_all(pending).await;

    let attempted = outcomes.len();
    let failures: Vec<E> = outcomes.into_iter().filter_map(Result::err).collect();
    BatchReport {
        attempted,
        succeeded: succeeded.into_inner(),
        failures,
    }
}
