//! Per-item results of multi-call store operations.
//!
//! Batches (one create per selected day, one delete per conflicting program,
//! one write per segment) are issued concurrently and awaited together. There
//! is no rollback, so the outcome keeps every success next to every failure.

use std::future::Future;

use futures::future::join_all;
use serde::Serialize;

use crate::db::RepositoryError;

/// One item of a batch whose store call failed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure<I> {
    pub item: I,
    pub error: String,
    #[serde(skip)]
    pub source: RepositoryError,
}

/// Successes and failures of one batch, in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome<T, I = T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure<I>>,
}

impl<T, I> Default for BatchOutcome<T, I> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T, I> BatchOutcome<T, I> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    /// The first failure's error, if any.
    pub fn first_error(&self) -> Option<&RepositoryError> {
        self.failed.first().map(|f| &f.source)
    }
}

/// Run one store call per item concurrently and collect every result.
///
/// `label` names the batch in the logs.
pub async fn run_batch<I, T, F, Fut>(label: &str, items: Vec<I>, call: F) -> BatchOutcome<T, I>
where
    I: Clone + std::fmt::Debug,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    let futures = items.iter().cloned().map(&call);
    let results = join_all(futures).await;

    let mut outcome = BatchOutcome::default();
    for (item, result) in items.into_iter().zip(results) {
        match result {
            Ok(value) => outcome.succeeded.push(value),
            Err(source) => {
                log::warn!("{}: {:?} failed: {}", label, item, source);
                outcome.failed.push(BatchFailure {
                    item,
                    error: source.to_string(),
                    source,
                });
            }
        }
    }
    outcome
}
