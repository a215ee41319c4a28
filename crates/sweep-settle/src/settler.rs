use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

use tokio::task::{Id, JoinSet};
use tracing::{debug, warn};

use crate::operation::{Operation, OperationFailure};
use crate::report::{SettlementEntry, SettlementReport};

/// Runs operations concurrently and waits for all of them to settle.
///
/// Each operation is spawned onto the tokio runtime before any of them is
/// awaited. Contexts stay on the joining side, keyed by task id, so an
/// operation that panics is still reported against its own context.
#[derive(Clone, Copy, Debug, Default)]
pub struct Settler {
    timeout: Option<Duration>,
}

impl Settler {
    /// A settler with no per-operation time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every operation by `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Settle every operation and report each outcome with its context.
    ///
    /// Never returns before the last operation has settled. An operation's
    /// failure is recorded in the report, never propagated.
    pub async fn settle<C, T, E>(
        &self,
        operations: Vec<Operation<C, T, E>>,
    ) -> SettlementReport<C, T, E>
    where
        C: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        if operations.is_empty() {
            return SettlementReport::empty();
        }

        let total = operations.len();
        let mut contexts: HashMap<Id, C> = HashMap::with_capacity(total);
        let mut tasks = JoinSet::new();

        for Operation { context, future } in operations {
            let limit = self.timeout;
            let handle = tasks.spawn(async move {
                match limit {
                    Some(limit) => match tokio::time::timeout(limit, future).await {
                        Ok(outcome) => outcome.map_err(OperationFailure::Error),
                        Err(_) => Err(OperationFailure::TimedOut(limit)),
                    },
                    None => future.await.map_err(OperationFailure::Error),
                }
            });
            contexts.insert(handle.id(), context);
        }

        debug!(total, timeout = ?self.timeout, "all operations in flight");

        let mut report = SettlementReport {
            passed: Vec::with_capacity(total),
            failed: Vec::new(),
        };

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(err) => {
                    let id = err.id();
                    let failure = if err.is_panic() {
                        OperationFailure::Panicked(panic_message(err.into_panic()))
                    } else {
                        OperationFailure::Cancelled
                    };
                    (id, Err(failure))
                }
            };

            let Some(context) = contexts.remove(&id) else {
                warn!(task = %id, "settled task has no registered context");
                debug_assert!(false, "settled task {id} has no registered context");
                continue;
            };

            match outcome {
                Ok(value) => report.passed.push(SettlementEntry { context, value }),
                Err(failure) => report.failed.push(SettlementEntry {
                    context,
                    value: failure,
                }),
            }
        }

        debug!(
            passed = report.passed.len(),
            failed = report.failed.len(),
            "settlement complete"
        );
        report
    }
}

/// Settle `operations` with a default [`Settler`].
pub async fn settle<C, T, E>(operations: Vec<Operation<C, T, E>>) -> SettlementReport<C, T, E>
where
    C: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    Settler::new().settle(operations).await
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
