use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::check::{Denial, EligibilityCheck};

/// An ordered list of checks evaluated one after another for each item.
///
/// The pipeline is **fail-fast**: the first check that denies an item stops
/// evaluation for that item and its denial is reported. An empty pipeline
/// allows everything.
pub struct CheckPipeline<I> {
    checks: Vec<Arc<dyn EligibilityCheck<I>>>,
}

impl<I> CheckPipeline<I> {
    /// Starts with an empty pipeline. Use [`Self::add_check`] or
    /// [`Self::with`] to add checks.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Append a check to the end of the pipeline.
    pub fn add_check(&mut self, check: Arc<dyn EligibilityCheck<I>>) {
        self.checks.push(check);
    }

    /// Builder form of [`Self::add_check`].
    pub fn with(mut self, check: impl EligibilityCheck<I> + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Number of checks in the pipeline.
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }
}

impl<I> Default for CheckPipeline<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<I: Sync> EligibilityCheck<I> for CheckPipeline<I> {
    fn name(&self) -> &str {
        "pipeline"
    }

    async fn check(&self, item: &I) -> Result<(), Denial> {
        for check in &self.checks {
            let started = Instant::now();
            let outcome = check.check(item).await;
            debug!(
                check = check.name(),
                passed = outcome.is_ok(),
                elapsed = ?started.elapsed(),
                "check evaluated"
            );
            outcome?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::checks::{AllowAll, StateCheck};
    use sweep_types::Resource;

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl EligibilityCheck<Resource> for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn check(&self, _item: &Resource) -> Result<(), Denial> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn empty_pipeline_allows() {
        let pipeline: CheckPipeline<Resource> = CheckPipeline::new();
        assert_eq!(pipeline.check_count(), 0);
        assert!(pipeline.check(&Resource::new("a")).await.is_ok());
    }

    #[tokio::test]
    async fn first_denial_stops_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = CheckPipeline::new()
            .with(AllowAll)
            .with(StateCheck::new("state", "item is locked", |r: &Resource| {
                r.id.as_str() != "locked"
            }))
            .with(Counting(Arc::clone(&calls)));

        let denial = pipeline.check(&Resource::new("locked")).await.unwrap_err();
        assert_eq!(denial.check, "state");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(pipeline.check(&Resource::new("free")).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
