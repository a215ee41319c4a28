use async_trait::async_trait;

use crate::check::{Denial, EligibilityCheck};

/// Synchronous domain-state predicate.
///
/// Examples: a domain must be disabled before it can be deleted; a protected
/// image cannot be deleted; a trunk with sub-ports cannot be removed.
pub struct StateCheck<I> {
    name: String,
    reason: String,
    predicate: Box<dyn Fn(&I) -> bool + Send + Sync>,
}

impl<I> StateCheck<I> {
    /// `predicate` returns `true` when the item is in an acceptable state;
    /// otherwise the item is denied with `reason`.
    pub fn new(
        name: impl Into<String>,
        reason: impl Into<String>,
        predicate: impl Fn(&I) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait]
impl<I: Sync> EligibilityCheck<I> for StateCheck<I> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, item: &I) -> Result<(), Denial> {
        if (self.predicate)(item) {
            Ok(())
        } else {
            Err(Denial::new(self.name.as_str(), self.reason.as_str()))
        }
    }
}
