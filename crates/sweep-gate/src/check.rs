use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Denial
// ---------------------------------------------------------------------------

/// Why an item was found ineligible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{check}: {reason}")]
pub struct Denial {
    /// Name of the check that denied the item.
    pub check: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Denial {
    pub fn new(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// EligibilityCheck trait
// ---------------------------------------------------------------------------

/// A per-item asynchronous eligibility predicate.
///
/// Typically an authorization check (may the current user delete this
/// domain?) or a state check (is the image unprotected?). `Ok(())` means the
/// item may be acted upon.
///
/// The trait is object-safe and `Send + Sync` so checks can be shared as
/// `Arc<dyn EligibilityCheck<I>>` across concurrently running items.
#[async_trait]
pub trait EligibilityCheck<I>: Send + Sync {
    /// Name reported in denials (e.g. "policy", "state").
    fn name(&self) -> &str;

    /// Decide whether `item` is eligible.
    async fn check(&self, item: &I) -> Result<(), Denial>;
}
