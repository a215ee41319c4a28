use std::sync::Arc;
use std::time::Instant;

use sweep_settle::{Operation, OperationFailure, Settler};
use sweep_types::{Item, ItemId};
use tracing::{debug, warn};

use crate::check::{Denial, EligibilityCheck};
use crate::checks::AllowAll;
use crate::config::GateConfig;

// ---------------------------------------------------------------------------
// EligibilityPartition
// ---------------------------------------------------------------------------

/// An item that failed its eligibility check, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ineligible<I> {
    pub item: I,
    pub reason: Denial,
}

/// Disjoint, exhaustive split of a batch into eligible and ineligible items.
///
/// Both lists keep the relative order the items were submitted in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibilityPartition<I> {
    pub eligible: Vec<I>,
    pub ineligible: Vec<Ineligible<I>>,
}

impl<I> EligibilityPartition<I> {
    pub fn len(&self) -> usize {
        self.eligible.len() + self.ineligible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty() && self.ineligible.is_empty()
    }

    pub fn ineligible_items(&self) -> impl Iterator<Item = &I> {
        self.ineligible.iter().map(|i| &i.item)
    }
}

impl<I: Item> EligibilityPartition<I> {
    pub fn eligible_ids(&self) -> Vec<ItemId> {
        self.eligible.iter().map(Item::id).collect()
    }

    pub fn ineligible_ids(&self) -> Vec<ItemId> {
        self.ineligible.iter().map(|i| i.item.id()).collect()
    }
}

impl<I> Default for EligibilityPartition<I> {
    fn default() -> Self {
        Self {
            eligible: Vec::new(),
            ineligible: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// EligibilityGate
// ---------------------------------------------------------------------------

/// Runs one eligibility check per item, concurrently, and partitions the
/// batch by the outcomes.
///
/// A check that errors, times out, or panics makes its item ineligible; the
/// gate itself never fails.
pub struct EligibilityGate<I> {
    check: Arc<dyn EligibilityCheck<I>>,
    config: GateConfig,
}

impl<I: Item> EligibilityGate<I> {
    pub fn new(check: Arc<dyn EligibilityCheck<I>>, config: GateConfig) -> Self {
        Self { check, config }
    }

    /// A gate that lets every item through.
    pub fn allow_all() -> Self {
        Self::new(Arc::new(AllowAll), GateConfig::default())
    }

    /// The current configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Name of the check this gate runs.
    pub fn check_name(&self) -> &str {
        self.check.name()
    }

    /// Partition `items` by running the check on each of them.
    ///
    /// An empty batch returns an empty partition without invoking the check.
    pub async fn partition(&self, items: Vec<I>) -> EligibilityPartition<I> {
        if items.is_empty() {
            return EligibilityPartition::default();
        }

        if self.config.permissive {
            debug!(count = items.len(), "permissive gate: all items eligible");
            return EligibilityPartition {
                eligible: items,
                ineligible: Vec::new(),
            };
        }

        let started = Instant::now();
        let ops = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let check = Arc::clone(&self.check);
                let probe = item.clone();
                Operation::new((index, item), async move { check.check(&probe).await })
            })
            .collect();

        let report = Settler::new()
            .with_timeout(self.config.check_timeout())
            .settle(ops)
            .await;

        let mut eligible: Vec<(usize, I)> = report.passed.into_iter().map(|e| e.context).collect();
        let mut ineligible: Vec<(usize, Ineligible<I>)> = report
            .failed
            .into_iter()
            .map(|entry| {
                let (index, item) = entry.context;
                let reason = self.denial_for(entry.value);
                (index, Ineligible { item, reason })
            })
            .collect();

        eligible.sort_by_key(|(index, _)| *index);
        ineligible.sort_by_key(|(index, _)| *index);

        for (_, denied) in &ineligible {
            warn!(
                item = %denied.item.id(),
                check = %denied.reason.check,
                reason = %denied.reason.reason,
                "item ineligible"
            );
        }
        debug!(
            eligible = eligible.len(),
            ineligible = ineligible.len(),
            elapsed = ?started.elapsed(),
            "eligibility partition complete"
        );

        EligibilityPartition {
            eligible: eligible.into_iter().map(|(_, item)| item).collect(),
            ineligible: ineligible.into_iter().map(|(_, denied)| denied).collect(),
        }
    }

    fn denial_for(&self, failure: OperationFailure<Denial>) -> Denial {
        let name = self.check.name();
        match failure {
            OperationFailure::Error(denial) => denial,
            OperationFailure::TimedOut(limit) => {
                Denial::new(name, format!("check timed out after {limit:?}"))
            }
            OperationFailure::Panicked(msg) => Denial::new(name, format!("check panicked: {msg}")),
            OperationFailure::Cancelled => Denial::new(name, "check was cancelled"),
        }
    }
}

/// Partition `items` with `check` using the default configuration.
pub async fn partition<I: Item>(
    items: Vec<I>,
    check: Arc<dyn EligibilityCheck<I>>,
) -> EligibilityPartition<I> {
    EligibilityGate::new(check, GateConfig::default())
        .partition(items)
        .await
}
