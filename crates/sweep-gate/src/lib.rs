//! Eligibility gate for Sweep.
//!
//! Before a batch action runs, every candidate item goes through an
//! eligibility check: typically an authorization policy check combined with
//! a domain-state check. The gate runs the check for all items concurrently
//! and splits the batch into an eligible set and an ineligible set carrying
//! the reason each item was denied.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sweep_gate::{CheckPipeline, EligibilityGate, GateConfig, PolicyCheck, PolicyRule, StateCheck, StaticPolicy};
//! use sweep_types::Resource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let rule = PolicyRule::new("identity", "identity:delete_domain");
//! let check = CheckPipeline::new()
//!     .with(PolicyCheck::new(Arc::new(StaticPolicy::granting([rule.clone()]))).require(rule))
//!     .with(StateCheck::new("state", "default domain is protected", |r: &Resource| {
//!         r.id.as_str() != "default"
//!     }));
//! let gate = EligibilityGate::new(Arc::new(check), GateConfig::default());
//! let partition = gate
//!     .partition(vec![Resource::new("d1"), Resource::new("default")])
//!     .await;
//! assert_eq!(partition.eligible, vec![Resource::new("d1")]);
//! assert_eq!(partition.ineligible[0].reason.check, "state");
//! # }
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod error;
pub mod gate;

// Re-exports for convenience.
pub use check::{Denial, EligibilityCheck};
pub use checks::{
    AllowAll, CheckPipeline, FnCheck, PolicyCheck, PolicyEnforcer, PolicyRule, StateCheck,
    StaticPolicy,
};
pub use config::GateConfig;
pub use error::{GateError, GateResult};
pub use gate::{partition, EligibilityGate, EligibilityPartition, Ineligible};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use sweep_types::{Item, ItemId, Resource};

    /// Helper: a check denying the listed ids and counting invocations.
    struct DenyList {
        denied: HashSet<String>,
        calls: AtomicUsize,
    }

    impl DenyList {
        fn new(denied: &[&str]) -> Self {
            Self {
                denied: denied.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EligibilityCheck<Resource> for DenyList {
        fn name(&self) -> &str {
            "deny-list"
        }

        async fn check(&self, item: &Resource) -> Result<(), Denial> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Reverse the settle order relative to submission order.
            let delay = 30u64.saturating_sub(item.id.as_str().len() as u64 * 5);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.denied.contains(item.id.as_str()) {
                Err(Denial::new("deny-list", "not allowed"))
            } else {
                Ok(())
            }
        }
    }

    fn items(ids: &[&str]) -> Vec<Resource> {
        ids.iter().map(|id| Resource::new(*id)).collect()
    }

    // -----------------------------------------------------------------------
    // 1. Empty batch never invokes the check
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn empty_batch_skips_check() {
        let check = Arc::new(DenyList::new(&[]));
        let gate = EligibilityGate::new(check.clone(), GateConfig::default());
        let partition = gate.partition(Vec::new()).await;
        assert!(partition.is_empty());
        assert_eq!(check.calls.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // 2. Denied items are split out with their reason
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn denied_items_are_ineligible() {
        let check = Arc::new(DenyList::new(&["b"]));
        let partition = partition(items(&["a", "b", "c"]), check.clone()).await;
        assert_eq!(partition.eligible_ids(), vec![ItemId::from("a"), ItemId::from("c")]);
        assert_eq!(partition.ineligible_ids(), vec![ItemId::from("b")]);
        assert_eq!(partition.ineligible[0].reason, Denial::new("deny-list", "not allowed"));
        assert_eq!(check.calls.load(Ordering::SeqCst), 3);
    }

    // -----------------------------------------------------------------------
    // 3. Output keeps submission order even when checks settle out of order
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn partition_keeps_submission_order() {
        let check = Arc::new(DenyList::new(&["dd", "b"]));
        let partition = partition(items(&["a", "bbbb", "ccc", "dd", "b"]), check).await;
        let eligible: Vec<String> = partition.eligible.iter().map(|r| r.label()).collect();
        assert_eq!(eligible, vec!["a", "bbbb", "ccc"]);
        let ineligible: Vec<String> = partition.ineligible_items().map(|r| r.label()).collect();
        assert_eq!(ineligible, vec!["dd", "b"]);
    }

    // -----------------------------------------------------------------------
    // 4. Permissive mode skips checks entirely
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn permissive_gate_skips_checks() {
        let check = Arc::new(DenyList::new(&["a"]));
        let gate = EligibilityGate::new(check.clone(), GateConfig::permissive());
        let partition = gate.partition(items(&["a", "b"])).await;
        assert_eq!(partition.eligible.len(), 2);
        assert_eq!(check.calls.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // 5. A hung check times out into a denial
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn hung_check_is_denied_on_timeout() {
        let check = FnCheck::new("slow-state", |r: Resource| async move {
            if r.id.as_str() == "hung" {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            Ok::<(), String>(())
        });
        let config = GateConfig {
            check_timeout_ms: Some(20),
            ..Default::default()
        };
        let gate = EligibilityGate::new(Arc::new(check), config);
        assert_eq!(gate.check_name(), "slow-state");
        let partition = gate.partition(items(&["ok", "hung"])).await;
        assert_eq!(partition.eligible_ids(), vec![ItemId::from("ok")]);
        assert_eq!(partition.ineligible[0].reason.check, "slow-state");
        assert!(partition.ineligible[0].reason.reason.contains("timed out"));
    }

    // -----------------------------------------------------------------------
    // 6. A panicking check denies only its own item
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn panicking_check_denies_item() {
        let check = FnCheck::new("flaky", |r: Resource| async move {
            if r.id.as_str() == "bad" {
                panic!("state lookup crashed");
            }
            Ok::<(), String>(())
        });
        let partition = partition(items(&["good", "bad"]), Arc::new(check)).await;
        assert_eq!(partition.eligible_ids(), vec![ItemId::from("good")]);
        assert!(partition.ineligible[0].reason.reason.contains("state lookup crashed"));
    }

    #[tokio::test]
    async fn allow_all_gate() {
        let gate = EligibilityGate::<Resource>::allow_all();
        let partition = gate.partition(items(&["x", "y"])).await;
        assert_eq!(partition.len(), 2);
        assert!(partition.ineligible.is_empty());
    }

    // -----------------------------------------------------------------------
    // Property: the partition is disjoint and exhaustive
    // -----------------------------------------------------------------------
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn partition_is_disjoint_and_exhaustive(flags in proptest::collection::vec(any::<bool>(), 0..20)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let batch: Vec<Resource> = (0..flags.len()).map(|i| Resource::new(format!("item-{i}"))).collect();
            let denied: Vec<String> = flags
                .iter()
                .enumerate()
                .filter(|(_, deny)| **deny)
                .map(|(i, _)| format!("item-{i}"))
                .collect();
            let denied_set: HashSet<String> = denied.iter().cloned().collect();
            let check = FnCheck::new("flags", move |r: Resource| {
                let deny = denied_set.contains(r.id.as_str());
                async move { if deny { Err("denied".to_string()) } else { Ok(()) } }
            });

            let partition = rt.block_on(partition(batch.clone(), Arc::new(check)));

            let eligible: HashSet<ItemId> = partition.eligible_ids().into_iter().collect();
            let ineligible: HashSet<ItemId> = partition.ineligible_ids().into_iter().collect();
            prop_assert!(eligible.is_disjoint(&ineligible));
            let union: HashSet<ItemId> = eligible.union(&ineligible).cloned().collect();
            let input: HashSet<ItemId> = batch.iter().map(Item::id).collect();
            prop_assert_eq!(union, input);
            prop_assert_eq!(ineligible.len(), denied.len());
        }
    }
}
