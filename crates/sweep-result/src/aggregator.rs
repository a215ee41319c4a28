use std::collections::HashMap;

use sweep_types::{Bucket, ItemId, ResourceKind};

use crate::error::{ResultError, ResultResult};
use crate::result::{ActionResult, ResultEntry};

/// Chainable builder for an [`ActionResult`].
///
/// Callers must register a given `(kind, id)` pair in at most one bucket.
/// The aggregator does not refuse a second registration; the collision is
/// caught when the result is frozen.
#[derive(Clone, Debug, Default)]
pub struct ResultAggregator {
    result: ActionResult,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&mut self, kind: ResourceKind, id: impl Into<ItemId>) -> &mut Self {
        self.register(Bucket::Created, kind, id)
    }

    pub fn updated(&mut self, kind: ResourceKind, id: impl Into<ItemId>) -> &mut Self {
        self.register(Bucket::Updated, kind, id)
    }

    pub fn deleted(&mut self, kind: ResourceKind, id: impl Into<ItemId>) -> &mut Self {
        self.register(Bucket::Deleted, kind, id)
    }

    pub fn failed(&mut self, kind: ResourceKind, id: impl Into<ItemId>) -> &mut Self {
        self.register(Bucket::Failed, kind, id)
    }

    /// Append `(kind, id)` to `bucket`.
    pub fn register(&mut self, bucket: Bucket, kind: ResourceKind, id: impl Into<ItemId>) -> &mut Self {
        let entry = ResultEntry::new(kind, id);
        match bucket {
            Bucket::Created => self.result.created.push(entry),
            Bucket::Updated => self.result.updated.push(entry),
            Bucket::Deleted => self.result.deleted.push(entry),
            Bucket::Failed => self.result.failed.push(entry),
        }
        self
    }

    /// Number of entries registered so far.
    pub fn len(&self) -> usize {
        self.result.total()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Freeze the accumulated result.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if a `(kind, id)` pair was registered in more
    /// than one bucket. Use [`Self::try_snapshot`] to get an error instead.
    pub fn snapshot(&self) -> ActionResult {
        if cfg!(debug_assertions) {
            if let Err(e) = self.check_exclusive() {
                panic!("{e}");
            }
        }
        self.result.clone()
    }

    /// Freeze the accumulated result, reporting bucket collisions in every
    /// build profile.
    pub fn try_snapshot(&self) -> ResultResult<ActionResult> {
        self.check_exclusive()?;
        Ok(self.result.clone())
    }

    fn check_exclusive(&self) -> ResultResult<()> {
        let mut seen: HashMap<&ResultEntry, Bucket> = HashMap::with_capacity(self.len());
        for bucket in Bucket::ALL {
            for entry in self.result.bucket(bucket) {
                match seen.get(entry) {
                    Some(first) if *first != bucket => {
                        return Err(ResultError::Collision {
                            kind: entry.kind.clone(),
                            id: entry.id.clone(),
                            first: *first,
                            second: bucket,
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(entry, bucket);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> ResourceKind {
        ResourceKind::from("OS::Keystone::Domain")
    }

    #[test]
    fn chained_registration_fills_buckets() {
        let mut agg = ResultAggregator::new();
        agg.created(domain(), "d1")
            .updated(domain(), "d2")
            .deleted(domain(), "d3")
            .failed(domain(), "d4");
        assert_eq!(agg.len(), 4);

        let result = agg.snapshot();
        for bucket in Bucket::ALL {
            assert_eq!(result.bucket(bucket).len(), 1, "bucket {bucket}");
        }
        assert_eq!(result.created()[0], ResultEntry::new(domain(), "d1"));
    }

    #[test]
    fn snapshot_is_detached_from_aggregator() {
        let mut agg = ResultAggregator::new();
        agg.deleted(domain(), "d1");
        let first = agg.snapshot();
        agg.deleted(domain(), "d2");
        assert_eq!(first.deleted().len(), 1);
        assert_eq!(agg.snapshot().deleted().len(), 2);
    }

    #[test]
    fn same_id_different_kind_is_not_a_collision() {
        let mut agg = ResultAggregator::new();
        agg.deleted(domain(), "x")
            .failed(ResourceKind::from("OS::Keystone::User"), "x");
        assert!(agg.try_snapshot().is_ok());
    }

    #[test]
    fn try_snapshot_reports_collision() {
        let mut agg = ResultAggregator::new();
        agg.deleted(domain(), "d1").failed(domain(), "d1");
        let err = agg.try_snapshot().unwrap_err();
        assert_eq!(
            err,
            ResultError::Collision {
                kind: domain(),
                id: ItemId::from("d1"),
                first: Bucket::Deleted,
                second: Bucket::Failed,
            }
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "registered in more than one bucket")]
    fn snapshot_panics_on_collision_in_debug() {
        let mut agg = ResultAggregator::new();
        agg.updated(domain(), "d1").deleted(domain(), "d1");
        let _ = agg.snapshot();
    }

    #[test]
    fn empty_aggregator_snapshots_empty_result() {
        let agg = ResultAggregator::new();
        assert!(agg.is_empty());
        assert_eq!(agg.snapshot(), ActionResult::empty());
    }
}
