use serde::{Deserialize, Serialize};
use sweep_types::{Bucket, ItemId, ResourceKind};

/// One `(kind, id)` pair in a result bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultEntry {
    pub kind: ResourceKind,
    pub id: ItemId,
}

impl ResultEntry {
    pub fn new(kind: ResourceKind, id: impl Into<ItemId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Immutable outcome of one batch action.
///
/// This is the only channel through which a batch reports what happened.
/// A caller that sees a non-empty success bucket refreshes its list; a caller
/// that only sees `failed` entries treats the batch as non-fatal but
/// unsuccessful.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub(crate) created: Vec<ResultEntry>,
    pub(crate) updated: Vec<ResultEntry>,
    pub(crate) deleted: Vec<ResultEntry>,
    pub(crate) failed: Vec<ResultEntry>,
}

impl ActionResult {
    /// A result with every bucket empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn created(&self) -> &[ResultEntry] {
        &self.created
    }

    pub fn updated(&self) -> &[ResultEntry] {
        &self.updated
    }

    pub fn deleted(&self) -> &[ResultEntry] {
        &self.deleted
    }

    pub fn failed(&self) -> &[ResultEntry] {
        &self.failed
    }

    pub fn bucket(&self, bucket: Bucket) -> &[ResultEntry] {
        match bucket {
            Bucket::Created => &self.created,
            Bucket::Updated => &self.updated,
            Bucket::Deleted => &self.deleted,
            Bucket::Failed => &self.failed,
        }
    }

    /// Ids in `bucket`, in registration order.
    pub fn ids(&self, bucket: Bucket) -> Vec<ItemId> {
        self.bucket(bucket).iter().map(|e| e.id.clone()).collect()
    }

    /// Ids in `bucket` that belong to `kind`.
    pub fn ids_of_kind(&self, bucket: Bucket, kind: &ResourceKind) -> Vec<ItemId> {
        self.bucket(bucket)
            .iter()
            .filter(|e| &e.kind == kind)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        Bucket::ALL.iter().all(|b| self.bucket(*b).is_empty())
    }

    /// Whether anything was created, updated, or deleted.
    pub fn has_changes(&self) -> bool {
        !(self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty())
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Number of entries across all buckets.
    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }
}
