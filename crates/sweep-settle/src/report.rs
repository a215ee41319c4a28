use crate::operation::OperationFailure;

/// An outcome paired with the context of the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementEntry<C, V> {
    pub context: C,
    pub value: V,
}

/// Outcome of settling a set of operations.
///
/// Every submitted operation appears exactly once, in `passed` or in
/// `failed`. Within each list entries appear in the order they settled.
#[derive(Debug, Clone)]
pub struct SettlementReport<C, T, E> {
    pub passed: Vec<SettlementEntry<C, T>>,
    pub failed: Vec<SettlementEntry<C, OperationFailure<E>>>,
}

impl<C, T, E> SettlementReport<C, T, E> {
    pub fn empty() -> Self {
        Self {
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Total number of settled operations.
    pub fn len(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passed.is_empty() && self.failed.is_empty()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn passed_contexts(&self) -> impl Iterator<Item = &C> {
        self.passed.iter().map(|e| &e.context)
    }

    pub fn failed_contexts(&self) -> impl Iterator<Item = &C> {
        self.failed.iter().map(|e| &e.context)
    }
}

impl<C, T, E> Default for SettlementReport<C, T, E> {
    fn default() -> Self {
        Self::empty()
    }
}
