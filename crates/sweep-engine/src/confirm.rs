use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sweep_types::{ActionVerb, Item, ItemId, Noun, ResourceKind};

/// The user's answer to a confirmation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Proceed,
    Cancel,
}

/// What the user is asked to confirm: the eligible items of one batch.
pub struct ConfirmRequest<'a, I> {
    pub kind: &'a ResourceKind,
    pub verb: &'a ActionVerb,
    pub noun: &'a Noun,
    pub items: &'a [I],
}

impl<I: Item> ConfirmRequest<'_, I> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(Item::label).collect()
    }

    /// Default prompt text, e.g. `Confirm delete of 2 domains: a, c`.
    pub fn prompt(&self) -> String {
        format!(
            "Confirm {} of {} {}: {}",
            self.verb.present(),
            self.count(),
            self.noun.for_count(self.count()),
            self.labels().join(", ")
        )
    }
}

/// The confirmation step, typically a modal dialog.
///
/// Waits for the user with no time limit. Answering [`Confirmation::Cancel`]
/// ends the batch before any action runs.
#[async_trait]
pub trait ConfirmStep<I>: Send + Sync {
    async fn confirm(&self, request: &ConfirmRequest<'_, I>) -> Confirmation;
}

/// Proceeds without asking.
pub struct AutoConfirm;

#[async_trait]
impl<I: Sync> ConfirmStep<I> for AutoConfirm {
    async fn confirm(&self, _request: &ConfirmRequest<'_, I>) -> Confirmation {
        Confirmation::Proceed
    }
}

/// Declines every batch.
pub struct AlwaysCancel;

#[async_trait]
impl<I: Sync> ConfirmStep<I> for AlwaysCancel {
    async fn confirm(&self, _request: &ConfirmRequest<'_, I>) -> Confirmation {
        Confirmation::Cancel
    }
}

/// Adapts a synchronous closure into a confirmation step.
pub struct FnConfirm<F> {
    f: F,
}

impl<F> FnConfirm<F> {
    pub fn new<I>(f: F) -> Self
    where
        F: Fn(&ConfirmRequest<'_, I>) -> Confirmation + Send + Sync,
    {
        Self { f }
    }
}

#[async_trait]
impl<I, F> ConfirmStep<I> for FnConfirm<F>
where
    I: Sync,
    F: Fn(&ConfirmRequest<'_, I>) -> Confirmation + Send + Sync,
{
    async fn confirm(&self, request: &ConfirmRequest<'_, I>) -> Confirmation {
        (self.f)(request)
    }
}
