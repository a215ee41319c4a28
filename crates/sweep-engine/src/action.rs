use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

/// The per-item operation a batch runs, e.g. a delete call against the
/// resource service.
///
/// Each eligible item gets its own invocation; invocations run concurrently
/// and fail independently. Implementations should not report failures to
/// the user themselves: the orchestrator owns failure notification and
/// reports all failed items in one aggregated message.
#[async_trait]
pub trait ItemAction<I>: Send + Sync + 'static {
    type Value: Send + 'static;
    type Error: fmt::Display + Send + 'static;

    async fn perform(&self, item: I) -> Result<Self::Value, Self::Error>;
}

/// Adapts an async closure into an [`ItemAction`].
pub struct FnAction<I, F> {
    f: F,
    _item: PhantomData<fn(I)>,
}

impl<I, F> FnAction<I, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<I, F, Fut, V, E> ItemAction<I> for FnAction<I, F>
where
    I: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
    V: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    type Value = V;
    type Error = E;

    async fn perform(&self, item: I) -> Result<V, E> {
        (self.f)(item).await
    }
}
