use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future driving a single operation.
pub type OperationFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// One independently running unit of work paired with caller context.
///
/// The context travels with the operation through the runtime and comes back
/// attached to its outcome. It is never inspected by the combinator.
pub struct Operation<C, T, E> {
    pub(crate) context: C,
    pub(crate) future: OperationFuture<T, E>,
}

impl<C, T, E> Operation<C, T, E> {
    pub fn new<F>(context: C, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            context,
            future: Box::pin(future),
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C: fmt::Debug, T, E> fmt::Debug for Operation<C, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Why an operation ended up in the failed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationFailure<E> {
    /// The operation itself returned an error.
    Error(E),
    /// The per-operation time limit elapsed first.
    TimedOut(Duration),
    /// The operation panicked. Holds the panic message when it was a string.
    Panicked(String),
    /// The runtime cancelled the task before it settled.
    Cancelled,
}

impl<E> OperationFailure<E> {
    /// The operation's own error, if that is what failed it.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

impl<E: fmt::Display> fmt::Display for OperationFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
            Self::Panicked(msg) => write!(f, "panicked: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
