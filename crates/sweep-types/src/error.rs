use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("item id must not be empty")]
    EmptyId,

    #[error("resource kind must not be empty")]
    EmptyKind,

    #[error("unknown action verb: {0}")]
    UnknownVerb(String),
}
