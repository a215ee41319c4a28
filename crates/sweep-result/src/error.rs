use sweep_types::{Bucket, ItemId, ResourceKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultError {
    #[error("{kind} {id} registered in more than one bucket ({first} and {second})")]
    Collision {
        kind: ResourceKind,
        id: ItemId,
        first: Bucket,
        second: Bucket,
    },
}

pub type ResultResult<T> = Result<T, ResultError>;
