use sweep_types::ItemId;
use thiserror::Error;

/// Programming and configuration errors.
///
/// Business outcomes never show up here: denied items, failed actions, and
/// a cancelled confirmation are all reported as data in
/// [`crate::BatchOutcome`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("orchestrator built without a required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("item {0} appears more than once in the batch")]
    DuplicateItem(ItemId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("gate error: {0}")]
    Gate(#[from] sweep_gate::GateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
