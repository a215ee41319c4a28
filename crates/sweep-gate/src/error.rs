use std::fmt;

/// Errors raised by the gate itself or by the services a check consults.
///
/// A check that *denies* an item is not an error; see [`crate::Denial`].
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The authorization service could not answer.
    #[error("policy enforcer error: {0}")]
    Enforcer(String),
}

impl PartialEq for GateError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for GateError {}

pub type GateResult<T> = Result<T, GateError>;
