use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GateError, GateResult};

/// Configuration for the eligibility gate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// When `true`, every item is eligible and no check runs.
    pub permissive: bool,
    /// Upper bound for a single item's check, in milliseconds.
    /// `None` waits as long as the check takes.
    pub check_timeout_ms: Option<u64>,
}

impl GateConfig {
    /// A configuration that skips all checks.
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Default::default()
        }
    }

    pub fn check_timeout(&self) -> Option<Duration> {
        self.check_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> GateResult<()> {
        if self.check_timeout_ms == Some(0) {
            return Err(GateError::Config(
                "check_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
