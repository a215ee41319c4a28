use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sweep_gate::GateConfig;

use crate::error::{EngineError, EngineResult};

/// What happens to items that fail the eligibility check.
///
/// Ineligible items are always announced in one aggregated denial
/// notification. This setting only controls whether they are also
/// registered in the result's `failed` bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReporting {
    /// Register them as failed only when no item was eligible, so a batch
    /// that ran nothing still reports why.
    #[default]
    FailedWhenNoneEligible,
    /// Always register them as failed.
    Always,
    /// Never register them; the denial notification is the only trace.
    Never,
}

/// Configuration for a batch orchestrator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound for a single item's action, in milliseconds. `None`
    /// waits as long as the action takes; a hung action hangs the batch.
    pub action_timeout_ms: Option<u64>,
    pub ineligible: IneligibleReporting,
    pub gate: GateConfig,
}

impl EngineConfig {
    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.action_timeout_ms == Some(0) {
            return Err(EngineError::Config(
                "action_timeout_ms must be greater than zero".into(),
            ));
        }
        self.gate.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = EngineConfig::default();
        assert!(c.action_timeout().is_none());
        assert_eq!(c.ineligible, IneligibleReporting::FailedWhenNoneEligible);
        assert!(!c.gate.permissive);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn parses_nested_gate_section() {
        let c = EngineConfig::from_toml_str(
            r#"
            action_timeout_ms = 1500
            ineligible = "always"

            [gate]
            permissive = true
            "#,
        )
        .unwrap();
        assert_eq!(c.action_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(c.ineligible, IneligibleReporting::Always);
        assert!(c.gate.permissive);
    }

    #[test]
    fn rejects_zero_timeouts() {
        assert!(matches!(
            EngineConfig::from_toml_str("action_timeout_ms = 0"),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[gate]\ncheck_timeout_ms = 0"),
            Err(EngineError::Gate(_))
        ));
    }

    #[test]
    fn rejects_unknown_reporting_mode() {
        assert!(EngineConfig::from_toml_str(r#"ineligible = "sometimes""#).is_err());
    }

    #[test]
    fn toml_round_trip_through_file() {
        let config = EngineConfig {
            action_timeout_ms: Some(250),
            ineligible: IneligibleReporting::Never,
            gate: GateConfig::default(),
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();
        assert_eq!(EngineConfig::load(file.path()).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/sweep.toml")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
