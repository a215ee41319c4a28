use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::check::{Denial, EligibilityCheck};
use crate::error::GateResult;

// ---------------------------------------------------------------------------
// Policy types
// ---------------------------------------------------------------------------

/// A single authorization rule: an action on a service, e.g.
/// `("identity", "identity:delete_domain")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Service the rule belongs to (e.g. `identity`, `image`, `compute`).
    pub service: String,
    /// Fully qualified action name.
    pub action: String,
}

impl PolicyRule {
    pub fn new(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service, self.action)
    }
}

/// The external authorization service.
///
/// Answers whether the current user is allowed to perform *all* of the given
/// rules.
#[async_trait]
pub trait PolicyEnforcer: Send + Sync {
    async fn allowed(&self, rules: &[PolicyRule]) -> GateResult<bool>;
}

/// In-memory enforcer holding the set of granted rules.
#[derive(Clone, Debug, Default)]
pub struct StaticPolicy {
    granted: HashSet<PolicyRule>,
    allow_everything: bool,
}

impl StaticPolicy {
    /// An enforcer that grants only the given rules.
    pub fn granting(rules: impl IntoIterator<Item = PolicyRule>) -> Self {
        Self {
            granted: rules.into_iter().collect(),
            allow_everything: false,
        }
    }

    /// A maximally permissive enforcer that allows everything.
    pub fn permissive() -> Self {
        Self {
            granted: HashSet::new(),
            allow_everything: true,
        }
    }

    pub fn grant(&mut self, rule: PolicyRule) {
        self.granted.insert(rule);
    }
}

#[async_trait]
impl PolicyEnforcer for StaticPolicy {
    async fn allowed(&self, rules: &[PolicyRule]) -> GateResult<bool> {
        if self.allow_everything {
            return Ok(true);
        }
        Ok(rules.iter().all(|r| self.granted.contains(r)))
    }
}

// ---------------------------------------------------------------------------
// PolicyCheck
// ---------------------------------------------------------------------------

/// Authorization check.
///
/// Asks the enforcer whether every configured rule is allowed. An enforcer
/// error denies the item rather than failing the batch.
pub struct PolicyCheck {
    rules: Vec<PolicyRule>,
    enforcer: Arc<dyn PolicyEnforcer>,
}

impl PolicyCheck {
    pub fn new(enforcer: Arc<dyn PolicyEnforcer>) -> Self {
        Self {
            rules: Vec::new(),
            enforcer,
        }
    }

    /// Require `rule` in addition to the rules already configured.
    pub fn require(mut self, rule: PolicyRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }
}

#[async_trait]
impl<I: Sync> EligibilityCheck<I> for PolicyCheck {
    fn name(&self) -> &str {
        "policy"
    }

    async fn check(&self, _item: &I) -> Result<(), Denial> {
        if self.rules.is_empty() {
            // Nothing required, nothing to verify.
            return Ok(());
        }

        match self.enforcer.allowed(&self.rules).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                let required = self
                    .rules
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Denial::new("policy", format!("not permitted by policy ({required})")))
            }
            Err(e) => {
                tracing::warn!(error = %e, "policy enforcer unavailable");
                Err(Denial::new("policy", format!("policy check failed: {e}")))
            }
        }
    }
}
