use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use sweep_gate::PolicyRule;
use sweep_types::{ActionVerb, Item, ItemId, ResourceKind};

/// A batch to run: one resource kind, one verb, and the selected items.
///
/// ```toml
/// kind = "OS::Keystone::Domain"
/// verb = "delete"
///
/// [policy]
/// require = ["identity:delete_domain"]
/// grant = ["identity:delete_domain"]
///
/// [[items]]
/// id = "d-1"
/// name = "alpha"
///
/// [[items]]
/// id = "d-2"
/// deny = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub kind: String,
    pub verb: String,
    #[serde(default)]
    pub policy: PolicySection,
    #[serde(default)]
    pub items: Vec<ManifestItem>,
}

/// Policy rules as `service:action` strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Rules the action needs.
    pub require: Vec<String>,
    /// Rules the simulated user holds.
    pub grant: Vec<String>,
}

/// One selected row, with knobs steering the simulated service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The item is in a state that forbids the action.
    #[serde(default)]
    pub deny: bool,
    /// The service rejects the action.
    #[serde(default)]
    pub fail: bool,
    /// Simulated service latency.
    #[serde(default)]
    pub delay_ms: u64,
}

impl Item for ManifestItem {
    fn id(&self) -> ItemId {
        self.id.clone()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Manifest {
    /// Load a manifest; `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read manifest {}", path.display()))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_toml_str(&raw),
        };
        parsed.with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let manifest: Self = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let manifest: Self = serde_json::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn kind(&self) -> anyhow::Result<ResourceKind> {
        Ok(ResourceKind::parse(self.kind.as_str())?)
    }

    pub fn verb(&self) -> anyhow::Result<ActionVerb> {
        Ok(self.verb.parse()?)
    }

    pub fn required_rules(&self) -> anyhow::Result<Vec<PolicyRule>> {
        self.policy.require.iter().map(|r| parse_rule(r)).collect()
    }

    pub fn granted_rules(&self) -> anyhow::Result<Vec<PolicyRule>> {
        self.policy.grant.iter().map(|r| parse_rule(r)).collect()
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.kind()?;
        self.verb()?;
        self.required_rules()?;
        self.granted_rules()?;
        if let Some(position) = self.items.iter().position(|i| i.id.as_str().trim().is_empty()) {
            bail!("item #{} has an empty id", position + 1);
        }
        Ok(())
    }
}

fn parse_rule(raw: &str) -> anyhow::Result<PolicyRule> {
    match raw.split_once(':') {
        Some((service, action)) if !service.is_empty() && !action.is_empty() => {
            Ok(PolicyRule::new(service, action))
        }
        _ => bail!("policy rule {raw:?} is not of the form service:action"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOMAINS: &str = r#"
kind = "OS::Keystone::Domain"
verb = "delete"

[[items]]
id = "a"
name = "alpha"

[[items]]
id = "b"
deny = true

[[items]]
id = "c"
fail = true
delay_ms = 5
"#;

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_toml_manifest() {
        let file = write_temp(".toml", DOMAINS);
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.kind().unwrap(), ResourceKind::from("OS::Keystone::Domain"));
        assert_eq!(manifest.verb().unwrap(), ActionVerb::Delete);
        assert_eq!(manifest.items.len(), 3);
        assert_eq!(manifest.items[0].label(), "alpha");
        assert!(manifest.items[1].deny);
        assert!(manifest.items[2].fail);
        assert_eq!(manifest.items[2].delay_ms, 5);
        assert!(manifest.required_rules().unwrap().is_empty());
    }

    #[test]
    fn loads_json_manifest() {
        let body = r#"{
            "kind": "OS::Glance::Image",
            "verb": "update",
            "policy": { "require": ["image:modify_image"] },
            "items": [{ "id": "img-1" }]
        }"#;
        let file = write_temp(".json", body);
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.items[0].label(), "img-1");
        assert_eq!(manifest.items[0].delay_ms, 0);
        assert_eq!(
            manifest.required_rules().unwrap(),
            vec![PolicyRule::new("image", "modify_image")]
        );
    }

    #[test]
    fn unknown_verb_is_rejected() {
        let err = Manifest::from_toml_str("kind = \"OS::Nova::Server\"\nverb = \"reboot\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("unknown action verb"));
    }

    #[test]
    fn malformed_rule_is_rejected() {
        let body = "kind = \"k\"\nverb = \"delete\"\n[policy]\nrequire = [\"nocolon\"]\n";
        assert!(Manifest::from_toml_str(body).is_err());
    }

    #[test]
    fn empty_item_id_is_rejected() {
        let body = "kind = \"k\"\nverb = \"delete\"\n[[items]]\nid = \" \"\n";
        let err = Manifest::from_toml_str(body).unwrap_err();
        assert!(err.to_string().contains("item #1"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Manifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
