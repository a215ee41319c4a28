use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of a resource type, e.g. `OS::Keystone::Domain` or `OS::Glance::Image`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Create a kind, rejecting empty names.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(TypeError::EmptyKind);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default display noun derived from the last `::` segment.
    ///
    /// `OS::Keystone::Domain` becomes `domain` / `domains`. Segments in
    /// CamelCase are split into words (`KeyPair` -> `key pair`).
    pub fn noun(&self) -> Noun {
        let last = self.0.rsplit("::").next().unwrap_or(&self.0);
        let mut singular = String::with_capacity(last.len() + 2);
        for (i, ch) in last.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                singular.push(' ');
            }
            singular.extend(ch.to_lowercase());
        }
        Noun::regular(singular)
    }
}

impl From<&str> for ResourceKind {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Singular and plural display forms of a resource noun.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Noun {
    pub singular: String,
    pub plural: String,
}

impl Noun {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Noun whose plural is formed by appending `s`.
    pub fn regular(singular: impl Into<String>) -> Self {
        let singular = singular.into();
        let plural = format!("{singular}s");
        Self { singular, plural }
    }

    /// Singular for exactly one, plural otherwise.
    pub fn for_count(&self, count: usize) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn noun_from_last_segment() {
        let kind = ResourceKind::from("OS::Keystone::Domain");
        assert_eq!(kind.noun(), Noun::new("domain", "domains"));
    }

    #[test]
    fn noun_splits_camel_case() {
        let kind = ResourceKind::from("OS::Nova::KeyPair");
        assert_eq!(kind.noun().singular, "key pair");
        assert_eq!(kind.noun().plural, "key pairs");
    }

    #[test]
    fn noun_without_namespace() {
        assert_eq!(ResourceKind::from("trunk").noun().plural, "trunks");
    }

    #[test]
    fn for_count_picks_form() {
        let noun = Noun::new("policy", "policies");
        assert_eq!(noun.for_count(0), "policies");
        assert_eq!(noun.for_count(1), "policy");
        assert_eq!(noun.for_count(7), "policies");
    }

    #[test]
    fn parse_rejects_empty_kind() {
        assert_eq!(ResourceKind::parse(" "), Err(TypeError::EmptyKind));
    }

    proptest! {
        #[test]
        fn regular_plural_extends_singular(word in "[a-z]{1,12}") {
            let noun = Noun::regular(word.clone());
            prop_assert!(noun.plural.starts_with(&word));
            prop_assert_eq!(noun.for_count(1), word.as_str());
        }
    }
}
