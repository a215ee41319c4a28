use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One of the four result buckets of an action result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Created,
    Updated,
    Deleted,
    Failed,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 4] = [Self::Created, Self::Updated, Self::Deleted, Self::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic of a batch action.
///
/// The verb decides which bucket successful items are registered into and
/// supplies the words used in aggregated notifications.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVerb {
    Create,
    Update,
    Delete,
    /// Domain-specific verb such as `enable` or `disable`.
    Custom {
        present: String,
        past: String,
        bucket: Bucket,
    },
}

impl ActionVerb {
    pub fn custom(present: impl Into<String>, past: impl Into<String>, bucket: Bucket) -> Self {
        Self::Custom {
            present: present.into(),
            past: past.into(),
            bucket,
        }
    }

    /// Bucket that receives items on which the action succeeded.
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Create => Bucket::Created,
            Self::Update => Bucket::Updated,
            Self::Delete => Bucket::Deleted,
            Self::Custom { bucket, .. } => *bucket,
        }
    }

    /// Lowercase present tense, e.g. `delete`.
    pub fn present(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Custom { present, .. } => present,
        }
    }

    /// Capitalized past tense, e.g. `Deleted`.
    pub fn past(&self) -> &str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
            Self::Custom { past, .. } => past,
        }
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.present())
    }
}

impl FromStr for ActionVerb {
    type Err = TypeError;

    /// Parses the three built-in verbs plus `enable` and `disable`, which
    /// land in the `updated` bucket.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "enable" => Ok(Self::custom("enable", "Enabled", Bucket::Updated)),
            "disable" => Ok(Self::custom("disable", "Disabled", Bucket::Updated)),
            other => Err(TypeError::UnknownVerb(other.to_string())),
        }
    }
}

/// Level attached to a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_maps_to_bucket() {
        assert_eq!(ActionVerb::Create.bucket(), Bucket::Created);
        assert_eq!(ActionVerb::Update.bucket(), Bucket::Updated);
        assert_eq!(ActionVerb::Delete.bucket(), Bucket::Deleted);
        let enable = ActionVerb::custom("enable", "Enabled", Bucket::Updated);
        assert_eq!(enable.bucket(), Bucket::Updated);
        assert_eq!(enable.past(), "Enabled");
    }

    #[test]
    fn verb_parses_known_names() {
        assert_eq!("Delete".parse::<ActionVerb>().unwrap(), ActionVerb::Delete);
        assert_eq!("disable".parse::<ActionVerb>().unwrap().present(), "disable");
        assert_eq!(
            "purge".parse::<ActionVerb>(),
            Err(TypeError::UnknownVerb("purge".into()))
        );
    }

    #[test]
    fn bucket_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Bucket::Deleted).unwrap(), r#""deleted""#);
        assert_eq!(Bucket::ALL.len(), 4);
    }

    #[test]
    fn severity_round_trips_both_levels() {
        assert_eq!(serde_json::to_string(&Severity::Success).unwrap(), r#""success""#);
        assert_eq!(Severity::Error.to_string(), "error");
        assert!(serde_json::from_str::<Severity>(r#""warning""#).is_err());
    }
}
