use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Stable identifier of an item targeted by a batch.
///
/// Results are correlated back to their inputs through this id, so it must
/// be unique within a single batch.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id, rejecting empty or whitespace-only strings.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(TypeError::EmptyId);
        }
        Ok(Self(s))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity a batch action can target.
///
/// The engine only ever reads `id` and `name`; it never mutates an item.
/// Items are cloned into each concurrently running operation, so they must
/// be cheap to clone (wrap large payloads in an `Arc`).
pub trait Item: Clone + Send + Sync + 'static {
    /// Stable identifier, unique within a batch.
    fn id(&self) -> ItemId;

    /// Optional display name.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Name when present, otherwise the id.
    fn label(&self) -> String {
        match self.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id().to_string(),
        }
    }
}

/// A plain item with an id and an optional name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Resource {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

impl Item for Resource {
    fn id(&self) -> ItemId {
        self.id.clone()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
