//! Foundation types for Sweep.
//!
//! This crate provides the identity and vocabulary types shared by every
//! other Sweep crate: what an item is, how resource kinds are named, which
//! verbs an action can carry, and which result bucket each verb lands in.
//!
//! # Key Types
//!
//! - [`Item`]: Anything a batch can act on (stable id, optional name)
//! - [`ItemId`]: Stable identifier of an item
//! - [`ResourceKind`]: Resource type name such as `OS::Keystone::Domain`
//! - [`ActionVerb`]: Semantic of a batch action and its success [`Bucket`]
//! - [`Severity`]: Level attached to user-facing notifications
//! - [`RunId`]: UUID v7 identifier of one orchestration run

pub mod error;
pub mod item;
pub mod kind;
pub mod run;
pub mod verb;

pub use error::TypeError;
pub use item::{Item, ItemId, Resource};
pub use kind::{Noun, ResourceKind};
pub use run::RunId;
pub use verb::{ActionVerb, Bucket, Severity};
