//! Built-in eligibility checks.

pub mod basic;
pub mod pipeline;
pub mod policy;
pub mod state;

pub use basic::{AllowAll, FnCheck};
pub use pipeline::CheckPipeline;
pub use policy::{PolicyCheck, PolicyEnforcer, PolicyRule, StaticPolicy};
pub use state::StateCheck;
