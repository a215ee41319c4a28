//! Batch action orchestration for Sweep.
//!
//! An admin console deletes, updates, and creates resources in batches: a
//! selection of domains, users, images, or instances gets the same action
//! applied in one go. The [`Orchestrator`] implements that flow once for
//! every resource type:
//!
//! 1. run a per-item eligibility check and report all denials in one message,
//! 2. ask the user to confirm the eligible items,
//! 3. run the action on every eligible item concurrently,
//! 4. fold the outcomes into one [`ActionResult`] and report successes and
//!    failures in one message each.
//!
//! A failure on one item never stops the others, and no failure is ever
//! returned as an `Err`: the result is the only channel for outcomes.
//!
//! # Quick Start
//!
//! ```rust
//! use sweep_engine::{BatchOutcome, FnAction, Orchestrator};
//! use sweep_types::{ActionVerb, Resource, ResourceKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let orchestrator = Orchestrator::builder(ResourceKind::from("OS::Nova::KeyPair"), ActionVerb::Delete)
//!     .action(FnAction::new(|item: Resource| async move {
//!         if item.id.as_str() == "in-use" {
//!             Err("key pair is in use".to_string())
//!         } else {
//!             Ok(())
//!         }
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let outcome = orchestrator
//!     .perform(vec![Resource::new("kp-1"), Resource::new("in-use")])
//!     .await
//!     .unwrap();
//! let result = outcome.result().unwrap();
//! assert_eq!(result.deleted().len(), 1);
//! assert_eq!(result.failed()[0].id.as_str(), "in-use");
//! # }
//! ```

pub mod action;
pub mod config;
pub mod confirm;
pub mod error;
pub mod events;
pub mod notify;
pub mod orchestrator;
pub mod state;

pub use action::{FnAction, ItemAction};
pub use config::{EngineConfig, IneligibleReporting};
pub use confirm::{AlwaysCancel, AutoConfirm, ConfirmRequest, ConfirmStep, Confirmation, FnConfirm};
pub use error::{EngineError, EngineResult};
pub use events::{BatchEvent, EventBus, EventFilter, EventSink, EventStream, MemoryEvents};
pub use notify::{MemoryNotifier, Notification, NotificationPhase, NotificationSink, TracingNotifier};
pub use orchestrator::{BatchOutcome, Orchestrator, OrchestratorBuilder};
pub use state::BatchState;
pub use sweep_result::ActionResult;
