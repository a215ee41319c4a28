//! Settle-all combinator.
//!
//! Given N independent asynchronous operations, [`Settler::settle`] runs them
//! all concurrently and waits until every one of them has either produced a
//! value or failed. One failure never short-circuits the others. The report
//! pairs each outcome with the context the caller attached at submission
//! time, so results can be correlated to inputs without relying on order.
//!
//! ```rust
//! use sweep_settle::{settle, Operation};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ops = vec![
//!     Operation::new("a", async { Ok::<_, String>(1) }),
//!     Operation::new("b", async { Err::<i32, _>("boom".to_string()) }),
//! ];
//! let report = settle(ops).await;
//! assert_eq!(report.passed.len(), 1);
//! assert_eq!(report.failed[0].context, "b");
//! # }
//! ```

pub mod operation;
pub mod report;
pub mod settler;

pub use operation::{Operation, OperationFailure, OperationFuture};
pub use report::{SettlementEntry, SettlementReport};
pub use settler::{settle, Settler};
