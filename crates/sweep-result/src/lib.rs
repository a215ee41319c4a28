//! Action result aggregation.
//!
//! A batch action reports its outcome as an [`ActionResult`]: four buckets
//! (created, updated, deleted, failed) of `(kind, id)` entries. Results are
//! built with the chainable [`ResultAggregator`] and frozen with
//! [`ResultAggregator::snapshot`].
//!
//! ```rust
//! use sweep_result::ResultAggregator;
//! use sweep_types::{Bucket, ResourceKind};
//!
//! let kind = ResourceKind::from("OS::Glance::Image");
//! let mut agg = ResultAggregator::new();
//! agg.deleted(kind.clone(), "img-1").failed(kind.clone(), "img-2");
//! let result = agg.snapshot();
//! assert_eq!(result.deleted().len(), 1);
//! assert!(result.has_failures());
//! assert_eq!(result.ids(Bucket::Failed)[0].as_str(), "img-2");
//! ```

pub mod aggregator;
pub mod error;
pub mod result;

pub use aggregator::ResultAggregator;
pub use error::{ResultError, ResultResult};
pub use result::{ActionResult, ResultEntry};
