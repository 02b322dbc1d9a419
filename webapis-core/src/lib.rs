//! Webapis Core Library
//!
//! The pipeline behind every job: paginated vendor listings are wrapped into
//! typed views, transformed into flat records, staged and deduplicated, then
//! either batched back to a vendor or written out as CSV or YAML.
//!
//! Vendor clients come from `webapis-provider` and are reached through the
//! traits it defines, so any job can run against in-memory doubles.

pub mod accumulator;
pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod property_list;
pub mod services;
pub mod sink;
pub mod transform;
pub mod wrapper;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use accumulator::{DedupAccumulator, derive_identity_key};
pub use batch::{BatchDispatcher, BatchReport, ItemContext, ItemOutcome};
pub use config::Settings;
pub use error::{CoreError, CoreResult};
pub use pagination::{Page, paginate, paginate_from_start};
pub use property_list::{PropertyRow, read_property_list};
pub use services::ServiceContext;
pub use sink::{Quoting, SinkOutcome};
pub use transform::{FieldValue, Outcome, RecordTransformer, TransformedRecord, TypeCounter};
pub use wrapper::{RawList, ResponseView};
