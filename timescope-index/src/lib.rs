//! Event indexing for the TimeScope timeline engine.
//!
//! Raw batches of heterogeneous log events are grouped per event type
//! into [`EventBucket`]s, timestamp-sorted append-only sequences that
//! answer range and point-in-time queries with upper-bound binary
//! search. The [`EventTypeIndex`] owns the buckets and handles batch
//! and live routing.

pub mod bucket;
pub mod error;
pub mod index;

pub use bucket::{EventBucket, EventPointRef, RangeView};
pub use error::IndexError;
pub use index::{EventTypeIndex, IngestReport};
