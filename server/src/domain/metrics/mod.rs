//! Telegraf metric ingestion
//!
//! Converts Telegraf JSON batches into typed samples, registers their
//! metadata with the catalogs and hands them to the metric store.

pub mod dispatch;
pub mod error;
pub mod fanout;
pub mod ingest;
pub mod model;
pub mod payload;
pub mod tags;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{UnsupportedField, classify};
pub use error::{CatalogError, FieldError, IngestError, StoreError};
pub use fanout::MetadataFanout;
pub use ingest::{IngestService, IngestSummary};
pub use model::{MetricBatch, MetricDataType, MetricRecord, MetricTag, SampleValue, Tag};
pub use payload::{TelegrafBatch, TelegrafMetric, validate_batch};
pub use tags::{HOST_TAG, TagFilter, TagFilterMode};
pub use transform::transform;
