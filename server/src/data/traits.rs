//! Collaborator traits for metric ingestion
//!
//! The ingest pipeline depends only on these traits. Each backend
//! (in-memory, DuckDB) implements all three.

use async_trait::async_trait;

use crate::domain::metrics::{CatalogError, MetricBatch, MetricRecord, StoreError};

/// Registry of the numeric kind each `metric.field` pair is stored as.
///
/// Registration is an upsert: the latest kind wins.
#[async_trait]
pub trait DataTypeCatalog: Send + Sync {
    async fn register(&self, record: &MetricRecord) -> Result<(), CatalogError>;
}

/// Registry of tag sets seen per application, host and metric field.
///
/// Registering an entry that already exists is a no-op.
#[async_trait]
pub trait TagCatalog: Send + Sync {
    async fn register(&self, batch_id: &str, record: &MetricRecord) -> Result<(), CatalogError>;
}

/// Bulk persistence of converted samples
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn insert_batch(&self, batch: &MetricBatch) -> Result<(), StoreError>;
}
