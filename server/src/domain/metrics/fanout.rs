//! Metadata registration pass over a converted batch

use std::sync::Arc;

use super::error::CatalogError;
use super::model::MetricBatch;
use crate::data::{DataTypeCatalog, TagCatalog};

/// Forwards every record to the data-type catalog, then the tag catalog.
///
/// Records are visited in batch order. The first failure stops the pass;
/// registrations already made are not undone.
#[derive(Clone)]
pub struct MetadataFanout {
    data_types: Arc<dyn DataTypeCatalog>,
    tags: Arc<dyn TagCatalog>,
}

impl MetadataFanout {
    pub fn new(data_types: Arc<dyn DataTypeCatalog>, tags: Arc<dyn TagCatalog>) -> Self {
        Self { data_types, tags }
    }

    pub async fn register(&self, batch: &MetricBatch) -> Result<(), CatalogError> {
        for record in &batch.records {
            self.data_types.register(record).await?;
            self.tags.register(&batch.id, record).await?;
        }
        tracing::trace!(
            batch_id = %batch.id,
            records = batch.len(),
            "Metadata registered"
        );
        Ok(())
    }
}
