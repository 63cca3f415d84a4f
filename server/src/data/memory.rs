//! In-memory metric backend
//!
//! Keeps everything in process memory. Used for ephemeral runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;

use super::traits::{DataTypeCatalog, MetricStore, TagCatalog};
use crate::domain::metrics::{
    CatalogError, MetricBatch, MetricDataType, MetricRecord, MetricTag, StoreError,
};

/// A persisted sample together with the application it was submitted under
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSample<T> {
    pub application_name: String,
    pub record: MetricRecord,
    pub value: T,
}

/// Samples split by kind, the way the DuckDB backend splits them into tables
#[derive(Debug, Default)]
pub struct MemoryMetricStore {
    long: RwLock<Vec<StoredSample<i64>>>,
    double: RwLock<Vec<StoredSample<f64>>>,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn long_samples(&self) -> Vec<StoredSample<i64>> {
        self.long.read().clone()
    }

    pub fn double_samples(&self) -> Vec<StoredSample<f64>> {
        self.double.read().clone()
    }

    pub fn len(&self) -> usize {
        self.long.read().len() + self.double.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    async fn insert_batch(&self, batch: &MetricBatch) -> Result<(), StoreError> {
        let long: Vec<_> = batch
            .integer_samples()
            .map(|(r, value)| StoredSample {
                application_name: batch.id.clone(),
                record: r.clone(),
                value,
            })
            .collect();
        let double: Vec<_> = batch
            .float_samples()
            .map(|(r, value)| StoredSample {
                application_name: batch.id.clone(),
                record: r.clone(),
                value,
            })
            .collect();

        // Take both locks before writing so readers never see half a batch
        let mut long_guard = self.long.write();
        let mut double_guard = self.double.write();
        long_guard.extend(long);
        double_guard.extend(double);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDataTypeCatalog {
    types: DashMap<(String, String), MetricDataType>,
}

impl MemoryDataTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric_name: &str, field_name: &str) -> Option<MetricDataType> {
        self.types
            .get(&(metric_name.to_string(), field_name.to_string()))
            .map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[async_trait]
impl DataTypeCatalog for MemoryDataTypeCatalog {
    async fn register(&self, record: &MetricRecord) -> Result<(), CatalogError> {
        self.types.insert(
            (record.metric_name.clone(), record.field_name.clone()),
            record.data_type(),
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTagCatalog {
    entries: DashSet<MetricTag>,
}

impl MemoryTagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, entry: &MetricTag) -> bool {
        self.entries.contains(entry)
    }

    /// Entries registered for one application's metric, in no particular order
    pub fn entries_for(&self, application_name: &str, metric_name: &str) -> Vec<MetricTag> {
        self.entries
            .iter()
            .filter(|e| e.application_name == application_name && e.metric_name == metric_name)
            .map(|e| e.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TagCatalog for MemoryTagCatalog {
    async fn register(&self, batch_id: &str, record: &MetricRecord) -> Result<(), CatalogError> {
        self.entries.insert(MetricTag::from_record(batch_id, record));
        Ok(())
    }
}

/// The three in-memory collaborators, created together
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pub store: Arc<MemoryMetricStore>,
    pub data_types: Arc<MemoryDataTypeCatalog>,
    pub tags: Arc<MemoryTagCatalog>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}
