//! Recording collaborators for pipeline tests

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CatalogError, MetricBatch, MetricRecord, StoreError};
use crate::data::{DataTypeCatalog, MetricSinks, MetricStore, TagCatalog};

/// One collaborator call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DataType { metric: String, field: String },
    Tag { batch_id: String, field: String },
    Store { batch_id: String, records: usize },
}

/// Which collaborator fails, and after how many successful calls
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub data_type_after: Option<usize>,
    pub tag_after: Option<usize>,
    pub store: bool,
}

#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    failures: Failures,
}

impl Recorder {
    pub fn new(failures: Failures) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failures,
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn sinks(self: &Arc<Self>) -> MetricSinks {
        MetricSinks {
            data_types: self.clone(),
            tags: self.clone(),
            store: self.clone(),
        }
    }
}

#[async_trait]
impl DataTypeCatalog for Recorder {
    async fn register(&self, record: &MetricRecord) -> Result<(), CatalogError> {
        let mut calls = self.calls.lock();
        let done = calls
            .iter()
            .filter(|c| matches!(c, Call::DataType { .. }))
            .count();
        if self.failures.data_type_after == Some(done) {
            return Err(CatalogError::backend("data type catalog down"));
        }
        calls.push(Call::DataType {
            metric: record.metric_name.clone(),
            field: record.field_name.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl TagCatalog for Recorder {
    async fn register(&self, batch_id: &str, record: &MetricRecord) -> Result<(), CatalogError> {
        let mut calls = self.calls.lock();
        let done = calls.iter().filter(|c| matches!(c, Call::Tag { .. })).count();
        if self.failures.tag_after == Some(done) {
            return Err(CatalogError::backend("tag catalog down"));
        }
        calls.push(Call::Tag {
            batch_id: batch_id.to_string(),
            field: record.field_name.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl MetricStore for Recorder {
    async fn insert_batch(&self, batch: &MetricBatch) -> Result<(), StoreError> {
        if self.failures.store {
            return Err(StoreError::backend("store down"));
        }
        self.calls.lock().push(Call::Store {
            batch_id: batch.id.clone(),
            records: batch.len(),
        });
        Ok(())
    }
}
