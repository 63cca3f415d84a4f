//! Catalog write cache
//!
//! Telegraf resends the same metric/field/tag combinations on every flush
//! interval. These decorators remember recent registrations and skip the
//! inner catalog call on a hit. Failed registrations are never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::traits::{DataTypeCatalog, TagCatalog};
use crate::domain::metrics::{CatalogError, MetricDataType, MetricRecord, MetricTag};

/// Cache sizing shared by both decorators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCacheConfig {
    pub max_entries: u64,
    pub ttl: Duration,
}

pub struct CachedDataTypeCatalog {
    inner: Arc<dyn DataTypeCatalog>,
    cache: Cache<(String, String), MetricDataType>,
}

impl CachedDataTypeCatalog {
    pub fn new(inner: Arc<dyn DataTypeCatalog>, config: CatalogCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl DataTypeCatalog for CachedDataTypeCatalog {
    async fn register(&self, record: &MetricRecord) -> Result<(), CatalogError> {
        let key = (record.metric_name.clone(), record.field_name.clone());
        let data_type = record.data_type();

        // A kind change must reach the inner catalog so the upsert can overwrite it
        if self.cache.get(&key).await == Some(data_type) {
            return Ok(());
        }

        self.inner.register(record).await?;
        self.cache.insert(key, data_type).await;
        Ok(())
    }
}

pub struct CachedTagCatalog {
    inner: Arc<dyn TagCatalog>,
    cache: Cache<MetricTag, ()>,
}

impl CachedTagCatalog {
    pub fn new(inner: Arc<dyn TagCatalog>, config: CatalogCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl TagCatalog for CachedTagCatalog {
    async fn register(&self, batch_id: &str, record: &MetricRecord) -> Result<(), CatalogError> {
        let key = MetricTag::from_record(batch_id, record);
        if self.cache.contains_key(&key) {
            return Ok(());
        }

        self.inner.register(batch_id, record).await?;
        self.cache.insert(key, ()).await;
        Ok(())
    }
}
