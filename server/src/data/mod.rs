//! Data storage layer
//!
//! - `traits` - Collaborator traits consumed by the ingest pipeline
//! - `memory` - In-process backend (ephemeral runs, tests)
//! - `duckdb` - Embedded file database backend
//! - `cached` - moka write cache in front of either catalog

pub mod cached;
pub mod duckdb;
pub mod memory;
pub mod traits;

pub use cached::{CachedDataTypeCatalog, CachedTagCatalog, CatalogCacheConfig};
pub use duckdb::{DuckdbError, DuckdbService};
pub use memory::MemoryBackend;
pub use traits::{DataTypeCatalog, MetricStore, TagCatalog};

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{DatabaseConfig, StorageBackend};
use crate::core::storage::AppStorage;
use crate::data::duckdb::{DuckdbDataTypeCatalog, DuckdbMetricStore, DuckdbTagCatalog};

/// Collaborators handed to the ingest service
#[derive(Clone)]
pub struct MetricSinks {
    pub data_types: Arc<dyn DataTypeCatalog>,
    pub tags: Arc<dyn TagCatalog>,
    pub store: Arc<dyn MetricStore>,
}

impl MetricSinks {
    /// Put a write cache in front of both catalogs
    pub fn with_catalog_cache(self, config: CatalogCacheConfig) -> Self {
        Self {
            data_types: Arc::new(CachedDataTypeCatalog::new(self.data_types, config)),
            tags: Arc::new(CachedTagCatalog::new(self.tags, config)),
            store: self.store,
        }
    }
}

/// Metric storage backend selected by configuration
pub enum MetricsBackend {
    Memory(Arc<MemoryBackend>),
    Duckdb(Arc<DuckdbService>),
}

impl MetricsBackend {
    pub async fn init(config: &DatabaseConfig, storage: &AppStorage) -> Result<Self, DuckdbError> {
        let backend = match config.backend {
            StorageBackend::Memory => Self::Memory(Arc::new(MemoryBackend::new())),
            StorageBackend::Duckdb => Self::Duckdb(Arc::new(DuckdbService::init(storage).await?)),
        };
        tracing::debug!(backend = backend.name(), "Metric storage initialized");
        Ok(backend)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Duckdb(_) => "duckdb",
        }
    }

    /// Build the collaborators, with the catalog cache when configured
    pub fn sinks(&self, cache: Option<CatalogCacheConfig>) -> MetricSinks {
        let sinks = match self {
            Self::Memory(m) => MetricSinks {
                data_types: m.data_types.clone(),
                tags: m.tags.clone(),
                store: m.store.clone(),
            },
            Self::Duckdb(db) => MetricSinks {
                data_types: Arc::new(DuckdbDataTypeCatalog::new(Arc::clone(db))),
                tags: Arc::new(DuckdbTagCatalog::new(Arc::clone(db))),
                store: Arc::new(DuckdbMetricStore::new(Arc::clone(db))),
            },
        };
        match cache {
            Some(config) => sinks.with_catalog_cache(config),
            None => sinks,
        }
    }

    /// Periodic checkpoint task (DuckDB only)
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        match self {
            Self::Memory(_) => None,
            Self::Duckdb(db) => Some(db.start_checkpoint_task(shutdown_rx)),
        }
    }

    /// Flush and close the underlying storage
    pub async fn close(&self) {
        if let Self::Duckdb(db) = self {
            if let Err(e) = db.checkpoint().await {
                tracing::warn!(error = %e, "DuckDB checkpoint failed");
            }
            if let Err(e) = Arc::clone(db).close().await {
                tracing::warn!(error = %e, "DuckDB close failed");
            }
        }
    }
}
