//! Collaborator trait implementations backed by DuckDB

use std::sync::Arc;

use async_trait::async_trait;

use super::repositories::{catalog, metric};
use super::{DuckdbError, DuckdbService};
use crate::data::traits::{DataTypeCatalog, MetricStore, TagCatalog};
use crate::domain::metrics::{CatalogError, MetricBatch, MetricRecord, MetricTag, StoreError};

impl From<DuckdbError> for CatalogError {
    fn from(e: DuckdbError) -> Self {
        match e {
            DuckdbError::Closed => CatalogError::Unavailable(e.to_string()),
            other => CatalogError::Backend(other.to_string()),
        }
    }
}

impl From<DuckdbError> for StoreError {
    fn from(e: DuckdbError) -> Self {
        match e {
            DuckdbError::Closed => StoreError::Unavailable(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

pub struct DuckdbMetricStore {
    db: Arc<DuckdbService>,
}

impl DuckdbMetricStore {
    pub fn new(db: Arc<DuckdbService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetricStore for DuckdbMetricStore {
    async fn insert_batch(&self, batch: &MetricBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let db = Arc::clone(&self.db);
        let batch = batch.clone();
        DuckdbService::run_query(move || {
            let conn = db.conn()?;
            metric::insert_batch(&conn, &batch)
        })
        .await?;
        Ok(())
    }
}

pub struct DuckdbDataTypeCatalog {
    db: Arc<DuckdbService>,
}

impl DuckdbDataTypeCatalog {
    pub fn new(db: Arc<DuckdbService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DataTypeCatalog for DuckdbDataTypeCatalog {
    async fn register(&self, record: &MetricRecord) -> Result<(), CatalogError> {
        let db = Arc::clone(&self.db);
        let metric_name = record.metric_name.clone();
        let field_name = record.field_name.clone();
        let data_type = record.data_type();
        DuckdbService::run_query(move || {
            let conn = db.conn()?;
            catalog::upsert_data_type(&conn, &metric_name, &field_name, data_type)
        })
        .await?;
        Ok(())
    }
}

pub struct DuckdbTagCatalog {
    db: Arc<DuckdbService>,
}

impl DuckdbTagCatalog {
    pub fn new(db: Arc<DuckdbService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagCatalog for DuckdbTagCatalog {
    async fn register(&self, batch_id: &str, record: &MetricRecord) -> Result<(), CatalogError> {
        let db = Arc::clone(&self.db);
        let entry = MetricTag::from_record(batch_id, record);
        DuckdbService::run_query(move || {
            let conn = db.conn()?;
            catalog::insert_tag(&conn, &entry)
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::AppStorage;
    use crate::domain::metrics::{MetricDataType, SampleValue, Tag};
    use tempfile::TempDir;

    async fn create_test_service() -> (TempDir, Arc<DuckdbService>) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        tokio::fs::create_dir_all(temp_dir.path().join("duckdb"))
            .await
            .expect("Failed to create duckdb dir");
        let storage = AppStorage::init_for_test(temp_dir.path().to_path_buf());
        let service = DuckdbService::init(&storage)
            .await
            .expect("Failed to init DuckDB");
        (temp_dir, Arc::new(service))
    }

    fn record(field: &str, value: SampleValue) -> MetricRecord {
        MetricRecord {
            metric_name: "cpu".to_string(),
            host: "h1".to_string(),
            field_name: field.to_string(),
            tags: Arc::from(vec![Tag::new("region", "us")]),
            timestamp_millis: 1_000_000,
            value,
        }
    }

    #[tokio::test]
    async fn test_store_and_catalogs_roundtrip() {
        let (_temp_dir, db) = create_test_service().await;
        let store = DuckdbMetricStore::new(Arc::clone(&db));
        let types = DuckdbDataTypeCatalog::new(Arc::clone(&db));
        let tags = DuckdbTagCatalog::new(Arc::clone(&db));

        let batch = MetricBatch {
            id: "app".to_string(),
            records: vec![
                record("usage", SampleValue::Integer(42)),
                record("idle", SampleValue::Float(0.5)),
            ],
            skipped_fields: 0,
        };
        for r in &batch.records {
            types.register(r).await.unwrap();
            tags.register(&batch.id, r).await.unwrap();
        }
        store.insert_batch(&batch).await.unwrap();

        let conn = db.conn().unwrap();
        assert_eq!(
            catalog::get_data_type(&conn, "cpu", "usage").unwrap(),
            Some(MetricDataType::Long)
        );
        assert_eq!(
            catalog::get_data_type(&conn, "cpu", "idle").unwrap(),
            Some(MetricDataType::Double)
        );
        assert_eq!(
            catalog::list_tags(&conn, "app", "cpu").unwrap(),
            vec![r#"{"region":"us"}"#]
        );
        let long: i64 = conn
            .query_row("SELECT COUNT(*) FROM system_metric_long", [], |row| row.get(0))
            .unwrap();
        assert_eq!(long, 1);
    }

    #[tokio::test]
    async fn test_closed_connection_is_unavailable() {
        let (_temp_dir, db) = create_test_service().await;
        let store = DuckdbMetricStore::new(Arc::clone(&db));
        let types = DuckdbDataTypeCatalog::new(Arc::clone(&db));
        Arc::clone(&db).close().await.unwrap();

        let r = record("usage", SampleValue::Integer(1));
        assert!(matches!(
            types.register(&r).await,
            Err(CatalogError::Unavailable(_))
        ));

        let batch = MetricBatch {
            id: "app".to_string(),
            records: vec![r],
            skipped_fields: 0,
        };
        assert!(matches!(
            store.insert_batch(&batch).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
