//! Error types for metric ingestion

use serde::Serialize;
use thiserror::Error;

/// One validation problem, addressed by field path (e.g. `metrics[2].name`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by a data-type or tag catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog backend error: {0}")]
    Backend(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Failure reported by the metric store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Error returned by the ingest boundary
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("Metadata registration failed: {0}")]
    CatalogFailure(#[from] CatalogError),

    #[error("Metric persistence failed: {0}")]
    StoreFailure(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_display() {
        let err = IngestError::ValidationFailed(vec![
            FieldError::new("a", "x", "bad"),
            FieldError::new("b", "y", "worse"),
        ]);
        assert_eq!(err.to_string(), "Validation failed with 2 error(s)");

        let err: IngestError = CatalogError::backend("disk full").into();
        assert_eq!(
            err.to_string(),
            "Metadata registration failed: Catalog backend error: disk full"
        );

        let err: IngestError = StoreError::Unavailable("closed".into()).into();
        assert_eq!(
            err.to_string(),
            "Metric persistence failed: Store unavailable: closed"
        );
    }
}
