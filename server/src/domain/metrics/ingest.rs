//! Ingest boundary: validate, convert, register metadata, persist

use std::sync::Arc;

use super::error::IngestError;
use super::fanout::MetadataFanout;
use super::payload::{TelegrafBatch, validate_batch};
use super::tags::TagFilter;
use super::transform::transform;
use crate::data::{MetricSinks, MetricStore};

/// Counts reported back for an accepted batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub metrics: usize,
    pub records: usize,
    pub skipped_fields: usize,
}

/// Runs one Telegraf batch through the pipeline.
///
/// Steps run strictly in order: validation, conversion, metadata fan-out,
/// bulk insert. A batch that converts to zero records makes no collaborator
/// calls at all. Catalog writes are not rolled back when the store fails.
#[derive(Clone)]
pub struct IngestService {
    filter: Arc<TagFilter>,
    fanout: MetadataFanout,
    store: Arc<dyn MetricStore>,
}

impl IngestService {
    pub fn new(filter: Arc<TagFilter>, sinks: MetricSinks) -> Self {
        Self {
            filter,
            fanout: MetadataFanout::new(sinks.data_types, sinks.tags),
            store: sinks.store,
        }
    }

    pub async fn ingest(
        &self,
        application_name: &str,
        payload: &TelegrafBatch,
    ) -> Result<IngestSummary, IngestError> {
        if let Err(errors) = validate_batch(application_name, payload) {
            tracing::warn!(
                application_name,
                errors = errors.len(),
                "Rejected Telegraf batch"
            );
            return Err(IngestError::ValidationFailed(errors));
        }

        tracing::debug!(application_name, payload = ?payload, "Telegraf payload");

        let batch = transform(application_name, payload, &self.filter);
        let summary = IngestSummary {
            metrics: payload.metrics.len(),
            records: batch.len(),
            skipped_fields: batch.skipped_fields,
        };
        tracing::info!(
            application_name,
            metrics = summary.metrics,
            records = summary.records,
            "Telegraf batch received"
        );

        if batch.is_empty() {
            tracing::debug!(application_name, "No numeric fields in batch");
            return Ok(summary);
        }

        self.fanout.register(&batch).await?;
        self.store.insert_batch(&batch).await?;

        tracing::debug!(
            application_name,
            records = summary.records,
            skipped = summary.skipped_fields,
            "Telegraf batch persisted"
        );
        Ok(summary)
    }
}
