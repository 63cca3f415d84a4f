//! Conversion of Telegraf batches into normalized metric records

use super::dispatch::classify;
use super::model::{MetricBatch, MetricRecord};
use super::payload::TelegrafBatch;
use super::tags::TagFilter;

/// Convert a batch into one record per supported field.
///
/// Records keep metric order, then field order within each metric.
/// Unsupported field values are skipped and counted, never fatal.
pub fn transform(application_name: &str, batch: &TelegrafBatch, filter: &TagFilter) -> MetricBatch {
    let capacity = batch.metrics.iter().map(|m| m.fields.len()).sum();
    let mut records = Vec::with_capacity(capacity);
    let mut skipped_fields = 0;

    for metric in &batch.metrics {
        let (host, tags) = filter.split(&metric.tags);
        let timestamp_millis = metric.timestamp.saturating_mul(1000);

        for (field_name, value) in &metric.fields {
            match classify(value) {
                Ok(value) => records.push(MetricRecord {
                    metric_name: metric.name.clone(),
                    host: host.clone(),
                    field_name: field_name.clone(),
                    tags: tags.clone(),
                    timestamp_millis,
                    value,
                }),
                Err(reason) => {
                    skipped_fields += 1;
                    tracing::trace!(
                        metric = %metric.name,
                        field = %field_name,
                        reason = %reason,
                        "Skipping unsupported field"
                    );
                }
            }
        }
    }

    if skipped_fields > 0 {
        tracing::debug!(
            application_name,
            skipped = skipped_fields,
            "Dropped unsupported fields"
        );
    }

    MetricBatch {
        id: application_name.to_string(),
        records,
        skipped_fields,
    }
}
