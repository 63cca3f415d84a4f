//! DuckDB metric repository using Appender API
//!
//! Integer samples go to `system_metric_long`, floating-point samples to
//! `system_metric_double`. Both tables are written in one transaction.

use duckdb::Connection;
use duckdb::params;

use super::tags_json;
use crate::data::duckdb::{DuckdbError, in_transaction};
use crate::domain::metrics::MetricBatch;

pub fn insert_batch(conn: &Connection, batch: &MetricBatch) -> Result<(), DuckdbError> {
    if batch.is_empty() {
        return Ok(());
    }

    in_transaction(conn, |conn| {
        insert_long(conn, batch)?;
        insert_double(conn, batch)?;
        Ok(())
    })
}

fn insert_long(conn: &Connection, batch: &MetricBatch) -> Result<(), DuckdbError> {
    let mut samples = batch.integer_samples().peekable();
    if samples.peek().is_none() {
        return Ok(());
    }

    let mut appender = conn.appender("system_metric_long")?;
    for (r, value) in samples {
        // Column order must match schema.rs CREATE TABLE definition
        appender.append_row(params![
            batch.id.as_str(),
            r.host.as_str(),
            r.metric_name.as_str(),
            r.field_name.as_str(),
            tags_json(&r.tags),
            r.timestamp_millis,
            value,
        ])?;
    }
    appender.flush()?;
    Ok(())
}

fn insert_double(conn: &Connection, batch: &MetricBatch) -> Result<(), DuckdbError> {
    let mut samples = batch.float_samples().peekable();
    if samples.peek().is_none() {
        return Ok(());
    }

    let mut appender = conn.appender("system_metric_double")?;
    for (r, value) in samples {
        appender.append_row(params![
            batch.id.as_str(),
            r.host.as_str(),
            r.metric_name.as_str(),
            r.field_name.as_str(),
            tags_json(&r.tags),
            r.timestamp_millis,
            value,
        ])?;
    }
    appender.flush()?;
    Ok(())
}
