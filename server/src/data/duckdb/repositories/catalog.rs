//! DuckDB data-type and tag catalogs

use duckdb::{Connection, OptionalExt, params};

use super::tags_json;
use crate::data::duckdb::DuckdbError;
use crate::domain::metrics::{MetricDataType, MetricTag};

/// Record the data type of a metric field, overwriting any previous kind
pub fn upsert_data_type(
    conn: &Connection,
    metric_name: &str,
    field_name: &str,
    data_type: MetricDataType,
) -> Result<(), DuckdbError> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO metric_data_type (metric_name, field_name, data_type, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (metric_name, field_name)
         DO UPDATE SET data_type = EXCLUDED.data_type, updated_at = EXCLUDED.updated_at",
        params![metric_name, field_name, data_type.as_str(), now],
    )?;
    Ok(())
}

pub fn get_data_type(
    conn: &Connection,
    metric_name: &str,
    field_name: &str,
) -> Result<Option<MetricDataType>, DuckdbError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT data_type FROM metric_data_type WHERE metric_name = ? AND field_name = ?",
            params![metric_name, field_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw.as_deref().and_then(MetricDataType::parse))
}

/// Record a tag-catalog entry. Existing entries are left untouched.
pub fn insert_tag(conn: &Connection, entry: &MetricTag) -> Result<(), DuckdbError> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO metric_tag (application_name, host, metric_name, field_name, tags, first_seen)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT DO NOTHING",
        params![
            entry.application_name.as_str(),
            entry.host.as_str(),
            entry.metric_name.as_str(),
            entry.field_name.as_str(),
            tags_json(&entry.tags),
            now,
        ],
    )?;
    Ok(())
}

/// Distinct tag sets registered for one application's metric
pub fn list_tags(
    conn: &Connection,
    application_name: &str,
    metric_name: &str,
) -> Result<Vec<String>, DuckdbError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT tags FROM metric_tag
         WHERE application_name = ? AND metric_name = ?
         ORDER BY tags",
    )?;
    let rows = stmt
        .query_map(params![application_name, metric_name], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(rows)
}
