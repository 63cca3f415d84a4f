//! DuckDB repositories
//!
//! Synchronous functions over a borrowed connection. Callers run them on the
//! blocking pool via `DuckdbService::run_query`.

pub mod catalog;
pub mod metric;

use crate::domain::metrics::Tag;

/// Encode a tag sequence as a JSON object (`{"region":"us"}`)
pub(crate) fn tags_json(tags: &[Tag]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = tags
        .iter()
        .map(|t| (t.key.clone(), serde_json::Value::String(t.value.clone())))
        .collect();
    serde_json::Value::Object(map).to_string()
}
