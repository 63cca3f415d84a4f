//! DuckDB schema definitions
//!
//! Samples are append-only and split by kind. The two catalog tables are
//! keyed so repeated registrations collapse onto one row.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- Infrastructure: Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description VARCHAR
);

-- Integer samples. Column order must match the appender in repositories/metric.rs
CREATE TABLE IF NOT EXISTS system_metric_long (
    application_name    VARCHAR NOT NULL,
    host                VARCHAR NOT NULL,   -- '' when the metric had no host tag
    metric_name         VARCHAR NOT NULL,
    field_name          VARCHAR NOT NULL,
    tags                VARCHAR NOT NULL,   -- JSON object of filtered tags
    event_time          BIGINT NOT NULL,    -- epoch milliseconds
    value               BIGINT NOT NULL
);

-- Floating-point samples, same layout as system_metric_long
CREATE TABLE IF NOT EXISTS system_metric_double (
    application_name    VARCHAR NOT NULL,
    host                VARCHAR NOT NULL,
    metric_name         VARCHAR NOT NULL,
    field_name          VARCHAR NOT NULL,
    tags                VARCHAR NOT NULL,
    event_time          BIGINT NOT NULL,
    value               DOUBLE NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_metric_long_app_time
    ON system_metric_long (application_name, metric_name, event_time);
CREATE INDEX IF NOT EXISTS idx_metric_double_app_time
    ON system_metric_double (application_name, metric_name, event_time);

-- Data-type catalog: LONG or DOUBLE per metric field, last writer wins
CREATE TABLE IF NOT EXISTS metric_data_type (
    metric_name         VARCHAR NOT NULL,
    field_name          VARCHAR NOT NULL,
    data_type           VARCHAR NOT NULL,
    updated_at          BIGINT NOT NULL,
    PRIMARY KEY (metric_name, field_name)
);

-- Tag catalog: distinct tag sets per application/host/metric field
CREATE TABLE IF NOT EXISTS metric_tag (
    application_name    VARCHAR NOT NULL,
    host                VARCHAR NOT NULL,
    metric_name         VARCHAR NOT NULL,
    field_name          VARCHAR NOT NULL,
    tags                VARCHAR NOT NULL,
    first_seen          BIGINT NOT NULL,
    PRIMARY KEY (application_name, host, metric_name, field_name, tags)
);
"#;
