//! Normalized metric records produced from Telegraf batches

use std::fmt;
use std::sync::Arc;

/// A single key/value label attached to a sample
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Data type a field is registered under in the data-type catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricDataType {
    Long,
    Double,
}

impl MetricDataType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricDataType::Long => "LONG",
            MetricDataType::Double => "DOUBLE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LONG" => Some(MetricDataType::Long),
            "DOUBLE" => Some(MetricDataType::Double),
            _ => None,
        }
    }
}

impl fmt::Display for MetricDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    Integer(i64),
    Float(f64),
}

impl SampleValue {
    pub const fn data_type(&self) -> MetricDataType {
        match self {
            SampleValue::Integer(_) => MetricDataType::Long,
            SampleValue::Float(_) => MetricDataType::Double,
        }
    }
}

/// One normalized metric sample.
///
/// Records built from the same Telegraf metric share their tag slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub metric_name: String,
    /// Empty when the source metric carried no `host` tag
    pub host: String,
    pub field_name: String,
    pub tags: Arc<[Tag]>,
    pub timestamp_millis: i64,
    pub value: SampleValue,
}

impl MetricRecord {
    pub fn data_type(&self) -> MetricDataType {
        self.value.data_type()
    }
}

/// Tag-catalog entry: which tag set an application/host/metric field carries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricTag {
    pub application_name: String,
    pub host: String,
    pub metric_name: String,
    pub field_name: String,
    pub tags: Arc<[Tag]>,
}

impl MetricTag {
    pub fn from_record(batch_id: &str, record: &MetricRecord) -> Self {
        Self {
            application_name: batch_id.to_string(),
            host: record.host.clone(),
            metric_name: record.metric_name.clone(),
            field_name: record.field_name.clone(),
            tags: Arc::clone(&record.tags),
        }
    }
}

/// All records converted from one inbound batch
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBatch {
    /// Application name the batch was submitted under
    pub id: String,
    pub records: Vec<MetricRecord>,
    /// Fields dropped because their value was not a supported number
    pub skipped_fields: usize,
}

impl MetricBatch {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
            skipped_fields: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records holding integer samples, with their values
    pub fn integer_samples(&self) -> impl Iterator<Item = (&MetricRecord, i64)> {
        self.records.iter().filter_map(|r| match r.value {
            SampleValue::Integer(v) => Some((r, v)),
            SampleValue::Float(_) => None,
        })
    }

    /// Records holding floating-point samples, with their values
    pub fn float_samples(&self) -> impl Iterator<Item = (&MetricRecord, f64)> {
        self.records.iter().filter_map(|r| match r.value {
            SampleValue::Float(v) => Some((r, v)),
            SampleValue::Integer(_) => None,
        })
    }
}
