//! Telegraf JSON batch payload and its validation rules
//!
//! Telegraf's JSON serializer in batch mode emits:
//!
//! ```json
//! {"metrics":[{"name":"cpu","tags":{"host":"h1"},"fields":{"usage":42},"timestamp":1700000000}]}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::error::FieldError;

/// Maximum length of an application name
pub const MAX_APPLICATION_NAME_LENGTH: usize = 255;

/// Largest timestamp (seconds) whose millisecond value still fits in an i64
pub const MAX_TIMESTAMP_SECS: i64 = i64::MAX / 1000;

/// A batch of metrics submitted by one application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TelegrafBatch {
    #[serde(default)]
    #[validate(nested)]
    pub metrics: Vec<TelegrafMetric>,
}

/// One metric entry: a name, its tags, and one or more fields sampled at `timestamp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TelegrafMetric {
    #[validate(length(min = 1, max = 256, message = "Metric name must be 1-256 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tag_keys"))]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,

    /// Seconds since the Unix epoch
    #[validate(range(
        min = 0,
        max = 9_223_372_036_854_775_i64,
        message = "Timestamp must be a non-negative number of seconds"
    ))]
    pub timestamp: i64,
}

fn validate_tag_keys(tags: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    if tags.keys().any(|k| k.is_empty()) {
        return Err(ValidationError::new("tag_key_empty")
            .with_message("Tag keys must not be empty".into()));
    }
    Ok(())
}

/// Validate application name: 1-255 chars, alphanumeric + dot/dash/underscore
pub fn is_valid_application_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_APPLICATION_NAME_LENGTH
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Validate the application name and payload, collecting every problem found.
///
/// Errors are sorted by field path so responses are stable.
pub fn validate_batch(application_name: &str, batch: &TelegrafBatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !is_valid_application_name(application_name) {
        errors.push(FieldError::new(
            "application_name",
            "invalid_application_name",
            "Application-Name must be 1-255 characters of letters, digits, '.', '-' or '_'",
        ));
    }

    if let Err(e) = batch.validate() {
        flatten_errors("", &e, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(errors)
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: validation failed", path));
                    out.push(FieldError::new(path.clone(), e.code.to_string(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str, timestamp: i64) -> TelegrafMetric {
        TelegrafMetric {
            name: name.to_string(),
            tags: BTreeMap::new(),
            fields: serde_json::Map::new(),
            timestamp,
        }
    }

    #[test]
    fn test_parse_telegraf_batch() {
        let json = r#"{
            "metrics": [
                {
                    "name": "cpu",
                    "tags": { "host": "h1", "region": "us" },
                    "fields": { "usage": 42, "idle": 57.5 },
                    "timestamp": 1000
                }
            ]
        }"#;
        let batch: TelegrafBatch = serde_json::from_str(json).unwrap();

        assert_eq!(batch.metrics.len(), 1);
        let m = &batch.metrics[0];
        assert_eq!(m.name, "cpu");
        assert_eq!(m.tags.get("host").map(String::as_str), Some("h1"));
        assert_eq!(m.timestamp, 1000);
        let keys: Vec<_> = m.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["usage", "idle"]);
    }

    #[test]
    fn test_parse_missing_tags_and_fields() {
        let json = r#"{ "metrics": [ { "name": "mem", "timestamp": 5 } ] }"#;
        let batch: TelegrafBatch = serde_json::from_str(json).unwrap();
        assert!(batch.metrics[0].tags.is_empty());
        assert!(batch.metrics[0].fields.is_empty());
    }

    #[test]
    fn test_parse_empty_object() {
        let batch: TelegrafBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.metrics.is_empty());
    }

    #[test]
    fn test_application_name_rules() {
        assert!(is_valid_application_name("billing-api"));
        assert!(is_valid_application_name("svc.v2_blue"));
        assert!(!is_valid_application_name(""));
        assert!(!is_valid_application_name("has space"));
        assert!(!is_valid_application_name(&"a".repeat(256)));
        assert!(is_valid_application_name(&"a".repeat(255)));
    }

    #[test]
    fn test_validate_batch_ok() {
        let batch = TelegrafBatch {
            metrics: vec![metric("cpu", 0), metric("mem", MAX_TIMESTAMP_SECS)],
        };
        assert!(validate_batch("app", &batch).is_ok());
    }

    #[test]
    fn test_validate_batch_collects_all_errors() {
        let mut bad_tags = metric("disk", 10);
        bad_tags.tags.insert(String::new(), "x".to_string());

        let batch = TelegrafBatch {
            metrics: vec![metric("", 10), metric("cpu", -1), bad_tags],
        };
        let errors = validate_batch("", &batch).unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "application_name",
                "metrics[0].name",
                "metrics[1].timestamp",
                "metrics[2].tags",
            ]
        );
        assert_eq!(errors[3].code, "tag_key_empty");
        assert_eq!(errors[3].message, "Tag keys must not be empty");
    }

    #[test]
    fn test_validate_timestamp_overflow_rejected() {
        let batch = TelegrafBatch {
            metrics: vec![metric("cpu", MAX_TIMESTAMP_SECS + 1)],
        };
        let errors = validate_batch("app", &batch).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "metrics[0].timestamp");
    }
}
