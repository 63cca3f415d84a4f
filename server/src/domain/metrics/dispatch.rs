//! Numeric classification of Telegraf field values

use serde_json::Value;
use thiserror::Error;

use super::model::SampleValue;

/// Field value that cannot become a sample
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnsupportedField {
    #[error("integer {0} does not fit in a signed 64-bit value")]
    OutOfRange(String),

    #[error("{0} value is not numeric")]
    NotNumeric(&'static str),
}

/// Classify a field value as an integer or floating-point sample.
///
/// Numbers keep their literal text, so a literal without a fraction or
/// exponent is always an integer. Integers of any width beyond i64 are
/// rejected, never widened to a float.
pub fn classify(value: &Value) -> Result<SampleValue, UnsupportedField> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SampleValue::Integer(i))
            } else if is_integer_literal(n.as_str()) {
                Err(UnsupportedField::OutOfRange(n.as_str().to_string()))
            } else if let Some(f) = n.as_f64() {
                Ok(SampleValue::Float(f))
            } else {
                Err(UnsupportedField::NotNumeric("number"))
            }
        }
        Value::String(_) => Err(UnsupportedField::NotNumeric("string")),
        Value::Bool(_) => Err(UnsupportedField::NotNumeric("boolean")),
        Value::Null => Err(UnsupportedField::NotNumeric("null")),
        Value::Array(_) => Err(UnsupportedField::NotNumeric("array")),
        Value::Object(_) => Err(UnsupportedField::NotNumeric("object")),
    }
}

fn is_integer_literal(literal: &str) -> bool {
    !literal.contains(['.', 'e', 'E'])
}
