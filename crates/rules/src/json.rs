//! Bridge from `serde_json::Value`
//!
//! Decoded JSON maps onto [`Value`] one-to-one except for two shapes the
//! engine does not model: `null`, and unsigned integers above `i64::MAX`.
//! Both are rejected with [`ValidationError::Unsupported`] rather than
//! guessed at.
//!
//! # Examples
//!
//! ```
//! use nebula_rules::{int_rule, map_rule, string_rule, Kind, Validate};
//! use serde_json::json;
//!
//! let rule = map_rule()
//!     .required("name", string_rule(Kind::String).non_empty())
//!     .required("age", int_rule(Kind::Int).gte(0));
//!
//! assert!(rule.apply_json(&json!({"name": "Ada", "age": 36})).is_ok());
//! assert!(rule.apply_json(&json!({"name": "Ada", "age": -1})).is_err());
//! assert!(rule.apply_json(&json!({"name": null, "age": 1})).is_err());
//! ```

use std::borrow::Cow;

use crate::error::ValidationError;
use crate::value::Value;

impl TryFrom<&serde_json::Value> for Value {
    type Error = ValidationError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => return Err(unsupported("null")),
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    return Err(unsupported("u64"));
                } else {
                    Value::Float(n.as_f64().ok_or_else(|| unsupported("number"))?)
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Sequence(
                items
                    .iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Value::try_from(v)?)))
                    .collect::<Result<_, ValidationError>>()?,
            ),
        })
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValidationError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Value::try_from(&json)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            // Non-finite floats have no JSON form.
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s),
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Sequence(items) => serde_json::Value::Array(
                items.into_iter().map(serde_json::Value::from).collect(),
            ),
        }
    }
}

fn unsupported(found: &'static str) -> ValidationError {
    ValidationError::Unsupported {
        found: Cow::Borrowed(found),
    }
}

// ============================================================================
// TESTS
// ============================================================================
