//! Response validator: untrusted model text in, [`ValidatedDraft`] out.
//!
//! Validation runs in three steps, stopping at the first failure:
//!
//! 1. parse the raw text as JSON ([`ValidationError::Malformed`] on failure);
//! 2. walk the kind's [`Schema`] in declaration order, checking presence,
//!    primitive type, enumerated values, and array element shapes;
//! 3. apply conditional requirements (video content must carry links).
//!
//! Steps 2 and 3 happen in the same walk, so the reported field is always the
//! first offending one in schema order. Values are never coerced: an enum value
//! outside its set or a negative price is a hard failure. Keys the schema does
//! not mention are dropped, and `null` counts as absent.
//!
//! Validation is pure. The same input always yields the same outcome.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::schema::{schema_for, FieldShape, FieldSpec, Requirement, Schema};
use crate::{ContentKind, MachineryDraft, RawModelResponse, TrainingDraft, ValidatedDraft};

/// Field path reported when the payload itself is not an object.
pub const ROOT_PATH: &str = "$";

/// Why model output was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The text did not parse as JSON.
    #[error("malformed response: {reason}")]
    Malformed { reason: String },

    /// The JSON did not conform to the schema at `field_path`.
    #[error("schema violation at '{field_path}'")]
    SchemaViolation { field_path: String },
}

impl ValidationError {
    fn at(path: &str) -> Self {
        let field_path = if path.is_empty() { ROOT_PATH } else { path };
        ValidationError::SchemaViolation {
            field_path: field_path.to_string(),
        }
    }
}

/// Validates `raw` against the schema registered for `kind`.
pub fn validate(kind: ContentKind, raw: &RawModelResponse) -> Result<ValidatedDraft, ValidationError> {
    let value: Value =
        serde_json::from_str(raw.as_str()).map_err(|e| ValidationError::Malformed {
            reason: e.to_string(),
        })?;
    validate_value(schema_for(kind), value)
}

/// Validates an already-parsed JSON value against `schema`.
pub fn validate_value(schema: &Schema, value: Value) -> Result<ValidatedDraft, ValidationError> {
    let conforming = check_object(&value, schema.fields(), "")?;

    let decoded = match schema.kind() {
        ContentKind::Machinery => {
            serde_json::from_value::<MachineryDraft>(conforming).map(ValidatedDraft::Machinery)
        }
        ContentKind::Training => {
            serde_json::from_value::<TrainingDraft>(conforming).map(ValidatedDraft::Training)
        }
    };

    decoded.map_err(|e| {
        // Only reachable if the schema and the draft structs disagree.
        debug!(kind = %schema.kind(), error = %e, "conforming value failed to decode");
        ValidationError::at(ROOT_PATH)
    })
}

// ---------------------------------------------------------------------------
// Schema walk
// ---------------------------------------------------------------------------

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Checks an object against `fields`, returning a copy holding only the
/// schema's fields with `null`s removed.
fn check_object(value: &Value, fields: &[FieldSpec], path: &str) -> Result<Value, ValidationError> {
    let object = value.as_object().ok_or_else(|| ValidationError::at(path))?;
    let mut conforming = Map::new();

    for field in fields {
        let path = child_path(path, field.name);
        let present = object.get(field.name).filter(|v| !v.is_null());

        let must_be_non_empty = match &field.requirement {
            Requirement::Required => {
                if present.is_none() {
                    return Err(ValidationError::at(&path));
                }
                false
            }
            Requirement::Optional => false,
            Requirement::NonEmptyWhen {
                field: sibling,
                equals,
            } => object.get(*sibling).and_then(Value::as_str) == Some(*equals),
        };

        let Some(present) = present else {
            if must_be_non_empty {
                return Err(ValidationError::at(&path));
            }
            continue;
        };

        let checked = check_shape(present, &field.shape, &path)?;
        if must_be_non_empty && is_empty(&checked) {
            return Err(ValidationError::at(&path));
        }
        conforming.insert(field.name.to_string(), checked);
    }

    Ok(Value::Object(conforming))
}

fn check_shape(value: &Value, shape: &FieldShape, path: &str) -> Result<Value, ValidationError> {
    match shape {
        FieldShape::Text { non_empty } => match value.as_str() {
            Some(s) if !(*non_empty && s.trim().is_empty()) => Ok(value.clone()),
            _ => Err(ValidationError::at(path)),
        },
        FieldShape::Number { minimum } => match value.as_f64() {
            Some(n) if n.is_finite() && minimum.map_or(true, |min| n >= min) => Ok(value.clone()),
            _ => Err(ValidationError::at(path)),
        },
        FieldShape::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(value.clone()),
            _ => Err(ValidationError::at(path)),
        },
        FieldShape::Array(item) => {
            let elements = value.as_array().ok_or_else(|| ValidationError::at(path))?;
            elements
                .iter()
                .enumerate()
                .map(|(i, element)| check_shape(element, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldShape::Object(fields) => check_object(value, fields, path),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Array(a) => a.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
