//! Envelope Validator: checks an extracted object against the response schema.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "outcome": {"status": "success", "code": "OK", "violation_category": null},
//!   "data": {"rewritten_text": "...", "detected_language": "it"}
//! }
//! ```
//!
//! `status` and `code` are open strings: template revisions disagree on their vocabulary,
//! so nothing is rejected for an unexpected value. No cross-field rules are enforced.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validated response returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub outcome: Outcome,
    pub data: Option<EnvelopeData>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: String,
    pub code: String,
    #[serde(default)]
    pub violation_category: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeData {
    #[serde(default)]
    pub rewritten_text: Option<String>,
    #[serde(default)]
    pub detected_language: Option<String>,
}

/// Coarse classification of [`Outcome::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Refusal,
    InvalidInput,
    Other,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self.status.trim().to_ascii_lowercase().as_str() {
            "success" | "ok" => OutcomeKind::Success,
            "refusal" | "refused" => OutcomeKind::Refusal,
            "invalid_input" | "invalid" => OutcomeKind::InvalidInput,
            _ => OutcomeKind::Other,
        }
    }
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        self.outcome.kind() == OutcomeKind::Success
    }

    pub fn rewritten_text(&self) -> Option<&str> {
        self.data.as_ref()?.rewritten_text.as_deref()
    }

    pub fn detected_language(&self) -> Option<&str> {
        self.data.as_ref()?.detected_language.as_deref()
    }
}

/// Schema violation at a dotted path, e.g. `outcome.code`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {problem}")]
pub struct SchemaError {
    pub path: String,
    pub problem: Problem,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Problem {
    Missing,
    /// Expected type, and the JSON type actually found.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => f.write_str("required field is missing"),
            Problem::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(path: &str, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError {
        path: path.to_string(),
        problem: Problem::WrongType {
            expected,
            found: type_name(found),
        },
    }
}

fn required_string(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<String, SchemaError> {
    let path = format!("{}.{}", parent, key);
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(wrong_type(&path, "string", other)),
        None => Err(SchemaError {
            path,
            problem: Problem::Missing,
        }),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<Option<String>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(
            &format!("{}.{}", parent, key),
            "string or null",
            other,
        )),
    }
}

/// Validates `obj` and converts it into a [`ResponseEnvelope`].
pub fn validate(obj: &Map<String, Value>) -> Result<ResponseEnvelope, SchemaError> {
    let outcome = match obj.get("outcome") {
        Some(Value::Object(o)) => o,
        Some(other) => return Err(wrong_type("outcome", "object", other)),
        None => {
            return Err(SchemaError {
                path: "outcome".into(),
                problem: Problem::Missing,
            })
        }
    };
    let outcome = Outcome {
        status: required_string(outcome, "outcome", "status")?,
        code: required_string(outcome, "outcome", "code")?,
        violation_category: optional_string(outcome, "outcome", "violation_category")?,
    };

    let data = match obj.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(d)) => Some(EnvelopeData {
            rewritten_text: optional_string(d, "data", "rewritten_text")?,
            detected_language: optional_string(d, "data", "detected_language")?,
        }),
        Some(other) => return Err(wrong_type("data", "object or null", other)),
    };

    Ok(ResponseEnvelope { outcome, data })
}
