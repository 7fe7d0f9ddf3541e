use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validation::Field;

// -- Messages --

/// Body of `POST /api/messages`.
///
/// Every field is optional on the wire: a missing key is reported as a
/// validation failure rather than a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessageRequest {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitMessageRequest {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            phone: Some(phone.into()),
            message: Some(message.into()),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Message => self.message.as_deref(),
        }
    }
}

/// Strings pass through, scalars are coerced to their text form, anything
/// else (null, arrays, objects) counts as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// 201 body of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessageResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
}

/// One rejected field, as reported in a 400 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorEntry {
    pub param: String,
    pub msg: String,
    #[serde(default = "body_location")]
    pub location: String,
}

fn body_location() -> String {
    "body".to_string()
}

impl FieldErrorEntry {
    pub fn new(field: Field, msg: impl Into<String>) -> Self {
        Self {
            param: field.as_str().to_string(),
            msg: msg.into(),
            location: body_location(),
        }
    }
}

/// 400 body listing every rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub errors: Vec<FieldErrorEntry>,
}

/// Generic failure body (`404`, `500`, malformed requests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// -- Health --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
