use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub message: String,
}

/// Whatever the backend answered with: JSON when it sent JSON, otherwise
/// the raw text body.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactAck {
    Json(serde_json::Value),
    Text(String),
}

impl ContactAck {
    pub fn message(&self) -> Option<String> {
        match self {
            ContactAck::Json(v) => v
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            ContactAck::Text(t) if t.trim().is_empty() => None,
            ContactAck::Text(t) => Some(t.trim().to_string()),
        }
    }
}
