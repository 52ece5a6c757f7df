use serde::{Deserialize, Serialize};

/// Body of the root health endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Health {
    pub fn ok(message: impl Into<String>, status: impl Into<String>) -> Self {
        Self { message: message.into(), status: Some(status.into()) }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None }
    }
}

/// `{id, message}` acknowledgement returned by note edits and deletes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub id: String,
    pub message: String,
}

impl MessageResponse {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { id: id.into(), message: message.into() }
    }
}
