use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Missing required '{0}' field.")]
    MissingField(&'static str),
    #[error("malformed {kind} document {id}: {reason}")]
    Malformed { kind: &'static str, id: String, reason: String },
    #[error("cannot encode {kind} document: {source}")]
    Encode { kind: &'static str, #[source] source: serde_json::Error },
}
