//! Document shapes shared by the service and HTTP layers.
//!
//! Records are stored as schemaless JSON documents keyed by a generated id;
//! these types give them a typed view while preserving fields they do not
//! know about.

pub mod errors;
pub mod interaction;
pub mod student;
pub mod timestamp;

pub use errors::ModelError;
pub use interaction::{Interaction, NewInteraction, NoteUpdate};
pub use student::{Progress, Student};

/// A stored document body, without its id.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub(crate) fn decode<T>(kind: &'static str, id: String, mut data: Document) -> Result<T, ModelError>
where
    T: serde::de::DeserializeOwned,
{
    // the id lives outside the stored body
    data.insert("id".into(), serde_json::Value::String(id.clone()));
    serde_json::from_value(serde_json::Value::Object(data))
        .map_err(|e| ModelError::Malformed { kind, id, reason: e.to_string() })
}

pub(crate) fn encode<T>(kind: &'static str, value: &T) -> Result<Document, ModelError>
where
    T: serde::Serialize,
{
    match serde_json::to_value(value).map_err(|source| ModelError::Encode { kind, source })? {
        serde_json::Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(ModelError::Malformed {
            kind,
            id: String::new(),
            reason: format!("expected an object, got {other}"),
        }),
    }
}
