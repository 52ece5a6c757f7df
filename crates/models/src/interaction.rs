use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timestamp::{millis_opt, Millis};
use crate::{Document, ModelError};

pub const DEFAULT_TYPE: &str = "Note";
pub const DEFAULT_SUBTYPE: &str = "Internal";
pub const DEFAULT_TEAM_MEMBER: &str = "API User";

/// A timeline entry (activity, communication, document or note) for a student.
///
/// `student_id` is a plain reference; nothing checks that the student exists.
/// Stored entries may come from other writers, so absent fields stay absent
/// and unrecognised ones are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub team_member: Option<String>,
    #[serde(default, with = "millis_opt", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Millis>,
    #[serde(default, with = "millis_opt", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Millis>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Interaction {
    pub fn from_document(id: String, data: Document) -> Result<Self, ModelError> {
        crate::decode("interaction", id, data)
    }

    pub fn to_document(&self) -> Result<Document, ModelError> {
        crate::encode("interaction", self)
    }

    /// Sort key for timelines; a missing timestamp counts as zero.
    pub fn sort_key(&self) -> Millis {
        self.timestamp.unwrap_or(0)
    }
}

/// Body of `POST /api/students/{id}/interactions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInteraction {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub team_member: Option<String>,
    #[serde(default, with = "millis_opt")]
    pub timestamp: Option<Millis>,
}

impl NewInteraction {
    /// Apply defaults and attach the owning student. `now` is used when the
    /// caller did not supply a timestamp.
    pub fn into_interaction(self, student_id: &str, now: Millis) -> Result<Interaction, ModelError> {
        let details = required_details(self.details)?;
        Ok(Interaction {
            id: String::new(),
            student_id: student_id.to_string(),
            kind: Some(self.kind.unwrap_or_else(|| DEFAULT_TYPE.to_string())),
            subtype: Some(self.subtype.unwrap_or_else(|| DEFAULT_SUBTYPE.to_string())),
            details: Some(details),
            team_member: Some(self.team_member.unwrap_or_else(|| DEFAULT_TEAM_MEMBER.to_string())),
            timestamp: Some(self.timestamp.unwrap_or(now)),
            ..Default::default()
        })
    }
}

/// Body of `PUT /api/notes/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub team_member: Option<String>,
}

impl NoteUpdate {
    /// Fields merged into the stored note.
    pub fn into_fields(self, now: Millis) -> Result<Document, ModelError> {
        let details = required_details(self.details)?;
        let mut fields = Document::new();
        fields.insert("details".into(), details.into());
        fields.insert(
            "team_member".into(),
            self.team_member.unwrap_or_else(|| DEFAULT_TEAM_MEMBER.to_string()).into(),
        );
        fields.insert("last_updated".into(), now.into());
        Ok(fields)
    }
}

fn required_details(details: Option<String>) -> Result<String, ModelError> {
    match details {
        Some(d) if !d.trim().is_empty() => Ok(d),
        _ => Err(ModelError::MissingField("details")),
    }
}
