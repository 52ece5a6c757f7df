use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::timestamp::{millis_opt, Millis};
use crate::{Document, ModelError};

/// Application-readiness signals kept alongside a student profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_uploaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities_added_count: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A directory record for one advisee.
///
/// Records are written by the seeding tool or by other systems sharing the
/// store, so every profile field tolerates being absent or null and unknown
/// fields are carried through untouched in `extra`. Numeric fields keep the
/// stored [`Number`] so `650` and `650.0` both read back as written. Absent
/// fields are left out of the serialized record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_e: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_m: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_status: Option<String>,
    #[serde(default, with = "millis_opt", skip_serializing_if = "Option::is_none")]
    pub last_active_timestamp: Option<Millis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colleges_selected_count: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_questions_asked: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_intent_score: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_essay_help: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    pub fn from_document(id: String, data: Document) -> Result<Self, ModelError> {
        crate::decode("student", id, data)
    }

    /// Body to store; the id is assigned by the store.
    pub fn to_document(&self) -> Result<Document, ModelError> {
        crate::encode("student", self)
    }

    /// Directory listings never expose the progress summary.
    pub fn without_progress(mut self) -> Self {
        self.progress = None;
        self
    }
}
