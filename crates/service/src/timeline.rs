//! Timeline Service: interaction records tied to a student.

use std::{cmp::Reverse, sync::Arc};

use models::{timestamp::now_millis, Interaction, NewInteraction, NoteUpdate};
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

pub struct TimelineService {
    store: Arc<dyn DocumentStore>,
    interactions: String,
}

/// Newest first; entries without a timestamp sink to the end. Stable, so
/// ties keep store order.
pub fn sort_newest_first(items: &mut [Interaction]) {
    items.sort_by_key(|i| Reverse(i.sort_key()));
}

impl TimelineService {
    pub fn new(store: Arc<dyn DocumentStore>, interactions: impl Into<String>) -> Self {
        Self { store, interactions: interactions.into() }
    }

    /// The student is not looked up; an unknown id simply yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_interactions(&self, student_id: &str) -> Result<Vec<Interaction>, ServiceError> {
        let docs = self
            .store
            .find_eq(&self.interactions, "student_id", &Value::String(student_id.to_string()))
            .await?;
        let mut items = docs
            .into_iter()
            .map(|d| Interaction::from_document(d.id, d.data))
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    /// Log a new interaction. Orphan student ids are accepted.
    #[instrument(skip(self, input))]
    pub async fn add_interaction(&self, student_id: &str, input: NewInteraction) -> Result<Interaction, ServiceError> {
        let mut record = input.into_interaction(student_id, now_millis())?;
        let id = self.store.create(&self.interactions, record.to_document()?).await?;
        record.id = id;
        info!(id = %record.id, %student_id, kind = ?record.kind, "interaction logged");
        Ok(record)
    }

    /// Overwrite details and team member of an existing note. Existence is
    /// not checked up front; a missing note surfaces as the store's error.
    #[instrument(skip(self, input))]
    pub async fn update_interaction(&self, id: &str, input: NoteUpdate) -> Result<(), ServiceError> {
        let fields = input.into_fields(now_millis())?;
        self.store.update(&self.interactions, id, fields).await?;
        info!(%id, "note updated");
        Ok(())
    }

    /// Idempotent: deleting an unknown id succeeds.
    #[instrument(skip(self))]
    pub async fn delete_interaction(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete(&self.interactions, id).await?;
        info!(%id, "note deleted");
        Ok(())
    }
}
