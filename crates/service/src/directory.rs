//! Directory Service: read-only access to student records.

use std::sync::Arc;

use models::Student;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

pub struct DirectoryService {
    store: Arc<dyn DocumentStore>,
    students: String,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DocumentStore>, students: impl Into<String>) -> Self {
        Self { store, students: students.into() }
    }

    /// Every student, without the progress summary. No ordering is applied
    /// beyond whatever the store returns.
    #[instrument(skip(self))]
    pub async fn list_students(&self) -> Result<Vec<Student>, ServiceError> {
        let docs = self.store.list(&self.students).await?;
        let students = docs
            .into_iter()
            .map(|d| Student::from_document(d.id, d.data).map(Student::without_progress))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    #[instrument(skip(self))]
    pub async fn get_student(&self, id: &str) -> Result<Student, ServiceError> {
        let doc = self
            .store
            .get(&self.students, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        Ok(Student::from_document(doc.id, doc.data)?)
    }

    /// Limit-1 read used by the health check.
    pub async fn has_students(&self) -> Result<bool, ServiceError> {
        Ok(self.store.probe(&self.students).await?)
    }
}
