use models::ModelError;
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self { Self::Storage(e.to_string()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::MissingField(_) => Self::Validation(e.to_string()),
            // a stored document we cannot read is a storage-side fault
            ModelError::Malformed { .. } | ModelError::Encode { .. } => Self::Storage(e.to_string()),
        }
    }
}
