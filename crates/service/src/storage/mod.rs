//! Document storage abstraction.
//!
//! The services only need collection-scoped CRUD plus an equality filter, so
//! that is all the trait exposes. Backends are picked at startup from
//! `configs::StorageConfig`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use configs::{StorageBackend, StorageConfig};
pub use models::Document;

pub mod json_file_store;
#[cfg(feature = "mongo")]
pub mod mongo_store;

pub use json_file_store::JsonFileStore;
#[cfg(feature = "mongo")]
pub use mongo_store::MongoStore;

/// A document together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("corrupt collection {collection}: {reason}")]
    Corrupt { collection: String, reason: String },
    #[error("no document with id {id} in {collection}")]
    Missing { collection: String, id: String },
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Trait abstraction for the document database.
/// Implementations can be file-backed or a remote database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;
    /// Documents whose top-level `field` equals `value`.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<StoredDocument>, StoreError>;
    /// Insert under a freshly generated id and return it.
    async fn create(&self, collection: &str, data: Document) -> Result<String, StoreError>;
    /// Merge `fields` into an existing document. Fails with `Missing` when absent.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;
    /// Remove a document; removing an unknown id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
    /// Whether the collection holds at least one document.
    async fn probe(&self, collection: &str) -> Result<bool, StoreError>;
    /// Remove every document in a collection, returning how many were removed.
    async fn clear(&self, collection: &str) -> Result<usize, StoreError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Open the backend selected by configuration.
pub async fn open_store(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match cfg.backend {
        StorageBackend::File => {
            let store = JsonFileStore::new(&cfg.data_dir).await?;
            info!(backend = "file", data_dir = %cfg.data_dir, "document store ready");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mongo")]
        StorageBackend::Mongo => {
            let store = MongoStore::connect(&cfg.mongo_uri, &cfg.database).await?;
            info!(backend = "mongo", database = %cfg.database, "document store ready");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongo"))]
        StorageBackend::Mongo => Err(anyhow::anyhow!(
            "storage.backend = \"mongo\" requires building with the `mongo` feature"
        )),
    }
}
