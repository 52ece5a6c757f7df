#![cfg(test)]
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use models::Document;

use crate::storage::{DocumentStore, JsonFileStore};

/// Unique scratch directory per test, removed on drop.
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new() -> Self {
        Self(std::env::temp_dir().join(format!("dashboard_store_{}", uuid::Uuid::new_v4())))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A file store in its own directory; keep the guard alive for the test.
pub async fn temp_store() -> (Arc<dyn DocumentStore>, TempDir) {
    let dir = TempDir::new();
    let store = JsonFileStore::new(dir.path()).await.expect("store init");
    (Arc::new(store), dir)
}
