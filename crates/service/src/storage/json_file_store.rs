use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    path::PathBuf,
};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use super::{new_id, Document, DocumentStore, StoreError, StoredDocument};

type Collection = BTreeMap<String, Document>;

/// JSON file-backed document store.
///
/// Each collection lives in `<root>/<collection>.json` as an `{id: document}`
/// object. Collections are loaded on first use, kept in memory and rewritten
/// on every mutation. Writers are serialised by the lock, so concurrent
/// edits to the same document resolve last-write-wins.
pub struct JsonFileStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, Collection>>,
}

impl JsonFileStore {
    /// Initialize the store rooted at a directory, creating it if missing.
    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Self, StoreError> {
        let root = root.into();
        if fs::metadata(&root).await.is_err() {
            info!(data_dir = %root.display(), "data directory not found; creating it");
        }
        fs::create_dir_all(&root).await?;
        Ok(Self { root, collections: RwLock::new(HashMap::new()) })
    }

    fn file_for(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> Result<Collection, StoreError> {
        match fs::read(self.file_for(collection)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                collection: collection.to_string(),
                reason: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collection::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, collection: &str, docs: &Collection) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(docs)?;
        fs::write(self.file_for(collection), data).await?;
        debug!(%collection, count = docs.len(), "collection persisted");
        Ok(())
    }

    async fn loaded<'a>(
        &self,
        map: &'a mut HashMap<String, Collection>,
        collection: &str,
    ) -> Result<&'a mut Collection, StoreError> {
        match map.entry(collection.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let docs = self.load(collection).await?;
                Ok(e.insert(docs))
            }
        }
    }

    async fn read<R>(&self, collection: &str, f: impl FnOnce(&Collection) -> R) -> Result<R, StoreError> {
        {
            let map = self.collections.read().await;
            if let Some(docs) = map.get(collection) {
                return Ok(f(docs));
            }
        }
        let mut map = self.collections.write().await;
        let docs = self.loaded(&mut map, collection).await?;
        Ok(f(&*docs))
    }

    /// Apply a mutation to one collection and persist it.
    ///
    /// The mutation runs on a copy; the cached collection is only replaced
    /// once the file has been written, so a failed save leaves memory and
    /// disk in agreement.
    async fn write<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Collection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut map = self.collections.write().await;
        let docs = self.loaded(&mut map, collection).await?;
        let mut next = docs.clone();
        let out = f(&mut next)?;
        self.save(collection, &next).await?;
        *docs = next;
        Ok(out)
    }
}

fn stored(id: &str, data: &Document) -> StoredDocument {
    StoredDocument { id: id.to_string(), data: data.clone() }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.read(collection, |docs| docs.iter().map(|(id, d)| stored(id, d)).collect())
            .await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.read(collection, |docs| docs.get(id).map(|d| stored(id, d))).await
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.read(collection, |docs| {
            docs.iter()
                .filter(|(_, d)| d.get(field) == Some(value))
                .map(|(id, d)| stored(id, d))
                .collect()
        })
        .await
    }

    async fn create(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = new_id();
        let key = id.clone();
        self.write(collection, move |docs| {
            docs.insert(key, data);
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            let doc = docs.get_mut(id).ok_or_else(|| StoreError::Missing {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
            doc.extend(fields);
            Ok(())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            docs.remove(id);
            Ok(())
        })
        .await
    }

    async fn probe(&self, collection: &str) -> Result<bool, StoreError> {
        self.read(collection, |docs| !docs.is_empty()).await
    }

    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        self.write(collection, |docs| {
            let removed = docs.len();
            docs.clear();
            Ok(removed)
        })
        .await
    }
}
