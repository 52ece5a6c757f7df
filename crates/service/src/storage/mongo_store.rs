use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document as BsonDocument},
    Client, Collection, Database,
};
use tracing::info;

use super::{new_id, Document, DocumentStore, StoreError, StoredDocument};

/// MongoDB-backed document store. Ids are stored as string `_id` values.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await.map_err(StoreError::backend)?;
        let db = client.database(database);
        info!(%database, "connected to mongodb");
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection::<BsonDocument>(name)
    }
}

fn to_bson(data: Document) -> Result<BsonDocument, StoreError> {
    bson::to_document(&data).map_err(StoreError::backend)
}

fn from_bson(collection: &str, mut raw: BsonDocument) -> Result<StoredDocument, StoreError> {
    let id = match raw.remove("_id") {
        Some(Bson::String(s)) => s,
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => {
            return Err(StoreError::Corrupt {
                collection: collection.to_string(),
                reason: "document without _id".into(),
            })
        }
    };
    match Bson::Document(raw).into_relaxed_extjson() {
        serde_json::Value::Object(data) => Ok(StoredDocument { id, data }),
        other => Err(StoreError::Corrupt {
            collection: collection.to_string(),
            reason: format!("expected a document, got {other}"),
        }),
    }
}

fn by_id(id: &str) -> BsonDocument {
    doc! { "_id": id }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let cursor = self.collection(collection).find(None, None).await.map_err(StoreError::backend)?;
        let raw: Vec<BsonDocument> = cursor.try_collect().await.map_err(StoreError::backend)?;
        raw.into_iter().map(|d| from_bson(collection, d)).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let found = self
            .collection(collection)
            .find_one(by_id(id), None)
            .await
            .map_err(StoreError::backend)?;
        found.map(|d| from_bson(collection, d)).transpose()
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let mut filter = BsonDocument::new();
        filter.insert(field, bson::to_bson(value).map_err(StoreError::backend)?);
        let cursor = self.collection(collection).find(filter, None).await.map_err(StoreError::backend)?;
        let raw: Vec<BsonDocument> = cursor.try_collect().await.map_err(StoreError::backend)?;
        raw.into_iter().map(|d| from_bson(collection, d)).collect()
    }

    async fn create(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = new_id();
        let mut raw = to_bson(data)?;
        raw.insert("_id", id.clone());
        self.collection(collection).insert_one(raw, None).await.map_err(StoreError::backend)?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let set = to_bson(fields)?;
        let result = self
            .collection(collection)
            .update_one(by_id(id), doc! { "$set": set }, None)
            .await
            .map_err(StoreError::backend)?;
        if result.matched_count == 0 {
            return Err(StoreError::Missing { collection: collection.to_string(), id: id.to_string() });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.collection(collection).delete_one(by_id(id), None).await.map_err(StoreError::backend)?;
        Ok(())
    }

    async fn probe(&self, collection: &str) -> Result<bool, StoreError> {
        let first = self.collection(collection).find_one(None, None).await.map_err(StoreError::backend)?;
        Ok(first.is_some())
    }

    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        let result = self
            .collection(collection)
            .delete_many(doc! {}, None)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.deleted_count as usize)
    }
}
