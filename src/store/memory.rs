//! In-process document store with the same observable semantics as the PostgreSQL store.

use crate::error::AppError;
use crate::id::DocumentId;
use crate::store::{with_id, Document, DocumentStore, UpdateOutcome, ID_KEY};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = HashMap<String, Vec<(String, Document)>>;

/// Collections keep insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, AppError> {
        self.collections
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, AppError> {
        self.collections
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<DocumentId, AppError> {
        let id = DocumentId::new();
        doc.remove(ID_KEY);
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push((id.as_str().to_string(), doc));
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|(k, _)| k == id))
            .map(|(k, doc)| with_id(k, doc.clone())))
    }

    async fn find(&self, collection: &str, limit: u32) -> Result<Vec<Document>, AppError> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .take(limit as usize)
                    .map(|(k, doc)| with_id(k, doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(&self, collection: &str, id: &str, set: Document) -> Result<UpdateOutcome, AppError> {
        let mut guard = self.write()?;
        let Some(doc) = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(k, _)| k == id))
            .map(|(_, doc)| doc)
        else {
            return Ok(UpdateOutcome::default());
        };
        let mut modified = 0;
        for (key, value) in set {
            if key == ID_KEY {
                continue;
            }
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = 1;
            }
        }
        Ok(UpdateOutcome { matched: 1, modified })
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, AppError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|(k, _)| k == id) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        match v {
            serde_json::Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn insert_then_find_adds_id() {
        let store = MemoryDocumentStore::new();
        let id = store.insert_one("images", doc(json!({ "path": "a.png" }))).await.unwrap();
        let found = store.find_one("images", id.as_str()).await.unwrap().unwrap();
        assert_eq!(found["_id"], id.as_str());
        assert_eq!(found["path"], "a.png");
        assert!(store.find_one("texts", id.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_respects_limit_and_order() {
        let store = MemoryDocumentStore::new();
        for i in 0..5 {
            store.insert_one("texts", doc(json!({ "text": i }))).await.unwrap();
        }
        let docs = store.find("texts", 3).await.unwrap();
        let texts: Vec<_> = docs.iter().map(|d| d["text"].clone()).collect();
        assert_eq!(texts, vec![json!(0), json!(1), json!(2)]);
        assert!(store.find("graphs", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_counts_matched_and_modified() {
        let store = MemoryDocumentStore::new();
        let id = store.insert_one("users", doc(json!({ "name": "Jane" }))).await.unwrap();

        let same = store.update_one("users", id.as_str(), doc(json!({ "name": "Jane" }))).await.unwrap();
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0 });

        let changed = store.update_one("users", id.as_str(), doc(json!({ "name": "Jane2" }))).await.unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let missing = store.update_one("users", "nope", doc(json!({ "name": "x" }))).await.unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn delete_once() {
        let store = MemoryDocumentStore::new();
        let id = store.insert_one("graphs", doc(json!({ "graph": "g" }))).await.unwrap();
        assert_eq!(store.delete_one("graphs", id.as_str()).await.unwrap(), 1);
        assert_eq!(store.delete_one("graphs", id.as_str()).await.unwrap(), 0);
        assert_eq!(store.delete_one("summaries", id.as_str()).await.unwrap(), 0);
    }
}
