//! Generic CRUD over any configured collection.
//!
//! Mutations never answer from the store acknowledgement: create and update re-fetch the
//! record so the response reflects what the store committed.

use crate::config::ResolvedCollection;
use crate::error::AppError;
use crate::service::secret::{hash_secret_fields, strip_secrets};
use crate::store::{Document, DocumentStore};
use serde_json::Value;

pub struct CrudService;

impl CrudService {
    /// Insert, re-fetch, then inline each linked record. A dangling or absent reference inlines `null`.
    /// If the new record is gone before the re-fetch (concurrent delete), the body is `null`.
    pub async fn create(
        store: &dyn DocumentStore,
        collection: &ResolvedCollection,
        doc: Document,
    ) -> Result<Value, AppError> {
        let doc = hash_secret_fields(doc, collection).await?;
        let id = store.insert_one(&collection.name, doc).await?;
        tracing::info!(collection = %collection.name, id = %id, "created");

        let Some(created) = store.find_one(&collection.name, id.as_str()).await? else {
            tracing::warn!(collection = %collection.name, id = %id, "record missing on re-fetch after insert");
            return Ok(Value::Null);
        };
        let mut created = public_view(created, collection);

        for link in &collection.links {
            let linked = match created.get(&link.field).and_then(Value::as_str) {
                Some(ref_id) => store
                    .find_one(&link.collection, ref_id)
                    .await?
                    .map(|d| Value::Object(strip_secrets(d, link.secret_fields.iter().map(String::as_str)))),
                None => None,
            };
            created.insert(link.embed_as.clone(), linked.unwrap_or(Value::Null));
        }
        Ok(Value::Object(created))
    }

    /// All records up to `limit`, in store order.
    pub async fn list(
        store: &dyn DocumentStore,
        collection: &ResolvedCollection,
        limit: u32,
    ) -> Result<Vec<Value>, AppError> {
        let docs = store.find(&collection.name, limit).await?;
        Ok(docs
            .into_iter()
            .map(|d| Value::Object(public_view(d, collection)))
            .collect())
    }

    pub async fn read(
        store: &dyn DocumentStore,
        collection: &ResolvedCollection,
        id: &str,
    ) -> Result<Value, AppError> {
        store
            .find_one(&collection.name, id)
            .await?
            .map(|d| Value::Object(public_view(d, collection)))
            .ok_or_else(|| AppError::not_found(&collection.name, id))
    }

    /// Merge the set fields (if any), then return whatever is stored now.
    /// An empty `set`, or one equal to the stored values, still returns the current record.
    pub async fn update(
        store: &dyn DocumentStore,
        collection: &ResolvedCollection,
        id: &str,
        set: Document,
    ) -> Result<Value, AppError> {
        if !set.is_empty() {
            let set = hash_secret_fields(set, collection).await?;
            let outcome = store.update_one(&collection.name, id, set).await?;
            tracing::debug!(
                collection = %collection.name,
                id,
                matched = outcome.matched,
                modified = outcome.modified,
                "update"
            );
            if outcome.modified == 1 {
                if let Some(updated) = store.find_one(&collection.name, id).await? {
                    return Ok(Value::Object(public_view(updated, collection)));
                }
            }
        }
        Self::read(store, collection, id).await
    }

    /// Remove the record; NotFound unless exactly one document was deleted.
    pub async fn delete(
        store: &dyn DocumentStore,
        collection: &ResolvedCollection,
        id: &str,
    ) -> Result<(), AppError> {
        let deleted = store.delete_one(&collection.name, id).await?;
        if deleted == 1 {
            tracing::info!(collection = %collection.name, id, "deleted");
            Ok(())
        } else {
            Err(AppError::not_found(&collection.name, id))
        }
    }
}

fn public_view(doc: Document, collection: &ResolvedCollection) -> Document {
    strip_secrets(doc, collection.secret_fields())
}
