//! Document store seam: identifier lookup, insert, field-level update, delete.
//!
//! Documents are JSON objects. `_id` is never part of the stored body; stores add it on read.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::{ensure_database_exists, PgDocumentStore};

use crate::error::AppError;
use crate::id::DocumentId;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

pub const ID_KEY: &str = "_id";

/// Acknowledgement counts of a single-document update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document; the store assigns and returns its identifier.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<DocumentId, AppError>;

    /// Exact-match lookup by identifier. The returned document carries `_id`.
    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Up to `limit` documents in store order.
    async fn find(&self, collection: &str, limit: u32) -> Result<Vec<Document>, AppError>;

    /// Merge `set` into the matching document.
    async fn update_one(&self, collection: &str, id: &str, set: Document) -> Result<UpdateOutcome, AppError>;

    /// Remove the matching document; returns the number removed (0 or 1).
    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Body plus `_id`, as returned to callers.
pub(crate) fn with_id(id: &str, mut doc: Document) -> Document {
    doc.remove(ID_KEY);
    doc.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    doc
}
