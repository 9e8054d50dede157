//! PostgreSQL-backed document store: one JSONB table per collection.

use crate::error::AppError;
use crate::id::DocumentId;
use crate::sql;
use crate::store::{with_id, Document, DocumentStore, UpdateOutcome};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgDocumentStore {
            pool,
            schema: schema.into(),
        }
    }
}

fn into_document(id: String, doc: Value) -> Result<Document, AppError> {
    match doc {
        Value::Object(map) => Ok(with_id(&id, map)),
        other => Err(AppError::Store(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<DocumentId, AppError> {
        let id = DocumentId::new();
        let q = sql::insert(&self.schema, collection);
        tracing::debug!(sql = %q, collection, id = %id, "query");
        sqlx::query(&q)
            .bind(id.as_str())
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let q = sql::select_by_id(&self.schema, collection);
        tracing::debug!(sql = %q, collection, id, "query");
        let row: Option<(String, Value)> = sqlx::query_as(&q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(id, doc)| into_document(id, doc)).transpose()
    }

    async fn find(&self, collection: &str, limit: u32) -> Result<Vec<Document>, AppError> {
        let q = sql::select_list(&self.schema, collection);
        tracing::debug!(sql = %q, collection, limit, "query");
        let rows: Vec<(String, Value)> = sqlx::query_as(&q)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|(id, doc)| into_document(id, doc)).collect()
    }

    async fn update_one(&self, collection: &str, id: &str, set: Document) -> Result<UpdateOutcome, AppError> {
        let q = sql::update_merge(&self.schema, collection);
        tracing::debug!(sql = %q, collection, id, "query");
        let (matched, modified): (i64, i64) = sqlx::query_as(&q)
            .bind(id)
            .bind(Value::Object(set))
            .fetch_one(&self.pool)
            .await?;
        Ok(UpdateOutcome {
            matched: matched as u64,
            modified: modified as u64,
        })
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, AppError> {
        let q = sql::delete(&self.schema, collection);
        tracing::debug!(sql = %q, collection, id, "query");
        let result = sqlx::query(&q).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the target database if it does not exist (connects to the `postgres` admin database).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/ocr?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "ocr");
    }

    #[test]
    fn non_object_document_is_store_error() {
        let err = into_document("abc".into(), Value::String("x".into())).unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        let doc = into_document("abc".into(), serde_json::json!({ "path": "a.png" })).unwrap();
        assert_eq!(doc["_id"], "abc");
        assert_eq!(doc["path"], "a.png");
    }
}
