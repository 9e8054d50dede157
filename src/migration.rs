//! Apply the catalog to the database: schema plus one document table per collection.

use crate::config::ResolvedModel;
use crate::error::AppError;
use crate::sql;
use sqlx::PgPool;

/// Idempotent: CREATE SCHEMA / CREATE TABLE IF NOT EXISTS. Existing tables are left untouched.
pub async fn ensure_collections(pool: &PgPool, schema: &str, model: &ResolvedModel) -> Result<(), AppError> {
    sqlx::query(&sql::create_schema(schema)).execute(pool).await?;
    for name in model.collection_names() {
        let ddl = sql::create_collection_table(schema, name);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema, collections = model.collections.len(), "collections ready");
    Ok(())
}
