//! Builds parameterized statements against collection tables (`_id TEXT`, `doc JSONB`).

/// Quote identifier for PostgreSQL (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))
}

/// One table per collection; the document body is schema-less JSONB.
pub fn create_collection_table(schema: &str, collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (_id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
        qualified_table(schema, collection)
    )
}

/// Params: $1 id, $2 document.
pub fn insert(schema: &str, collection: &str) -> String {
    format!(
        "INSERT INTO {} (_id, doc) VALUES ($1, $2)",
        qualified_table(schema, collection)
    )
}

/// Params: $1 id.
pub fn select_by_id(schema: &str, collection: &str) -> String {
    format!(
        "SELECT _id, doc FROM {} WHERE _id = $1",
        qualified_table(schema, collection)
    )
}

/// Params: $1 limit. No ORDER BY: rows come back in table order.
pub fn select_list(schema: &str, collection: &str) -> String {
    format!(
        "SELECT _id, doc FROM {} LIMIT $1",
        qualified_table(schema, collection)
    )
}

/// Field-level merge. Params: $1 id, $2 fields to set (JSONB object).
/// Returns one row (matched, modified); modified is 0 when the stored document already holds every value.
/// JSONB containment equals per-key equality only for scalar values; validation admits strings only.
/// Array or object fields would need a per-key comparison here, since `@>` also matches subsets.
pub fn update_merge(schema: &str, collection: &str) -> String {
    let table = qualified_table(schema, collection);
    format!(
        "WITH target AS (SELECT _id, doc FROM {table} WHERE _id = $1 FOR UPDATE), \
         changed AS (UPDATE {table} AS d SET doc = d.doc || $2::jsonb FROM target \
         WHERE d._id = target._id AND NOT (target.doc @> $2::jsonb) RETURNING 1) \
         SELECT (SELECT COUNT(*) FROM target) AS matched, (SELECT COUNT(*) FROM changed) AS modified",
        table = table
    )
}

/// Params: $1 id.
pub fn delete(schema: &str, collection: &str) -> String {
    format!("DELETE FROM {} WHERE _id = $1", qualified_table(schema, collection))
}
