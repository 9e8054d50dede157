//! Response helpers: records are returned as-is, without an envelope.

use axum::{http::StatusCode, Json};
use serde_json::Value;

pub fn created(record: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(record))
}

pub fn ok(record: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(record))
}

pub fn ok_many(records: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(records))
}
