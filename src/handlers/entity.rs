//! Collection CRUD handlers: create, list, read, update, delete.
//! The collection is resolved from the first path segment; ids are passed to the store unvalidated.

use crate::config::ResolvedCollection;
use crate::error::AppError;
use crate::response;
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn collection<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a ResolvedCollection, AppError> {
    state
        .model
        .collection_by_path(path_segment)
        .ok_or_else(|| AppError::UnknownCollection(path_segment.to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let collection = collection(&state, &path_segment)?;
    let rows = CrudService::list(state.store.as_ref(), collection, state.model.list_limit).await?;
    Ok(response::ok_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let collection = collection(&state, &path_segment)?;
    let doc = RequestValidator::validate_create(body, collection)?;
    let row = CrudService::create(state.store.as_ref(), collection, doc).await?;
    Ok(response::created(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let collection = collection(&state, &path_segment)?;
    let row = CrudService::read(state.store.as_ref(), collection, &id).await?;
    Ok(response::ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let collection = collection(&state, &path_segment)?;
    let set = RequestValidator::validate_update(body, collection)?;
    let row = CrudService::update(state.store.as_ref(), collection, &id, set).await?;
    Ok(response::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let collection = collection(&state, &path_segment)?;
    CrudService::delete(state.store.as_ref(), collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
