//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("catalog has no collections")]
    Empty,
    #[error("duplicate collection name: {0}")]
    DuplicateCollection(String),
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("duplicate field '{field}' in collection {collection}")]
    DuplicateField { collection: String, field: String },
    #[error("link in {collection} uses undeclared field '{field}'")]
    UnknownLinkField { collection: String, field: String },
    #[error("link in {collection} targets unknown collection '{target}'")]
    UnknownLinkTarget { collection: String, target: String },
    #[error("invalid collection name: '{0}'")]
    InvalidName(String),
    #[error("list limit must be greater than zero")]
    ZeroListLimit,
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{collection} {id} not found")]
    NotFound { collection: String, id: String },
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("validation: {field} {reason}")]
    Validation { field: String, reason: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store: {0}")]
    Store(String),
    #[error("hash: {0}")]
    Hash(String),
}

impl AppError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        AppError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } | AppError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Db(_) | AppError::Store(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::NotFound { .. } | AppError::UnknownCollection(_) => "not_found",
            AppError::Validation { .. } => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::Db(_) => "database_error",
            AppError::Store(_) => "store_error",
            AppError::Hash(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::Validation { field, reason } => Some(serde_json::json!({
                "field": field,
                "reason": reason,
            })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_collection_and_id() {
        let err = AppError::not_found("users", "abc");
        assert_eq!(err.to_string(), "users abc not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_unprocessable_entity() {
        let err = AppError::validation("email", "is required");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_failures_are_server_errors() {
        assert_eq!(
            AppError::Store("connection refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
