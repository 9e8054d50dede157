//! Request validation against the collection's declared fields.

use crate::config::{FieldFormat, ResolvedCollection, ResolvedField};
use crate::error::AppError;
use crate::id::DocumentId;
use crate::store::Document;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn email_regex() -> Result<&'static Regex, &'static regex::Error> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN)).as_ref()
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. Required fields must be present, strings, and non-empty.
    /// Returns only declared fields; undeclared keys (including `_id`) are dropped.
    pub fn validate_create(body: Value, collection: &ResolvedCollection) -> Result<Document, AppError> {
        let mut body = into_object(body)?;
        let mut out = Document::new();
        for field in &collection.fields {
            match body.remove(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(AppError::validation(&field.name, "is required"));
                    }
                }
                Some(v) => {
                    let v = validate_field(field, v)?;
                    out.insert(field.name.clone(), v);
                }
            }
        }
        Ok(out)
    }

    /// Validate an update body. Every field is optional; `null` means unset and is stripped.
    /// The result may be empty, in which case no write is issued.
    pub fn validate_update(body: Value, collection: &ResolvedCollection) -> Result<Document, AppError> {
        let mut body = into_object(body)?;
        let mut out = Document::new();
        for field in &collection.fields {
            match body.remove(&field.name) {
                None | Some(Value::Null) => {}
                Some(v) => {
                    let v = validate_field(field, v)?;
                    out.insert(field.name.clone(), v);
                }
            }
        }
        Ok(out)
    }
}

fn into_object(body: Value) -> Result<Document, AppError> {
    match body {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::validation("body", "must be a JSON object")),
    }
}

/// Returns the value to store; identifiers come back normalised to lowercase.
fn validate_field(field: &ResolvedField, v: Value) -> Result<Value, AppError> {
    let s = v
        .as_str()
        .ok_or_else(|| AppError::validation(&field.name, "must be a string"))?;
    if field.required && s.is_empty() {
        return Err(AppError::validation(&field.name, "must not be empty"));
    }
    match field.format {
        FieldFormat::Text => {}
        FieldFormat::Email => {
            let re = email_regex()
                .map_err(|_| AppError::validation(&field.name, "could not be checked against the email pattern"))?;
            if !re.is_match(s) {
                return Err(AppError::validation(&field.name, "must be a valid email"));
            }
        }
        FieldFormat::ObjectId => {
            let id = DocumentId::parse(s)
                .map_err(|_| AppError::validation(&field.name, "must be a valid identifier"))?;
            return Ok(Value::String(id.into_string()));
        }
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalog, resolve};
    use serde_json::json;

    fn collection(path: &str) -> ResolvedCollection {
        resolve(&default_catalog())
            .unwrap()
            .collection_by_path(path)
            .unwrap()
            .clone()
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_requires_declared_fields() {
        let users = collection("users");
        let err = RequestValidator::validate_create(json!({ "name": "Jane", "password": "x" }), &users)
            .unwrap_err();
        assert_eq!(field_of(err), "email");

        let err = RequestValidator::validate_create(
            json!({ "name": "", "email": "j@x.com", "password": "x" }),
            &users,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "name");
    }

    #[test]
    fn create_drops_undeclared_keys() {
        let images = collection("images");
        let doc = RequestValidator::validate_create(
            json!({ "_id": "507f1f77bcf86cd799439011", "path": "a.png", "extra": 1 }),
            &images,
        )
        .unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc["path"], "a.png");
    }

    #[test]
    fn reference_fields_must_be_identifiers() {
        let images = collection("images");
        let err = RequestValidator::validate_create(json!({ "user_id": "2", "path": "a.png" }), &images)
            .unwrap_err();
        assert_eq!(field_of(err), "user_id");
    }

    #[test]
    fn reference_fields_are_lowercased() {
        let texts = collection("texts");
        let doc = RequestValidator::validate_create(
            json!({ "image_id": "507F1F77BCF86CD799439011", "text": "t" }),
            &texts,
        )
        .unwrap();
        assert_eq!(doc["image_id"], "507f1f77bcf86cd799439011");

        let doc = RequestValidator::validate_update(json!({ "user_id": "ABCDEF0123456789ABCDEF01" }), &texts)
            .unwrap();
        assert_eq!(doc["user_id"], "abcdef0123456789abcdef01");
    }

    #[test]
    fn email_format_checked() {
        let users = collection("users");
        let err = RequestValidator::validate_create(
            json!({ "name": "Jane", "email": "not-an-email", "password": "x" }),
            &users,
        )
        .unwrap_err();
        assert_eq!(field_of(err), "email");
    }

    #[test]
    fn update_strips_nulls_and_allows_empty() {
        let users = collection("users");
        let doc = RequestValidator::validate_update(json!({ "name": "Jane2", "email": null }), &users).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(RequestValidator::validate_update(json!({}), &users).unwrap().is_empty());
    }

    #[test]
    fn update_rejects_bad_values_and_non_objects() {
        let users = collection("users");
        let err = RequestValidator::validate_update(json!({ "name": 5 }), &users).unwrap_err();
        assert_eq!(field_of(err), "name");
        let err = RequestValidator::validate_update(json!([1, 2]), &users).unwrap_err();
        assert_eq!(field_of(err), "body");
    }
}
