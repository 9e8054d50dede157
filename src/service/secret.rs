//! Secret fields: Argon2id hashing before persist, removal before responding.

use crate::config::ResolvedCollection;
use crate::error::AppError;
use crate::store::Document;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use serde_json::Value;

/// Hash one secret into a PHC string (`$argon2id$...`).
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Hash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AppError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Replace every present secret field with its hash. Hashing is CPU-bound, so it runs off the async workers.
pub async fn hash_secret_fields(doc: Document, collection: &ResolvedCollection) -> Result<Document, AppError> {
    let secrets: Vec<String> = collection
        .secret_fields()
        .filter(|name| doc.contains_key(*name))
        .map(str::to_string)
        .collect();
    if secrets.is_empty() {
        return Ok(doc);
    }
    tokio::task::spawn_blocking(move || {
        let mut doc = doc;
        for name in secrets {
            if let Some(Value::String(plain)) = doc.get(&name) {
                let hashed = hash_secret(plain)?;
                doc.insert(name, Value::String(hashed));
            }
        }
        Ok::<_, AppError>(doc)
    })
    .await
    .map_err(|e| AppError::Hash(e.to_string()))?
}

pub fn strip_secrets<'a>(mut doc: Document, secrets: impl IntoIterator<Item = &'a str>) -> Document {
    for name in secrets {
        doc.remove(name);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalog, resolve};
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use serde_json::json;

    fn verify_secret(secret: &str, phc: &str) -> bool {
        PasswordHash::new(phc)
            .map(|parsed| Argon2::default().verify_password(secret.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }

    #[test]
    fn hash_round_trip() {
        let phc = hash_secret("123456").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_secret("123456", &phc));
        assert!(!verify_secret("654321", &phc));
        assert!(!verify_secret("123456", "not a hash"));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash_secret("pw").unwrap(), hash_secret("pw").unwrap());
    }

    #[tokio::test]
    async fn only_secret_fields_are_hashed() {
        let model = resolve(&default_catalog()).unwrap();
        let users = model.collection_by_path("users").unwrap();
        let doc = match json!({ "name": "Jane", "password": "123456" }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let hashed = hash_secret_fields(doc, users).await.unwrap();
        assert_eq!(hashed["name"], "Jane");
        let phc = hashed["password"].as_str().unwrap();
        assert!(verify_secret("123456", phc));

        let stripped = strip_secrets(hashed, users.secret_fields());
        assert!(!stripped.contains_key("password"));
        assert!(stripped.contains_key("name"));
    }
}
