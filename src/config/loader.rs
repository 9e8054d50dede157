//! Load the catalog from a JSON file and resolve it into the runtime model.

use crate::config::resolved::{ResolvedCollection, ResolvedField, ResolvedLink, ResolvedModel};
use crate::config::{validate, CatalogConfig};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Build resolved model from catalog config. Validates first.
pub fn resolve(config: &CatalogConfig) -> Result<ResolvedModel, ConfigError> {
    validate(config)?;

    let secrets_by_collection: HashMap<&str, Vec<String>> = config
        .collections
        .iter()
        .map(|c| {
            let secrets = c.fields.iter().filter(|f| f.secret).map(|f| f.name.clone()).collect();
            (c.name.as_str(), secrets)
        })
        .collect();

    let mut collections = Vec::with_capacity(config.collections.len());
    let mut collection_by_path = HashMap::new();

    for c in &config.collections {
        let fields = c
            .fields
            .iter()
            .map(|f| ResolvedField {
                name: f.name.clone(),
                required: f.required,
                format: f.format,
                secret: f.secret,
            })
            .collect();
        let links = c
            .links
            .iter()
            .map(|l| ResolvedLink {
                field: l.field.clone(),
                collection: l.collection.clone(),
                embed_as: l.embed_as.clone(),
                secret_fields: secrets_by_collection
                    .get(l.collection.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        let path_segment = c.path_segment.clone().unwrap_or_else(|| c.name.clone());
        let collection = ResolvedCollection {
            name: c.name.clone(),
            path_segment: path_segment.clone(),
            fields,
            links,
        };
        collection_by_path.insert(path_segment, collection.clone());
        collections.push(collection);
    }

    Ok(ResolvedModel {
        collections,
        collection_by_path,
        list_limit: config.list_limit,
    })
}

/// Read a catalog from a JSON file.
pub async fn load_from_file(path: impl AsRef<Path>) -> Result<CatalogConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalog;

    #[test]
    fn resolves_default_catalog() {
        let model = resolve(&default_catalog()).unwrap();
        assert_eq!(model.collections.len(), 5);
        assert_eq!(model.list_limit, 1000);

        let texts = model.collection_by_path("texts").unwrap();
        let embeds: Vec<_> = texts.links.iter().map(|l| l.embed_as.as_str()).collect();
        assert_eq!(embeds, vec!["users", "images"]);
        assert!(model.collection_by_path("text").is_none());
    }

    #[test]
    fn links_carry_target_secrets() {
        let model = resolve(&default_catalog()).unwrap();
        let images = model.collection_by_path("images").unwrap();
        assert_eq!(images.links[0].secret_fields, vec!["password".to_string()]);
        let users = model.collection_by_path("users").unwrap();
        assert_eq!(users.secret_fields().collect::<Vec<_>>(), vec!["password"]);
    }

    #[tokio::test]
    async fn missing_file_is_load_error() {
        let err = load_from_file("/nonexistent/catalog.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
