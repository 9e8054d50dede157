//! Catalog validation: unique names and link integrity.

use crate::config::CatalogConfig;
use crate::error::ConfigError;
use std::collections::HashSet;

/// Collection names become table names and URL segments; keep them to lowercase identifiers.
fn valid_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && s.starts_with(|c: char| c.is_ascii_lowercase())
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub fn validate(config: &CatalogConfig) -> Result<(), ConfigError> {
    if config.collections.is_empty() {
        return Err(ConfigError::Empty);
    }
    if config.list_limit == 0 {
        return Err(ConfigError::ZeroListLimit);
    }

    let mut names = HashSet::new();
    let mut path_segments = HashSet::new();
    for c in &config.collections {
        if !valid_name(&c.name) {
            return Err(ConfigError::InvalidName(c.name.clone()));
        }
        if !names.insert(c.name.as_str()) {
            return Err(ConfigError::DuplicateCollection(c.name.clone()));
        }
        let segment = c.path_segment.as_deref().unwrap_or(&c.name);
        if !valid_name(segment) {
            return Err(ConfigError::InvalidName(segment.to_string()));
        }
        if !path_segments.insert(segment) {
            return Err(ConfigError::DuplicatePathSegment(segment.to_string()));
        }
    }

    for c in &config.collections {
        let mut fields = HashSet::new();
        for f in &c.fields {
            if f.name.is_empty() || f.name == "_id" || !fields.insert(f.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    collection: c.name.clone(),
                    field: f.name.clone(),
                });
            }
        }
        for l in &c.links {
            if !fields.contains(l.field.as_str()) {
                return Err(ConfigError::UnknownLinkField {
                    collection: c.name.clone(),
                    field: l.field.clone(),
                });
            }
            if !names.contains(l.collection.as_str()) {
                return Err(ConfigError::UnknownLinkTarget {
                    collection: c.name.clone(),
                    target: l.collection.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_catalog, LinkConfig};

    #[test]
    fn default_catalog_is_valid() {
        validate(&default_catalog()).unwrap();
    }

    #[test]
    fn rejects_duplicate_collection() {
        let mut catalog = default_catalog();
        let dup = catalog.collections[0].clone();
        catalog.collections.push(dup);
        assert!(matches!(validate(&catalog), Err(ConfigError::DuplicateCollection(_))));
    }

    #[test]
    fn rejects_link_to_unknown_collection() {
        let mut catalog = default_catalog();
        catalog.collections[1].links.push(LinkConfig {
            field: "user_id".into(),
            collection: "accounts".into(),
            embed_as: "account".into(),
        });
        assert!(matches!(validate(&catalog), Err(ConfigError::UnknownLinkTarget { .. })));
    }

    #[test]
    fn rejects_link_on_undeclared_field() {
        let mut catalog = default_catalog();
        catalog.collections[3].links[0].field = "txt_id".into();
        assert!(matches!(validate(&catalog), Err(ConfigError::UnknownLinkField { .. })));
    }

    #[test]
    fn rejects_zero_list_limit_and_bad_names() {
        let mut catalog = default_catalog();
        catalog.list_limit = 0;
        assert!(matches!(validate(&catalog), Err(ConfigError::ZeroListLimit)));

        let mut catalog = default_catalog();
        catalog.collections[0].name = "Users; DROP".into();
        assert!(matches!(validate(&catalog), Err(ConfigError::InvalidName(_))));
    }
}
