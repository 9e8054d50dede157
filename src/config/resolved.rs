//! Resolved catalog: config validated and flattened for runtime use.

use crate::config::FieldFormat;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResolvedField {
    pub name: String,
    pub required: bool,
    pub format: FieldFormat,
    pub secret: bool,
}

/// Enrichment link resolved against the catalog.
#[derive(Clone, Debug)]
pub struct ResolvedLink {
    /// Our reference field holding the linked record's id.
    pub field: String,
    /// Collection the reference points into.
    pub collection: String,
    /// Response key the linked record is inlined under.
    pub embed_as: String,
    /// Secret fields of the linked collection, stripped from the inlined record.
    pub secret_fields: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedCollection {
    pub name: String,
    pub path_segment: String,
    pub fields: Vec<ResolvedField>,
    pub links: Vec<ResolvedLink>,
}

impl ResolvedCollection {
    pub fn secret_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.secret).map(|f| f.name.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedModel {
    pub collections: Vec<ResolvedCollection>,
    pub collection_by_path: HashMap<String, ResolvedCollection>,
    pub list_limit: u32,
}

impl ResolvedModel {
    pub fn collection_by_path(&self, path: &str) -> Option<&ResolvedCollection> {
        self.collection_by_path.get(path)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }
}
