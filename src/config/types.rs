//! Raw catalog types matching the JSON catalog file.

use serde::{Deserialize, Serialize};

/// Value format enforced on a field by request validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    #[default]
    Text,
    Email,
    /// Store identifier; used for reference fields.
    ObjectId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub format: FieldFormat,
    /// Hashed before persisting and never exposed in responses (e.g. passwords).
    #[serde(default)]
    pub secret: bool,
}

/// Enrichment link: on create, the record referenced by `field` in `collection` is inlined under `embed_as`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkConfig {
    pub field: String,
    pub collection: String,
    pub embed_as: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    /// URL segment; defaults to the collection name.
    #[serde(default)]
    pub path_segment: Option<String>,
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

pub const DEFAULT_LIST_LIMIT: u32 = 1000;

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub collections: Vec<CollectionConfig>,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl FieldConfig {
    pub fn required(name: &str) -> Self {
        FieldConfig {
            name: name.into(),
            required: true,
            format: FieldFormat::Text,
            secret: false,
        }
    }

    pub fn reference(name: &str) -> Self {
        FieldConfig {
            name: name.into(),
            required: false,
            format: FieldFormat::ObjectId,
            secret: false,
        }
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

fn link(field: &str, collection: &str, embed_as: &str) -> LinkConfig {
    LinkConfig {
        field: field.into(),
        collection: collection.into(),
        embed_as: embed_as.into(),
    }
}

/// The OCR pipeline catalog: users own images, images yield texts, texts yield graphs, graphs yield summaries.
pub fn default_catalog() -> CatalogConfig {
    CatalogConfig {
        collections: vec![
            CollectionConfig {
                name: "users".into(),
                path_segment: None,
                fields: vec![
                    FieldConfig::required("name"),
                    FieldConfig::required("email").with_format(FieldFormat::Email),
                    FieldConfig::required("password").secret(),
                ],
                links: vec![],
            },
            CollectionConfig {
                name: "images".into(),
                path_segment: None,
                fields: vec![FieldConfig::reference("user_id"), FieldConfig::required("path")],
                links: vec![link("user_id", "users", "user")],
            },
            CollectionConfig {
                name: "texts".into(),
                path_segment: None,
                fields: vec![
                    FieldConfig::reference("user_id"),
                    FieldConfig::reference("image_id"),
                    FieldConfig::required("text"),
                ],
                links: vec![
                    link("user_id", "users", "users"),
                    link("image_id", "images", "images"),
                ],
            },
            CollectionConfig {
                name: "graphs".into(),
                path_segment: None,
                fields: vec![FieldConfig::reference("text_id"), FieldConfig::required("graph")],
                links: vec![link("text_id", "texts", "texts")],
            },
            CollectionConfig {
                name: "summaries".into(),
                path_segment: None,
                fields: vec![FieldConfig::reference("graph_id"), FieldConfig::required("summary")],
                links: vec![link("graph_id", "graphs", "graphs")],
            },
        ],
        list_limit: DEFAULT_LIST_LIMIT,
    }
}
