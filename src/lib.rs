//! OCR catalog: one generic CRUD pattern, configured per collection
//! (users, images, texts, graphs, summaries) over a document store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod id;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{default_catalog, load_from_file, resolve, CatalogConfig, ResolvedCollection, ResolvedModel, Settings, StoreBackend};
pub use error::{AppError, ConfigError};
pub use id::DocumentId;
pub use migration::ensure_collections;
pub use routes::{app, common_routes, entity_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, DocumentStore, MemoryDocumentStore, PgDocumentStore};
