//! Catalog server: reads settings from the environment (and `.env`), prepares the store,
//! and serves the collection routes.

use ocr_catalog::{
    app, default_catalog, ensure_collections, ensure_database_exists, load_from_file, resolve, AppState,
    DocumentStore, MemoryDocumentStore, PgDocumentStore, Settings, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ocr_catalog=info,catalog_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let catalog = match &settings.catalog_path {
        Some(path) => load_from_file(path).await?,
        None => default_catalog(),
    };
    let model = resolve(&catalog)?;

    let store: Arc<dyn DocumentStore> = match settings.store_backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_collections(&pool, &settings.schema, &model).await?;
            Arc::new(PgDocumentStore::new(pool, settings.schema.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; records are lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let state = AppState::new(store, model);
    let router = app(state, settings.max_body_bytes);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
