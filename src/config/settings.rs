//! Process settings read from the environment at startup.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ocr";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SCHEMA: &str = "catalog";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Default max request body (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Load(format!(
                "invalid STORE_BACKEND: {} (expected postgres or memory)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    /// PostgreSQL schema holding one table per collection.
    pub schema: String,
    /// Optional JSON catalog; the built-in OCR catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub max_connections: u32,
    pub max_body_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or empty keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| ConfigError::Load(format!("invalid BIND_ADDR: {}", e)))?;
        let store_backend = match get("STORE_BACKEND") {
            Some(s) => s.parse()?,
            None => StoreBackend::Postgres,
        };
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::Load(format!("invalid DB_MAX_CONNECTIONS: {}", s)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::Load(format!("invalid MAX_BODY_BYTES: {}", s)))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr,
            store_backend,
            schema: get("CATALOG_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            max_connections,
            max_body_bytes,
        })
    }
}
