use std::path::{Path, PathBuf};

use fruitstand_common::catalog::Catalog;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    ParseCatalog {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where purchase records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerConfig {
    Mongo {
        uri: Option<String>,
        database: Option<String>,
    },
    InMemory,
}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub ledger: LedgerConfig,
    /// JSON catalog file; the built-in catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ledger: LedgerConfig::InMemory,
            catalog_path: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog_file(path),
            None => Ok(Catalog::default()),
        }
    }
}

/// Load `KEY=value` pairs into the process environment before the CLI is
/// parsed. Variables already set are not overridden.
///
/// With no explicit path, `.env` is searched for from the current directory
/// upward. A missing file is not an error; the loaded path is returned.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn load_catalog_file(path: &Path) -> Result<Catalog, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&data).map_err(|source| ConfigError::ParseCatalog {
        path: path.to_path_buf(),
        source,
    })
}
