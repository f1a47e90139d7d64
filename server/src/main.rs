//! Fruit stand API daemon.
//!
//! Serves `/fruits` and `/purchases` over HTTP. Purchase records live in
//! MongoDB (`MONGODB_URI`), or in memory with `--in-memory`. A database that
//! cannot be reached is logged and the server listens anyway. A `.env` file
//! in the working directory (or a parent) supplies unset variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fruitstand_server::config::{self, DEFAULT_PORT};
use fruitstand_server::{ledger, LedgerConfig, ServerConfig, StandService};

#[derive(Parser)]
#[command(name = "fruitstand-server", about = "Fruit stand inventory and purchase API")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI")]
    mongodb_uri: Option<String>,

    /// Database name (default: the one in the URI, else "fruitstand").
    #[arg(long, env = "MONGODB_DB")]
    database: Option<String>,

    /// Keep purchases in memory instead of MongoDB.
    #[arg(long)]
    in_memory: bool,

    /// JSON file mapping fruit -> {count, price}; replaces the built-in catalog.
    #[arg(long, env = "CATALOG_PATH")]
    catalog: Option<PathBuf>,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let ledger = if cli.in_memory {
            LedgerConfig::InMemory
        } else {
            LedgerConfig::Mongo {
                uri: cli.mongodb_uri,
                database: cli.database,
            }
        };
        ServerConfig {
            port: cli.port,
            ledger,
            catalog_path: cli.catalog,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file(None);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config = ServerConfig::from(Cli::parse());
    let catalog = config.load_catalog()?;
    tracing::info!(
        "Catalog: {}",
        catalog.fruits().collect::<Vec<_>>().join(", ")
    );

    let ledger = ledger::open(&config.ledger).await;
    let service = Arc::new(StandService::new(catalog, ledger));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    fruitstand_server::serve(listener, service)
        .await
        .context("server failed")
}
