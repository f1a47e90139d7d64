//! Fruit stand backend: catalog-driven inventory and an append-only purchase
//! ledger behind a small HTTP/JSON API.

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod service;

pub use api::{router, serve};
pub use config::{LedgerConfig, ServerConfig};
pub use error::StandError;
pub use service::StandService;
