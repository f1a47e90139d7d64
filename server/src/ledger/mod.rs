//! Purchase ledger: the append-only store of purchase records.
//!
//! Two backends implement [`PurchaseLedger`]:
//!
//! 1. [`MongoLedger`] → the `purchases` collection in MongoDB
//! 2. [`InMemoryLedger`] → a process-local vector, for development and tests
//!
//! [`UnavailableLedger`] stands in when no store could be opened at startup,
//! so the server keeps listening and answers storage-backed routes with errors.

mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use fruitstand_common::inventory::FruitTotal;
use fruitstand_common::purchase::{NewPurchase, PurchaseRecord};
use tracing::{error, info};

use crate::config::LedgerConfig;

pub use memory::InMemoryLedger;
pub use mongo::MongoLedger;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("corrupt ledger document: {0}")]
    Corrupt(String),
}

/// Append-only purchase storage. Records are never updated or deleted.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Short backend name reported by `/health`.
    fn backend(&self) -> &'static str;

    /// Persist one purchase line, assigning its id and timestamp.
    async fn append(&self, purchase: NewPurchase) -> Result<PurchaseRecord, LedgerError>;

    /// Every record, most recent first.
    async fn newest_first(&self) -> Result<Vec<PurchaseRecord>, LedgerError>;

    /// Total purchased quantity per fruit over all records.
    async fn quantities_by_fruit(&self) -> Result<Vec<FruitTotal>, LedgerError>;
}

/// A ledger that fails every operation with the startup failure reason.
#[derive(Debug, Clone)]
pub struct UnavailableLedger {
    reason: String,
}

impl UnavailableLedger {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn err(&self) -> LedgerError {
        LedgerError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl PurchaseLedger for UnavailableLedger {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    async fn append(&self, _purchase: NewPurchase) -> Result<PurchaseRecord, LedgerError> {
        Err(self.err())
    }

    async fn newest_first(&self) -> Result<Vec<PurchaseRecord>, LedgerError> {
        Err(self.err())
    }

    async fn quantities_by_fruit(&self) -> Result<Vec<FruitTotal>, LedgerError> {
        Err(self.err())
    }
}

/// Open the configured ledger. Never fails: a store that cannot be opened is
/// logged and replaced by an [`UnavailableLedger`].
pub async fn open(config: &LedgerConfig) -> Arc<dyn PurchaseLedger> {
    match config {
        LedgerConfig::InMemory => {
            info!("Using in-memory purchase ledger (records are lost on exit)");
            Arc::new(InMemoryLedger::new())
        }
        LedgerConfig::Mongo { uri: None, .. } => {
            error!("MONGODB_URI is not set; purchase ledger unavailable");
            Arc::new(UnavailableLedger::new("MONGODB_URI is not set"))
        }
        LedgerConfig::Mongo {
            uri: Some(uri),
            database,
        } => match MongoLedger::connect(uri, database.as_deref()).await {
            Ok(ledger) => Arc::new(ledger),
            Err(e) => {
                error!("Failed to connect to MongoDB: {}", e);
                Arc::new(UnavailableLedger::new(e.to_string()))
            }
        },
    }
}
