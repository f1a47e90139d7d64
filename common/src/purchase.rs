use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseId(pub String);

/// One requested line: a fruit and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub fruit: String,
    pub quantity: u32,
}

/// Body of `POST /purchases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub items: Vec<PurchaseItem>,
    /// Order-level total computed by the client.
    pub total_price: f64,
}

/// A purchase line ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub fruit: String,
    pub quantity: u32,
    pub total_price: f64,
    /// Unit price looked up at insert time.
    pub price: f64,
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    #[serde(rename = "_id")]
    pub id: PurchaseId,
    pub fruit: String,
    pub quantity: u32,
    pub total_price: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl PurchaseRecord {
    pub fn from_new(id: PurchaseId, new: NewPurchase, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            fruit: new.fruit,
            quantity: new.quantity,
            total_price: new.total_price,
            price: new.price,
            timestamp,
        }
    }
}

/// Sort records most recent first.
pub fn sort_newest_first(records: &mut [PurchaseRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
