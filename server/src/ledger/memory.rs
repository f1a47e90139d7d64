use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use fruitstand_common::inventory::FruitTotal;
use fruitstand_common::purchase::{sort_newest_first, NewPurchase, PurchaseId, PurchaseRecord};
use tokio::sync::RwLock;

use super::{LedgerError, PurchaseLedger};

/// Process-local ledger. Ids are sequential, starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: RwLock<Vec<PurchaseRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PurchaseLedger for InMemoryLedger {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, purchase: NewPurchase) -> Result<PurchaseRecord, LedgerError> {
        let mut records = self.records.write().await;
        let id = PurchaseId((records.len() + 1).to_string());
        let record = PurchaseRecord::from_new(id, purchase, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn newest_first(&self) -> Result<Vec<PurchaseRecord>, LedgerError> {
        // Reverse first so equal timestamps keep latest-inserted first under
        // the stable sort.
        let mut records: Vec<_> = self.records.read().await.iter().rev().cloned().collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn quantities_by_fruit(&self) -> Result<Vec<FruitTotal>, LedgerError> {
        let records = self.records.read().await;
        let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
        for record in records.iter() {
            *totals.entry(record.fruit.as_str()).or_default() += i64::from(record.quantity);
        }
        Ok(totals
            .into_iter()
            .map(|(fruit, quantity)| FruitTotal {
                fruit: fruit.to_string(),
                quantity,
            })
            .collect())
    }
}
