//! Inventory and purchase operations over a catalog and a purchase ledger.
//!
//! Nothing here takes a lock across the aggregate-then-insert sequence:
//! concurrent purchases can push stock below zero.

use std::sync::Arc;

use fruitstand_common::catalog::Catalog;
use fruitstand_common::inventory::InventorySnapshot;
use fruitstand_common::purchase::{NewPurchase, PurchaseRecord, PurchaseRequest};
use tracing::{debug, warn};

use crate::error::StandError;
use crate::ledger::PurchaseLedger;

pub struct StandService {
    catalog: Catalog,
    ledger: Arc<dyn PurchaseLedger>,
}

impl StandService {
    pub fn new(catalog: Catalog, ledger: Arc<dyn PurchaseLedger>) -> Self {
        Self { catalog, ledger }
    }

    pub fn ledger(&self) -> &dyn PurchaseLedger {
        self.ledger.as_ref()
    }

    pub fn price(&self, fruit: &str) -> Result<f64, StandError> {
        Ok(self.catalog.price(fruit)?)
    }

    /// Starting counts minus everything ever purchased.
    pub async fn inventory(&self) -> Result<InventorySnapshot, StandError> {
        let mut snapshot = InventorySnapshot::from_catalog(&self.catalog);
        let totals = self.ledger.quantities_by_fruit().await?;
        for skipped in snapshot.apply_purchases(totals) {
            warn!(
                fruit = %skipped.fruit,
                quantity = skipped.quantity,
                "Ledger holds purchases for a fruit not in the catalog"
            );
        }
        Ok(snapshot)
    }

    /// Save one ledger record per item, in order, each write awaited before
    /// the next.
    ///
    /// Every record carries the request-level `total_price`. The first unknown
    /// fruit or storage error stops the loop; records already written stay.
    pub async fn submit_purchase(
        &self,
        request: PurchaseRequest,
    ) -> Result<Vec<PurchaseRecord>, StandError> {
        let requested = request.items.len();
        let mut saved = Vec::with_capacity(requested);

        for item in request.items {
            match self.save_line(item.fruit, item.quantity, request.total_price).await {
                Ok(record) => {
                    debug!(id = %record.id.0, fruit = %record.fruit, "Saved purchase line");
                    saved.push(record);
                }
                Err(e) if saved.is_empty() => return Err(e),
                Err(e) => {
                    return Err(StandError::PartialWrite {
                        committed: saved.len(),
                        requested,
                        source: Box::new(e),
                    })
                }
            }
        }

        Ok(saved)
    }

    async fn save_line(
        &self,
        fruit: String,
        quantity: u32,
        total_price: f64,
    ) -> Result<PurchaseRecord, StandError> {
        let price = self.price(&fruit)?;
        let purchase = NewPurchase {
            fruit,
            quantity,
            total_price,
            price,
        };
        Ok(self.ledger.append(purchase).await?)
    }

    /// Full purchase history, most recent first.
    pub async fn purchases(&self) -> Result<Vec<PurchaseRecord>, StandError> {
        Ok(self.ledger.newest_first().await?)
    }
}
