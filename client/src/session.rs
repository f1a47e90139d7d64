use fruitstand_common::inventory::InventorySnapshot;
use fruitstand_common::order::{OrderBuilder, OrderPreview};
use fruitstand_common::purchase::{PurchaseRecord, PurchaseRequest};
use tracing::{error, info};

use crate::api::ApiClient;
use crate::error::ClientError;

/// Client-side shopping state: the order being built, the last inventory
/// fetched from the server, and the last history fetched.
///
/// The cached inventory is only ever replaced by a fresh server snapshot.
/// Previews are computed on a copy.
#[derive(Debug, Clone)]
pub struct OrderSession {
    api: ApiClient,
    order: OrderBuilder,
    inventory: InventorySnapshot,
    history: Vec<PurchaseRecord>,
    last_total: f64,
}

impl OrderSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            order: OrderBuilder::new(),
            inventory: InventorySnapshot::default(),
            history: Vec::new(),
            last_total: 0.0,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn order(&self) -> &OrderBuilder {
        &self.order
    }

    pub fn order_mut(&mut self) -> &mut OrderBuilder {
        &mut self.order
    }

    pub fn inventory(&self) -> &InventorySnapshot {
        &self.inventory
    }

    pub fn history(&self) -> &[PurchaseRecord] {
        &self.history
    }

    /// Total of the most recent submission attempt.
    pub fn last_total(&self) -> f64 {
        self.last_total
    }

    pub fn preview(&self) -> OrderPreview {
        self.order.preview(&self.inventory)
    }

    /// Replace the cached snapshot. Order lines are left alone.
    pub fn set_inventory(&mut self, snapshot: InventorySnapshot) {
        self.inventory = snapshot;
    }

    pub fn set_history(&mut self, history: Vec<PurchaseRecord>) {
        self.history = history;
    }

    /// Preview the order, record its total, and build the request to post.
    pub fn begin_submit(&mut self) -> PurchaseRequest {
        let preview = self.preview();
        self.last_total = preview.total;
        self.order.to_request(preview.total)
    }

    pub async fn refresh_inventory(&mut self) -> Result<&InventorySnapshot, ClientError> {
        self.inventory = self.api.inventory().await?;
        Ok(&self.inventory)
    }

    pub async fn load_history(&mut self) -> Result<&[PurchaseRecord], ClientError> {
        self.history = self.api.purchases().await?;
        Ok(&self.history)
    }

    /// Preview the order, post the raw lines with the preview total, then
    /// re-fetch inventory.
    ///
    /// A failed re-fetch is logged and the old snapshot is kept; the submit
    /// still counts as successful.
    pub async fn submit(&mut self) -> Result<Vec<PurchaseRecord>, ClientError> {
        let request = self.begin_submit();
        let saved = self.api.submit(&request).await?;
        info!("Purchase saved: {} line(s)", saved.len());

        if let Err(e) = self.refresh_inventory().await {
            error!("Failed to fetch inventory: {}", e);
        }
        Ok(saved)
    }
}
