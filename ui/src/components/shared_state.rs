use dioxus::prelude::*;

use fruitstand_client::{ApiClient, OrderSession};

/// Shopping session shared across all components.
///
/// Network calls run on a cloned `ApiClient`; only the fetched field is
/// written back, so edits made while a request is in flight survive.
pub fn provide_session() -> Signal<OrderSession> {
    use_context_provider(|| Signal::new(OrderSession::new(ApiClient::new())))
}

pub fn use_session() -> Signal<OrderSession> {
    use_context::<Signal<OrderSession>>()
}

/// Fetch the inventory from the server into the shared session.
/// Failures are logged only.
pub async fn refresh_inventory(mut session: Signal<OrderSession>) {
    let api = session.read().api().clone();
    match api.inventory().await {
        Ok(snapshot) => session.write().set_inventory(snapshot),
        Err(e) => tracing::error!("Failed to fetch inventory: {e}"),
    }
}

/// Fetch the purchase history into the shared session.
pub async fn load_history(mut session: Signal<OrderSession>) {
    let api = session.read().api().clone();
    match api.purchases().await {
        Ok(history) => session.write().set_history(history),
        Err(e) => tracing::error!("Failed to fetch purchase history: {e}"),
    }
}

/// Submit the current order, then re-fetch inventory on success.
///
/// The displayed total is recorded before the request goes out.
pub async fn submit_order(mut session: Signal<OrderSession>) {
    let (api, request) = {
        let mut state = session.write();
        (state.api().clone(), state.begin_submit())
    };
    match api.submit(&request).await {
        Ok(saved) => {
            tracing::info!("Purchase saved: {} line(s)", saved.len());
            refresh_inventory(session).await;
        }
        Err(e) => tracing::error!("Failed to save purchase: {e}"),
    }
}
