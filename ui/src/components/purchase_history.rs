use dioxus::prelude::*;

use super::shared_state::{load_history, use_session};

#[component]
pub fn PurchaseHistory() -> Element {
    let session = use_session();
    let history = session.read().history().to_vec();

    rsx! {
        div { class: "purchase-history",
            button {
                onclick: move |_| {
                    spawn(load_history(session));
                },
                "Show Purchase History"
            }
            if !history.is_empty() {
                table {
                    thead {
                        tr {
                            th { "Fruit" }
                            th { "Quantity" }
                            th { "Total Price($)" }
                            th { "Timestamp" }
                        }
                    }
                    tbody {
                        {history.into_iter().map(|purchase| {
                            let when = purchase.timestamp.to_rfc3339();
                            rsx! {
                                tr { key: "{purchase.id.0}",
                                    td { "{purchase.fruit}" }
                                    td { "{purchase.quantity}" }
                                    td { "{purchase.total_price}" }
                                    td { "{when}" }
                                }
                            }
                        })}
                    }
                }
            }
        }
    }
}
