use dioxus::prelude::*;

use super::order_form::OrderForm;
use super::purchase_history::PurchaseHistory;
use super::shared_state::{provide_session, refresh_inventory};

#[component]
pub fn App() -> Element {
    let session = provide_session();

    // Initial inventory load
    use_future(move || refresh_inventory(session));

    rsx! {
        div { class: "fruitstand-app",
            header { class: "app-header",
                h1 { "Fruit Stand" }
            }
            PurchaseHistory {}
            OrderForm {}
        }
    }
}
