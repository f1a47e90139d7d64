use dioxus::prelude::*;

use fruitstand_common::currency::format_amount;

use super::shared_state::{submit_order, use_session};

#[component]
pub fn OrderForm() -> Element {
    let mut session = use_session();

    let state = session.read();
    let lines = state.order().lines().to_vec();
    // (fruit, remaining) for the dropdown
    let options: Vec<(String, i64)> = state
        .inventory()
        .iter()
        .map(|(fruit, level)| (fruit.to_string(), level.count))
        .collect();
    let total = format_amount(state.last_total());
    let accepted = state.preview().accepted;
    drop(state);

    rsx! {
        div { class: "order-form",
            h2 { "Total Amount: {total}" }
            {lines.into_iter().enumerate().map(|(index, line)| {
                let options = options.clone();
                let counted = accepted.contains(&index);
                let class = if counted { "order-line accepted" } else { "order-line" };
                rsx! {
                    div { class: "{class}",
                        key: "{index}",
                        div { class: "form-group",
                            select {
                                value: "{line.fruit}",
                                onchange: move |evt| {
                                    session.write().order_mut().set_fruit(index, evt.value());
                                },
                                option { value: "", "Select Fruit" }
                                {options.into_iter().map(|(fruit, count)| rsx! {
                                    option { key: "{fruit}", value: "{fruit}", "{fruit} ({count} left)" }
                                })}
                            }
                        }
                        div { class: "form-group",
                            label { "Quantity:" }
                            input {
                                r#type: "number",
                                value: "{line.quantity}",
                                oninput: move |evt| {
                                    session.write().order_mut().set_quantity_input(index, &evt.value());
                                },
                            }
                        }
                        if counted {
                            span { class: "line-status", "in total" }
                        }
                        button {
                            onclick: move |_| session.write().order_mut().add_line(),
                            "Add Row"
                        }
                        button {
                            onclick: move |_| session.write().order_mut().remove_line(index),
                            "Remove Row"
                        }
                    }
                }
            })}
            button {
                class: "purchase",
                onclick: move |_| {
                    spawn(submit_order(session));
                },
                "Purchase"
            }
        }
    }
}
