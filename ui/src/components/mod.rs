pub mod app;
pub mod order_form;
pub mod purchase_history;
pub mod shared_state;
