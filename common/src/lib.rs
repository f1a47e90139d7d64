pub mod catalog;
pub mod currency;
pub mod inventory;
pub mod order;
pub mod purchase;
