//! HTTP client and shopping session for the fruit stand API.

pub mod api;
pub mod error;
pub mod session;

pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use session::OrderSession;
