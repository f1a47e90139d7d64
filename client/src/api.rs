use fruitstand_common::inventory::InventorySnapshot;
use fruitstand_common::purchase::{PurchaseRecord, PurchaseRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

/// Where the storefront API runs.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed client for the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /fruits`
    pub async fn inventory(&self) -> Result<InventorySnapshot, ClientError> {
        let resp = self.http.get(self.url("/fruits")).send().await?;
        decode(resp).await
    }

    /// `GET /purchases`
    pub async fn purchases(&self) -> Result<Vec<PurchaseRecord>, ClientError> {
        let resp = self.http.get(self.url("/purchases")).send().await?;
        decode(resp).await
    }

    /// `POST /purchases`
    pub async fn submit(&self, request: &PurchaseRequest) -> Result<Vec<PurchaseRecord>, ClientError> {
        let resp = self
            .http
            .post(self.url("/purchases"))
            .json(request)
            .send()
            .await?;
        decode(resp).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(ApiClient::new().base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(client.url("/fruits"), "http://127.0.0.1:9000/fruits");
    }
}
