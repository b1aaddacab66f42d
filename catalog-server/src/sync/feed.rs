//! Upstream catalog feed client
//!
//! Fetches the paginated products feed. The access token travels in the
//! X-Access-Token header. Every page is validated before it is accepted;
//! a malformed page aborts the run.

use super::SyncError;
use shared::catalog::{CatalogPage, CatalogProduct};
use std::time::Duration;
use validator::Validate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the upstream catalog feed
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    access_token: String,
    page_size: u32,
}

impl FeedClient {
    pub fn new(url: &str, access_token: &str, page_size: u32) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.to_string(),
            access_token: access_token.to_string(),
            page_size,
        })
    }

    /// Fetch the complete catalog, following pagination until a short page
    pub async fn fetch_all(&self) -> Result<Vec<CatalogProduct>, SyncError> {
        let mut products = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self.fetch_page(page).await?;
            let len = batch.len();
            products.extend(batch);

            if (len as u32) < self.page_size {
                break;
            }
            page += 1;
        }

        tracing::info!(count = products.len(), pages = page, "Catalog feed fetched");
        Ok(products)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<CatalogProduct>, SyncError> {
        let response = self
            .http
            .get(&self.url)
            .header("X-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .query(&[("limit", self.page_size), ("page", page)])
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Feed {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CatalogPage = response
            .json()
            .await
            .map_err(|e| SyncError::Malformed(format!("page {page}: {e}")))?;

        payload
            .validate()
            .map_err(|e| SyncError::Malformed(format!("page {page}: {e}")))?;

        Ok(payload.products)
    }
}
