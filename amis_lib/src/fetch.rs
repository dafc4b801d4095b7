//! The page fetching seam between the crawl and the network.

use async_trait::async_trait;

/// Fetches a listing page by URL and returns its HTML.
///
/// The crawl only ever talks to this trait. Scheduling across products,
/// timeouts and retries belong to the implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, amis_api::Error>;
}

#[async_trait]
impl PageFetcher for amis_api::Client {
    async fn fetch_page(&self, url: &str) -> Result<String, amis_api::Error> {
        self.get_html(url).await
    }
}
