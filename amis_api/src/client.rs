//! HTTP client for the market price listing.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// HTTP client that fetches market listing pages as raw HTML.
///
/// Sends requests with browser-like headers and a randomized user agent.
/// The underlying `reqwest::Client` is built once, with a 30-second
/// timeout, and reused for every page.
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self { http })
    }

    fn get_url(url: &str) -> Result<Url, Error> {
        Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL {}: {}", url, e);
            Error::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Fetches `url` and returns the response body.
    pub async fn get_html(&self, url: &str) -> Result<String, Error> {
        let url = Self::get_url(url)?;
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("upgrade-insecure-requests", "1")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", url, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request to {} failed with status {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
