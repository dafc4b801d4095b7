//! Error types for the market page client.

/// Errors that can occur when fetching a market page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL handed to the client could not be parsed.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The site returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// Whether a fresh attempt at the same URL could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::InvalidUrl { .. } => false,
            Error::RequestFailed => true,
            Error::HttpStatus { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
        }
    }
}
