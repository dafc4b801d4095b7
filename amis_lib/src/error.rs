//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer: bad configuration, HTML selector
/// setup, and failures writing the CSV output.
#[derive(Debug)]
pub enum AmisError {
    /// An error from the underlying page client.
    Api(amis_api::Error),
    /// User-provided input failed validation (e.g. a non-integer product id).
    InvalidInput(String),
    /// A configuration file could not be read or parsed.
    Config(String),
    /// The page parser could not be set up.
    Parse(String),
    /// The output file could not be created or appended to.
    Io(std::io::Error),
    /// A row could not be encoded as CSV.
    Csv(csv::Error),
    /// A crawl task panicked or was cancelled.
    Task(String),
}

impl fmt::Display for AmisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
            Self::Task(msg) => write!(f, "Crawl task failed: {}", msg),
        }
    }
}

impl std::error::Error for AmisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<amis_api::Error> for AmisError {
    fn from(e: amis_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<std::io::Error> for AmisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for AmisError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<crate::scrape::ScrapeError> for AmisError {
    fn from(e: crate::scrape::ScrapeError) -> Self {
        Self::Parse(e.to_string())
    }
}
