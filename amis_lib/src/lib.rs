//! Library layer for the AMIS market price scraper: row extraction, price
//! cleanup, CSV output, and the paginated crawl.
//!
//! Wraps the `amis_api` page client with configuration layering, a retrying
//! fetcher, and the pipeline that turns listing pages into CSV rows.

pub mod client;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod scrape;
pub mod sink;
pub mod validation;

pub use amis_api;
pub use amis_api::types;
pub use amis_api::{first_request, next_request, MarketQuery};

pub use client::{RetryConfig, RetryingFetcher};
pub use config::{ConfigOverrides, ScrapeConfig};
pub use crawl::{CrawlReport, Crawler, PageState, ProductReport};
pub use error::AmisError;
pub use fetch::PageFetcher;
pub use normalize::extract_price;
pub use scrape::{parse_page, ParsedPage, ScrapeError};
pub use sink::CsvSink;
