//! Pagination and the per-product crawl loop.
//!
//! Each product is walked page by page until a page comes back with at most
//! one `<tr>`. That count includes header rows, so a final page holding only
//! a header, or a single data row, ends the walk. The site gives no explicit
//! "last page" marker.

use std::collections::HashSet;
use std::sync::Arc;

use amis_api::types::ProductId;
use amis_api::MarketQuery;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::error::AmisError;
use crate::fetch::PageFetcher;
use crate::scrape::parse_page;
use crate::sink::CsvSink;

/// Default number of products crawled at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Where a product's crawl stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    /// `page` (1-based) is to be fetched next.
    Fetching { product_id: ProductId, page: u64 },
    /// No more pages will be requested for this product.
    Done { product_id: ProductId },
}

impl PageState {
    pub fn start(product_id: ProductId) -> Self {
        PageState::Fetching {
            product_id,
            page: 1,
        }
    }

    /// Transition after a page with `row_count` rows has been processed.
    pub fn advance(self, row_count: usize) -> Self {
        match self {
            PageState::Fetching { product_id, page } if row_count > 1 => PageState::Fetching {
                product_id,
                page: page + 1,
            },
            PageState::Fetching { product_id, .. } | PageState::Done { product_id } => {
                PageState::Done { product_id }
            }
        }
    }

    /// URL for the page this state is waiting on, or `None` once done.
    pub fn url(&self, base_url: &str) -> Option<String> {
        match *self {
            PageState::Fetching { product_id, page } => {
                Some(MarketQuery::new(product_id).with_page(page).to_url(base_url))
            }
            PageState::Done { .. } => None,
        }
    }
}

/// Rows seen and written for a single page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub row_count: usize,
    pub written: usize,
}

/// Parses `html` and appends its records to `sink`.
///
/// Synchronous on purpose: the parsed document cannot cross an await.
pub fn ingest_page(html: &str, sink: &CsvSink) -> Result<PageSummary, AmisError> {
    let page = parse_page(html)?;
    let row_count = page.row_count();
    let mut written = 0;
    for record in page.records() {
        if sink.append_record(&record)? {
            written += 1;
        } else {
            debug!("Skipping row without commodity");
        }
    }
    Ok(PageSummary { row_count, written })
}

/// Outcome of one product's crawl.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductReport {
    pub product_id: ProductId,
    pub pages: u64,
    pub rows_seen: usize,
    pub rows_written: usize,
    /// Set when a fetch failed and the crawl for this product stopped early.
    pub error: Option<String>,
}

/// Outcome of a whole run, one entry per distinct product id in order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CrawlReport {
    pub header_created: bool,
    pub products: Vec<ProductReport>,
}

impl CrawlReport {
    pub fn rows_written(&self) -> usize {
        self.products.iter().map(|p| p.rows_written).sum()
    }

    pub fn failed_products(&self) -> usize {
        self.products.iter().filter(|p| p.error.is_some()).count()
    }
}

/// Drives the crawl for every configured product.
pub struct Crawler<F> {
    config: Arc<ScrapeConfig>,
    fetcher: Arc<F>,
    sink: Arc<CsvSink>,
    concurrency: usize,
}

impl<F: PageFetcher + 'static> Crawler<F> {
    pub fn new(config: ScrapeConfig, fetcher: F) -> Self {
        let sink = CsvSink::new(config.csv_file_name.clone(), config.column_names.clone());
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many products are crawled at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Writes the header if needed, then crawls all products.
    ///
    /// A product id listed more than once is crawled once. Fetch failures
    /// end the affected product's crawl and are recorded in its report.
    /// Output write failures abort the run.
    pub async fn run(&self) -> Result<CrawlReport, AmisError> {
        let header_created = self.sink.ensure_header()?;
        if header_created {
            info!("Created {}", self.sink.path().display());
        }

        let product_ids = distinct_products(&self.config.product_ids);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, &product_id) in product_ids.iter().enumerate() {
            let config = Arc::clone(&self.config);
            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            let sem = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| AmisError::Task(e.to_string()))?;
                let report =
                    crawl_product(&config.base_url, product_id, fetcher.as_ref(), &sink).await?;
                Ok::<_, AmisError>((index, report))
            });
        }

        let mut reports: Vec<Option<ProductReport>> = vec![None; product_ids.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, report) = joined.map_err(|e| AmisError::Task(e.to_string()))??;
            reports[index] = Some(report);
        }

        Ok(CrawlReport {
            header_created,
            products: reports.into_iter().flatten().collect(),
        })
    }
}

// Their first page URLs would be identical, so later repeats are dropped.
fn distinct_products(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| {
            let first = seen.insert(*id);
            if !first {
                debug!("Product {} listed more than once, crawling it once", id);
            }
            first
        })
        .collect()
}

/// Walks one product's pages until the row-count check says stop.
pub async fn crawl_product<F: PageFetcher + ?Sized>(
    base_url: &str,
    product_id: ProductId,
    fetcher: &F,
    sink: &CsvSink,
) -> Result<ProductReport, AmisError> {
    let mut report = ProductReport {
        product_id,
        ..Default::default()
    };
    let mut state = PageState::start(product_id);

    while let PageState::Fetching { page, .. } = state {
        let Some(url) = state.url(base_url) else {
            break;
        };
        let html = match fetcher.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Product {} page {}: fetch of {} failed: {}", product_id, page, url, e);
                report.error = Some(e.to_string());
                break;
            }
        };

        let summary = ingest_page(&html, sink)?;
        report.pages += 1;
        report.rows_seen += summary.row_count;
        report.rows_written += summary.written;
        info!(
            "Product {} page {}: {} rows, {} written",
            product_id, page, summary.row_count, summary.written
        );

        state = state.advance(summary.row_count);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_page() {
        let state = PageState::start(3);
        assert_eq!(
            state.url("https://h/m").as_deref(),
            Some("https://h/m?product=3&per_page=3000")
        );
    }

    #[test]
    fn more_than_one_row_requests_next_page() {
        let state = PageState::start(3).advance(2);
        assert_eq!(state, PageState::Fetching { product_id: 3, page: 2 });
        assert_eq!(
            state.url("https://h/m").as_deref(),
            Some("https://h/m/3000?product=3&per_page=3000")
        );
        let state = state.advance(3001);
        assert_eq!(
            state.url("https://h/m").as_deref(),
            Some("https://h/m/6000?product=3&per_page=3000")
        );
    }

    #[test]
    fn page_urls_follow_market_query() {
        let base = "https://h/m";
        let mut state = PageState::start(7);
        for page in 1..=4u64 {
            assert_eq!(
                state.url(base),
                Some(MarketQuery::new(7).with_page(page).to_url(base))
            );
            state = state.advance(2);
        }
    }

    #[test]
    fn one_or_zero_rows_is_done() {
        assert_eq!(PageState::start(3).advance(1), PageState::Done { product_id: 3 });
        assert_eq!(PageState::start(3).advance(0), PageState::Done { product_id: 3 });
        let done = PageState::Done { product_id: 3 };
        assert_eq!(done.advance(10), done);
        assert_eq!(done.url("https://h/m"), None);
    }

    #[test]
    fn repeated_products_are_dropped_in_order() {
        assert_eq!(distinct_products(&[2, 1, 2, 3, 1]), vec![2, 1, 3]);
        assert_eq!(distinct_products(&[]), Vec::<ProductId>::new());
    }

    #[test]
    fn ingest_counts_header_rows_but_skips_them() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"), vec!["commodity".into()]);
        let html = "<table><tr><th>Commodity</th></tr><tr><td>Rice</td></tr>\
            <tr><td></td></tr></table>";
        let summary = ingest_page(html, &sink).unwrap();
        assert_eq!(summary, PageSummary { row_count: 3, written: 1 });
        assert_eq!(
            std::fs::read_to_string(sink.path()).unwrap(),
            "Rice\r\n"
        );
    }
}
