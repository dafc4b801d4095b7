//! The `scrape` subcommand: crawls the market listing and appends rows to
//! the output CSV.

use std::path::PathBuf;
use std::time::Duration;

use amis_lib::amis_api::Client;
use amis_lib::validation;
use amis_lib::{ConfigOverrides, Crawler, RetryConfig, RetryingFetcher, ScrapeConfig};
use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{print_json, print_report_markdown, print_report_table, OutputFormat};

/// Arguments for the `scrape` subcommand.
///
/// Every setting can also come from a TOML file (`--config`) or an
/// `AMIS_*` environment variable. Flags win over the environment, which
/// wins over the file.
#[derive(Args)]
pub struct ScrapeArgs {
    /// Listing URL [default: https://amis.co.ke/site/market]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Product ids to crawl, comma-separated (e.g. 1,2,7) [default: 1]
    #[arg(long)]
    pub product_ids: Option<String>,

    /// Output columns, comma-separated, in order [default: all nine]
    #[arg(long)]
    pub column_names: Option<String>,

    /// Output CSV file, created with a header if missing [default: commodity_data.csv]
    #[arg(long)]
    pub csv_file_name: Option<String>,

    /// TOML config file with base_url, product_ids, column_names, csv_file_name
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of products crawled at once (1-64)
    #[arg(long, default_value = "8")]
    pub concurrency: usize,

    /// Give up on a page after the first failed fetch
    #[arg(long)]
    pub no_retry: bool,
}

impl ScrapeArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            product_ids: self.product_ids.clone(),
            column_names: self.column_names.clone(),
            csv_file_name: self.csv_file_name.clone(),
        }
    }
}

/// Layers file, environment and flags into the run configuration.
pub fn resolve_config(args: &ScrapeArgs, env: &ConfigOverrides) -> Result<ScrapeConfig> {
    let base = match args.config {
        Some(ref path) => ScrapeConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    let config = base.apply(env)?.apply(&args.overrides())?;
    Ok(config)
}

pub async fn run(args: &ScrapeArgs, format: &OutputFormat) -> Result<()> {
    let concurrency = validation::validate_concurrency(args.concurrency)?;
    let config = resolve_config(args, &ConfigOverrides::from_env())?;

    let unknown = validation::unknown_columns(&config.column_names);
    if !unknown.is_empty() {
        tracing::warn!(
            "Unknown columns will be left empty: {} (see `amis columns`)",
            unknown.join(", ")
        );
    }

    eprintln!(
        "Scraping {} product(s) from {} into {}",
        config.product_ids.len(),
        config.base_url,
        config.csv_file_name.display()
    );

    let retry = if args.no_retry {
        RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        }
    } else {
        RetryConfig::from_env()
    };
    let fetcher = RetryingFetcher::new(Client::new()?, retry);
    let crawler = Crawler::new(config, fetcher).with_concurrency(concurrency);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("crawling market pages...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = crawler.run().await;
    pb.finish_and_clear();
    let report = result?;

    match format {
        OutputFormat::Table => print_report_table(&report),
        OutputFormat::Markdown => print_report_markdown(&report),
        OutputFormat::Json => print_json(&report),
    }

    let failed = report.failed_products();
    if failed > 0 {
        eprintln!(
            "Note: {} product(s) stopped early after a failed fetch.",
            failed
        );
    }
    eprintln!(
        "Wrote {} row(s) to {}",
        report.rows_written(),
        crawler.config().csv_file_name.display()
    );
    Ok(())
}
