mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "amis")]
#[command(about = "Scrape commodity market prices from the AMIS Kenya market listing into CSV")]
struct Cli {
    /// Summary format: table, markdown or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the listing for one or more products and append rows to a CSV file
    Scrape(commands::scrape::ScrapeArgs),
    /// List the column names that can be selected for output
    Columns,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("amis=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Scrape(args) => commands::scrape::run(args, &format).await?,
        Commands::Columns => commands::columns::run(&format),
    }

    Ok(())
}
