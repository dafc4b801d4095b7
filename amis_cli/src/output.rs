use amis_lib::types::{Column, ProductId};
use amis_lib::{CrawlReport, ProductReport};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Product")]
    product_id: ProductId,
    #[tabled(rename = "Pages")]
    pages: u64,
    #[tabled(rename = "Rows")]
    rows_seen: usize,
    #[tabled(rename = "Written")]
    rows_written: usize,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: &'static str,
    #[tabled(rename = "Cell")]
    position: usize,
}

fn build_report_rows(products: &[ProductReport]) -> Vec<ReportRow> {
    products
        .iter()
        .map(|p| ReportRow {
            product_id: p.product_id,
            pages: p.pages,
            rows_seen: p.rows_seen,
            rows_written: p.rows_written,
            status: match p.error {
                Some(ref e) => format!("stopped: {}", e),
                None => "done".to_string(),
            },
        })
        .collect()
}

fn build_column_rows(columns: &[Column]) -> Vec<ColumnRow> {
    columns
        .iter()
        .map(|c| ColumnRow {
            name: c.name(),
            position: c.cell_position(),
        })
        .collect()
}

// -- Table output --

pub fn print_report_table(report: &CrawlReport) {
    println!("{}", Table::new(build_report_rows(&report.products)));
}

pub fn print_columns_table(columns: &[Column]) {
    println!("{}", Table::new(build_column_rows(columns)));
}

// -- Markdown output --

pub fn print_report_markdown(report: &CrawlReport) {
    let mut table = Table::new(build_report_rows(&report.products));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_columns_markdown(columns: &[Column]) {
    let mut table = Table::new(build_column_rows(columns));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
