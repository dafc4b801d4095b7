//! The `columns` subcommand: lists selectable output columns.

use amis_lib::types::Column;

use crate::output::{print_columns_markdown, print_columns_table, print_json, OutputFormat};

pub fn run(format: &OutputFormat) {
    let columns = Column::ALL;
    match format {
        OutputFormat::Table => print_columns_table(&columns),
        OutputFormat::Markdown => print_columns_markdown(&columns),
        OutputFormat::Json => {
            let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
            print_json(&names);
        }
    }
}
