use amis_api::types::{Column, ProductId};

use crate::error::AmisError;

/// Upper bound on concurrently crawled products.
pub const MAX_CONCURRENCY: usize = 64;

/// Parse a comma-separated product id list such as `"1, 2,7"`.
///
/// Empty input means "no ids given" and yields an empty list; the caller
/// substitutes the default. Any entry that is not a non-negative integer
/// (including a whitespace-only entry) is an error.
pub fn parse_product_ids(input: &str) -> Result<Vec<ProductId>, AmisError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<ProductId>().map_err(|e| {
                AmisError::InvalidInput(format!("invalid product id '{}': {}", part, e))
            })
        })
        .collect()
}

/// Split a comma-separated column list. Names are kept as written; lookups
/// trim them, so `"commodity, retail"` selects both columns while the header
/// keeps the leading space. Blank input yields an empty list.
pub fn parse_column_names(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    input.split(',').map(str::to_string).collect()
}

/// Column names that do not match any known column. These are written as
/// empty fields, so callers may want to warn about them.
pub fn unknown_columns(columns: &[String]) -> Vec<&str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|name| name.parse::<Column>().is_err())
        .collect()
}

/// Validate the crawl concurrency (1-64).
pub fn validate_concurrency(value: usize) -> Result<usize, AmisError> {
    if value == 0 || value > MAX_CONCURRENCY {
        return Err(AmisError::InvalidInput(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, value
        )));
    }
    Ok(value)
}
