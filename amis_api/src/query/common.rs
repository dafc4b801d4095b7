//! URL templates for the paginated market price listing.
//!
//! The listing paginates by row offset in the path rather than by a page
//! query parameter: page 1 is served from the base URL, and every later page
//! from `{base}/{offset}` where the offset is a multiple of [`PER_PAGE`].

use crate::types::ProductId;

/// Market listing used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://amis.co.ke/site/market";

/// Rows requested per page. Also the step of the offset path segment.
pub const PER_PAGE: u64 = 3000;

/// URL of the first page for a product.
///
/// The base URL is not validated here; a malformed one surfaces as an error
/// when the page is fetched.
pub fn first_request(base_url: &str, product_id: ProductId) -> String {
    format!("{}?product={}&per_page={}", base_url, product_id, PER_PAGE)
}

/// URL of the page following `page_number` for a product.
pub fn next_request(base_url: &str, product_id: ProductId, page_number: u64) -> String {
    format!(
        "{}/{}?product={}&per_page={}",
        base_url,
        PER_PAGE * page_number,
        product_id,
        PER_PAGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_uses_base_url() {
        assert_eq!(
            first_request("https://amis.co.ke/site/market", 1),
            "https://amis.co.ke/site/market?product=1&per_page=3000"
        );
    }

    #[test]
    fn next_request_offsets_by_page_size() {
        assert_eq!(
            next_request("https://amis.co.ke/site/market", 7, 1),
            "https://amis.co.ke/site/market/3000?product=7&per_page=3000"
        );
        assert_eq!(
            next_request("https://amis.co.ke/site/market", 7, 4),
            "https://amis.co.ke/site/market/12000?product=7&per_page=3000"
        );
    }

    #[test]
    fn malformed_base_is_passed_through() {
        assert_eq!(first_request("not a url", 0), "not a url?product=0&per_page=3000");
    }
}
