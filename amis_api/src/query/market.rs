use crate::types::ProductId;

use super::common::{first_request, next_request};

/// Builder for a single market listing request: one product, one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketQuery {
    /// Product (commodity category) id sent as the `product` parameter.
    pub product_id: ProductId,
    /// Page number (1-indexed). Defaults to 1.
    pub page: u64,
}

impl MarketQuery {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            page: 1,
        }
    }

    /// Sets the page number. Values below 1 are clamped to the first page.
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page.max(1);
        self
    }

    /// The query for the page after this one.
    pub fn next_page(self) -> Self {
        self.with_page(self.page + 1)
    }

    /// Renders the request URL against `base_url`.
    ///
    /// Page 1 has no offset segment; page `n` uses the offset of the rows
    /// already served by the `n - 1` pages before it.
    pub fn to_url(&self, base_url: &str) -> String {
        if self.page <= 1 {
            first_request(base_url, self.product_id)
        } else {
            next_request(base_url, self.product_id, self.page - 1)
        }
    }
}
