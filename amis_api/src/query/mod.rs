mod common;
pub use self::common::{first_request, next_request, DEFAULT_BASE_URL, PER_PAGE};

mod market;
pub use self::market::MarketQuery;
