mod product;
pub use self::product::ProductId;

mod record;
pub use self::record::{Column, MarketRecord, MISSING_VALUE};
