mod client;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{first_request, next_request, MarketQuery, DEFAULT_BASE_URL, PER_PAGE};
