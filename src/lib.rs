pub use client::LiquipediaClient;
pub use driver::{ScrapeReport, Scraper, DEFAULT_SEED_TEAMS};
pub use error::{Result, ScrapeError};

pub mod client;
pub mod driver;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod scrape;
pub mod sink;
