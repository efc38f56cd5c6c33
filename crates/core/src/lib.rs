pub mod config;
pub mod error;
pub mod types;
pub mod urltools;

pub use config::CrawlConfig;
pub use error::CrawlError;
pub use types::*;
