pub mod aggregator;
pub mod composer;
pub mod config;
pub mod error;
pub mod observability;
pub mod security;
pub mod server;
pub mod storage;
pub mod upstream;

pub use aggregator::SummaryAggregator;
pub use composer::CustomerSummary;
pub use config::Config;
pub use error::{Result, SummaryError};
pub use storage::SummaryCache;
