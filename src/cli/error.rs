//! CLI error types and conversions

use crate::daterange::DateRangeError;
use crate::fetcher::FetcherError;

/// CLI errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Fetcher error
    #[error("fetcher error: {0}")]
    Fetcher(#[from] FetcherError),

    /// Date range error
    #[error("date range error: {0}")]
    DateRange(#[from] DateRangeError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Server error
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
