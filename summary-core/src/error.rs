use crate::security::ValidationError;
use crate::upstream::{Endpoint, UpstreamError};
use prometheus::Error as PrometheusError;
use reqwest::Error as ReqwestError;
use std::io::Error as IoError;
use thiserror::Error;
use toml::de::Error as TomlError;

#[derive(Error, Debug)]
pub enum SummaryError {
    /// A fatal upstream outcome. Aborts the whole aggregation run.
    #[error("{endpoint} call for {subject} failed: {source}")]
    Upstream {
        endpoint: Endpoint,
        subject: String,
        #[source]
        source: UpstreamError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Config parse error: {0}")]
    Toml(#[from] TomlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] ReqwestError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] PrometheusError),
}

impl SummaryError {
    /// True when the caller sent something unusable, as opposed to an
    /// upstream or local failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SummaryError::InvalidInput(_))
    }

    /// True when the run was aborted by a fatal upstream outcome.
    pub fn is_upstream_abort(&self) -> bool {
        matches!(self, SummaryError::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
