//! Service configuration, loaded from TOML.
//!
//! Every section has defaults, so an empty file (or no file at all) yields
//! a configuration pointing at the production provider URLs.

use crate::error::{Result, SummaryError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file when none is given explicitly.
pub const CONFIG_ENV: &str = "SUMMARY_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub financero: FinanceroConfig,
    pub oderino: OderinoConfig,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Provider A: billing and invoicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceroConfig {
    /// Address and billing-info endpoints.
    pub base_url: String,
    /// Invoice endpoints, versioned separately.
    pub invoices_url: String,
}

/// Provider B: orders and fulfilment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OderinoConfig {
    /// Customer order listing.
    pub base_url: String,
    /// Order details and jobs.
    pub orders_url: String,
    /// Delivery details.
    pub delivery_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_secs: u64,
    pub max_concurrent_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for FinanceroConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financero.api.com/v1".to_string(),
            invoices_url: "https://financero.mockapi.com/v3-1".to_string(),
        }
    }
}

impl Default for OderinoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://oderino.mockapi.com/v1".to_string(),
            orders_url: "https://oderino.api.com/v2".to_string(),
            delivery_url: "https://oderino.api.com/v1".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_concurrent_orders: 8,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl FinanceroConfig {
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url("financero.base_url", &self.base_url)
    }

    pub fn invoices_url(&self) -> Result<Url> {
        parse_base_url("financero.invoices_url", &self.invoices_url)
    }
}

impl OderinoConfig {
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url("oderino.base_url", &self.base_url)
    }

    pub fn orders_url(&self) -> Result<Url> {
        parse_base_url("oderino.orders_url", &self.orders_url)
    }

    pub fn delivery_url(&self) -> Result<Url> {
        parse_base_url("oderino.delivery_url", &self.delivery_url)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, falling back to `$SUMMARY_CONFIG`, then to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.financero.base_url()?;
        self.financero.invoices_url()?;
        self.oderino.base_url()?;
        self.oderino.orders_url()?;
        self.oderino.delivery_url()?;

        if self.upstream.timeout_secs == 0 {
            return Err(SummaryError::InvalidConfig(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.upstream.max_concurrent_orders == 0 {
            return Err(SummaryError::InvalidConfig(
                "upstream.max_concurrent_orders must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| SummaryError::InvalidConfig(format!("{key}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(SummaryError::InvalidConfig(format!(
            "{key}: {raw} cannot be used as a base URL"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.upstream.timeout(), Duration::from_secs(5));
        assert_eq!(config.financero.base_url, "https://financero.api.com/v1");
        assert_eq!(config.oderino.orders_url, "https://oderino.api.com/v2");
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [cache]
            ttl_secs = 5

            [oderino]
            delivery_url = "http://localhost:9000/v1"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.ttl_secs, 5);
        assert_eq!(config.oderino.delivery_url, "http://localhost:9000/v1");
        assert_eq!(config.oderino.base_url, "https://oderino.mockapi.com/v1");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_bad_urls() {
        let err = Config::from_toml_str("[financero]\nbase_url = \"not a url\"").unwrap_err();
        assert!(matches!(err, SummaryError::InvalidConfig(msg) if msg.starts_with("financero.base_url")));

        let err = Config::from_toml_str("[oderino]\norders_url = \"mailto:ops@example.com\"").unwrap_err();
        assert!(matches!(err, SummaryError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(Config::from_toml_str("[upstream]\ntimeout_secs = 0").is_err());
        assert!(Config::from_toml_str("[upstream]\nmax_concurrent_orders = 0").is_err());
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let config = Config::from_toml_str(include_str!("../../summary.example.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unparseable_toml() {
        let err = Config::from_toml_str("[cache\nttl_secs = 1").unwrap_err();
        assert!(matches!(err, SummaryError::Toml(_)));
    }
}
