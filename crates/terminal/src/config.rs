//! Terminal configuration, read from `TILLPOINT_*` environment variables.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tillpoint_core::TaxRate;
use tillpoint_data::{FileStore, HttpFileStore, HttpRemoteStore, InMemoryFileStore, InMemoryRemoteStore, RemoteStore};
use tillpoint_inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use tillpoint_sales::DEFAULT_RECEIPT_PREFIX;

const ENV_PREFIX: &str = "TILLPOINT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// REST endpoint of the hosted backend. Unset means offline (in-memory).
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// Object storage endpoint for menu images. Unset means in-memory.
    pub storage_url: Option<String>,
    pub storage_bucket: String,
    /// Sales tax in basis points (1200 = 12%).
    pub tax_rate_bps: u32,
    pub receipt_prefix: String,
    pub default_low_stock_threshold: u32,
    pub request_timeout_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            storage_url: None,
            storage_bucket: "menu-images".to_string(),
            tax_rate_bps: TaxRate::STANDARD.basis_points(),
            receipt_prefix: DEFAULT_RECEIPT_PREFIX.to_string(),
            default_low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            request_timeout_ms: 10_000,
        }
    }
}

impl TerminalConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let config = Self {
            api_url: get("API_URL"),
            api_key: get("API_KEY"),
            storage_url: get("STORAGE_URL"),
            storage_bucket: get("STORAGE_BUCKET").unwrap_or(defaults.storage_bucket),
            tax_rate_bps: parse_or(get("TAX_RATE_BPS"), "TAX_RATE_BPS", defaults.tax_rate_bps)?,
            receipt_prefix: get("RECEIPT_PREFIX").unwrap_or(defaults.receipt_prefix),
            default_low_stock_threshold: parse_or(
                get("LOW_STOCK_THRESHOLD"),
                "LOW_STOCK_THRESHOLD",
                defaults.default_low_stock_threshold,
            )?,
            request_timeout_ms: parse_or(
                get("REQUEST_TIMEOUT_MS"),
                "REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,
        };
        config.check()?;

        if config.api_url.is_none() {
            tracing::warn!("TILLPOINT_API_URL not set; using in-memory backend");
        }
        Ok(config)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.tax_rate_bps > 10_000 {
            bail!("tax rate {} bps is above 100%", self.tax_rate_bps);
        }
        if self.storage_bucket.is_empty() || self.storage_bucket.contains('/') {
            bail!("storage bucket {:?} must be a single path segment", self.storage_bucket);
        }
        if self.receipt_prefix.is_empty() || !self.receipt_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("receipt prefix {:?} must be non-empty and alphanumeric", self.receipt_prefix);
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_basis_points(self.tax_rate_bps)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// HTTP store when an API URL is configured, otherwise an in-memory one.
    pub fn remote_store(&self) -> anyhow::Result<Arc<dyn RemoteStore>> {
        let Some(url) = &self.api_url else {
            return Ok(Arc::new(InMemoryRemoteStore::new()));
        };
        let mut store = HttpRemoteStore::new(url.as_str())
            .with_timeout(self.request_timeout())
            .context("failed to build HTTP client")?;
        if let Some(key) = &self.api_key {
            store = store.with_api_key(key.as_str());
        }
        Ok(Arc::new(store))
    }

    /// Bucket storage when a storage URL is configured, otherwise in-memory.
    pub fn file_store(&self) -> anyhow::Result<Arc<dyn FileStore>> {
        let Some(url) = &self.storage_url else {
            return Ok(Arc::new(InMemoryFileStore::new()));
        };
        let mut files = HttpFileStore::new(url.as_str(), self.storage_bucket.as_str())
            .with_timeout(self.request_timeout())
            .context("failed to build storage client")?;
        if let Some(key) = &self.api_key {
            files = files.with_api_key(key.as_str());
        }
        Ok(Arc::new(files))
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{ENV_PREFIX}{name} must be a number, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = TerminalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TerminalConfig::default());
        assert_eq!(config.tax_rate(), TaxRate::STANDARD);
        assert_eq!(config.receipt_prefix, "RCP");
        assert_eq!(config.default_low_stock_threshold, 10);
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = TerminalConfig::from_lookup(lookup(&[
            ("TILLPOINT_API_URL", "https://db.example.com/rest/v1"),
            ("TILLPOINT_API_KEY", "anon"),
            ("TILLPOINT_TAX_RATE_BPS", "800"),
            ("TILLPOINT_RECEIPT_PREFIX", "POS1"),
            ("TILLPOINT_REQUEST_TIMEOUT_MS", " 2500 "),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://db.example.com/rest/v1"));
        assert_eq!(config.tax_rate().basis_points(), 800);
        assert_eq!(config.receipt_prefix, "POS1");
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn storage_settings_are_read() {
        let config = TerminalConfig::from_lookup(lookup(&[
            ("TILLPOINT_STORAGE_URL", "https://db.example.com/storage/v1"),
            ("TILLPOINT_STORAGE_BUCKET", "pos-images"),
        ]))
        .unwrap();
        assert_eq!(config.storage_url.as_deref(), Some("https://db.example.com/storage/v1"));
        assert_eq!(config.storage_bucket, "pos-images");
        assert!(config.file_store().is_ok());

        assert!(TerminalConfig::from_lookup(lookup(&[("TILLPOINT_STORAGE_BUCKET", "a/b")])).is_err());
    }

    #[tokio::test]
    async fn offline_file_store_keeps_uploads_in_memory() {
        let files = TerminalConfig::default().file_store().unwrap();
        let uploaded = files.upload("menu/x/a.png", vec![1, 2], "image/png").await.unwrap();
        assert_eq!(uploaded.path, "menu/x/a.png");
        files.remove("menu/x/a.png").await.unwrap();
        assert!(files.remove("menu/x/a.png").await.is_err());
    }

    #[test]
    fn rejects_bad_values() {
        let err = TerminalConfig::from_lookup(lookup(&[("TILLPOINT_TAX_RATE_BPS", "twelve")])).unwrap_err();
        assert!(err.to_string().contains("TILLPOINT_TAX_RATE_BPS"));

        assert!(TerminalConfig::from_lookup(lookup(&[("TILLPOINT_TAX_RATE_BPS", "12000")])).is_err());
        assert!(TerminalConfig::from_lookup(lookup(&[("TILLPOINT_RECEIPT_PREFIX", "R-1")])).is_err());
    }

    #[test]
    fn deserializes_partial_json() {
        let config: TerminalConfig = serde_json::from_str(r#"{ "tax_rate_bps": 500 }"#).unwrap();
        assert_eq!(config.tax_rate_bps, 500);
        assert_eq!(config.receipt_prefix, "RCP");
    }
}
