//! Client configuration.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

pub const DEFAULT_API_BASE: &str = "https://pegasus-backend.super-elmore95.workers.dev";

pub(crate) const DEFAULT_UA: &str = concat!("pegasus-client/", env!("CARGO_PKG_VERSION"));

/// Days a "remember me" sign-in records as its expiry.
pub const DEFAULT_REMEMBER_DAYS: u32 = 30;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for every component built from one [`SessionContext`](crate::SessionContext).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the remote API, without the `/api` suffix.
    pub api_base: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Expiry recorded for remembered sign-ins (default: 30)
    pub remember_days: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_UA.to_string(),
            remember_days: DEFAULT_REMEMBER_DAYS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_remember_days(mut self, days: u32) -> Self {
        self.remember_days = days;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed API base. Always ends with `/` so relative joins keep any path prefix.
    pub fn base_url(&self) -> Result<Url> {
        let mut base = self.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }

    /// Build the shared HTTP client.
    pub fn build_http_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout())
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.remember_days, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let config = ClientConfig::new("http://localhost:8787/v1");
        let base = config.base_url().unwrap();
        assert_eq!(
            base.join("api/content").unwrap().as_str(),
            "http://localhost:8787/v1/api/content"
        );
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(ClientConfig::new("not a url").base_url().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base":"http://127.0.0.1:9000"}"#).unwrap();
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.remember_days, DEFAULT_REMEMBER_DAYS);
    }
}
