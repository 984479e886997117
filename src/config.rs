//! HTTP client configuration.
//!
//! Parsed from TOML by the caller; every field has a default so an empty
//! document is a valid config.
//!
//! ```toml
//! user_agent = "skraper/0.1"
//! timeout_secs = 20
//!
//! [headers]
//! Accept-Language = "de-DE"
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SkraperError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Fixed User-Agent. When unset a random browser profile is used.
    pub user_agent: Option<String>,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Extra default headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Keep a cookie jar across requests.
    pub cookies: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_redirects: 10,
            headers: BTreeMap::new(),
            cookies: true,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SkraperError::Config(e.to_string()))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parse_partial_config() {
        let config = ClientConfig::from_toml_str(
            r#"
user_agent = "skraper-test"
timeout_secs = 5
cookies = false

[headers]
Accept-Language = "de-DE"
"#,
        )
        .unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("skraper-test"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_redirects, 10);
        assert!(!config.cookies);
        assert_eq!(config.headers.get("Accept-Language").map(String::as_str), Some("de-DE"));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ClientConfig::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, SkraperError::Config(_)));
    }
}
