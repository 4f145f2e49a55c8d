//! Service configuration
//!
//! A read-only key/value store shared by all stream services, plus an
//! explicit region hint used by services that are geo-restricted.
//!
//! ```toml
//! region = "en_AU"
//!
//! [settings]
//! proxy = "127.0.0.1:8080"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, StreamServiceError};

/// Key holding the proxy address in `host:port` form
pub const PROXY_KEY: &str = "proxy";

/// Configuration store consulted by stream services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Locale or region the requests are expected to egress from (e.g. "en_AU")
    #[serde(default)]
    pub region: Option<String>,
    /// Free-form string settings
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

impl ServiceConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    ///
    /// # Errors
    /// Returns `StreamServiceError::ConfigError` if the text is not valid TOML
    /// or does not match the expected layout.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Set a string setting
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Set the region hint
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Look up a setting, falling back to `default` when absent
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.settings.get(key).map(String::as_str).unwrap_or(default)
    }

    /// The configured proxy, if the `proxy` setting looks like `host:port`
    ///
    /// A value without a colon means "no proxy". A value with a colon but an
    /// unusable port is logged and ignored.
    pub fn proxy(&self) -> Option<ProxyAddress> {
        let value = self.get(PROXY_KEY, "");
        if !value.contains(':') {
            return None;
        }

        match value.parse() {
            Ok(proxy) => Some(proxy),
            Err(e) => {
                warn!(error = %e, "Ignoring proxy setting");
                None
            }
        }
    }

    /// The configured region hint, if any
    pub fn region_hint(&self) -> Option<RegionHint> {
        self.region.as_deref().map(RegionHint::new)
    }
}

/// Proxy address split from a `host:port` setting
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyAddress {
    pub host: String,
    pub port: u16,
}

impl ProxyAddress {
    /// Proxy URL understood by the HTTP client
    pub fn to_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl FromStr for ProxyAddress {
    type Err = StreamServiceError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .split_once(':')
            .ok_or_else(|| StreamServiceError::InvalidProxy(s.to_string()))?;

        let host = host.trim();
        if host.is_empty() {
            return Err(StreamServiceError::InvalidProxy(s.to_string()));
        }

        let port = port
            .trim()
            .parse()
            .map_err(|_| StreamServiceError::InvalidProxy(s.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Where requests are believed to originate from
///
/// Only a hint: a locale says nothing certain about the network egress region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionHint(String);

impl RegionHint {
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// Derive a hint from the process locale variables
    ///
    /// Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in that order and returns
    /// the first non-empty value.
    pub fn from_locale_env() -> Option<Self> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .map(Self)
    }

    /// Whether the hint points at Australia or New Zealand
    pub fn is_oceania(&self) -> bool {
        self.0.contains("AU") || self.0.contains("NZ")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_default() {
        let config = ServiceConfig::new().with_setting("proxy", "10.0.0.1:3128");
        assert_eq!(config.get("proxy", ""), "10.0.0.1:3128");
        assert_eq!(config.get("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_proxy_parsed_from_setting() {
        let config = ServiceConfig::new().with_setting("proxy", "10.0.0.1:3128");
        let proxy = config.proxy().unwrap();
        assert_eq!(proxy.host, "10.0.0.1");
        assert_eq!(proxy.port, 3128);
        assert_eq!(proxy.to_url(), "http://10.0.0.1:3128");
    }

    #[test]
    fn test_proxy_without_colon_is_ignored() {
        let config = ServiceConfig::new().with_setting("proxy", "localhost");
        assert!(config.proxy().is_none());
        assert!(ServiceConfig::new().proxy().is_none());
    }

    #[test]
    fn test_proxy_with_bad_port_is_ignored() {
        let config = ServiceConfig::new().with_setting("proxy", "localhost:http");
        assert!(config.proxy().is_none());
    }

    #[test]
    fn test_proxy_address_parse_errors() {
        assert!(matches!(
            "localhost".parse::<ProxyAddress>(),
            Err(StreamServiceError::InvalidProxy(_))
        ));
        assert!(matches!(
            ":8080".parse::<ProxyAddress>(),
            Err(StreamServiceError::InvalidProxy(_))
        ));
        assert!(matches!(
            "localhost:99999".parse::<ProxyAddress>(),
            Err(StreamServiceError::InvalidProxy(_))
        ));
    }

    #[test]
    fn test_proxy_address_display() {
        let proxy: ProxyAddress = "proxy.example.au:8080".parse().unwrap();
        assert_eq!(proxy.to_string(), "proxy.example.au:8080");
    }

    #[test]
    fn test_from_toml_str() {
        let config = ServiceConfig::from_toml_str(
            r#"
            region = "en_NZ"

            [settings]
            proxy = "127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.region.as_deref(), Some("en_NZ"));
        assert_eq!(config.proxy().unwrap().port, 8080);
        assert!(config.region_hint().unwrap().is_oceania());
    }

    #[test]
    fn test_from_toml_str_empty() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = ServiceConfig::from_toml_str("settings = 3");
        assert!(matches!(result, Err(StreamServiceError::ConfigError(_))));
    }

    #[test]
    fn test_region_hint_is_oceania() {
        assert!(RegionHint::new("en_AU.UTF-8").is_oceania());
        assert!(RegionHint::new("en_NZ").is_oceania());
        assert!(!RegionHint::new("en_US.UTF-8").is_oceania());
        assert!(!RegionHint::new("de_DE").is_oceania());
    }
}
