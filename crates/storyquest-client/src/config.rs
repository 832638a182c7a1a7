//! Client configuration.

use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

/// Base URL used when `STORYQUEST_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Request timeout used when `STORYQUEST_TIMEOUT_SECS` is unset. Chapter
/// generation is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The timeout is not a whole number of seconds.
    #[error("{name} must be a whole number of seconds: {source}")]
    InvalidTimeout {
        /// The offending variable.
        name: &'static str,
        /// The parse failure.
        source: ParseIntError,
    },

    /// The base URL has no HTTP scheme.
    #[error("base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Where the chapter service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Reads `STORYQUEST_BASE_URL` and `STORYQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup("STORYQUEST_BASE_URL") {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(timeout) = lookup("STORYQUEST_TIMEOUT_SECS") {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidTimeout {
                    name: "STORYQUEST_TIMEOUT_SECS",
                    source,
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Replaces the base URL. A trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not HTTP(S).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_owned()));
        }
        base_url.clone_into(&mut self.base_url);
        Ok(self)
    }

    /// Replaces the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of an endpoint, e.g. `start-game`.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{name}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint("start-game"), "http://127.0.0.1:5000/api/start-game");
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = ClientConfig::from_lookup(|name| match name {
            "STORYQUEST_BASE_URL" => Some("https://quest.example.com/".into()),
            "STORYQUEST_TIMEOUT_SECS" => Some("30".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.base_url, "https://quest.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.endpoint("upload"),
            "https://quest.example.com/api/upload"
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = ClientConfig::from_lookup(|name| {
            (name == "STORYQUEST_TIMEOUT_SECS").then(|| "soon".to_owned())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidTimeout {
                name: "STORYQUEST_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn test_base_url_without_scheme_is_rejected() {
        let result = ClientConfig::default().with_base_url("localhost:5000");

        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));
    }
}
