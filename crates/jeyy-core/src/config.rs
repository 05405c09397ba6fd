//! Configuration structures for Jeyy clients.
//!
//! This module provides the user-facing client configuration: base URL, API
//! version prefix, credential, and transport timeouts, with validation.

use crate::client::ClientConfig;
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public Jeyy API authority.
pub const DEFAULT_BASE_URL: &str = "https://api.jeyy.xyz/";

/// API version segment of the authenticated revision.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Configuration for a Jeyy client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JeyyClientConfig {
    /// API base URL (authority, without version segment)
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Version path segment; `None` targets the unversioned revision
    #[serde(default = "default_api_version")]
    pub api_version: Option<String>,

    /// Bearer token sent in the `Authorization` header
    #[serde(default, skip_serializing, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_api_version() -> Option<String> {
    Some(DEFAULT_API_VERSION.to_string())
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    crate::client::DEFAULT_REQUEST_TIMEOUT
}

const fn default_connect_timeout_secs() -> u64 {
    crate::client::DEFAULT_CONNECT_TIMEOUT
}

impl JeyyClientConfig {
    /// Create a configuration for the public API using the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Create a configuration for a custom base URL (mirrors, test servers).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the API key for authentication.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the version segment; `None` drops it.
    #[must_use]
    pub fn with_api_version(mut self, version: Option<&str>) -> Self {
        self.api_version = version.map(str::to_string);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport settings for an owned session.
    #[must_use]
    pub const fn http_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_tls_verify(self.tls_verify)
    }

    /// Resolve the URL every endpoint suffix is joined onto.
    ///
    /// The result always ends with exactly one `/`, so
    /// `Url::join("image/glitch")` appends rather than replaces the last
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn endpoint_root(&self) -> Result<Url, Error> {
        let mut root = self.base_url.trim_end_matches('/').to_string();
        if let Some(version) = self
            .api_version
            .as_deref()
            .map(|v| v.trim_matches('/'))
            .filter(|v| !v.is_empty())
        {
            root.push('/');
            root.push_str(version);
        }
        root.push('/');

        Url::parse(&root).map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }
}

impl Default for JeyyClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            api_key: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
