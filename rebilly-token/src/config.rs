//! Client configuration.
//!
//! This module defines the TOML-deserializable configuration used to build a
//! [`TokenHandler`](crate::TokenHandler) with an [`HttpTransport`](crate::transport::HttpTransport).
//!
//! ```toml
//! endpoint = "https://api.rebilly.com/v2.1/tokens"
//! auth = "pk_live_..."
//! request_timeout_ms = 15000
//! connect_timeout_ms = 3000
//! protocol = "http1"
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{Result, TokenError};

/// Token endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.rebilly.com/v2.1/tokens";

/// Request deadline in milliseconds when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Connect deadline in milliseconds when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

const REQUEST_TIMEOUT_RANGE_MS: (u64, u64) = (500, 120_000);
const MIN_CONNECT_TIMEOUT_MS: u64 = 100;

/// HTTP protocol used to reach the token endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Let TLS negotiation pick HTTP/2 or HTTP/1.1.
    #[default]
    Negotiate,
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 without negotiation, for endpoints known to speak it.
    Http2,
}

/// Root client configuration.
///
/// Unknown keys are rejected so a misspelled setting does not silently fall back to
/// its default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Token endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Authorization credential sent in the `reb-auth` header.
    #[serde(default)]
    pub auth: Option<String>,

    /// Deadline for the whole token request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Deadline for establishing the connection, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Protocol selection.
    #[serde(default)]
    pub protocol: Protocol,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth: None,
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            protocol: Protocol::default(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebilly_token::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml(r#"auth = "secret""#).unwrap();
    /// assert_eq!(config.endpoint, "https://api.rebilly.com/v2.1/tokens");
    /// assert_eq!(config.auth.as_deref(), Some("secret"));
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| TokenError::InvalidConfig(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its contents are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TokenError::InvalidConfig(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates the endpoint and the request deadlines.
    ///
    /// The endpoint must be an absolute `http` or `https` URL with a host. The request
    /// deadline must lie within 500 ms and 2 minutes, and the connect deadline must be
    /// at least 100 ms and no longer than the request deadline.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            TokenError::InvalidConfig(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;

        if !matches!(url.scheme(), "https" | "http") {
            return Err(TokenError::InvalidConfig(format!(
                "endpoint must use http or https, got: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(TokenError::InvalidConfig(format!(
                "endpoint missing host: {}",
                self.endpoint
            )));
        }

        let (min, max) = REQUEST_TIMEOUT_RANGE_MS;
        if !(min..=max).contains(&self.request_timeout_ms) {
            return Err(TokenError::InvalidConfig(format!(
                "request_timeout_ms must be within {min}..={max}, got {}",
                self.request_timeout_ms
            )));
        }
        if self.connect_timeout_ms < MIN_CONNECT_TIMEOUT_MS
            || self.connect_timeout_ms > self.request_timeout_ms
        {
            return Err(TokenError::InvalidConfig(format!(
                "connect_timeout_ms must be within {MIN_CONNECT_TIMEOUT_MS}..=request_timeout_ms ({}), got {}",
                self.request_timeout_ms, self.connect_timeout_ms
            )));
        }

        Ok(())
    }

    /// Request deadline as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Connect deadline as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}
