//! Checkout module configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
pub const LIVE_BASE_URL: &str = "https://api-m.paypal.com";

/// PayPal REST credentials and client tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayPalConfig {
    /// REST app client identifier. Also embedded in the checkout page.
    pub client_id: String,
    /// REST app secret.
    #[serde(serialize_with = "redact_secret")]
    pub client_secret: SecretString,
    pub environment: PayPalEnvironment,
    /// Overrides the environment's API host.
    pub base_url: Option<Url>,
    /// Per-request timeout of the remote client.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Access tokens are refreshed this long before they expire.
    #[serde(with = "humantime_serde")]
    pub token_refresh_offset: Duration,
}

impl Default for PayPalConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::from(String::new()),
            environment: PayPalEnvironment::Sandbox,
            base_url: None,
            timeout: Duration::from_secs(30),
            token_refresh_offset: Duration::from_secs(60),
        }
    }
}

impl PayPalConfig {
    /// API host the remote client talks to.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] if the built-in host fails to parse.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(self.environment.base_url())
                .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string())),
        }
    }

    /// Reject configurations the proxy cannot start with.
    ///
    /// # Errors
    /// Returns [`ConfigError`] naming the first missing or invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("paypal.client_id"));
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing("paypal.client_secret"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "paypal.timeout",
                reason: "must be greater than zero".to_owned(),
            });
        }
        let base = self.api_base()?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(base.to_string()));
        }
        Ok(())
    }
}

/// PayPal environment selecting the default API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPalEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("invalid PayPal base URL: {0}")]
    InvalidBaseUrl(String),
}

fn redact_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    if secret.expose_secret().is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str("***REDACTED***")
    }
}

/// Serde adapter for humantime durations (`"30s"`, `"1m 30s"`).
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    /// # Errors
    /// Fails when the value is not a humantime duration string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
