//! Layered application configuration.
//!
//! Sources, later wins: built-in defaults, YAML file, `APP__SECTION__KEY`
//! environment variables, `PAYPAL_CLIENT_ID` / `PAYPAL_CLIENT_SECRET`, CLI.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use checkout::PayPalConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub paypal: PayPalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Larger request bodies are rejected with 413 before reaching a handler.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_owned(),
            port: 8080,
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Load the layered configuration; `path` must exist when given.
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value has the
    /// wrong type.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .extract()
            .context("failed to load configuration")
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("APP__").split("__"))
            .merge(
                Env::raw()
                    .only(&["PAYPAL_CLIENT_ID", "PAYPAL_CLIENT_SECRET"])
                    .map(|key| {
                        key.as_str()
                            .to_ascii_lowercase()
                            .replacen("paypal_", "paypal.", 1)
                            .into()
                    }),
            )
    }

    pub fn apply_cli_overrides(&mut self, port: Option<u16>) {
        if let Some(port) = port {
            self.server.port = port;
        }
    }

    /// # Errors
    /// Returns an error if `server.bind_addr` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr: {}", self.server.bind_addr))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Everything `run` needs beyond successful parsing.
    ///
    /// # Errors
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        self.paypal.validate()?;
        Ok(())
    }

    /// Effective configuration as YAML, secrets redacted.
    ///
    /// # Errors
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to serialize configuration to YAML")
    }
}
