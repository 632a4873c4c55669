use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::auth::{UpstreamCredentials, DEFAULT_TOKEN_URL};
use crate::twitch::DEFAULT_HELIX_BASE_URL;

/// Every setting is read from `TWITCH_<FIELD>` environment variables
const ENV_PREFIX: &str = "TWITCH_";

/// Service configuration
///
/// Credentials have no defaults; everything else falls back to the public
/// Twitch endpoints and local listening defaults.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Applied to every outbound request, token grants included
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_HELIX_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    /// Loads configuration from the process environment and an optional `.env` file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Loads configuration from the given variables
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("Failed to read configuration from environment")?;

        config.validate()
    }

    fn validate(mut self) -> Result<Self> {
        if self.client_id.trim().is_empty() {
            anyhow::bail!("TWITCH_CLIENT_ID must not be empty");
        }
        if self.client_secret.trim().is_empty() {
            anyhow::bail!("TWITCH_CLIENT_SECRET must not be empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("TWITCH_HTTP_TIMEOUT_SECS must be greater than zero");
        }

        // Endpoints are appended with a leading slash
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();

        Ok(self)
    }

    /// Returns the upstream credentials
    pub fn credentials(&self) -> UpstreamCredentials {
        UpstreamCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            token_url: self.token_url.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }

    /// Returns the outbound request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Returns the address to listen on
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid TWITCH_BIND_ADDR: {}", self.bind_addr))
    }
}
