use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

use super::store::{AccessToken, TokenCache, TOKEN_CACHE_KEY};
use super::UpstreamCredentials;
use crate::time::{Clock, SystemClock};
use crate::twitch::error::TOKEN_REQUEST_FAILED_MESSAGE;
use crate::twitch::{ApiError, HttpClient, ReqwestClient};

/// Seconds shaved off the reported lifetime so a token never expires mid-flight
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Response from the token endpoint
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
}

/// Owns the application access token
///
/// Tokens are requested with the client-credentials grant on a cache miss and
/// dropped again when Helix rejects them. There is no background refresh.
pub struct TokenManager<H: HttpClient = ReqwestClient> {
    http: Arc<H>,
    credentials: Arc<UpstreamCredentials>,
    cache: Arc<dyn TokenCache>,
    clock: Arc<dyn Clock>,
}

impl<H: HttpClient> TokenManager<H> {
    /// Creates a token manager backed by the system clock
    pub fn new(
        http: Arc<H>,
        credentials: Arc<UpstreamCredentials>,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        Self {
            http,
            credentials,
            cache,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to judge expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a usable access token, requesting a new one on a cache miss
    pub async fn get_token(&self) -> Result<AccessToken, ApiError> {
        if let Some(token) = self.cache.get(TOKEN_CACHE_KEY).await {
            if !token.is_expired_at(self.clock.now()) {
                return Ok(token);
            }
            tracing::debug!("Cached access token expired");
            self.cache.evict(TOKEN_CACHE_KEY).await;
        }

        let token = self.request_token().await?;
        self.cache.put(TOKEN_CACHE_KEY, token.clone()).await;

        Ok(token)
    }

    /// Drops the cached token so the next call requests a fresh one
    pub async fn invalidate(&self) {
        self.cache.evict(TOKEN_CACHE_KEY).await;
    }

    /// Requests a new token from the token endpoint
    async fn request_token(&self) -> Result<AccessToken, ApiError> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let requested_at = self.clock.now();
        let response = self
            .http
            .post_form(&self.credentials.token_url, &params)
            .await?;

        if !response.is_success() {
            tracing::error!(
                "Token request failed: {} - {}",
                response.status,
                response.body
            );
            return Err(ApiError::Authentication(
                TOKEN_REQUEST_FAILED_MESSAGE.to_string(),
            ));
        }

        let grant = response.json::<TokenResponse>().ok();
        let Some((value, expires_in)) = grant.and_then(|g| {
            g.access_token
                .filter(|t| !t.is_empty())
                .map(|t| (t, g.expires_in))
        }) else {
            tracing::error!(
                "Token response missing access_token: {} - {}",
                response.status,
                response.body
            );
            return Err(ApiError::Authentication(
                TOKEN_REQUEST_FAILED_MESSAGE.to_string(),
            ));
        };

        let lifetime = expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS).max(0);
        tracing::info!("Obtained app access token (expires in {}s)", expires_in);

        // Lifetimes past chrono's range are capped at the latest representable instant
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|ttl| requested_at.checked_add_signed(ttl))
            .unwrap_or_else(|| {
                tracing::warn!("Token lifetime of {}s is out of range, capping", expires_in);
                DateTime::<Utc>::MAX_UTC
            });

        Ok(AccessToken { value, expires_at })
    }
}
