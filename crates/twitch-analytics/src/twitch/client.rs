use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::http::{HttpClient, ReqwestClient};
use super::types::{Stream, User};
use super::ApiError;
use crate::auth::{AccessToken, TokenCache, TokenManager, UpstreamCredentials};
use crate::time::Clock;

/// Public Twitch Helix API base URL
pub const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Page size for the live stream listing
pub const DEFAULT_STREAMS_PAGE_SIZE: u32 = 20;

/// How many times a rejected token is regenerated within one call
const AUTH_RETRY_LIMIT: u32 = 1;

/// Twitch Helix API client authenticated as the application
///
/// Generic over the HTTP client implementation for testability.
pub struct TwitchClient<H: HttpClient = ReqwestClient> {
    http: Arc<H>,
    credentials: Arc<UpstreamCredentials>,
    tokens: TokenManager<H>,
}

impl TwitchClient<ReqwestClient> {
    /// Creates a new Twitch API client with the default HTTP implementation
    pub fn new(
        credentials: UpstreamCredentials,
        timeout: Duration,
        cache: Arc<dyn TokenCache>,
    ) -> anyhow::Result<Self> {
        let http = ReqwestClient::new(timeout)?;
        Ok(Self::with_http_client(credentials, http, cache))
    }
}

impl<H: HttpClient> TwitchClient<H> {
    /// Creates a new Twitch API client with a custom HTTP implementation
    pub fn with_http_client(
        credentials: UpstreamCredentials,
        http: H,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        let http = Arc::new(http);
        let credentials = Arc::new(credentials);
        let tokens = TokenManager::new(http.clone(), credentials.clone(), cache);

        Self {
            http,
            credentials,
            tokens,
        }
    }

    /// Replaces the clock used for token expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    /// Token manager backing this client
    pub fn tokens(&self) -> &TokenManager<H> {
        &self.tokens
    }

    fn build_url(&self, endpoint: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.credentials.api_base_url, endpoint);

        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// Builds the headers for an authenticated request
    fn build_headers(&self, token: &AccessToken) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token.value))
                .context("Access token is not a valid header value")?,
        );
        headers.insert(
            "Client-Id",
            HeaderValue::from_str(&self.credentials.client_id)
                .context("Client ID is not a valid header value")?,
        );

        Ok(headers)
    }

    /// Makes an authenticated GET request to the Helix API
    ///
    /// A 401 drops the cached token and repeats the call once with a fresh
    /// one. A second 401 is returned as `ApiError::Authentication`.
    pub async fn request(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = self.build_url(endpoint, query);
        let mut rejected = None;

        for attempt in 0..=AUTH_RETRY_LIMIT {
            let token = self.tokens.get_token().await?;
            let headers = self.build_headers(&token)?;

            let response = self.http.get_response(&url, &headers).await?;

            if response.is_unauthorized() {
                if attempt < AUTH_RETRY_LIMIT {
                    tracing::info!("Access token rejected for {}, regenerating", endpoint);
                    self.tokens.invalidate().await;
                    continue;
                }
                rejected = Some(response);
                break;
            }

            if response.is_not_found() {
                tracing::warn!(
                    "Twitch API not found on {}: {} - {}",
                    endpoint,
                    response.status,
                    response.body
                );
                return Err(ApiError::NotFound);
            }

            if !response.is_success() {
                tracing::error!(
                    "Twitch API error on {}: {} - {}",
                    endpoint,
                    response.status,
                    response.body
                );
                return Err(ApiError::Upstream {
                    status: response.status,
                });
            }

            return Ok(response.json()?);
        }

        if let Some(response) = rejected {
            tracing::warn!(
                "Access token still rejected for {} after regeneration: {} - {}",
                endpoint,
                response.status,
                response.body
            );
        }
        Err(ApiError::unauthorized())
    }
}

// User-related methods
impl<H: HttpClient> TwitchClient<H> {
    /// Looks up a user by ID
    ///
    /// Returns `Ok(None)` when Helix returns no rows for the ID.
    pub async fn fetch_user_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let body = self.request("/users", &[("id", id)]).await?;

        let Some(first) = body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|data| data.first())
        else {
            return Ok(None);
        };

        let user = User::deserialize(first).context("Failed to parse user")?;
        Ok(Some(user))
    }
}

// Stream-related methods
impl<H: HttpClient> TwitchClient<H> {
    /// Gets the current top live streams
    ///
    /// A missing or malformed `data` field yields an empty list.
    pub async fn fetch_live_streams(&self, first: u32) -> Result<Vec<Stream>, ApiError> {
        let first = first.to_string();
        let body = self.request("/streams", &[("first", &first)]).await?;

        let Some(data) = body.get("data").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let streams = data
            .iter()
            .map(|s| Stream::deserialize(s).context("Failed to parse stream"))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(streams)
    }
}
