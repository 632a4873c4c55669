mod manager;
mod store;

pub use manager::{TokenManager, TOKEN_EXPIRY_MARGIN_SECS};
pub use store::{AccessToken, MemoryTokenCache, TokenCache, TOKEN_CACHE_KEY};

/// Public Twitch OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Client credentials and endpoints for the upstream API
///
/// Loaded once at startup and never changed afterwards.
#[derive(Clone)]
pub struct UpstreamCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
