/// Message returned once the single token regeneration has been spent
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Twitch access token is invalid or has expired.";

/// Message returned when the token endpoint refuses to issue a token
pub const TOKEN_REQUEST_FAILED_MESSAGE: &str = "Failed to obtain Twitch access token.";

/// Errors from talking to the Twitch API
///
/// Every upstream failure lands in exactly one of these; the HTTP layer maps
/// each variant to a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token endpoint failure, or a 401 that survived one regeneration
    #[error("{0}")]
    Authentication(String),
    /// Helix answered 404
    #[error("Resource not found.")]
    NotFound,
    /// Any other non-success Helix status
    #[error("Twitch API error")]
    Upstream { status: u16 },
    /// Network faults, malformed bodies and anything else unexpected
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// The terminal error after the retry budget is exhausted
    pub fn unauthorized() -> Self {
        Self::Authentication(UNAUTHORIZED_MESSAGE.to_string())
    }
}
