use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache slot holding the application access token
pub const TOKEN_CACHE_KEY: &str = "twitch_app_access_token";

/// Application access token obtained through the client-credentials grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    /// Already shortened by the safety margin
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Checks if the token has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Trait for token cache operations
///
/// The client receives its cache at construction, so tests and alternate
/// backends can supply their own.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Returns the token stored under `key`, if any
    async fn get(&self, key: &str) -> Option<AccessToken>;

    /// Stores a token under `key`, replacing any previous one
    async fn put(&self, key: &str, token: AccessToken);

    /// Removes the token stored under `key`; no-op when empty
    async fn evict(&self, key: &str);
}

/// In-process token cache
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl MemoryTokenCache {
    /// Creates a new empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn get(&self, key: &str) -> Option<AccessToken> {
        self.tokens.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, token: AccessToken) {
        self.tokens.write().await.insert(key.to_string(), token);
    }

    async fn evict(&self, key: &str) {
        self.tokens.write().await.remove(key);
    }
}
