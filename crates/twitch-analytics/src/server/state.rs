//! Application state shared across handlers

use std::sync::Arc;

use crate::twitch::{HttpClient, ReqwestClient, TwitchClient};

/// Application state shared across all handlers
pub struct AppState<H: HttpClient = ReqwestClient> {
    /// Twitch API client, including the cached app token
    pub client: Arc<TwitchClient<H>>,

    /// Page size used for the live stream listing
    pub streams_page_size: u32,
}

impl<H: HttpClient> AppState<H> {
    /// Creates the application state
    pub fn new(client: TwitchClient<H>) -> Self {
        Self {
            client: Arc::new(client),
            streams_page_size: crate::twitch::DEFAULT_STREAMS_PAGE_SIZE,
        }
    }
}

impl<H: HttpClient> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            streams_page_size: self.streams_page_size,
        }
    }
}
