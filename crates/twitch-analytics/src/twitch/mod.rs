mod client;
pub mod error;
pub mod http;
mod types;

pub use client::{TwitchClient, DEFAULT_HELIX_BASE_URL, DEFAULT_STREAMS_PAGE_SIZE};
pub use error::ApiError;
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use types::*;
