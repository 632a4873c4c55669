//! Analytics and health endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{Result, ServerError};
use super::state::AppState;
use crate::twitch::{HttpClient, Stream, User};

/// Query parameters for the user lookup
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: Option<String>,
}

/// Entry in the live stream listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub title: String,
    pub user_name: String,
}

impl From<&Stream> for StreamSummary {
    fn from(stream: &Stream) -> Self {
        Self {
            title: stream.title.clone(),
            user_name: stream.display_name().to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// `GET /api/analytics/user?id=<id>`
pub async fn user_handler<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    query: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<User>> {
    let id = query
        .ok()
        .and_then(|Query(q)| q.id)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(ServerError::InvalidUserId)?;

    let user = state
        .client
        .fetch_user_by_id(&id)
        .await?
        .ok_or(ServerError::UserNotFound)?;

    Ok(Json(user))
}

/// `GET /api/analytics/streams`
pub async fn streams_handler<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
) -> Result<Json<Vec<StreamSummary>>> {
    let streams = state
        .client
        .fetch_live_streams(state.streams_page_size)
        .await?;

    Ok(Json(streams.iter().map(StreamSummary::from).collect()))
}

/// Health check that never calls Twitch
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ServerError {
    ServerError::RouteNotFound
}
