//! Integration tests for the app token lifecycle

mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use common::{ScriptedHttp, BASE_URL, TOKEN_URL};
use twitch_analytics::auth::{AccessToken, MemoryTokenCache, TokenCache, TOKEN_CACHE_KEY};
use twitch_analytics::twitch::ApiError;

fn users_url(id: &str) -> String {
    format!("{BASE_URL}/users?id={id}")
}

#[tokio::test]
async fn token_is_shared_across_operations() {
    let http = ScriptedHttp::new()
        .grant("app_token")
        .data("/users?id=1", &json!({"data": [{"id": "1", "login": "one"}]}))
        .data("/streams?first=20", &json!({"data": []}));
    let client = common::client(&http, Arc::new(MemoryTokenCache::new()));

    assert_ok!(client.fetch_user_by_id("1").await);
    assert_ok!(client.fetch_live_streams(20).await);

    assert_eq!(http.calls_to(TOKEN_URL), 1);
    assert_eq!(http.bearer_tokens(), vec!["Bearer app_token", "Bearer app_token"]);
}

#[tokio::test]
async fn preseeded_cache_skips_token_request() {
    let cache = Arc::new(MemoryTokenCache::new());
    cache
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                value: "seeded".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        )
        .await;

    let http = ScriptedHttp::new().data("/users?id=1", &json!({"data": []}));
    let client = common::client(&http, cache);

    let user = assert_ok!(client.fetch_user_by_id("1").await);

    assert!(user.is_none());
    assert_eq!(http.calls_to(TOKEN_URL), 0);
    assert_eq!(http.bearer_tokens(), vec!["Bearer seeded"]);
}

#[tokio::test]
async fn expired_cache_entry_is_replaced() {
    let cache = Arc::new(MemoryTokenCache::new());
    cache
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                value: "old".to_string(),
                expires_at: Utc::now() - Duration::seconds(1),
            },
        )
        .await;

    let http = ScriptedHttp::new()
        .grant("new")
        .data("/users?id=1", &json!({"data": []}));
    let client = common::client(&http, cache.clone());

    assert_ok!(client.fetch_user_by_id("1").await);

    assert_eq!(http.bearer_tokens(), vec!["Bearer new"]);
    assert_eq!(cache.get(TOKEN_CACHE_KEY).await.unwrap().value, "new");
}

#[tokio::test]
async fn revoked_token_is_regenerated_once() {
    let cache = Arc::new(MemoryTokenCache::new());
    cache
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                value: "revoked".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        )
        .await;

    let http = ScriptedHttp::new()
        .grant("replacement")
        .respond(&users_url("7"), 401, "")
        .data("/users?id=7", &json!({"data": [{"id": "7", "login": "seven"}]}));
    let client = common::client(&http, cache.clone());

    let user = assert_ok!(client.fetch_user_by_id("7").await).unwrap();

    assert_eq!(user.login, "seven");
    assert_eq!(http.calls_to(TOKEN_URL), 1);
    assert_eq!(
        http.bearer_tokens(),
        vec!["Bearer revoked", "Bearer replacement"]
    );
    assert_eq!(cache.get(TOKEN_CACHE_KEY).await.unwrap().value, "replacement");
}

#[tokio::test]
async fn second_rejection_is_terminal() {
    let http = ScriptedHttp::new()
        .grant("token")
        .respond(&users_url("7"), 401, "");
    let client = common::client(&http, Arc::new(MemoryTokenCache::new()));

    let err = assert_err!(client.fetch_user_by_id("7").await);

    assert!(matches!(err, ApiError::Authentication(_)));
    assert_eq!(http.calls_to(&users_url("7")), 2);
}

#[tokio::test]
async fn retry_budget_is_per_call() {
    let http = ScriptedHttp::new()
        .grant("token")
        .respond(&users_url("7"), 401, "")
        .respond(&users_url("7"), 200, r#"{"data": []}"#)
        .respond(&users_url("7"), 401, "")
        .respond(&users_url("7"), 200, r#"{"data": []}"#);
    let client = common::client(&http, Arc::new(MemoryTokenCache::new()));

    assert_ok!(client.fetch_user_by_id("7").await);
    assert_ok!(client.fetch_user_by_id("7").await);

    assert_eq!(http.calls_to(&users_url("7")), 4);
    assert_eq!(http.calls_to(TOKEN_URL), 3);
}
