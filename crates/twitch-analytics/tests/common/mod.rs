//! Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use twitch_analytics::auth::{TokenCache, UpstreamCredentials};
use twitch_analytics::twitch::{HttpClient, HttpResponse, TwitchClient};

pub const TOKEN_URL: &str = "https://id.example.test/oauth2/token";
pub const BASE_URL: &str = "https://api.example.test/helix";

/// Scripted HTTP transport
///
/// Responses are queued per URL; the last one repeats. Every call is logged
/// as `"METHOD url"` together with the Authorization header, if any.
#[derive(Clone, Default)]
pub struct ScriptedHttp {
    responses: Arc<Mutex<HashMap<String, VecDeque<HttpResponse>>>>,
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.into(),
            });
        self
    }

    pub fn grant(self, token: &str) -> Self {
        let body = json!({"access_token": token, "expires_in": 5_000_000, "token_type": "bearer"});
        self.respond(TOKEN_URL, 200, body.to_string())
    }

    pub fn data(self, path: &str, body: &Value) -> Self {
        self.respond(&format!("{BASE_URL}{path}"), 200, body.to_string())
    }

    pub fn calls_to(&self, url: &str) -> usize {
        let suffix = format!(" {url}");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| call.ends_with(&suffix))
            .count()
    }

    pub fn bearer_tokens(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, auth)| auth.clone())
            .collect()
    }

    fn next(&self, method: &str, url: &str, auth: Option<String>) -> anyhow::Result<HttpResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((format!("{method} {url}"), auth));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(url)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| anyhow::anyhow!("unscripted request to {url}"))?;

        Ok(if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue[0].clone()
        })
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get_response(&self, url: &str, headers: &HeaderMap) -> anyhow::Result<HttpResponse> {
        let auth = headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.next("GET", url, auth)
    }

    async fn post_form(&self, url: &str, _form: &[(&str, &str)]) -> anyhow::Result<HttpResponse> {
        self.next("POST", url, None)
    }
}

pub fn credentials() -> UpstreamCredentials {
    UpstreamCredentials {
        client_id: "integration_client".to_string(),
        client_secret: "integration_secret".to_string(),
        token_url: TOKEN_URL.to_string(),
        api_base_url: BASE_URL.to_string(),
    }
}

pub fn client(http: &ScriptedHttp, cache: Arc<dyn TokenCache>) -> TwitchClient<ScriptedHttp> {
    TwitchClient::with_http_client(credentials(), http.clone(), cache)
}
