//! HTTP client abstraction for Twitch API
//!
//! This module provides a trait-based HTTP client that can be easily mocked for testing.
//! Both calls hand back the raw status and body; interpreting them is up to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Trait for making HTTP requests
///
/// This abstraction allows easy mocking of HTTP calls in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Makes a GET request and returns the raw response
    async fn get_response(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse>;

    /// POSTs an `application/x-www-form-urlencoded` body and returns the raw response
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Response from an HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Returns true if status is in 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if status is 401
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns true if status is 404
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to parse JSON response")
    }
}

/// Production HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new reqwest-based HTTP client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_response(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
        let response = self
            .inner
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        let response = self
            .inner
            .post(url)
            .form(form)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
