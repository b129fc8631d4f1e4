use std::sync::Arc;
use std::time::Duration;

use configs::ApiConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, instrument};

use super::fallback::{first_available, FallbackPolicy};
use crate::errors::ApiError;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// JSON client for the portal API.
///
/// Every request is bounded by the configured timeout and carries the stored
/// bearer token when one exists. Non-2xx responses become
/// [`ApiError::Status`] with the parsed body attached.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sessions: Arc<SessionStore>,
    fallback: FallbackPolicy,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, sessions: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, sessions, fallback: FallbackPolicy::default() })
    }

    pub fn from_config(cfg: &ApiConfig, sessions: Arc<SessionStore>) -> Result<Self, ApiError> {
        Self::new(cfg.base_url.clone(), Duration::from_millis(cfg.timeout_ms), sessions)
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::Patch, path, Some(body)).await
    }

    /// Issue the same request against each candidate path in order; see
    /// [`first_available`] for which failures advance.
    pub async fn try_endpoints<S: AsRef<str>>(
        &self,
        method: Method,
        candidates: &[S],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        first_available(&self.fallback, candidates, move |path| async move {
            self.request(method, &path, body).await
        })
        .await
    }

    #[instrument(skip(self, body), fields(base = %self.base_url))]
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method.as_reqwest(), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.sessions.access_token().await {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).ok();
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}
