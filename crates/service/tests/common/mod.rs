//! Scriptable mock of the portal backend.
//!
//! Routes are registered as canned `(status, json)` replies keyed by method
//! and path; anything unregistered answers 404. Every hit is logged.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;
use service::guard::RecordingNavigator;
use service::storage::MemoryStorage;
use service::Portal;

#[derive(Clone)]
struct Reply {
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<(String, String), Reply>>,
    hits: Mutex<Vec<Hit>>,
}

pub struct MockApi {
    state: Arc<MockState>,
    pub addr: SocketAddr,
}

impl MockApi {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { state, addr })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn reply(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.insert(method, path, Reply { status, body, delay: None })
    }

    pub fn reply_after(&self, method: &str, path: &str, delay: Duration, body: Value) -> &Self {
        self.insert(method, path, Reply { status: 200, body, delay: Some(delay) })
    }

    fn insert(&self, method: &str, path: &str, reply: Reply) -> &Self {
        if let Ok(mut replies) = self.state.replies.lock() {
            replies.insert((method.to_uppercase(), format!("/api{path}")), reply);
        }
        self
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// `"METHOD /path"` per hit, with the `/api` prefix stripped.
    pub fn trail(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .map(|h| format!("{} {}", h.method, h.path.trim_start_matches("/api")))
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let hit = Hit {
        method: method.as_str().to_string(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    if let Ok(mut hits) = state.hits.lock() {
        hits.push(hit);
    }

    let reply = state
        .replies
        .lock()
        .ok()
        .and_then(|r| r.get(&(method.as_str().to_string(), path)).cloned());
    let Some(reply) = reply else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, Json(reply.body)).into_response()
}

/// Portal wired to `base_url` with in-memory storage.
pub fn portal(base_url: &str, timeout_ms: u64, offline: bool) -> anyhow::Result<(Portal, Arc<RecordingNavigator>)> {
    let mut config = configs::AppConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_ms = timeout_ms;
    config.api.enable_offline_auth_fallback = offline;
    let nav = Arc::new(RecordingNavigator::new());
    let portal = Portal::with_storage(config, Arc::new(MemoryStorage::new()), nav.clone())?;
    Ok((portal, nav))
}

/// Address nothing listens on.
pub async fn dead_address() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/api"))
}
