//! Fake static host for transport and pipeline tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Every `GET` is answered from a path table: a registered path
//! returns its configured status and body, anything else is `404`. Each
//! request's path, query string and cache headers are recorded so tests can
//! assert on what actually reached the wire.
//!
//! # Example
//!
//! ```rust,ignore
//! let host = FakeHost::start().await.unwrap();
//! host.serve("/findings.csv", 200, "date_utc,message_id\n").await;
//! host.serve("/broken.csv", 503, "").await;
//!
//! let url = host.url("/findings.csv");
//! ```

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub cache_control: Option<String>,
    pub pragma: Option<String>,
}

impl SeenRequest {
    /// Value of the `ts` query parameter, if present and numeric.
    pub fn ts(&self) -> Option<u64> {
        self.query
            .as_deref()?
            .split('&')
            .find_map(|pair| pair.strip_prefix("ts="))
            .and_then(|v| v.parse().ok())
    }
}

#[derive(Default)]
struct HostState {
    routes: HashMap<String, (u16, String)>,
    requests: Vec<SeenRequest>,
}

/// Handle to the running fake host.
pub struct FakeHost {
    addr: SocketAddr,
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(HostState::default()));

        let app = Router::new().fallback(respond).with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL of the host (e.g. `http://127.0.0.1:PORT/`).
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Answer `GET path` with `status` and `body`.
    pub async fn serve(&self, path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .await
            .routes
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

async fn respond(
    State(state): State<Arc<Mutex<HostState>>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut state = state.lock().await;
    state.requests.push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        cache_control: header_str(header::CACHE_CONTROL),
        pragma: header_str(header::PRAGMA),
    });

    match state.routes.get(uri.path()) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body.clone(),
        ),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
