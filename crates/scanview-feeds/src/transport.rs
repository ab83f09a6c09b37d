//! Transport: how one candidate location becomes text.
//!
//! Absolute `http(s)` locations are always fetched over the network. Relative
//! locations are resolved against the [`HostingBase`]: joined onto the base
//! URL and fetched, or joined onto the base directory and read from disk.

use crate::error::FeedError;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Url;
use scanview_core::config::HttpConfig;
use scanview_core::error::SourceFailure;
use scanview_core::resolver::HostingContext;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Issues one GET for one candidate.
///
/// `ts` is the cache-busting value for this attempt. Implementations that
/// talk HTTP must append it as a `ts` query parameter.
pub trait Transport: Send + Sync {
    fn get(&self, location: &str, ts: u64) -> impl Future<Output = Result<String, SourceFailure>> + Send;
}

/// What relative candidates are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostingBase {
    Url(Url),
    Dir(PathBuf),
}

impl Default for HostingBase {
    fn default() -> Self {
        HostingBase::Dir(PathBuf::from("."))
    }
}

impl HostingBase {
    /// Parse a `--base` argument: an `http(s)` URL, a `file://` URL or a path.
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| FeedError::InvalidBase(format!("{raw}: {e}")))?;
            return Ok(HostingBase::Url(url));
        }
        if raw.starts_with("file://") {
            let path = Url::parse(raw)
                .ok()
                .and_then(|u| u.to_file_path().ok())
                .ok_or_else(|| FeedError::InvalidBase(raw.to_string()))?;
            return Ok(HostingBase::Dir(path));
        }
        Ok(HostingBase::Dir(PathBuf::from(raw)))
    }

    /// Host and path for candidate derivation. Local bases have no host.
    pub fn hosting_context(&self) -> HostingContext {
        match self {
            HostingBase::Url(url) => match url.host_str() {
                Some(host) => HostingContext::web(host, url.path()),
                None => HostingContext::local(),
            },
            HostingBase::Dir(_) => HostingContext::local(),
        }
    }
}

impl std::fmt::Display for HostingBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostingBase::Url(url) => write!(f, "{url}"),
            HostingBase::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Append `ts=<ts>` to `url`, keeping any existing query.
pub fn with_cache_buster(mut url: Url, ts: u64) -> Url {
    url.query_pairs_mut().append_pair("ts", &ts.to_string());
    url
}

enum Target {
    Http(Url),
    File(PathBuf),
}

/// reqwest-backed transport with filesystem support for local bases.
pub struct HttpTransport {
    client: reqwest::Client,
    base: HostingBase,
}

impl HttpTransport {
    pub fn new(base: HostingBase, cfg: &HttpConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &HostingBase {
        &self.base
    }

    fn target(&self, location: &str) -> Result<Target, SourceFailure> {
        if let Ok(url) = Url::parse(location) {
            return match url.scheme() {
                "http" | "https" => Ok(Target::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Target::File)
                    .map_err(|_| SourceFailure::InvalidLocation(location.to_string())),
                _ => Err(SourceFailure::InvalidLocation(location.to_string())),
            };
        }
        match &self.base {
            HostingBase::Url(base) => base
                .join(location)
                .map(Target::Http)
                .map_err(|e| SourceFailure::InvalidLocation(format!("{location}: {e}"))),
            HostingBase::Dir(dir) => Ok(Target::File(dir.join(location))),
        }
    }

    async fn fetch_url(&self, url: Url, ts: u64) -> Result<String, SourceFailure> {
        let url = with_cache_buster(url, ts);
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store, no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| SourceFailure::Transport(e.to_string()))?;
        let resp = check_response(resp)?;
        resp.text().await.map_err(|e| SourceFailure::Transport(e.to_string()))
    }
}

/// Non-2xx responses are failures.
fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SourceFailure> {
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceFailure::Status(status.as_u16()));
    }
    Ok(resp)
}

async fn read_file(path: &Path) -> Result<String, SourceFailure> {
    tracing::debug!(path = %path.display(), "read");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceFailure::Io(format!("{}: {e}", path.display())))
}

impl Transport for HttpTransport {
    async fn get(&self, location: &str, ts: u64) -> Result<String, SourceFailure> {
        match self.target(location)? {
            Target::Http(url) => self.fetch_url(url, ts).await,
            Target::File(path) => read_file(&path).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
