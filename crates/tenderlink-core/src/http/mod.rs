//! HTTP plumbing shared by the record fetch and the resource locator.
//!
//! Everything that talks to the network goes through the [`Transport`] trait,
//! so the probing and fallback logic can be tested without sockets. The
//! production implementation is [`CurlTransport`] (libcurl via the `curl`
//! crate), run on the blocking pool.

mod classify;
mod curl_transport;

pub use self::classify::{classify_curl_error, classify_status, StatusClass, TransportErrorKind};
pub use self::curl_transport::CurlTransport;

use std::future::Future;
use std::sync::Arc;

use url::Url;

use crate::credentials::CredentialProvider;

/// A single outgoing request: target URL and optional bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub bearer: Option<String>,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer: None,
        }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Header lines in `Name: value` form.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if let Some(token) = &self.bearer {
            lines.push(format!("Authorization: Bearer {}", token.trim()));
        }
        lines
    }
}

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport error: the request never produced an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("transport task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Curl(e) => classify_curl_error(e),
            TransportError::Join(_) => TransportErrorKind::Other,
            TransportError::Io(e) => match e.kind() {
                std::io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
                std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::NotConnected => TransportErrorKind::Connection,
                _ => TransportErrorKind::Other,
            },
        }
    }
}

/// Non-blocking HEAD/GET. Implementations must not retry on their own.
pub trait Transport: Send + Sync {
    /// Existence check. Returns the final status code after redirects.
    fn head(&self, req: &Request) -> impl Future<Output = Result<u32, TransportError>> + Send;

    fn get(&self, req: &Request)
        -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Transport plus credential source, shared by every component that issues
/// requests on behalf of the signed-in user.
pub struct HttpSession<T, C> {
    transport: Arc<T>,
    credentials: Arc<C>,
}

impl<T, C> Clone for HttpSession<T, C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<T: Transport, C: CredentialProvider> HttpSession<T, C> {
    pub fn new(transport: Arc<T>, credentials: Arc<C>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Builds a request for `url`, attaching the bearer token when one is stored.
    pub fn request(&self, url: &Url) -> Request {
        Request::new(url.as_str()).with_bearer(self.credentials.bearer_token())
    }

    pub async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let req = self.request(url);
        self.transport.get(&req).await
    }

    pub async fn head(&self, url: &Url) -> Result<u32, TransportError> {
        let req = self.request(url);
        self.transport.head(&req).await
    }
}

/// Appends percent-encoded path segments to `base`, keeping its own path.
///
/// `http://h/api` + `["tenders", "7"]` → `http://h/api/tenders/7`.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        path.extend(segments);
    }
    url
}
