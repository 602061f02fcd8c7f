//! libcurl-backed transport.
//!
//! Each request uses its own `Easy` handle on tokio's blocking pool, so the
//! async caller is never blocked on the network. A transport bound to a
//! [`ViewScope`] aborts its transfers once the scope is unmounted.

use std::fs::File;
use std::io::Write;
use std::time::Duration;

use curl::easy::{Easy, List};

use super::{HttpResponse, Request, Transport, TransportError};
use crate::action::ViewScope;
use crate::config::HttpConfig;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
    cancel: Option<ViewScope>,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
            cancel: None,
        }
    }

    /// Transfers started by the returned transport stop once `scope` is
    /// unmounted; libcurl reports them as aborted by callback.
    #[must_use]
    pub fn with_cancel(mut self, scope: ViewScope) -> Self {
        self.cancel = Some(scope);
        self
    }

    pub fn from_config(cfg: &HttpConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    fn easy_for(&self, req: &Request) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.url(&req.url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(scope) = &self.cancel {
            let scope = scope.clone();
            easy.progress(true)?;
            easy.progress_function(move |_, _, _, _| scope.is_mounted())?;
        }

        let lines = req.header_lines();
        if !lines.is_empty() {
            let mut list = List::new();
            for line in &lines {
                list.append(line)?;
            }
            easy.http_headers(list)?;
        }
        Ok(easy)
    }

    fn head_blocking(&self, req: &Request) -> Result<u32, curl::Error> {
        let mut easy = self.easy_for(req)?;
        easy.nobody(true)?;
        easy.perform()?;
        easy.response_code()
    }

    fn get_blocking(&self, req: &Request) -> Result<HttpResponse, curl::Error> {
        let mut easy = self.easy_for(req)?;
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let status = easy.response_code()?;
        Ok(HttpResponse { status, body })
    }

    /// Streams a GET body into `file`. Returns the status code; the caller
    /// decides whether the written bytes are kept.
    fn save_blocking(&self, req: &Request, file: &mut File) -> Result<u32, curl::Error> {
        let mut easy = self.easy_for(req)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("attachment save write failed: {}", e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()?;
        }
        easy.response_code()
    }

    /// Async wrapper around [`Self::save_blocking`]; hands the file back so the
    /// caller can persist or drop it.
    pub async fn save_to(
        &self,
        req: &Request,
        mut file: tempfile::NamedTempFile,
    ) -> Result<(u32, tempfile::NamedTempFile), TransportError> {
        let this = self.clone();
        let req = req.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let status = this.save_blocking(&req, file.as_file_mut());
            status.map(|s| (s, file))
        })
        .await?;
        Ok(joined?)
    }
}

impl Transport for CurlTransport {
    async fn head(&self, req: &Request) -> Result<u32, TransportError> {
        let this = self.clone();
        let req = req.clone();
        Ok(tokio::task::spawn_blocking(move || this.head_blocking(&req)).await??)
    }

    async fn get(&self, req: &Request) -> Result<HttpResponse, TransportError> {
        let this = self.clone();
        let req = req.clone();
        Ok(tokio::task::spawn_blocking(move || this.get_blocking(&req)).await??)
    }
}
