//! Shared wiring for commands: config, endpoints, session and browser.

use anyhow::{anyhow, Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tenderlink_core::action::ViewScope;
use tenderlink_core::config::PortalConfig;
use tenderlink_core::credentials::{CredentialProvider, FileCredentials};
use tenderlink_core::dispatch::{BrowserContext, DesktopBrowser, OpenRequest};
use tenderlink_core::endpoints::Endpoints;
use tenderlink_core::error::FetchError;
use tenderlink_core::fetch::TenderClient;
use tenderlink_core::http::{CurlTransport, HttpSession};
use tenderlink_core::normalize::CanonicalRecord;
use url::Url;

pub type Session = HttpSession<CurlTransport, FileCredentials>;

pub struct Context {
    pub cfg: PortalConfig,
    pub endpoints: Endpoints,
    pub credentials: Arc<FileCredentials>,
    pub transport: Arc<CurlTransport>,
}

impl Context {
    pub fn new(cfg: PortalConfig) -> Result<Self> {
        let endpoints = Endpoints::from_config(&cfg)?;
        let credentials = Arc::new(FileCredentials::open_default()?);
        let transport = Arc::new(CurlTransport::from_config(&cfg.http_or_default()));
        Ok(Self {
            cfg,
            endpoints,
            credentials,
            transport,
        })
    }

    pub fn session(&self) -> Session {
        self.session_on(Arc::clone(&self.transport))
    }

    pub fn session_on(&self, transport: Arc<CurlTransport>) -> Session {
        HttpSession::new(transport, Arc::clone(&self.credentials))
    }

    /// Transport whose transfers abort once `scope` is unmounted.
    pub fn scoped_transport(&self, scope: &ViewScope) -> Arc<CurlTransport> {
        Arc::new(self.transport.as_ref().clone().with_cancel(scope.clone()))
    }

    pub fn browser(&self, dir: Option<PathBuf>) -> Result<DesktopBrowser> {
        self.browser_on(&self.transport, dir)
    }

    /// Browser that saves into `dir`, falling back to the configured
    /// download dir and then the current directory.
    pub fn browser_on(&self, transport: &CurlTransport, dir: Option<PathBuf>) -> Result<DesktopBrowser> {
        let dir = match dir.or_else(|| self.cfg.download_dir.clone()) {
            Some(d) => d,
            None => std::env::current_dir().context("resolve current directory")?,
        };
        Ok(DesktopBrowser::new(transport.clone(), dir)
            .with_bearer(self.credentials.bearer_token())
            .with_opener(self.cfg.browser_command.clone()))
    }

    /// Fetches a tender, turning fetch failures into user-facing errors.
    /// An expired session opens the login page.
    pub async fn fetch_record(&self, id: &str) -> Result<CanonicalRecord> {
        let client = TenderClient::new(self.session(), self.endpoints.clone(), self.cfg.role);
        match client.fetch_tender(id).await {
            Ok(record) => Ok(record),
            Err(FetchError::AuthExpired { login_url }) => {
                self.open_login(&login_url);
                Err(anyhow!(
                    "Your session has expired. Please log in again ({login_url}), then run `tenderlink login --token <TOKEN>`."
                ))
            }
            Err(e) => {
                let message = e.user_message();
                let hint = if e.is_retryable() {
                    " Run the command again to retry."
                } else {
                    ""
                };
                Err(anyhow::Error::new(e).context(format!("{message}{hint}")))
            }
        }
    }

    fn open_login(&self, login_url: &str) {
        let opened = Url::parse(login_url)
            .map_err(|e| anyhow!(e))
            .and_then(|url| {
                let browser = self.browser(None)?;
                browser
                    .open_in_browsing_context(OpenRequest::detached(&url))
                    .map_err(|e| anyhow!(e))
            });
        if let Err(e) = opened {
            tracing::warn!("could not open login page {}: {:#}", login_url, e);
        }
    }
}
