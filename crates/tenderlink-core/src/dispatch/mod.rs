//! Action dispatch: perform the browser-side effect for a reachable URL.
//!
//! The effect goes through the [`BrowserContext`] capability so it can be
//! swapped for a recording implementation in tests, or for a desktop one in
//! the CLI.

mod desktop;
mod sanitize;

pub use desktop::DesktopBrowser;
pub use sanitize::{save_name, DEFAULT_SAVE_NAME};

use std::future::Future;

use url::Url;

use crate::error::{unavailable_message, DispatchError};
use crate::locator::Intent;

/// Target for a fresh, unnamed browsing context.
pub const TARGET_BLANK: &str = "_blank";
/// Window features: the opened page gets no handle back to the opener.
pub const NO_OPENER: &str = "noopener,noreferrer";

/// Open `url` in a new, unnamed browsing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub url: String,
    pub target: &'static str,
    pub features: &'static str,
}

impl OpenRequest {
    pub fn detached(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            target: TARGET_BLANK,
            features: NO_OPENER,
        }
    }
}

/// Transient save request. Consumed by [`BrowserContext::trigger_save`];
/// nothing of it outlives the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub url: String,
    pub suggested_name: String,
}

pub trait BrowserContext: Send + Sync {
    fn open_in_browsing_context(&self, req: OpenRequest) -> Result<(), DispatchError>;

    fn trigger_save(
        &self,
        req: SaveRequest,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Show a user-facing message.
    fn alert(&self, message: &str);
}

pub struct Dispatcher<B> {
    browser: B,
}

impl<B: BrowserContext> Dispatcher<B> {
    pub fn new(browser: B) -> Self {
        Self { browser }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub async fn dispatch(
        &self,
        url: &Url,
        intent: Intent,
        display_name: &str,
    ) -> Result<(), DispatchError> {
        match intent {
            Intent::View => {
                tracing::info!(%url, "opening attachment");
                self.browser
                    .open_in_browsing_context(OpenRequest::detached(url))
            }
            Intent::Download => {
                tracing::info!(%url, display_name, "saving attachment");
                let req = SaveRequest {
                    url: url.to_string(),
                    suggested_name: display_name.to_string(),
                };
                self.browser.trigger_save(req).await
            }
        }
    }

    /// The single message shown when no candidate was reachable.
    pub fn report_unavailable(&self, display_name: &str) {
        self.browser.alert(&unavailable_message(display_name));
    }
}
