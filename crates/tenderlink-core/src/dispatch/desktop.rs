//! Desktop implementation of [`BrowserContext`].
//!
//! Views are handed to an external opener (`xdg-open` by default) as a
//! detached process. Saves stream the response into a temp file in the
//! download dir, which only becomes visible under its final name once the
//! transfer succeeded and the owning view is still mounted.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use super::{save_name, BrowserContext, OpenRequest, SaveRequest};
use crate::action::ViewScope;
use crate::error::DispatchError;
use crate::http::{CurlTransport, Request};

const DEFAULT_OPENER: &str = "xdg-open";

#[derive(Debug, Clone)]
pub struct DesktopBrowser {
    transport: CurlTransport,
    bearer: Option<String>,
    download_dir: PathBuf,
    opener: String,
    scope: Option<ViewScope>,
}

impl DesktopBrowser {
    pub fn new(transport: CurlTransport, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            bearer: None,
            download_dir: download_dir.into(),
            opener: DEFAULT_OPENER.to_string(),
            scope: None,
        }
    }

    /// Ties saves to `scope`: once it is unmounted, a transfer still in
    /// flight is discarded instead of landing in the download dir.
    #[must_use]
    pub fn with_scope(mut self, scope: ViewScope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    #[must_use]
    pub fn with_opener(mut self, program: Option<String>) -> Self {
        if let Some(p) = program.filter(|p| !p.trim().is_empty()) {
            self.opener = p;
        }
        self
    }

    /// Where a save with this suggested name ends up.
    pub fn save_path(&self, suggested_name: &str) -> PathBuf {
        self.download_dir.join(save_name(suggested_name))
    }

    fn abandoned(&self) -> bool {
        self.scope.as_ref().is_some_and(|s| !s.is_mounted())
    }
}

/// Temp file for an in-progress save. Created with the regular file mode so
/// the persisted download gets umask permissions, not tempfile's 0600.
fn partial_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".tenderlink-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

impl BrowserContext for DesktopBrowser {
    fn open_in_browsing_context(&self, req: OpenRequest) -> Result<(), DispatchError> {
        // Not waited on: the opener outlives this process if it wants to.
        Command::new(&self.opener)
            .arg(&req.url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(DispatchError::Open)
    }

    async fn trigger_save(&self, req: SaveRequest) -> Result<(), DispatchError> {
        if self.abandoned() {
            return Err(DispatchError::Abandoned);
        }
        let target = self.save_path(&req.suggested_name);
        let temp = partial_file_in(&self.download_dir).map_err(|e| {
            DispatchError::Persist {
                path: self.download_dir.display().to_string(),
                source: e,
            }
        })?;

        let http_req = Request::new(req.url).with_bearer(self.bearer.clone());
        let saved = self.transport.save_to(&http_req, temp).await;
        // Covers both a transfer aborted on unmount and one that finished
        // just before it. Dropping the temp file removes the partial body.
        if self.abandoned() {
            tracing::debug!(url = %http_req.url, "view gone during save; discarding download");
            return Err(DispatchError::Abandoned);
        }
        let (status, temp) = saved?;
        if !(200..300).contains(&status) {
            return Err(DispatchError::SaveStatus(status));
        }

        temp.persist(&target).map_err(|e| DispatchError::Persist {
            path: target.display().to_string(),
            source: e.error,
        })?;
        tracing::info!("saved attachment to {}", target.display());
        Ok(())
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
