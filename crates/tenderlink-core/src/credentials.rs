//! Bearer credential source.
//!
//! The core only needs to read the current token and to drop it when the
//! backend rejects it; how the token was obtained is not its concern.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if any.
    fn bearer_token(&self) -> Option<String>;

    /// Forget the stored credential (called on 401 from a record fetch).
    fn clear(&self);
}

/// Token kept in a file under the XDG state dir (`~/.local/state/tenderlink/token`).
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("tenderlink")?;
        let path = xdg_dirs
            .place_state_file("token")
            .context("create state dir for token")?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }
        let mut file = opts
            .open(&self.path)
            .with_context(|| format!("open token file: {}", self.path.display()))?;
        // An existing file keeps its old mode on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.trim().as_bytes())
            .with_context(|| format!("write token: {}", self.path.display()))?;
        Ok(())
    }
}

impl CredentialProvider for FileCredentials {
    fn bearer_token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!("cleared stored credentials at {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to clear credentials {}: {}", self.path.display(), e),
        }
    }
}

/// In-process credential holder. Counts `clear()` calls.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: Mutex<Option<String>>,
    clears: AtomicUsize,
}

impl MemoryCredentials {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(str::to_string)),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialProvider for MemoryCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn clear(&self) {
        if let Ok(mut t) = self.token.lock() {
            *t = None;
        }
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
