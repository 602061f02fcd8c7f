use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Portal role of the signed-in user. Only elevated roles may use the
/// privileged record endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Standard,
    Admin,
}

impl Role {
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Transport timeouts (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/tenderlink/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Standard API base, e.g. `http://localhost:5000/api`.
    pub api_base: String,
    /// Privileged (admin) API base.
    pub privileged_base: String,
    /// Root under which the backend serves `/uploads/...` statically.
    pub static_root: String,
    /// Login entry point opened when the session expires.
    pub login_url: String,
    #[serde(default)]
    pub role: Role,
    /// Directory for downloaded attachments (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Program used to open URLs (None = `xdg-open`).
    #[serde(default)]
    pub browser_command: Option<String>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000/api".to_string(),
            privileged_base: "http://localhost:5000/api/admin".to_string(),
            static_root: "http://localhost:5000".to_string(),
            login_url: "http://localhost:3000/login".to_string(),
            role: Role::Standard,
            download_dir: None,
            browser_command: None,
            http: None,
        }
    }
}

impl PortalConfig {
    pub fn http_or_default(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tenderlink")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PortalConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PortalConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PortalConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
