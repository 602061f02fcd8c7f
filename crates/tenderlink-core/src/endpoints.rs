//! Parsed base URLs of the portal backend.

use url::Url;

use crate::config::PortalConfig;
use crate::http::endpoint;

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {field} {value:?}: {reason}")]
pub struct EndpointError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: Url,
    pub privileged_base: Url,
    pub static_root: Url,
    pub login_url: String,
}

fn parse_base(field: &'static str, value: &str) -> Result<Url, EndpointError> {
    let err = |reason: String| EndpointError {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|e| err(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(err("not a hierarchical URL".to_string()));
    }
    Ok(url)
}

impl Endpoints {
    pub fn new(
        api_base: &str,
        privileged_base: &str,
        static_root: &str,
        login_url: &str,
    ) -> Result<Self, EndpointError> {
        Ok(Self {
            api_base: parse_base("api_base", api_base)?,
            privileged_base: parse_base("privileged_base", privileged_base)?,
            static_root: parse_base("static_root", static_root)?,
            login_url: login_url.trim().to_string(),
        })
    }

    pub fn from_config(cfg: &PortalConfig) -> Result<Self, EndpointError> {
        Self::new(
            &cfg.api_base,
            &cfg.privileged_base,
            &cfg.static_root,
            &cfg.login_url,
        )
    }

    /// `<base>/tenders/{id}` on the privileged or standard API.
    pub fn tender(&self, privileged: bool, id: &str) -> Url {
        let base = if privileged {
            &self.privileged_base
        } else {
            &self.api_base
        };
        endpoint(base, &["tenders", id])
    }

    /// `<base>/tenders/{id}/files`.
    pub fn tender_files(&self, id: &str) -> Url {
        endpoint(&self.api_base, &["tenders", id, "files"])
    }
}
