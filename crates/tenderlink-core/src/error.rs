//! Error taxonomy for record fetches and attachment actions.
//!
//! Record-fetch errors are fatal to the view that asked for the record;
//! attachment errors stay local to the one attachment being opened.

use crate::http::TransportError;

/// The payload contained nothing that looks like a tender record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("response does not contain a recognizable tender record")]
    MalformedResponse,
}

/// Failure of the primary record fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("response does not contain a recognizable tender record")]
    MalformedResponse,
    /// 401 on the record fetch. Stored credentials have already been cleared.
    #[error("session expired; log in again at {login_url}")]
    AuthExpired { login_url: String },
    #[error("tender not found")]
    NotFound,
    #[error("access to tender forbidden")]
    Forbidden,
    #[error("record fetch returned HTTP {0}")]
    Http(u32),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<NormalizeError> for FetchError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::MalformedResponse => FetchError::MalformedResponse,
        }
    }
}

impl FetchError {
    /// Copy shown to the end user in place of the tender view.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::AuthExpired { .. } => "Your session has expired. Please log in again.",
            FetchError::NotFound => "This tender was not found or has been deleted.",
            FetchError::Forbidden => "You do not have permission to view this tender.",
            FetchError::MalformedResponse | FetchError::Http(_) | FetchError::Transport(_) => {
                "Unable to load tender details."
            }
        }
    }

    /// Whether the view should offer a retry action. An expired session
    /// redirects to login instead.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::AuthExpired { .. })
    }
}

/// Every probe candidate for an attachment failed, or the action was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("no reachable location for {display_name}")]
    ResourceUnavailable { display_name: String },
    #[error("probing abandoned")]
    Abandoned,
}

/// Browser-side effect could not be performed.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to open browsing context: {0}")]
    Open(#[source] std::io::Error),
    #[error("save request failed: {0}")]
    Save(#[from] TransportError),
    #[error("save request returned HTTP {0}")]
    SaveStatus(u32),
    #[error("failed to store {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The owning view went away mid-save; the partial file was discarded.
    #[error("save abandoned")]
    Abandoned,
}

/// Outcome of one user-triggered attachment action that did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The descriptor yielded no storage name at all.
    #[error("attachment {display_name:?} has no retrievable file name")]
    Unretrievable { display_name: String },
    #[error("no reachable location for {display_name}")]
    ResourceUnavailable { display_name: String },
    /// The owning view went away; nothing was applied.
    #[error("attachment action abandoned")]
    Abandoned,
    #[error(transparent)]
    Dispatch(DispatchError),
}

impl From<DispatchError> for ActionError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Abandoned => ActionError::Abandoned,
            other => ActionError::Dispatch(other),
        }
    }
}

impl From<LocateError> for ActionError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::ResourceUnavailable { display_name } => {
                ActionError::ResourceUnavailable { display_name }
            }
            LocateError::Abandoned => ActionError::Abandoned,
        }
    }
}

/// Single user-facing message for an attachment that could not be reached.
/// Transport errors and 404s read the same.
pub fn unavailable_message(display_name: &str) -> String {
    let name = if display_name.is_empty() {
        "attachment"
    } else {
        display_name
    };
    format!("Unable to open \"{name}\". The file may be missing or inaccessible.")
}
