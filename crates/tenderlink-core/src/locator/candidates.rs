//! Ordered retrieval URLs for one storage name.

use std::collections::HashSet;

use serde::Serialize;
use url::Url;

use crate::endpoints::Endpoints;
use crate::http::endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Show inline in a new browsing context.
    View,
    /// Save under the display name.
    Download,
}

impl Intent {
    fn alternate(self) -> Intent {
        match self {
            Intent::View => Intent::Download,
            Intent::Download => Intent::View,
        }
    }
}

/// A URL to probe and the intent it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCandidate {
    pub url: Url,
    pub intent: Intent,
}

fn upload_url(endpoints: &Endpoints, intent: Intent, storage_name: &str, display_name: &str) -> Url {
    match intent {
        Intent::View => endpoint(&endpoints.api_base, &["upload", "view", storage_name]),
        Intent::Download => {
            let mut url = endpoint(&endpoints.api_base, &["upload", "download", storage_name]);
            let hint = if display_name.is_empty() {
                storage_name
            } else {
                display_name
            };
            url.query_pairs_mut().append_pair("original", hint);
            url
        }
    }
}

/// Candidates in probe order: the intent's own endpoint, the alternate
/// endpoint, `<static-root>/uploads/{s}`, then `<api-base>/uploads/{s}` for
/// deployments without the static path rewrite. Duplicates are dropped.
pub fn build_candidates(
    endpoints: &Endpoints,
    storage_name: &str,
    intent: Intent,
    display_name: &str,
) -> Vec<ProbeCandidate> {
    let ordered = [
        ProbeCandidate {
            url: upload_url(endpoints, intent, storage_name, display_name),
            intent,
        },
        ProbeCandidate {
            url: upload_url(endpoints, intent.alternate(), storage_name, display_name),
            intent: intent.alternate(),
        },
        ProbeCandidate {
            url: endpoint(&endpoints.static_root, &["uploads", storage_name]),
            intent,
        },
        ProbeCandidate {
            url: endpoint(&endpoints.api_base, &["uploads", storage_name]),
            intent,
        },
    ];

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .filter(|c| seen.insert(c.url.as_str().to_string()))
        .collect()
}
