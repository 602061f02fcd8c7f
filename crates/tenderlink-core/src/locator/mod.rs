//! Resource locator: find a reachable URL for a stored attachment.
//!
//! Candidates are probed strictly one after another with HEAD. The first 2xx
//! wins and the rest are never touched; a miss or transport error moves on
//! immediately. Probe failures, including 401s, never affect the session.

mod candidates;
mod lookup;

pub use candidates::{build_candidates, Intent, ProbeCandidate};

use url::Url;

use crate::action::ViewScope;
use crate::attachment::looks_server_generated;
use crate::credentials::CredentialProvider;
use crate::endpoints::Endpoints;
use crate::error::LocateError;
use crate::http::{HttpSession, Transport};

pub struct Locator<T, C> {
    session: HttpSession<T, C>,
    endpoints: Endpoints,
}

impl<T: Transport, C: CredentialProvider> Locator<T, C> {
    pub fn new(session: HttpSession<T, C>, endpoints: Endpoints) -> Self {
        Self { session, endpoints }
    }

    pub fn candidates(
        &self,
        storage_name: &str,
        intent: Intent,
        display_name: &str,
    ) -> Vec<ProbeCandidate> {
        build_candidates(&self.endpoints, storage_name, intent, display_name)
    }

    /// Returns the first reachable candidate URL.
    pub async fn locate(
        &self,
        storage_name: &str,
        intent: Intent,
        display_name: &str,
    ) -> Result<Url, LocateError> {
        self.locate_in(&ViewScope::new(), storage_name, intent, display_name)
            .await
    }

    /// Like [`Self::locate`], but stops with [`LocateError::Abandoned`] as soon
    /// as `scope` is unmounted.
    pub async fn locate_in(
        &self,
        scope: &ViewScope,
        storage_name: &str,
        intent: Intent,
        display_name: &str,
    ) -> Result<Url, LocateError> {
        let candidates = self.candidates(storage_name, intent, display_name);
        for (i, candidate) in candidates.into_iter().enumerate() {
            if !scope.is_mounted() {
                return Err(LocateError::Abandoned);
            }
            match self.session.head(&candidate.url).await {
                Ok(status) if (200..300).contains(&status) => {
                    tracing::debug!(
                        url = %candidate.url,
                        endpoint = ?candidate.intent,
                        attempt = i + 1,
                        "probe hit"
                    );
                    return Ok(candidate.url);
                }
                Ok(status) => {
                    tracing::debug!(url = %candidate.url, status, "probe miss");
                }
                Err(e) => {
                    tracing::debug!(url = %candidate.url, kind = %e.kind(), "probe failed: {}", e);
                }
            }
        }
        if !scope.is_mounted() {
            return Err(LocateError::Abandoned);
        }
        tracing::warn!(storage_name, "no reachable location for attachment");
        Err(LocateError::ResourceUnavailable {
            display_name: display_name.to_string(),
        })
    }

    /// Locates attachment `index` of `tender_id`, first confirming the
    /// storage name against the tender's file listing.
    pub async fn locate_for(
        &self,
        scope: &ViewScope,
        tender_id: &str,
        index: usize,
        storage_name: &str,
        intent: Intent,
        display_name: &str,
    ) -> Result<Url, LocateError> {
        if !scope.is_mounted() {
            return Err(LocateError::Abandoned);
        }
        let storage_name = self.confirm_storage_name(tender_id, index, storage_name).await;
        self.locate_in(scope, &storage_name, intent, display_name).await
    }

    /// Confirms the storage name against the tender's file listing when it
    /// does not look server-generated. Any failure keeps `storage_name`.
    pub async fn confirm_storage_name(
        &self,
        tender_id: &str,
        index: usize,
        storage_name: &str,
    ) -> String {
        if looks_server_generated(storage_name) {
            return storage_name.to_string();
        }
        let url = self.endpoints.tender_files(tender_id);
        let listed = match self.session.get(&url).await {
            Ok(resp) if resp.is_success() => resp
                .json()
                .ok()
                .and_then(|body| lookup::storage_name_from_listing(&body, index)),
            Ok(resp) => {
                tracing::debug!(%url, status = resp.status, "file listing unavailable");
                None
            }
            Err(e) => {
                tracing::debug!(%url, "file listing failed: {}", e);
                None
            }
        };
        match listed {
            Some(name) => {
                tracing::debug!(from = storage_name, to = %name, "storage name from listing");
                name
            }
            None => storage_name.to_string(),
        }
    }
}
