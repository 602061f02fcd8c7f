//! Tender record fetch with privileged → standard fallback.
//!
//! Elevated users try the privileged endpoint first, since only it knows the
//! bid-permission flags. Its failures are logged and hidden behind the
//! standard endpoint; only a 401 short-circuits, because a rejected
//! credential will be rejected by both.

use crate::config::Role;
use crate::credentials::CredentialProvider;
use crate::endpoints::Endpoints;
use crate::error::FetchError;
use crate::http::{classify_status, HttpSession, StatusClass, Transport};
use crate::normalize::{normalize, CanonicalRecord, Source};

pub struct TenderClient<T, C> {
    session: HttpSession<T, C>,
    endpoints: Endpoints,
    role: Role,
}

impl<T: Transport, C: CredentialProvider> TenderClient<T, C> {
    pub fn new(session: HttpSession<T, C>, endpoints: Endpoints, role: Role) -> Self {
        Self {
            session,
            endpoints,
            role,
        }
    }

    pub fn session(&self) -> &HttpSession<T, C> {
        &self.session
    }

    pub async fn fetch_tender(&self, id: &str) -> Result<CanonicalRecord, FetchError> {
        if self.role.is_elevated() {
            match self.fetch_from(Source::Privileged, id).await {
                Ok(record) => return Ok(record),
                Err(e @ FetchError::AuthExpired { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(tender_id = id, "privileged fetch failed, using standard endpoint: {}", e);
                }
            }
        }
        self.fetch_from(Source::Standard, id).await
    }

    async fn fetch_from(&self, source: Source, id: &str) -> Result<CanonicalRecord, FetchError> {
        let url = self.endpoints.tender(source == Source::Privileged, id);
        tracing::debug!(%url, ?source, "fetching tender");
        let resp = self.session.get(&url).await?;

        match classify_status(resp.status) {
            StatusClass::Success => {}
            StatusClass::Unauthorized => return Err(self.expire_session()),
            StatusClass::Forbidden => return Err(FetchError::Forbidden),
            StatusClass::NotFound => return Err(FetchError::NotFound),
            StatusClass::Other(code) => return Err(FetchError::Http(code)),
        }

        let raw = resp.json().map_err(|e| {
            tracing::debug!(%url, "tender body is not JSON: {}", e);
            FetchError::MalformedResponse
        })?;
        Ok(normalize(source, &raw)?)
    }

    fn expire_session(&self) -> FetchError {
        tracing::info!("record fetch unauthorized; clearing credentials");
        self.session.credentials().clear();
        FetchError::AuthExpired {
            login_url: self.endpoints.login_url.clone(),
        }
    }
}
