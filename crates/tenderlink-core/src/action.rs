//! One user-triggered attachment action: resolve, locate, dispatch.
//!
//! Nothing is cached between actions; every call re-resolves and re-probes.
//! Two concurrent actions on the same attachment run independently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;

use crate::attachment::{resolve, AttachmentDescriptor};
use crate::credentials::CredentialProvider;
use crate::dispatch::{BrowserContext, Dispatcher};
use crate::error::{ActionError, LocateError};
use crate::http::Transport;
use crate::locator::{Intent, Locator};

/// Lifetime of the view that started an action. Once unmounted, in-flight
/// actions stop at their next check and apply nothing.
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

/// Which attachment of which tender.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentTarget<'a> {
    pub tender_id: &'a str,
    /// Position in the tender's attachment list (matches the file listing).
    pub index: usize,
    pub descriptor: &'a AttachmentDescriptor,
}

pub struct AttachmentActions<T, C, B> {
    locator: Locator<T, C>,
    dispatcher: Dispatcher<B>,
}

impl<T, C, B> AttachmentActions<T, C, B>
where
    T: Transport,
    C: CredentialProvider,
    B: BrowserContext,
{
    pub fn new(locator: Locator<T, C>, dispatcher: Dispatcher<B>) -> Self {
        Self {
            locator,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    /// Runs the action and returns the URL that was used.
    ///
    /// Failures to reach the file are reported to the user once, through the
    /// dispatcher; an abandoned action reports nothing.
    pub async fn run(
        &self,
        scope: &ViewScope,
        target: AttachmentTarget<'_>,
        intent: Intent,
    ) -> Result<Url, ActionError> {
        if !scope.is_mounted() {
            return Err(ActionError::Abandoned);
        }
        let resolved = resolve(target.descriptor);
        if !resolved.is_retrievable() {
            tracing::warn!(
                tender_id = target.tender_id,
                index = target.index,
                "attachment has no usable name"
            );
            self.dispatcher.report_unavailable(&resolved.display_name);
            return Err(ActionError::Unretrievable {
                display_name: resolved.display_name,
            });
        }

        let located = self
            .locator
            .locate_for(
                scope,
                target.tender_id,
                target.index,
                &resolved.storage_name,
                intent,
                &resolved.display_name,
            )
            .await;
        let url = match located {
            Ok(url) => url,
            Err(LocateError::ResourceUnavailable { display_name }) => {
                self.dispatcher.report_unavailable(&display_name);
                return Err(ActionError::ResourceUnavailable { display_name });
            }
            Err(e @ LocateError::Abandoned) => return Err(e.into()),
        };

        if !scope.is_mounted() {
            tracing::debug!(%url, "view gone before dispatch; discarding result");
            return Err(ActionError::Abandoned);
        }
        self.dispatcher
            .dispatch(&url, intent, &resolved.display_name)
            .await?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentials;
    use crate::dispatch::{OpenRequest, SaveRequest};
    use crate::http::HttpSession;
    use crate::normalize::{normalize, Source};
    use crate::testing::{endpoints, BrowserEvent, FakeTransport, Method, RecordingBrowser};
    use serde_json::json;

    type Actions = AttachmentActions<FakeTransport, MemoryCredentials, RecordingBrowser>;

    fn actions(transport: FakeTransport) -> (Actions, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let session = HttpSession::new(Arc::clone(&transport), Arc::new(MemoryCredentials::new(None)));
        let locator = Locator::new(session, endpoints());
        (
            AttachmentActions::new(locator, Dispatcher::new(RecordingBrowser::default())),
            transport,
        )
    }

    fn descriptor(v: serde_json::Value) -> AttachmentDescriptor {
        AttachmentDescriptor::from_value(&v)
    }

    fn target(d: &AttachmentDescriptor) -> AttachmentTarget<'_> {
        AttachmentTarget {
            tender_id: "t1",
            index: 0,
            descriptor: d,
        }
    }

    #[tokio::test]
    async fn download_saves_with_original_name() {
        let dl = "http://portal.test/api/upload/download/file-1690000000-123.pdf?original=Specification.pdf";
        let (a, t) = actions(FakeTransport::new().status(Method::Head, dl, 200));
        let d = descriptor(json!({
            "filename": "file-1690000000-123.pdf",
            "originalName": "Specification.pdf"
        }));
        let url = a.run(&ViewScope::new(), target(&d), Intent::Download).await.unwrap();
        assert_eq!(url.as_str(), dl);
        // Generated name: no listing lookup, one probe.
        assert_eq!(t.calls(), vec![(Method::Head, dl.to_string())]);
        assert_eq!(
            a.dispatcher().browser().events(),
            vec![BrowserEvent::Save(SaveRequest {
                url: dl.to_string(),
                suggested_name: "Specification.pdf".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn plain_name_is_looked_up_before_probing() {
        let view = "http://portal.test/api/upload/view/file-5-5.pdf";
        let (a, t) = actions(
            FakeTransport::new()
                .body(
                    Method::Get,
                    "http://portal.test/api/tenders/t1/files",
                    200,
                    r#"{"files":[{"filename":"file-5-5.pdf"}]}"#,
                )
                .status(Method::Head, view, 200),
        );
        let d = descriptor(json!({"name": "spec.pdf"}));
        let url = a.run(&ViewScope::new(), target(&d), Intent::View).await.unwrap();
        assert_eq!(url.as_str(), view);
        assert_eq!(t.calls()[0].0, Method::Get);
        assert_eq!(
            a.dispatcher().browser().events(),
            vec![BrowserEvent::Open(OpenRequest {
                url: view.to_string(),
                target: "_blank",
                features: "noopener,noreferrer",
            })]
        );
    }

    #[tokio::test]
    async fn unreachable_reports_once_and_dispatches_nothing() {
        let (a, _) = actions(FakeTransport::new());
        let d = descriptor(json!({"filename": "file-1-2.pdf", "originalName": "Bid form.pdf"}));
        let err = a.run(&ViewScope::new(), target(&d), Intent::View).await.unwrap_err();
        assert!(matches!(err, ActionError::ResourceUnavailable { ref display_name } if display_name == "Bid form.pdf"));
        let events = a.dispatcher().browser().events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], BrowserEvent::Alert(m) if m.contains("Bid form.pdf")));
    }

    #[tokio::test]
    async fn nameless_descriptor_is_unretrievable() {
        let (a, t) = actions(FakeTransport::new());
        let d = descriptor(json!({"size": 10}));
        let err = a.run(&ViewScope::new(), target(&d), Intent::Download).await.unwrap_err();
        assert!(matches!(err, ActionError::Unretrievable { .. }));
        assert!(t.calls().is_empty());
    }

    #[tokio::test]
    async fn unmounted_view_applies_nothing() {
        let (a, t) = actions(FakeTransport::new());
        let scope = ViewScope::new();
        scope.unmount();
        let d = descriptor(json!({"filename": "file-1-2.pdf"}));
        let err = a.run(&scope, target(&d), Intent::View).await.unwrap_err();
        assert!(matches!(err, ActionError::Abandoned));
        assert!(t.calls().is_empty());
        assert!(a.dispatcher().browser().events().is_empty());
    }

    #[tokio::test]
    async fn unmount_between_requests_dispatches_nothing() {
        let scope = ViewScope::new();
        let (a, t) = actions(FakeTransport::new().unmount_after(&scope, 1));
        let d = descriptor(json!({"filename": "file-1-2.pdf"}));
        let err = a.run(&scope, target(&d), Intent::Download).await.unwrap_err();
        assert!(matches!(err, ActionError::Abandoned));
        assert_eq!(t.calls().len(), 1);
        assert!(a.dispatcher().browser().events().is_empty());
    }

    #[tokio::test]
    async fn unmounted_nameless_descriptor_is_silent() {
        let (a, _) = actions(FakeTransport::new());
        let scope = ViewScope::new();
        scope.unmount();
        let d = descriptor(json!({"size": 10}));
        let err = a.run(&scope, target(&d), Intent::View).await.unwrap_err();
        assert!(matches!(err, ActionError::Abandoned));
        assert!(a.dispatcher().browser().events().is_empty());
    }

    #[tokio::test]
    async fn junk_entry_does_not_shift_listing_lookup() {
        let record = normalize(
            Source::Standard,
            &json!({"_id": "t1", "attachments": [null, {"name": "spec.pdf"}]}),
        )
        .unwrap();
        let view = "http://portal.test/api/upload/view/file-2-2.pdf";
        let (a, t) = actions(
            FakeTransport::new()
                .body(
                    Method::Get,
                    "http://portal.test/api/tenders/t1/files",
                    200,
                    r#"{"files":[{"filename":"file-1-1.pdf"},{"filename":"file-2-2.pdf"}]}"#,
                )
                .status(Method::Head, view, 200),
        );
        let (index, d) = record
            .attachments
            .iter()
            .enumerate()
            .find(|(_, d)| d.name.as_deref() == Some("spec.pdf"))
            .unwrap();
        assert_eq!(index, 1);
        let tgt = AttachmentTarget {
            tender_id: "t1",
            index,
            descriptor: d,
        };
        let url = a.run(&ViewScope::new(), tgt, Intent::View).await.unwrap();
        assert_eq!(url.as_str(), view);
        assert_eq!(t.urls().last().map(String::as_str), Some(view));
    }

    #[tokio::test]
    async fn repeated_actions_re_probe() {
        let view = "http://portal.test/api/upload/view/file-1-2.pdf";
        let (a, t) = actions(FakeTransport::new().status(Method::Head, view, 200));
        let d = descriptor(json!({"filename": "file-1-2.pdf"}));
        a.run(&ViewScope::new(), target(&d), Intent::View).await.unwrap();
        a.run(&ViewScope::new(), target(&d), Intent::View).await.unwrap();
        assert_eq!(t.calls().len(), 2);
    }

    #[test]
    fn scope_clones_share_state() {
        let scope = ViewScope::new();
        let handle = scope.clone();
        assert!(handle.is_mounted());
        scope.unmount();
        assert!(!handle.is_mounted());
    }
}
