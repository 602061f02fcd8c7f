//! `tenderlink view` / `tenderlink download` – one attachment action.

use anyhow::{bail, Result};
use std::path::PathBuf;
use tenderlink_core::action::{AttachmentActions, AttachmentTarget, ViewScope};
use tenderlink_core::dispatch::Dispatcher;
use tenderlink_core::error::ActionError;
use tenderlink_core::locator::{Intent, Locator};

use super::Context;

pub async fn run_attachment(
    ctx: &Context,
    id: &str,
    index: usize,
    intent: Intent,
    dir: Option<PathBuf>,
) -> Result<()> {
    let record = ctx.fetch_record(id).await?;
    let Some(descriptor) = record.attachments.get(index) else {
        bail!(
            "tender {} has {} attachment(s); index {} is out of range",
            record.id,
            record.attachments.len(),
            index
        );
    };

    // Ctrl-c drops the view: the action future is dropped, in-flight curl
    // transfers abort, and a save that already finished is discarded.
    let scope = ViewScope::new();
    let transport = ctx.scoped_transport(&scope);
    let browser = ctx.browser_on(&transport, dir)?.with_scope(scope.clone());
    let actions = AttachmentActions::new(
        Locator::new(ctx.session_on(transport), ctx.endpoints.clone()),
        Dispatcher::new(browser),
    );

    let target = AttachmentTarget {
        tender_id: &record.id,
        index,
        descriptor,
    };
    let result = tokio::select! {
        r = actions.run(&scope, target, intent) => r,
        _ = tokio::signal::ctrl_c() => {
            scope.unmount();
            Err(ActionError::Abandoned)
        }
    };

    match result {
        Ok(url) => {
            match intent {
                Intent::View => println!("Opened {url}"),
                Intent::Download => println!("Saved from {url}"),
            }
            Ok(())
        }
        Err(ActionError::Abandoned) => {
            tracing::info!(tender_id = id, index, "attachment action cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
