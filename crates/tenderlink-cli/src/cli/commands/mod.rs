//! CLI command handlers, one file per command group.

mod attachment;
mod context;
mod login;
mod show;

pub use attachment::run_attachment;
pub use context::Context;
pub use login::{run_login, run_logout};
pub use show::{run_attachments, run_show};
