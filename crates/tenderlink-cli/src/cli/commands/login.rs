//! `tenderlink login` / `tenderlink logout`.

use anyhow::{bail, Result};
use tenderlink_core::credentials::CredentialProvider;

use super::Context;

pub fn run_login(ctx: &Context, token: &str) -> Result<()> {
    if token.trim().is_empty() {
        bail!("token must not be empty");
    }
    ctx.credentials.store(token)?;
    println!("Token stored at {}", ctx.credentials.path().display());
    Ok(())
}

pub fn run_logout(ctx: &Context) {
    ctx.credentials.clear();
    println!("Logged out.");
}
