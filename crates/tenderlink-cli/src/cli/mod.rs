//! CLI for browsing tenders and retrieving their attachments.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tenderlink_core::config;
use tenderlink_core::locator::Intent;

use commands::{run_attachment, run_attachments, run_login, run_logout, run_show, Context};

/// Top-level CLI for tenderlink.
#[derive(Debug, Parser)]
#[command(name = "tenderlink")]
#[command(about = "tenderlink: tender records and attachments from the procurement portal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a tender and print its details.
    Show {
        /// Tender identifier.
        id: String,
        /// Print the normalized record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List a tender's attachments with their storage and display names.
    Attachments {
        /// Tender identifier.
        id: String,
    },

    /// Open an attachment in the browser.
    View {
        /// Tender identifier.
        id: String,
        /// Attachment position as listed by `attachments`.
        index: usize,
    },

    /// Save an attachment under its original name.
    Download {
        /// Tender identifier.
        id: String,
        /// Attachment position as listed by `attachments`.
        index: usize,
        /// Directory to save into (default: config `download_dir`, else current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Store a bearer token for subsequent requests.
    Login {
        /// Token issued by the portal.
        #[arg(long)]
        token: String,
    },

    /// Forget the stored bearer token.
    Logout,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let ctx = Context::new(cfg)?;

        match cli.command {
            CliCommand::Show { id, json } => run_show(&ctx, &id, json).await?,
            CliCommand::Attachments { id } => run_attachments(&ctx, &id).await?,
            CliCommand::View { id, index } => {
                run_attachment(&ctx, &id, index, Intent::View, None).await?
            }
            CliCommand::Download { id, index, dir } => {
                run_attachment(&ctx, &id, index, Intent::Download, dir).await?
            }
            CliCommand::Login { token } => run_login(&ctx, &token)?,
            CliCommand::Logout => run_logout(&ctx),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
