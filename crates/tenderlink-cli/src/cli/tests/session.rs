//! Tests for login and logout.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_login() {
    match parse(&["tenderlink", "login", "--token", "abc.def"]) {
        CliCommand::Login { token } => assert_eq!(token, "abc.def"),
        _ => panic!("expected Login"),
    }
}

#[test]
fn cli_login_requires_token() {
    assert!(Cli::try_parse_from(["tenderlink", "login"]).is_err());
}

#[test]
fn cli_parse_logout() {
    match parse(&["tenderlink", "logout"]) {
        CliCommand::Logout => {}
        _ => panic!("expected Logout"),
    }
}
