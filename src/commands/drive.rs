// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Backup and Sync credential listing

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use super::{print_json, reveal};
use crate::cli::OutputArgs;
use crate::colors::{line, Status, StyledText};
use crate::drive::{get_drive_credentials, DriveCredential, DriveCredentialToken};
use crate::secret_store::SecretStore;

#[derive(Serialize)]
struct DriveCredentialJson<'a> {
    #[serde(flatten)]
    credential: &'a DriveCredential,
    plausible: Option<bool>,
}

/// List every Drive account found under `service`
pub fn list_drive_credentials(
    store: &dyn SecretStore,
    service: &str,
    output: &OutputArgs,
) -> Result<()> {
    let creds = get_drive_credentials(store, service)
        .with_context(|| format!("Failed to read '{}' from the secret store", service))?;

    if output.json {
        let rows: Vec<_> = creds
            .iter()
            .map(|c| DriveCredentialJson {
                credential: c,
                plausible: c.token.as_ref().map(DriveCredentialToken::is_valid),
            })
            .collect();
        return print_json(&rows);
    }

    println!("\n{} Google Drive Accounts", Status::detail());
    println!("{}", line(60));

    if creds.is_empty() {
        println!("{} No accounts stored under '{}'", Status::missing(), service);
        return Ok(());
    }

    for cred in &creds {
        println!("\n{} {}", Status::found(), cred.email.header());
        match &cred.machine_id {
            Some(id) => println!("   {} Machine ID: {}", Status::detail(), id.path()),
            None => println!("   {} Machine ID: (none)", Status::detail()),
        }
        match &cred.token {
            Some(token) => print_token(token, output.show_secrets, "   "),
            None => println!("   {} No usable token", Status::warn()),
        }
    }

    let with_tokens = creds.iter().filter(|c| c.token.is_some()).count();
    println!(
        "\n{} {} account(s), {} with tokens",
        Status::ok(),
        creds.len(),
        with_tokens
    );
    Ok(())
}

/// Human readable token report
pub(crate) fn print_token(token: &DriveCredentialToken, show_secrets: bool, indent: &str) {
    let checks = token.validation();
    let flag = |ok: bool| if ok { "".normal() } else { " (unexpected format)".yellow() };

    println!(
        "{}{} Refresh token: {}{}",
        indent,
        Status::detail(),
        reveal(&token.refresh_token, show_secrets).as_str().secret(),
        flag(checks.refresh_token)
    );
    println!(
        "{}{} Client ID: {}{}",
        indent,
        Status::detail(),
        token.client_id.cyan(),
        flag(checks.client_id)
    );
    println!(
        "{}{} Client secret: {}{}",
        indent,
        Status::detail(),
        reveal(&token.client_secret, show_secrets).as_str().secret(),
        flag(checks.client_secret)
    );
    println!(
        "{}{} Scopes:{}",
        indent,
        Status::detail(),
        flag(checks.scopes)
    );
    for scope in &token.scopes {
        println!("{}    {}", indent, scope.dimmed());
    }
    if !checks.all() {
        println!(
            "{}{} {}",
            indent,
            Status::warn(),
            "Token does not look like a typical Google OAuth token".warning()
        );
    }
}
