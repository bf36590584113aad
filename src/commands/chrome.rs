// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Chrome account and client configuration commands

use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{or_unset, print_json, reveal};
use crate::chrome::{get_chrome_accounts, ChromeInstall, ChromeProfile, ClientConfig};
use crate::cli::OutputArgs;
use crate::colors::{line, Status, StyledText};
use crate::config::{ChromeConfig, ScanConfig};
use crate::secret_store::SecretStore;

/// List accounts signed into a Chrome profile with their refresh tokens
pub fn chrome_accounts(
    store: &dyn SecretStore,
    config: &ChromeConfig,
    output: &OutputArgs,
) -> Result<()> {
    let profile = ChromeProfile::locate(config.user_data_dir.as_deref(), &config.profile)
        .context("Failed to locate the Chrome profile")?;
    log::debug!("Using profile {}", profile.dir.display());

    let accounts = get_chrome_accounts(
        &profile,
        store,
        &config.safe_storage_service,
        &config.safe_storage_account,
    )
    .with_context(|| format!("Failed to read accounts from {}", profile.dir.display()))?;

    if output.json {
        return print_json(&accounts);
    }

    println!(
        "\n{} Chrome Accounts ({})",
        Status::detail(),
        profile.dir.display().to_string().as_str().path()
    );
    println!("{}", line(60));

    if accounts.is_empty() {
        println!("{} No signed-in accounts", Status::missing());
        return Ok(());
    }

    for account in &accounts {
        let info = &account.info;
        println!("\n{} {}", Status::found(), info.email.header());
        if !info.full_name.is_empty() {
            println!("   {} Name: {}", Status::detail(), info.full_name);
        }
        println!("   {} Account ID: {}", Status::detail(), info.account_id.cyan());
        if !info.hd.is_empty() {
            println!("   {} Hosted domain: {}", Status::detail(), info.hd);
        }
        match &account.refresh_token {
            Some(token) => println!(
                "   {} Refresh token: {}",
                Status::detail(),
                reveal(token, output.show_secrets).as_str().secret()
            ),
            None => println!("   {} No refresh token", Status::warn()),
        }
    }

    let with_tokens = accounts.iter().filter(|a| a.refresh_token.is_some()).count();
    println!(
        "\n{} {} account(s), {} with tokens",
        Status::ok(),
        accounts.len(),
        with_tokens
    );
    Ok(())
}

/// Resolve the version to report for a scan
fn resolve_version(
    install: &ChromeInstall,
    explicit: Option<&str>,
    binary_given: bool,
) -> Result<String> {
    if let Some(v) = explicit {
        return Ok(v.to_string());
    }
    match install.version() {
        Ok(v) => Ok(v),
        Err(e) if binary_given => {
            log::debug!("Chrome version unavailable: {}", e);
            Ok("unknown".to_string())
        }
        Err(e) => Err(e).with_context(|| {
            format!(
                "Failed to read the Chrome version from {}",
                install.info_plist_path().display()
            )
        }),
    }
}

/// Read the client configuration out of `binary`
pub fn scan_binary(binary: &Path, version: &str, scan: &ScanConfig) -> Result<ClientConfig> {
    let scanner = scan.scanner().context("Invalid scan configuration")?;
    let file = File::open(binary)
        .with_context(|| format!("Failed to open {}", binary.display()))?;
    log::info!(
        "Scanning {} for '{}'",
        binary.display(),
        scan.signature
    );
    let config = ClientConfig::from_binary(version, BufReader::new(file), &scanner)
        .with_context(|| format!("Failed to scan {}", binary.display()))?;
    Ok(config)
}

/// Print the OAuth clients and API key compiled into Chrome
pub fn chrome_client_config(
    chrome: &ChromeConfig,
    scan: &ScanConfig,
    binary: Option<PathBuf>,
    chrome_version: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let install = ChromeInstall::new(&chrome.app_dir);
    let version = resolve_version(&install, chrome_version, binary.is_some())?;
    let binary = binary.unwrap_or_else(|| install.framework_binary(&version));

    let config = scan_binary(&binary, &version, scan)?;

    if output.json {
        return print_json(&config);
    }

    println!(
        "\n{} Chrome {} Client Configuration",
        Status::detail(),
        config.version.as_str().header()
    );
    println!("{}", line(60));
    println!(
        "{} API key: {}",
        Status::detail(),
        or_unset(config.api_key.as_deref(), output.show_secrets)
    );

    for (name, client) in config.clients() {
        let marker = if client.client_id.is_some() {
            Status::found()
        } else {
            Status::missing()
        };
        println!("\n{} {}", marker, name.header());
        println!(
            "   {} Client ID: {}",
            Status::detail(),
            client.client_id.as_deref().unwrap_or("(not set)").cyan()
        );
        println!(
            "   {} Client secret: {}",
            Status::detail(),
            or_unset(client.client_secret.as_deref(), output.show_secrets)
        );
    }
    Ok(())
}
