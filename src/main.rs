// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! gcred - Main entry point
//!
//! Recovers Google OAuth credentials stored locally by Backup and Sync and
//! Google Chrome.

use anyhow::{Context, Result};
use clap::Parser;

use gcred::cli::{ChromeCommands, Cli, Commands, ConfigCommands};
use gcred::commands;
use gcred::config::GcredConfig;
use gcred::logging;
use gcred::secret_store::KeychainCli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let config_path = match cli.config {
        Some(path) => path,
        None => GcredConfig::config_path()?,
    };
    let mut config = GcredConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    match cli.command {
        // ====================================================================
        // Drive Commands
        // ====================================================================
        Commands::Drive { service, output } => {
            let service = service.unwrap_or(config.drive.service);
            commands::list_drive_credentials(&KeychainCli::new(), &service, &output)
        }

        // ====================================================================
        // Chrome Commands
        // ====================================================================
        Commands::Chrome { command } => match command {
            ChromeCommands::Accounts {
                user_data_dir,
                profile,
                output,
            } => {
                if user_data_dir.is_some() {
                    config.chrome.user_data_dir = user_data_dir;
                }
                if let Some(profile) = profile {
                    config.chrome.profile = profile;
                }
                commands::chrome_accounts(&KeychainCli::new(), &config.chrome, &output)
            }
            ChromeCommands::ClientConfig {
                binary,
                chrome_version,
                app_dir,
                window_size,
                output,
            } => {
                if let Some(app_dir) = app_dir {
                    config.chrome.app_dir = app_dir;
                }
                if let Some(window_size) = window_size {
                    config.scan.window_size = window_size;
                }
                commands::chrome_client_config(
                    &config.chrome,
                    &config.scan,
                    binary,
                    chrome_version.as_deref(),
                    &output,
                )
            }
        },

        // ====================================================================
        // Decode Commands
        // ====================================================================
        Commands::DecodeBlob { blob, output } => commands::decode_blob(&blob, &output),

        // ====================================================================
        // Config Commands
        // ====================================================================
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(&config),
            Some(ConfigCommands::Path) => commands::config_path(&config_path),
            Some(ConfigCommands::Init { force }) => commands::config_init(&config_path, force),
        },
    }
}
