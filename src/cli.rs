// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! CLI argument definitions using clap derive macros

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gcred - Recover locally stored Google OAuth credentials
#[derive(Parser)]
#[command(name = "gcred")]
#[command(author = "Nervosys")]
#[command(version)]
#[command(about = "Recover Google OAuth credentials from Backup and Sync and Chrome", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: <config dir>/gcred/config.json)
    #[arg(long, global = true, env = "GCRED_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output options shared by the credential commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print JSON instead of the human readable report
    #[arg(long)]
    pub json: bool,

    /// Print refresh tokens and client secrets in full
    #[arg(long)]
    pub show_secrets: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    // ============================================================================
    // Drive Commands
    // ============================================================================
    /// List Backup and Sync accounts stored in the keychain
    Drive {
        /// Keychain service name
        #[arg(long)]
        service: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    // ============================================================================
    // Chrome Commands
    // ============================================================================
    /// Recover credentials from Google Chrome
    Chrome {
        #[command(subcommand)]
        command: ChromeCommands,
    },

    // ============================================================================
    // Decode Commands
    // ============================================================================
    /// Decode a Backup and Sync token blob ("-" reads stdin)
    DecodeBlob {
        /// The blob, starting with "2G"
        blob: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    // ============================================================================
    // Config Commands
    // ============================================================================
    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ChromeCommands {
    /// Signed-in accounts and their decrypted refresh tokens
    Accounts {
        /// Chrome user data directory
        #[arg(long, env = "GCRED_CHROME_USER_DATA")]
        user_data_dir: Option<PathBuf>,

        /// Profile directory name inside the user data directory
        #[arg(long)]
        profile: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// OAuth clients and API key compiled into the Chrome binary
    ClientConfig {
        /// Chrome framework binary (default: located from the app bundle)
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Chrome version to report (default: read from Info.plist)
        #[arg(long = "chrome-version")]
        chrome_version: Option<String>,

        /// Chrome app bundle Contents directory
        #[arg(long)]
        app_dir: Option<PathBuf>,

        /// Bytes of string table to read after the signature
        #[arg(long)]
        window_size: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
