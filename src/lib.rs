// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! gcred - Library
//!
//! Recovers the Google OAuth credentials that desktop Google software keeps
//! on the local machine.
//!
//! ## Sources
//!
//! - **Backup and Sync** - per-account token blobs in the keychain
//!   (service `Google Drive`), see [`drive`]
//! - **Google Chrome** - refresh tokens encrypted in the profile's `Web Data`
//!   database, see [`chrome::vault`]
//! - **Chrome framework binary** - the OAuth clients and API key compiled into
//!   Chrome, see [`chrome::client_config`]
//!
//! ```rust,ignore
//! use gcred::drive::DriveCredentialToken;
//!
//! let token = DriveCredentialToken::from_blob(blob)?;
//! if !token.is_valid() {
//!     eprintln!("unexpected token format");
//! }
//! ```

pub mod chrome;
pub mod cli;
pub mod codec;
pub mod colors;
pub mod commands;
pub mod config;
pub mod drive;
pub mod error;
pub mod logging;
pub mod secret_store;

// Re-export commonly used items
pub use chrome::{
    ChromeAccount, ChromeVaultToken, ClientConfig, EncryptedTokenEntry, OAuthClient,
    SignatureScanner, VaultDecryptor, VaultReport,
};
pub use config::GcredConfig;
pub use drive::{DriveCredential, DriveCredentialToken, TokenValidation};
pub use error::{GcredError, Result};
pub use secret_store::{Credential, KeychainCli, MemorySecretStore, SecretStore};
