// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Google Chrome credential recovery
//!
//! - [`vault`] decrypts the refresh tokens Chrome keeps in `Web Data`
//! - [`signature`] and [`client_config`] recover the OAuth clients and API key
//!   compiled into the Chrome framework binary
//! - [`profile`] and [`accounts`] locate and read the profile files

pub mod accounts;
pub mod client_config;
pub mod profile;
pub mod signature;
pub mod vault;

pub use accounts::{get_chrome_accounts, AccountIdentity, ChromeAccount};
pub use client_config::{ClientConfig, OAuthClient};
pub use profile::{ChromeInstall, ChromeProfile};
pub use signature::{Signature, SignatureScanner, StringTable};
pub use vault::{ChromeVaultToken, EncryptedTokenEntry, VaultDecryptor, VaultReport};
