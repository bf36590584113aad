// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Google accounts signed into a Chrome profile
//!
//! Joins the `account_info` list from `Preferences` with the refresh tokens
//! decrypted out of `Web Data`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::profile::{read_token_rows, ChromeProfile};
use super::vault::{EncryptedTokenEntry, VaultDecryptor, VaultReport};
use crate::error::{GcredError, Result};
use crate::secret_store::SecretStore;

/// Keychain service holding the OSCrypt master secret
pub const SAFE_STORAGE_SERVICE: &str = "Chrome Safe Storage";
pub const SAFE_STORAGE_ACCOUNT: &str = "Chrome";

/// One entry of `account_info` in `Preferences`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountIdentity {
    pub account_id: String,
    pub email: String,
    pub full_name: String,
    pub gaia: String,
    pub given_name: String,
    /// Hosted domain
    pub hd: String,
    pub is_child_account: bool,
    pub is_under_advanced_protection: bool,
    pub locale: String,
    pub picture_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Preferences {
    #[serde(default)]
    account_info: Vec<AccountIdentity>,
}

/// A signed-in account with its refresh token, if one could be recovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromeAccount {
    pub info: AccountIdentity,
    pub refresh_token: Option<String>,
}

/// Parse the `account_info` list out of a `Preferences` document
pub fn parse_preferences(json: &str) -> Result<Vec<AccountIdentity>> {
    let prefs: Preferences = serde_json::from_str(json)?;
    Ok(prefs.account_info)
}

pub fn read_preferences(path: &Path) -> Result<Vec<AccountIdentity>> {
    if !path.exists() {
        return Err(GcredError::ProfileNotFound(path.to_path_buf()));
    }
    parse_preferences(&fs::read_to_string(path)?)
}

/// Fetch the master secret Chrome derives its token key from
///
/// The keychain value looks like base64 but is used as-is.
pub fn master_secret(store: &dyn SecretStore, service: &str, account: &str) -> Result<Vec<u8>> {
    store
        .get_password(service, account)?
        .filter(|s| !s.is_empty())
        .map(String::into_bytes)
        .ok_or(GcredError::MasterSecretUnavailable)
}

/// Decrypt `rows` for `accounts` and pair every account with its token
pub fn join_accounts(
    accounts: Vec<AccountIdentity>,
    rows: &[EncryptedTokenEntry],
    master_secret: &[u8],
) -> (Vec<ChromeAccount>, VaultReport) {
    let known: HashSet<String> = accounts.iter().map(|a| a.account_id.clone()).collect();
    let report = VaultDecryptor::new(master_secret).decrypt_all(rows, &known);
    let slots = report.tokens_for(accounts.iter().map(|a| a.account_id.as_str()));

    let joined = accounts
        .into_iter()
        .zip(slots)
        .map(|(info, slot)| ChromeAccount {
            info,
            refresh_token: slot.refresh_token,
        })
        .collect();
    (joined, report)
}

/// Recover every account signed into `profile`
pub fn get_chrome_accounts(
    profile: &ChromeProfile,
    store: &dyn SecretStore,
    service: &str,
    account: &str,
) -> Result<Vec<ChromeAccount>> {
    let rows = read_token_rows(&profile.web_data_path())?;
    let secret = master_secret(store, service, account)?;
    let identities = read_preferences(&profile.preferences_path())?;
    log::info!(
        "Found {} token rows and {} accounts in {}",
        rows.len(),
        identities.len(),
        profile.dir.display()
    );

    let (accounts, report) = join_accounts(identities, &rows, &secret);
    if !report.skipped.is_empty() {
        log::warn!("{} token rows could not be used", report.skipped.len());
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret_store::MemorySecretStore;

    const PREFS: &str = r#"{
        "browser": {"has_seen_welcome_page": true},
        "account_info": [
            {
                "account_id": "1001",
                "email": "one@example.com",
                "full_name": "One",
                "gaia": "1001",
                "given_name": "One",
                "hd": "NO_HOSTED_DOMAIN",
                "is_child_account": false,
                "is_under_advanced_protection": false,
                "locale": "en",
                "picture_url": "https://lh3.googleusercontent.com/a.jpg"
            },
            {"account_id": "1002", "email": "two@example.com"}
        ]
    }"#;

    #[test]
    fn test_parse_preferences() {
        let accounts = parse_preferences(PREFS).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].locale, "en");
        assert_eq!(accounts[1].email, "two@example.com");
        assert!(accounts[1].full_name.is_empty());
    }

    #[test]
    fn test_preferences_without_accounts() {
        assert!(parse_preferences("{}").unwrap().is_empty());
        assert!(parse_preferences("not json").is_err());
    }

    #[test]
    fn test_master_secret() {
        let store = MemorySecretStore::new().with(SAFE_STORAGE_SERVICE, SAFE_STORAGE_ACCOUNT, "k3y==");
        assert_eq!(
            master_secret(&store, SAFE_STORAGE_SERVICE, SAFE_STORAGE_ACCOUNT).unwrap(),
            b"k3y==".to_vec()
        );

        let empty = MemorySecretStore::new();
        assert!(matches!(
            master_secret(&empty, SAFE_STORAGE_SERVICE, SAFE_STORAGE_ACCOUNT),
            Err(GcredError::MasterSecretUnavailable)
        ));
    }

    #[test]
    fn test_join_accounts() {
        let accounts = parse_preferences(PREFS).unwrap();
        let vault = VaultDecryptor::new(b"secret");
        let rows = vec![
            EncryptedTokenEntry {
                service: "AccountId-1001".to_string(),
                encrypted_token: vault.encrypt(b"1/token-one").unwrap(),
            },
            EncryptedTokenEntry {
                service: "AccountId-9999".to_string(),
                encrypted_token: vault.encrypt(b"1/stranger").unwrap(),
            },
        ];

        let (joined, report) = join_accounts(accounts, &rows, b"secret");
        assert_eq!(joined[0].refresh_token.as_deref(), Some("1/token-one"));
        assert!(joined[1].refresh_token.is_none());
        assert_eq!(report.skipped.len(), 1);

        assert_eq!(joined[1].info.account_id, "1002");
        assert_eq!(report.tokens.len(), 1);
    }
}
