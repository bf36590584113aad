// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Chrome OSCrypt decryption of `token_service` rows
//!
//! On macOS Chrome derives an AES-128 key from the "Chrome Safe Storage"
//! keychain password and encrypts each refresh token with AES-128-CBC behind
//! a `v10` version tag. The constants below are replicated from Chromium for
//! format compatibility only and must not be reused for new encryption.

use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::error::{GcredError, Result};

type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;

// =============================================================================
// OSCrypt parameters (replicated for format compatibility)
// =============================================================================

/// PBKDF2 salt used by Chromium's OSCrypt
pub const KDF_SALT: &[u8] = b"saltysalt";

/// PBKDF2 iteration count used by Chromium on macOS
pub const KDF_ITERATIONS: u32 = 1003;

/// AES-128 key length in bytes
pub const KEY_SIZE: usize = 16;

/// Fixed IV: sixteen ASCII spaces
pub const IV: [u8; 16] = [b' '; 16];

/// Version tag in front of every encrypted value
pub const ENCRYPTION_VERSION_PREFIX: &[u8] = b"v10";

static SERVICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^AccountId-([0-9]+)$").expect("valid service regex"));

/// Raw `token_service` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedTokenEntry {
    pub service: String,
    pub encrypted_token: Vec<u8>,
}

/// A row that decrypted successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedEntry {
    pub account_id: String,
    pub refresh_token: String,
}

/// A row that was left out of the result
#[derive(Debug)]
pub struct SkippedEntry {
    /// Position of the row in the input
    pub index: usize,
    pub service: String,
    pub reason: GcredError,
}

/// Outcome of decrypting a batch of rows
#[derive(Debug, Default)]
pub struct VaultReport {
    /// Refresh token per account id
    pub tokens: BTreeMap<String, String>,
    pub skipped: Vec<SkippedEntry>,
}

/// Refresh token slot for one known account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromeVaultToken {
    pub account_id: String,
    pub refresh_token: Option<String>,
}

/// Extract the account id from a `token_service.service` value
pub fn account_id_from_service(service: &str) -> Option<&str> {
    SERVICE_RE
        .captures(service)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Derive the AES key from the master secret
pub fn derive_key(master_secret: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<sha1::Sha1>(master_secret, KDF_SALT, KDF_ITERATIONS, &mut key);
    key
}

/// Decrypts `token_service` rows with a key derived once per batch
pub struct VaultDecryptor {
    key: [u8; KEY_SIZE],
}

impl VaultDecryptor {
    /// The master secret is the raw keychain password, not base64 decoded
    pub fn new(master_secret: &[u8]) -> Self {
        Self {
            key: derive_key(master_secret),
        }
    }

    /// Decrypt a `v10` payload into its plaintext string
    pub fn decrypt(&self, payload: &[u8]) -> Result<String> {
        let ciphertext = payload
            .strip_prefix(ENCRYPTION_VERSION_PREFIX)
            .ok_or(GcredError::UnsupportedEncryptionVersion)?;

        let cipher = Aes128CbcDec::new_from_slices(&self.key, &IV)
            .map_err(|e| GcredError::DecryptionFailed(e.to_string()))?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| GcredError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| GcredError::DecryptionFailed(e.to_string()))
    }

    /// Produce a `v10` payload Chrome would be able to read
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes128CbcEnc::new_from_slices(&self.key, &IV)
            .map_err(|e| GcredError::DecryptionFailed(e.to_string()))?;
        let mut payload = ENCRYPTION_VERSION_PREFIX.to_vec();
        payload.extend(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext));
        Ok(payload)
    }

    /// Validate and decrypt a single row
    pub fn decrypt_entry(
        &self,
        entry: &EncryptedTokenEntry,
        known_ids: &HashSet<String>,
    ) -> Result<DecryptedEntry> {
        let account_id = account_id_from_service(&entry.service)
            .ok_or_else(|| GcredError::UnknownAccountService(entry.service.clone()))?;

        if !known_ids.contains(account_id) {
            return Err(GcredError::UnknownAccountId(account_id.to_string()));
        }

        let refresh_token = self.decrypt(&entry.encrypted_token)?;

        Ok(DecryptedEntry {
            account_id: account_id.to_string(),
            refresh_token,
        })
    }

    /// Decrypt every row, skipping the ones that fail
    ///
    /// Rows are decrypted in parallel but folded in input order, so when an
    /// account id appears more than once the last successful row wins.
    pub fn decrypt_all(
        &self,
        entries: &[EncryptedTokenEntry],
        known_ids: &HashSet<String>,
    ) -> VaultReport {
        let outcomes: Vec<Result<DecryptedEntry>> = entries
            .par_iter()
            .map(|entry| self.decrypt_entry(entry, known_ids))
            .collect();

        let mut report = VaultReport::default();
        for (index, (entry, outcome)) in entries.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(decrypted) => {
                    report
                        .tokens
                        .insert(decrypted.account_id, decrypted.refresh_token);
                }
                Err(reason) => {
                    log::warn!("Skipping token row {} ({}): {}", index, entry.service, reason);
                    report.skipped.push(SkippedEntry {
                        index,
                        service: entry.service.clone(),
                        reason,
                    });
                }
            }
        }

        log::debug!(
            "Decrypted {} of {} token rows",
            report.tokens.len(),
            entries.len()
        );
        report
    }
}

impl VaultReport {
    /// One slot per account id, in the given order
    pub fn tokens_for<'a, I>(&self, account_ids: I) -> Vec<ChromeVaultToken>
    where
        I: IntoIterator<Item = &'a str>,
    {
        account_ids
            .into_iter()
            .map(|id| ChromeVaultToken {
                account_id: id.to_string(),
                refresh_token: self.tokens.get(id).cloned(),
            })
            .collect()
    }
}
