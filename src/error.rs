// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Error types for gcred

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcredError {
    // Blob decoding: fatal to the single decode call
    #[error("Malformed blob: {0}")]
    MalformedBlob(String),

    #[error("Invalid blob: missing standard prefix")]
    InvalidPrefix,

    #[error("Invalid blob: appears to be incomplete ({fields} fields, expected 4)")]
    IncompleteBlob { fields: usize },

    // Vault rows: recovered, the row is skipped
    #[error("Unsupported encryption version")]
    UnsupportedEncryptionVersion,

    #[error("Unknown account service: {0}")]
    UnknownAccountService(String),

    #[error("Unknown account with id: {0}")]
    UnknownAccountId(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    // Fatal to the whole operation
    #[error("Master secret unavailable in the secret store")]
    MasterSecretUnavailable,

    #[error("Failed to find the signature string table")]
    SignatureNotFound,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Profile not found: {}", .0.display())]
    ProfileNotFound(PathBuf),

    #[error("Secret store error: {0}")]
    SecretStore(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
}

impl GcredError {
    /// Whether a batch may skip the offending row and continue
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self,
            GcredError::UnsupportedEncryptionVersion
                | GcredError::UnknownAccountService(_)
                | GcredError::UnknownAccountId(_)
                | GcredError::DecryptionFailed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GcredError>;
