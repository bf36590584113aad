// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Backup and Sync OAuth2 token blobs
//!
//! The sync client stores each account's token in the secret store as
//! `"2G"` followed by a delimited list of four fields: refresh token,
//! client id, client secret and a nested delimited list of scopes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec::{decode_strings, encode_strings};
use crate::error::{GcredError, Result};

/// Prefix every serialized token starts with
pub const BLOB_PREFIX: &str = "2G";

const FIELD_COUNT: usize = 4;
const REFRESH_TOKEN_PREFIX: &str = "1/";
const REFRESH_TOKEN_LEN: usize = 45;
const CLIENT_SECRET_LEN: usize = 24;

static CLIENT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9\-]+\.apps\.googleusercontent\.com$").expect("valid client id regex")
});

static SCOPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^((https?://)|/)[a-z0-9._&#?=%\-]+(:[0-9]+)?(/[a-z0-9._&#?=%\-]+)*/?$")
        .expect("valid scope regex")
});

/// OAuth2 credentials of one Backup and Sync account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveCredentialToken {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

/// Outcome of each plausibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenValidation {
    pub refresh_token: bool,
    pub client_id: bool,
    pub client_secret: bool,
    pub scopes: bool,
}

impl TokenValidation {
    pub fn all(&self) -> bool {
        self.refresh_token && self.client_id && self.client_secret && self.scopes
    }
}

impl DriveCredentialToken {
    /// Parse a token from its secret store representation
    pub fn from_blob(blob: &str) -> Result<Self> {
        let rest = blob
            .strip_prefix(BLOB_PREFIX)
            .ok_or(GcredError::InvalidPrefix)?;

        let parts = decode_strings(rest)?;
        if parts.len() != FIELD_COUNT {
            return Err(GcredError::IncompleteBlob {
                fields: parts.len(),
            });
        }

        let mut parts = parts.into_iter();
        let mut next = || parts.next().unwrap_or_default();
        let refresh_token = next();
        let client_id = next();
        let client_secret = next();
        let scopes = decode_strings(&next())?;

        Ok(Self {
            refresh_token,
            client_id,
            client_secret,
            scopes,
        })
    }

    /// Serialize back into the exact format the sync client reads
    pub fn to_blob(&self) -> String {
        let scopes = encode_strings(&self.scopes);
        let fields = [
            self.refresh_token.as_str(),
            self.client_id.as_str(),
            self.client_secret.as_str(),
            scopes.as_str(),
        ];
        format!("{}{}", BLOB_PREFIX, encode_strings(&fields))
    }

    /// Run each format check separately
    ///
    /// None of these formats are documented; they only reflect what tokens
    /// issued to Google apps typically look like. Nothing here talks to a server.
    pub fn validation(&self) -> TokenValidation {
        TokenValidation {
            refresh_token: self.refresh_token.starts_with(REFRESH_TOKEN_PREFIX)
                && self.refresh_token.chars().count() == REFRESH_TOKEN_LEN,
            // Google's own apps use a numeric subdomain, third party apps may not
            client_id: CLIENT_ID_RE.is_match(&self.client_id),
            client_secret: self.client_secret.chars().count() == CLIENT_SECRET_LEN,
            scopes: self.scopes.iter().all(|s| SCOPE_RE.is_match(s)),
        }
    }

    /// Whether the token looks like a usable set of credentials
    pub fn is_valid(&self) -> bool {
        self.validation().all()
    }
}
