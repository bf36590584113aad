// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Google Drive (Backup and Sync) credentials from the secret store
//!
//! Every account owns up to two entries under the `"Google Drive"` service:
//! `<email>` holding the serialized OAuth2 token and `<email> - machine`
//! holding a device identifier generated by the client.

pub mod token;

pub use token::{DriveCredentialToken, TokenValidation, BLOB_PREFIX};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::secret_store::{Credential, SecretStore};

/// Secret store service the sync client writes to
pub const SERVICE_NAME: &str = "Google Drive";

const MACHINE_SUFFIX: &str = "machine";

static ACCOUNT_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)(?:\s+-\s+(\S+))?$").expect("valid account label regex"));

/// Credentials recovered for one Drive account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveCredential {
    pub email: String,
    /// UUIDv1 in hex generated on the device
    pub machine_id: Option<String>,
    pub token: Option<DriveCredentialToken>,
}

impl DriveCredential {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            machine_id: None,
            token: None,
        }
    }
}

/// Split a secret store account label into `(email, suffix)`
pub fn parse_account_label(label: &str) -> Option<(&str, Option<&str>)> {
    let caps = ACCOUNT_LABEL_RE.captures(label)?;
    let email = caps.get(1)?.as_str();
    Some((email, caps.get(2).map(|m| m.as_str())))
}

/// Group raw secret store entries into per-account credentials
///
/// Accounts keep the order in which their email first appears. Entries that
/// cannot be interpreted are logged and skipped; a token that decodes but
/// fails the plausibility checks is kept with a warning.
pub fn collect_credentials(raw: &[Credential]) -> Vec<DriveCredential> {
    let mut creds: Vec<DriveCredential> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for rc in raw {
        let Some((email, kind)) = parse_account_label(&rc.account) else {
            log::warn!("Unknown account name: {}", rc.account);
            continue;
        };

        let idx = *index.entry(email.to_string()).or_insert_with(|| {
            creds.push(DriveCredential::new(email));
            creds.len() - 1
        });
        let cred = &mut creds[idx];

        match kind {
            None => {
                let token = match DriveCredentialToken::from_blob(&rc.password) {
                    Ok(t) => t,
                    Err(e) => {
                        log::error!("Invalid token in {}: {}", rc.account, e);
                        continue;
                    }
                };
                if !token.is_valid() {
                    log::warn!("Possibly invalid token for: {}", rc.account);
                }
                cred.token = Some(token);
            }
            Some(MACHINE_SUFFIX) => cred.machine_id = Some(rc.password.clone()),
            Some(_) => log::warn!("Unsupported account data for: {}", rc.account),
        }
    }

    creds
}

/// Read and decode every Drive account in `store`
pub fn get_drive_credentials(store: &dyn SecretStore, service: &str) -> Result<Vec<DriveCredential>> {
    let raw = store.find_credentials(service)?;
    log::debug!("Found {} secret store entries for {}", raw.len(), service);
    Ok(collect_credentials(&raw))
}
