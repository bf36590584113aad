// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Secret store access
//!
//! Both Backup and Sync and Chrome keep their secrets in the platform secret
//! store. Decoders never talk to it directly; callers pass a [`SecretStore`].

use std::process::Command;

use crate::error::{GcredError, Result};

/// One generic password entry of a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub account: String,
    pub password: String,
}

/// Read-only view of a platform secret store
pub trait SecretStore {
    /// All entries stored under `service`
    fn find_credentials(&self, service: &str) -> Result<Vec<Credential>>;

    /// The password of a single entry, `None` if it does not exist
    fn get_password(&self, service: &str, account: &str) -> Result<Option<String>>;
}

/// In-memory store, used for fixtures and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    entries: Vec<(String, Credential)>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service: &str, account: &str, password: &str) {
        self.entries.push((
            service.to_string(),
            Credential {
                account: account.to_string(),
                password: password.to_string(),
            },
        ));
    }

    pub fn with(mut self, service: &str, account: &str, password: &str) -> Self {
        self.insert(service, account, password);
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn find_credentials(&self, service: &str) -> Result<Vec<Credential>> {
        Ok(self
            .entries
            .iter()
            .filter(|(s, _)| s == service)
            .map(|(_, c)| c.clone())
            .collect())
    }

    fn get_password(&self, service: &str, account: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .iter()
            .find(|(s, c)| s == service && c.account == account)
            .map(|(_, c)| c.password.clone()))
    }
}

/// macOS login keychain through the `security` command line tool
#[derive(Debug, Clone)]
pub struct KeychainCli {
    program: String,
}

// `security` exits with errSecItemNotFound (44) when nothing matches
const SECURITY_NOT_FOUND: i32 = 44;

impl Default for KeychainCli {
    fn default() -> Self {
        Self {
            program: "security".to_string(),
        }
    }
}

impl KeychainCli {
    pub fn new() -> Self {
        Self::default()
    }

    fn run(&self, args: &[&str]) -> Result<Option<String>> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| GcredError::SecretStore(format!("failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
        }
        if output.status.code() == Some(SECURITY_NOT_FOUND) {
            return Ok(None);
        }
        Err(GcredError::SecretStore(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

impl SecretStore for KeychainCli {
    fn find_credentials(&self, service: &str) -> Result<Vec<Credential>> {
        let dump = self.run(&["dump-keychain"])?.unwrap_or_default();

        let mut credentials = Vec::new();
        for account in accounts_for_service(&dump, service) {
            match self.get_password(service, &account)? {
                Some(password) => credentials.push(Credential { account, password }),
                None => log::warn!("Keychain entry vanished: {} / {}", service, account),
            }
        }
        Ok(credentials)
    }

    fn get_password(&self, service: &str, account: &str) -> Result<Option<String>> {
        let out = self.run(&["find-generic-password", "-s", service, "-a", account, "-w"])?;
        Ok(out.map(|s| s.trim_end_matches('\n').to_string()))
    }
}

/// Pull the generic password accounts of `service` out of `security dump-keychain`
pub fn accounts_for_service(dump: &str, service: &str) -> Vec<String> {
    let mut accounts = Vec::new();
    let mut class_genp = false;
    let mut acct: Option<String> = None;
    let mut svce: Option<String> = None;

    let mut flush = |class_genp: bool, acct: &mut Option<String>, svce: &mut Option<String>| {
        if let (true, Some(a), Some(s)) = (class_genp, acct.take(), svce.take()) {
            if s == service && !accounts.contains(&a) {
                accounts.push(a);
            }
        }
        *acct = None;
        *svce = None;
    };

    for line in dump.lines() {
        let line = line.trim();
        if line.starts_with("keychain:") {
            flush(class_genp, &mut acct, &mut svce);
            class_genp = false;
        } else if let Some(class) = line.strip_prefix("class:") {
            class_genp = class.trim() == "\"genp\"";
        } else if let Some(value) = attribute_value(line, "\"acct\"") {
            acct = Some(value);
        } else if let Some(value) = attribute_value(line, "\"svce\"") {
            svce = Some(value);
        }
    }
    flush(class_genp, &mut acct, &mut svce);

    accounts
}

// Lines look like `"acct"<blob>="user@example.com"`; hex and <NULL> values are ignored
fn attribute_value(line: &str, name: &str) -> Option<String> {
    let rest = line.strip_prefix(name)?;
    let (_, value) = rest.split_once('=')?;
    let value = value.strip_prefix('"')?.strip_suffix('"')?;
    Some(value.to_string())
}
