// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Chrome profile and installation discovery
//!
//! Locates the user data directory, snapshots the `Web Data` database (Chrome
//! keeps it locked while running) and finds the framework binary of the
//! installed version.

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};

use super::vault::EncryptedTokenEntry;
use crate::error::{GcredError, Result};

pub const DEFAULT_PROFILE: &str = "Default";
pub const WEB_DATA_FILE: &str = "Web Data";
pub const PREFERENCES_FILE: &str = "Preferences";

/// macOS application bundle contents
pub const DEFAULT_APP_DIR: &str = "/Applications/Google Chrome.app/Contents";

static KS_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<key>KSVersion</key>\s*<string>([^<]+)</string>").expect("valid plist regex")
});

/// Default Chrome user data directory for this platform
pub fn default_user_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir().map(|p| p.join("Google/Chrome/User Data"))
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().map(|p| p.join("Library/Application Support/Google/Chrome"))
    } else {
        // Linux
        dirs::home_dir().map(|p| p.join(".config/google-chrome"))
    }
}

/// A single Chrome profile directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeProfile {
    pub dir: PathBuf,
}

impl ChromeProfile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve `<user data dir>/<profile>`, falling back to the platform default
    pub fn locate(user_data_dir: Option<&Path>, profile: &str) -> Result<Self> {
        let base = match user_data_dir {
            Some(p) => p.to_path_buf(),
            None => default_user_data_dir()
                .ok_or_else(|| GcredError::ProfileNotFound(PathBuf::from(profile)))?,
        };
        let dir = base.join(profile);
        if !dir.is_dir() {
            return Err(GcredError::ProfileNotFound(dir));
        }
        Ok(Self { dir })
    }

    pub fn web_data_path(&self) -> PathBuf {
        self.dir.join(WEB_DATA_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }
}

/// Read every `token_service` row of a `Web Data` database
///
/// The database is copied first so a running Chrome holding the lock does not
/// get in the way, and the copy is removed afterwards.
pub fn read_token_rows(db_path: &Path) -> Result<Vec<EncryptedTokenEntry>> {
    if !db_path.exists() {
        return Err(GcredError::ProfileNotFound(db_path.to_path_buf()));
    }

    let snapshot = Snapshot::create(db_path)?;
    log::debug!(
        "Copied {} to {}",
        db_path.display(),
        snapshot.path.display()
    );
    query_token_rows(&snapshot.path)
}

/// Query `token_service` directly, without taking a snapshot
pub fn query_token_rows(db_path: &Path) -> Result<Vec<EncryptedTokenEntry>> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let mut stmt = conn.prepare("SELECT service, encrypted_token FROM token_service")?;
    let rows = stmt.query_map([], |row| {
        Ok(EncryptedTokenEntry {
            service: row.get(0)?,
            encrypted_token: row.get(1)?,
        })
    })?;

    let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

/// Temporary copy of a SQLite database and its journal files
struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    fn create(db_path: &Path) -> Result<Self> {
        let path = std::env::temp_dir().join(format!("gcred_webdata_{}.db", uuid::Uuid::new_v4()));
        let snapshot = Self { path };

        fs::copy(db_path, &snapshot.path)?;
        for suffix in ["-wal", "-shm"] {
            let journal = sibling(db_path, suffix);
            if journal.exists() {
                if let Err(e) = fs::copy(&journal, sibling(&snapshot.path, suffix)) {
                    log::warn!("Failed to copy {}: {}", journal.display(), e);
                }
            }
        }
        Ok(snapshot)
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        let _ = fs::remove_file(sibling(&self.path, "-wal"));
        let _ = fs::remove_file(sibling(&self.path, "-shm"));
    }
}

// SQLite names journals by appending to the full file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// An installed Chrome application bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeInstall {
    pub app_dir: PathBuf,
}

impl Default for ChromeInstall {
    fn default() -> Self {
        Self::new(DEFAULT_APP_DIR)
    }
}

impl ChromeInstall {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    pub fn info_plist_path(&self) -> PathBuf {
        self.app_dir.join("Info.plist")
    }

    /// Installed version, from `KSVersion` in `Info.plist`
    pub fn version(&self) -> Result<String> {
        let path = self.info_plist_path();
        if !path.exists() {
            return Err(GcredError::ProfileNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        parse_ks_version(&content).ok_or_else(|| {
            GcredError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("no KSVersion in {}", path.display()),
            ))
        })
    }

    /// Framework binary holding the API key string table
    pub fn framework_binary(&self, version: &str) -> PathBuf {
        self.app_dir
            .join("Versions")
            .join(version)
            .join("Google Chrome Framework.framework/Versions/Current/Google Chrome Framework")
    }
}

/// Extract `KSVersion` from an XML property list
pub fn parse_ks_version(plist: &str) -> Option<String> {
    KS_VERSION_RE
        .captures(plist)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}
