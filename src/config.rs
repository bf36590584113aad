// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! gcred configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chrome::accounts::{SAFE_STORAGE_ACCOUNT, SAFE_STORAGE_SERVICE};
use crate::chrome::client_config::DEFAULT_SIGNATURE;
use crate::chrome::profile::{DEFAULT_APP_DIR, DEFAULT_PROFILE};
use crate::chrome::signature::{
    Signature, SignatureScanner, DEFAULT_BLOCK_SIZE, DEFAULT_WINDOW_SIZE,
};
use crate::drive;
use crate::error::Result;

/// String table scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_signature")]
    pub signature: String,

    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Bytes read after the signature; strings cut by this bound are dropped
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            signature: default_signature(),
            block_size: default_block_size(),
            window_size: default_window_size(),
        }
    }
}

impl ScanConfig {
    pub fn scanner(&self) -> Result<SignatureScanner> {
        Ok(SignatureScanner::new(Signature::new(&self.signature)?)
            .with_block_size(self.block_size)
            .with_window_size(self.window_size))
    }
}

/// Chrome locations and keychain entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeConfig {
    /// Override for the platform user data directory
    pub user_data_dir: Option<PathBuf>,

    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,

    #[serde(default = "default_safe_storage_service")]
    pub safe_storage_service: String,

    #[serde(default = "default_safe_storage_account")]
    pub safe_storage_account: String,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            user_data_dir: None,
            profile: default_profile(),
            app_dir: default_app_dir(),
            safe_storage_service: default_safe_storage_service(),
            safe_storage_account: default_safe_storage_account(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_drive_service")]
    pub service: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            service: default_drive_service(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcredConfig {
    #[serde(default)]
    pub chrome: ChromeConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

fn default_signature() -> String {
    DEFAULT_SIGNATURE.to_string()
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_app_dir() -> PathBuf {
    PathBuf::from(DEFAULT_APP_DIR)
}

fn default_safe_storage_service() -> String {
    SAFE_STORAGE_SERVICE.to_string()
}

fn default_safe_storage_account() -> String {
    SAFE_STORAGE_ACCOUNT.to_string()
}

fn default_drive_service() -> String {
    drive::SERVICE_NAME.to_string()
}

impl GcredConfig {
    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("gcred").join("config.json"))
    }
}
