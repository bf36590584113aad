// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! CLI command implementations

mod chrome;
mod config;
mod decode;
mod drive;

pub use chrome::{chrome_accounts, chrome_client_config};
pub use config::{config_init, config_path, config_show};
pub use decode::decode_blob;
pub use drive::list_drive_credentials;

use anyhow::Result;
use serde::Serialize;

use crate::colors::mask;

/// Print `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a secret for display, masked unless requested otherwise
pub(crate) fn reveal(secret: &str, show: bool) -> String {
    if show {
        secret.to_string()
    } else {
        mask(secret)
    }
}

pub(crate) fn or_unset(value: Option<&str>, show: bool) -> String {
    value
        .map(|v| reveal(v, show))
        .unwrap_or_else(|| "(not set)".to_string())
}
