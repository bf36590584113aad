// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Configuration file commands

use anyhow::{bail, Result};
use std::path::Path;

use crate::colors::{Status, StyledText};
use crate::config::GcredConfig;

/// Print the effective configuration as JSON
pub fn config_show(config: &GcredConfig) -> Result<()> {
    super::print_json(config)
}

pub fn config_path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

/// Write the default configuration to `path`
pub fn config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    GcredConfig::default().save_to(path)?;
    println!(
        "{} Wrote {}",
        Status::ok(),
        path.display().to_string().as_str().path()
    );
    Ok(())
}
