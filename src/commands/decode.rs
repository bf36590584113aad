// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Offline decoding of Backup and Sync token blobs

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;

use super::drive::print_token;
use super::print_json;
use crate::cli::OutputArgs;
use crate::colors::{line, Status};
use crate::drive::{DriveCredentialToken, TokenValidation};

#[derive(Serialize)]
struct DecodedBlob<'a> {
    token: &'a DriveCredentialToken,
    validation: TokenValidation,
}

/// Read the blob argument, taking stdin for `-`
fn read_blob(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.trim().to_string());
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read blob from stdin")?;
    Ok(input.trim().to_string())
}

/// Decode and print a single token blob
pub fn decode_blob(arg: &str, output: &OutputArgs) -> Result<()> {
    let blob = read_blob(arg)?;
    let token = DriveCredentialToken::from_blob(&blob).context("Failed to decode token blob")?;
    let validation = token.validation();

    if output.json {
        return print_json(&DecodedBlob {
            token: &token,
            validation,
        });
    }

    println!("\n{} Decoded Token", Status::detail());
    println!("{}", line(60));
    print_token(&token, output.show_secrets, "");
    if validation.all() {
        println!("\n{} Token looks valid", Status::ok());
    }
    Ok(())
}
