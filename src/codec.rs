// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Delimited blob codec
//!
//! An ordered list of byte strings is stored as the base64 encoding of each
//! element joined with `|`. Since `|` is outside the base64 alphabet the
//! framing is unambiguous, and an element may itself be an encoded list.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{GcredError, Result};

/// Field separator between encoded elements
pub const DELIMITER: &str = "|";

/// Encode a list of byte strings into one flat string
pub fn encode_list<T: AsRef<[u8]>>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| BASE64.encode(item.as_ref()))
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

/// Decode a flat string back into its list of byte strings
///
/// The empty string decodes to the empty list.
pub fn decode_list(blob: &str) -> Result<Vec<Vec<u8>>> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }

    blob.split(DELIMITER)
        .enumerate()
        .map(|(idx, piece)| {
            BASE64
                .decode(piece)
                .map_err(|e| GcredError::MalformedBlob(format!("field {}: {}", idx, e)))
        })
        .collect()
}

/// Encode a list of UTF-8 strings
pub fn encode_strings<T: AsRef<str>>(items: &[T]) -> String {
    let bytes: Vec<&[u8]> = items.iter().map(|s| s.as_ref().as_bytes()).collect();
    encode_list(&bytes)
}

/// Decode a list whose elements must all be valid UTF-8
pub fn decode_strings(blob: &str) -> Result<Vec<String>> {
    decode_list(blob)?
        .into_iter()
        .enumerate()
        .map(|(idx, bytes)| {
            String::from_utf8(bytes)
                .map_err(|e| GcredError::MalformedBlob(format!("field {}: {}", idx, e)))
        })
        .collect()
}
