// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Signature scan over an arbitrary binary
//!
//! Finds the first occurrence of a marker string in a large file and reads
//! the table of NUL-terminated strings that starts there.

use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

use crate::error::{GcredError, Result};

pub const DEFAULT_BLOCK_SIZE: usize = 512;
pub const DEFAULT_WINDOW_SIZE: usize = 1024;

/// Marker string searched for by [`SignatureScanner`]
///
/// The matcher keeps a single counter and restarts on mismatch instead of
/// running a full substring automaton. That is only correct when the first
/// byte of the signature never occurs again inside it, so construction
/// rejects any other signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(signature: &str) -> Result<Self> {
        let bytes = signature.as_bytes();
        let Some((first, rest)) = bytes.split_first() else {
            return Err(GcredError::InvalidSignature("empty signature".to_string()));
        };
        if rest.contains(first) {
            return Err(GcredError::InvalidSignature(format!(
                "'{}' repeats its first character",
                signature
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Strings read from the lookahead window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringTable {
    /// Absolute offset of the signature match
    pub offset: u64,
    pub strings: Vec<String>,
    /// The window ended inside a string, which was dropped
    pub truncated: bool,
}

/// Streams a binary looking for a [`Signature`]
#[derive(Debug, Clone)]
pub struct SignatureScanner {
    signature: Signature,
    block_size: usize,
    window_size: usize,
}

impl SignatureScanner {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            block_size: DEFAULT_BLOCK_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Absolute offset of the first signature occurrence
    ///
    /// Reading stops at the block containing the end of the match.
    pub fn find_offset<R: Read>(&self, mut reader: R) -> Result<u64> {
        let sig = self.signature.as_bytes();
        let mut buf = vec![0u8; self.block_size];
        let mut state = 0usize;
        let mut pos = 0u64;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            for (i, &byte) in buf[..n].iter().enumerate() {
                if byte == sig[state] {
                    state += 1;
                } else {
                    // The first byte is unique, so no match can start inside
                    // the partial match; only the current byte may restart one.
                    state = usize::from(byte == sig[0]);
                }

                if state == sig.len() {
                    let end = pos + i as u64;
                    return Ok(end + 1 - sig.len() as u64);
                }
            }
            pos += n as u64;
        }

        Err(GcredError::SignatureNotFound)
    }

    /// Read the string table starting at `offset`
    ///
    /// One byte past the window is read to tell a cut string from EOF.
    pub fn read_table<R: Read + Seek>(&self, mut reader: R, offset: u64) -> Result<StringTable> {
        reader.seek(SeekFrom::Start(offset))?;
        let mut window = Vec::with_capacity(self.window_size + 1);
        reader
            .take(self.window_size as u64 + 1)
            .read_to_end(&mut window)?;
        let more_data = window.len() > self.window_size;
        window.truncate(self.window_size);

        let (strings, tail) = split_nul_terminated(&window);
        let truncated = !tail.is_empty() && more_data;
        if truncated {
            log::warn!(
                "String table window of {} bytes ended inside a string; dropped {} bytes",
                self.window_size,
                tail.len()
            );
        }

        Ok(StringTable {
            offset,
            strings,
            truncated,
        })
    }

    /// Find the signature and read the table that starts with it
    pub fn scan<R: Read + Seek>(&self, mut reader: R) -> Result<StringTable> {
        let offset = self.find_offset(&mut reader)?;
        log::debug!("Signature found at offset {:#x}", offset);
        self.read_table(reader, offset)
    }
}

/// Split on NUL terminators, returning the unterminated tail separately
fn split_nul_terminated(data: &[u8]) -> (Vec<String>, &[u8]) {
    let mut strings = Vec::new();
    let mut rest = data;
    while let Some(end) = rest.iter().position(|&b| b == 0) {
        strings.push(String::from_utf8_lossy(&rest[..end]).into_owned());
        rest = &rest[end + 1..];
    }
    (strings, rest)
}
