// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Stderr log output
//!
//! Library code logs through the `log` facade; records are forwarded into a
//! `tracing-subscriber` fmt layer filtered by an `EnvFilter`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives, overriding `-v`/`-q`
pub const LOG_ENV: &str = "GCRED_LOG";

/// Map `-v` occurrences to a level name; warnings are always shown
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Default directive: our crate at the requested level, everything else at warn
pub fn default_directive(verbosity: u8, quiet: bool) -> String {
    let level = level_for(verbosity, quiet);
    if quiet {
        return level.to_string();
    }
    format!("gcred={level},warn")
}

/// Filter from [`LOG_ENV`], falling back to the verbosity flags
pub fn env_filter(verbosity: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)))
}

/// Install the subscriber; later calls are ignored
pub fn init(verbosity: u8, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
