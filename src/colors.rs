// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Terminal styling
//!
//! Status markers and text styles used by the command reports.

use colored::{ColoredString, Colorize};

/// Status indicators with consistent colors
pub struct Status;

impl Status {
    /// Success indicator: `[OK]` in green
    pub fn ok() -> ColoredString {
        "[OK]".green()
    }

    /// Warning indicator: `[!]` in yellow
    pub fn warn() -> ColoredString {
        "[!]".yellow()
    }

    /// Detail indicator: `[*]` in blue
    pub fn detail() -> ColoredString {
        "[*]".blue()
    }

    /// Found indicator: `[+]` in green bold
    pub fn found() -> ColoredString {
        "[+]".green().bold()
    }

    /// Missing indicator: `[-]` dimmed
    pub fn missing() -> ColoredString {
        "[-]".dimmed()
    }
}

/// Text styling helpers
pub trait StyledText {
    /// Style as a header/label (magenta bold)
    fn header(&self) -> ColoredString;
    /// Style as a path/identifier (cyan)
    fn path(&self) -> ColoredString;
    /// Style as a credential value (green)
    fn secret(&self) -> ColoredString;
    /// Style as a warning (yellow)
    fn warning(&self) -> ColoredString;
}

impl StyledText for str {
    fn header(&self) -> ColoredString {
        self.magenta().bold()
    }

    fn path(&self) -> ColoredString {
        self.cyan()
    }

    fn secret(&self) -> ColoredString {
        self.green()
    }

    fn warning(&self) -> ColoredString {
        self.yellow()
    }
}

/// Create a simple separator line
pub fn line(width: usize) -> ColoredString {
    "=".repeat(width).dimmed()
}

/// Shorten a secret to its first and last characters
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
