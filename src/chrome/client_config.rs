// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! OAuth and API client configuration compiled into Chrome
//!
//! `google_apis/google_api_keys.cc` leaves its values and their environment
//! variable names next to each other in the binary's string table. Each value
//! sits immediately before its key; a key with no value of its own follows
//! another key directly.

use serde::Serialize;
use std::io::{Read, Seek};

use super::signature::SignatureScanner;
use crate::error::Result;

/// Marker string preceding the key table
pub const DEFAULT_SIGNATURE: &str = "dummytoken";

/// An OAuth client slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OAuthClient {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Client configuration of an installed Chrome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Chrome version the binary belongs to
    pub version: String,
    pub api_key: Option<String>,
    pub default: OAuthClient,
    pub main: OAuthClient,
    pub cloud_print: OAuthClient,
    pub remoting: OAuthClient,
    pub remoting_host: OAuthClient,
}

/// Named OAuth client compiled into Chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientName {
    Default,
    Main,
    CloudPrint,
    Remoting,
    RemotingHost,
}

/// Destination of a recognized key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSlot {
    ApiKey,
    ClientId(ClientName),
    ClientSecret(ClientName),
}

/// Map a string table entry to the slot it names
pub fn slot_for_key(key: &str) -> Option<ConfigSlot> {
    use ClientName::*;
    use ConfigSlot::*;

    let slot = match key {
        "GOOGLE_API_KEY" => ApiKey,
        "GOOGLE_DEFAULT_CLIENT_ID" => ClientId(Default),
        "GOOGLE_DEFAULT_CLIENT_SECRET" => ClientSecret(Default),
        "GOOGLE_CLIENT_ID_MAIN" => ClientId(Main),
        "GOOGLE_CLIENT_SECRET_MAIN" => ClientSecret(Main),
        "GOOGLE_CLIENT_ID_CLOUD_PRINT" => ClientId(CloudPrint),
        "GOOGLE_CLIENT_SECRET_CLOUD_PRINT" => ClientSecret(CloudPrint),
        "GOOGLE_CLIENT_ID_REMOTING" => ClientId(Remoting),
        "GOOGLE_CLIENT_SECRET_REMOTING" => ClientSecret(Remoting),
        "GOOGLE_CLIENT_ID_REMOTING_HOST" => ClientId(RemotingHost),
        "GOOGLE_CLIENT_SECRET_REMOTING_HOST" => ClientSecret(RemotingHost),
        _ => return None,
    };
    Some(slot)
}

/// Pairing state while walking the string table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairState {
    /// The previous string was a key (or nothing was read yet)
    SawKey,
    /// The previous string was a candidate value
    SawValue(String),
}

/// Positional key/value pairing over a string sequence
#[derive(Debug, Clone)]
pub struct KeyPairing {
    state: PairState,
}

impl Default for KeyPairing {
    fn default() -> Self {
        Self {
            state: PairState::SawKey,
        }
    }
}

impl KeyPairing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PairState {
        &self.state
    }

    /// Feed the next string; returns a completed `(slot, value)` pair
    pub fn push(&mut self, s: &str) -> Option<(ConfigSlot, String)> {
        match slot_for_key(s) {
            Some(slot) => match std::mem::replace(&mut self.state, PairState::SawKey) {
                PairState::SawValue(value) => Some((slot, value)),
                PairState::SawKey => None,
            },
            None => {
                self.state = PairState::SawValue(s.to_string());
                None
            }
        }
    }
}

impl ClientConfig {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Self::default()
        }
    }

    fn client_mut(&mut self, client: ClientName) -> &mut OAuthClient {
        match client {
            ClientName::Default => &mut self.default,
            ClientName::Main => &mut self.main,
            ClientName::CloudPrint => &mut self.cloud_print,
            ClientName::Remoting => &mut self.remoting,
            ClientName::RemotingHost => &mut self.remoting_host,
        }
    }

    pub fn set(&mut self, slot: ConfigSlot, value: String) {
        match slot {
            ConfigSlot::ApiKey => self.api_key = Some(value),
            ConfigSlot::ClientId(c) => self.client_mut(c).client_id = Some(value),
            ConfigSlot::ClientSecret(c) => self.client_mut(c).client_secret = Some(value),
        }
    }

    /// Rebuild the configuration from a string table
    ///
    /// The first string is the signature itself and is skipped.
    pub fn from_strings<S: AsRef<str>>(version: &str, strings: &[S]) -> Self {
        let mut config = Self::new(version);
        let mut pairing = KeyPairing::new();
        for s in strings.iter().skip(1) {
            if let Some((slot, value)) = pairing.push(s.as_ref()) {
                config.set(slot, value);
            }
        }
        config
    }

    /// Scan a Chrome framework binary
    pub fn from_binary<R: Read + Seek>(
        version: &str,
        reader: R,
        scanner: &SignatureScanner,
    ) -> Result<Self> {
        let table = scanner.scan(reader)?;
        Ok(Self::from_strings(version, &table.strings))
    }

    /// Every OAuth client slot with its name
    pub fn clients(&self) -> [(&'static str, &OAuthClient); 5] {
        [
            ("default", &self.default),
            ("main", &self.main),
            ("cloud_print", &self.cloud_print),
            ("remoting", &self.remoting),
            ("remoting_host", &self.remoting_host),
        ]
    }
}
