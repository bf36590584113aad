//! Extensive tests for Chrome credential recovery
//!
//! This file contains comprehensive unit tests for:
//! - Refresh token vault decryption
//! - Profile discovery and account joining
//! - Client configuration recovery from the framework binary

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use gcred::chrome::accounts::{get_chrome_accounts, SAFE_STORAGE_ACCOUNT, SAFE_STORAGE_SERVICE};
use gcred::chrome::client_config::{ClientConfig, KeyPairing, PairState};
use gcred::chrome::profile::ChromeProfile;
use gcred::chrome::signature::{Signature, SignatureScanner};
use gcred::chrome::vault::{EncryptedTokenEntry, VaultDecryptor};
use gcred::error::GcredError;
use gcred::secret_store::MemorySecretStore;
use tempfile::TempDir;

const MASTER_SECRET: &[u8] = b"bXlzZWNyZXRrZXk=";

fn entry(service: &str, payload: Vec<u8>) -> EncryptedTokenEntry {
    EncryptedTokenEntry {
        service: service.to_string(),
        encrypted_token: payload,
    }
}

fn ids(list: &[&str]) -> HashSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Vault Tests
// ============================================================================

mod vault_tests {
    use super::*;

    #[test]
    fn test_tampered_prefix_skipped() {
        let vault = VaultDecryptor::new(MASTER_SECRET);
        let good = vault.encrypt(b"token-1").unwrap();
        let mut tampered = vault.encrypt(b"token-2").unwrap();
        tampered[..3].copy_from_slice(b"v11");

        let rows = vec![
            entry("AccountId-1", good),
            entry("AccountId-2", tampered),
        ];
        let report = vault.decrypt_all(&rows, &ids(&["1", "2"]));

        assert_eq!(report.tokens.get("1").map(String::as_str), Some("token-1"));
        assert!(!report.tokens.contains_key("2"));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert!(matches!(
            report.skipped[0].reason,
            GcredError::UnsupportedEncryptionVersion
        ));
    }

    #[test]
    fn test_duplicate_id_second_success_wins() {
        let vault = VaultDecryptor::new(MASTER_SECRET);
        let rows = vec![
            entry("AccountId-7", b"v10 not a ciphertext".to_vec()),
            entry("AccountId-7", vault.encrypt(b"second").unwrap()),
        ];
        let report = vault.decrypt_all(&rows, &ids(&["7"]));
        assert_eq!(report.tokens.get("7").map(String::as_str), Some("second"));
        assert_eq!(report.skipped.len(), 1);

        let rows = vec![
            entry("AccountId-7", vault.encrypt(b"first").unwrap()),
            entry("AccountId-7", vault.encrypt(b"second").unwrap()),
            entry("AccountId-7", b"v10".to_vec()),
        ];
        let report = vault.decrypt_all(&rows, &ids(&["7"]));
        assert_eq!(report.tokens.get("7").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_unknown_rows_do_not_abort() {
        let vault = VaultDecryptor::new(MASTER_SECRET);
        let rows = vec![
            entry("Token-1", vault.encrypt(b"x").unwrap()),
            entry("AccountId-99", vault.encrypt(b"y").unwrap()),
            entry("AccountId-1", vault.encrypt(b"z").unwrap()),
        ];
        let report = vault.decrypt_all(&rows, &ids(&["1"]));
        assert_eq!(report.tokens.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|s| s.reason.is_row_recoverable()));

        let slots = report.tokens_for(["1", "2"]);
        assert_eq!(slots[0].refresh_token.as_deref(), Some("z"));
        assert_eq!(slots[1].refresh_token, None);
    }

    #[test]
    fn test_empty_batch() {
        let vault = VaultDecryptor::new(MASTER_SECRET);
        let report = vault.decrypt_all(&[], &ids(&["1"]));
        assert!(report.tokens.is_empty());
        assert!(report.skipped.is_empty());
    }
}

// ============================================================================
// Profile Tests
// ============================================================================

mod profile_tests {
    use super::*;

    fn write_profile(dir: &Path, rows: &[EncryptedTokenEntry]) {
        fs::write(
            dir.join("Preferences"),
            r#"{"account_info": [
                {"account_id": "111", "email": "one@example.com", "full_name": "One"},
                {"account_id": "222", "email": "two@example.com"}
            ]}"#,
        )
        .unwrap();

        let conn = rusqlite::Connection::open(dir.join("Web Data")).unwrap();
        conn.execute(
            "CREATE TABLE token_service (service VARCHAR PRIMARY KEY NOT NULL, encrypted_token BLOB)",
            [],
        )
        .unwrap();
        for row in rows {
            conn.execute(
                "INSERT INTO token_service (service, encrypted_token) VALUES (?1, ?2)",
                rusqlite::params![row.service, row.encrypted_token],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_accounts_joined_with_tokens() {
        let data = TempDir::new().unwrap();
        let profile_dir = data.path().join("Default");
        fs::create_dir(&profile_dir).unwrap();

        let vault = VaultDecryptor::new(MASTER_SECRET);
        write_profile(
            &profile_dir,
            &[
                entry("AccountId-111", vault.encrypt(b"1//refresh-one").unwrap()),
                entry("AccountId-333", vault.encrypt(b"stray").unwrap()),
            ],
        );

        let store = MemorySecretStore::new().with(
            SAFE_STORAGE_SERVICE,
            SAFE_STORAGE_ACCOUNT,
            std::str::from_utf8(MASTER_SECRET).unwrap(),
        );
        let profile = ChromeProfile::locate(Some(data.path()), "Default").unwrap();
        let accounts =
            get_chrome_accounts(&profile, &store, SAFE_STORAGE_SERVICE, SAFE_STORAGE_ACCOUNT)
                .unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].info.email, "one@example.com");
        assert_eq!(accounts[0].refresh_token.as_deref(), Some("1//refresh-one"));
        assert_eq!(accounts[1].info.account_id, "222");
        assert_eq!(accounts[1].refresh_token, None);
    }

    #[test]
    fn test_missing_master_secret_is_fatal() {
        let data = TempDir::new().unwrap();
        let profile_dir = data.path().join("Default");
        fs::create_dir(&profile_dir).unwrap();
        write_profile(&profile_dir, &[]);

        let profile = ChromeProfile::new(&profile_dir);
        let err = get_chrome_accounts(
            &profile,
            &MemorySecretStore::new(),
            SAFE_STORAGE_SERVICE,
            SAFE_STORAGE_ACCOUNT,
        )
        .unwrap_err();
        assert!(matches!(err, GcredError::MasterSecretUnavailable));
    }

    #[test]
    fn test_missing_profile() {
        let data = TempDir::new().unwrap();
        assert!(matches!(
            ChromeProfile::locate(Some(data.path()), "Profile 9"),
            Err(GcredError::ProfileNotFound(_))
        ));
    }
}

// ============================================================================
// Client Configuration Tests
// ============================================================================

mod client_config_tests {
    use super::*;

    fn binary(table: &[&str]) -> Vec<u8> {
        let mut data = vec![0x90u8; 1500];
        for s in table {
            data.extend_from_slice(s.as_bytes());
            data.push(0);
        }
        data.extend_from_slice(&[0xcc; 64]);
        data
    }

    #[test]
    fn test_value_key_pairs() {
        let strings = [
            "DUMMY",
            "v1",
            "GOOGLE_API_KEY",
            "secret1",
            "GOOGLE_DEFAULT_CLIENT_ID",
        ];
        let config = ClientConfig::from_strings("100.0", &strings);
        assert_eq!(config.api_key.as_deref(), Some("v1"));
        // "secret1" sits directly before the key, so it is taken as its value
        assert_eq!(config.default.client_id.as_deref(), Some("secret1"));
        assert_eq!(config.default.client_secret, None);
    }

    #[test]
    fn test_key_following_key_stays_unset() {
        let strings = [
            "DUMMY",
            "v1",
            "GOOGLE_API_KEY",
            "GOOGLE_DEFAULT_CLIENT_ID",
        ];
        let config = ClientConfig::from_strings("100.0", &strings);
        assert_eq!(config.api_key.as_deref(), Some("v1"));
        assert_eq!(config.default.client_id, None);
    }

    #[test]
    fn test_pairing_state_machine() {
        let mut pairing = KeyPairing::new();
        assert_eq!(pairing.state(), &PairState::SawKey);
        assert_eq!(pairing.push("GOOGLE_API_KEY"), None);
        assert_eq!(pairing.push("abc"), None);
        assert_eq!(pairing.state(), &PairState::SawValue("abc".to_string()));
        assert!(pairing.push("GOOGLE_CLIENT_ID_MAIN").is_some());
        assert_eq!(pairing.state(), &PairState::SawKey);
    }

    #[test]
    fn test_from_binary() {
        let data = binary(&[
            "dummytoken",
            "AIzaSyExample",
            "GOOGLE_API_KEY",
            "77185425430.apps.googleusercontent.com",
            "GOOGLE_CLIENT_ID_MAIN",
            "OTJgUOQcT7lO7GsGZq2G4IlT",
            "GOOGLE_CLIENT_SECRET_MAIN",
            "GOOGLE_CLIENT_ID_CLOUD_PRINT",
        ]);
        let scanner = SignatureScanner::new(Signature::new("dummytoken").unwrap());
        let config = ClientConfig::from_binary("120.0.1", Cursor::new(data), &scanner).unwrap();

        assert_eq!(config.version, "120.0.1");
        assert_eq!(config.api_key.as_deref(), Some("AIzaSyExample"));
        assert_eq!(
            config.main.client_id.as_deref(),
            Some("77185425430.apps.googleusercontent.com")
        );
        assert_eq!(
            config.main.client_secret.as_deref(),
            Some("OTJgUOQcT7lO7GsGZq2G4IlT")
        );
        assert_eq!(config.cloud_print.client_id, None);
        assert_eq!(config.remoting, Default::default());
    }

    #[test]
    fn test_signature_not_found() {
        let data = binary(&["nothing", "to", "see"]);
        let scanner = SignatureScanner::new(Signature::new("dummytoken").unwrap());
        let err = ClientConfig::from_binary("1", Cursor::new(data), &scanner).unwrap_err();
        assert!(matches!(err, GcredError::SignatureNotFound));
    }

    #[test]
    fn test_empty_binary() {
        let scanner = SignatureScanner::new(Signature::new("dummytoken").unwrap());
        let err = scanner.scan(Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, GcredError::SignatureNotFound));
    }

    #[test]
    fn test_small_window_drops_cut_string() {
        let data = binary(&["dummytoken", "v1", "GOOGLE_API_KEY"]);
        let scanner = SignatureScanner::new(Signature::new("dummytoken").unwrap())
            .with_block_size(7)
            .with_window_size(20);
        let table = scanner.scan(Cursor::new(data)).unwrap();
        assert_eq!(table.offset, 1500);
        assert_eq!(table.strings, vec!["dummytoken", "v1"]);
        assert!(table.truncated);
    }
}
