//! End-to-end tests for the gcred binary
//!
//! These run the built executable and only exercise commands that need no
//! keychain access.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use gcred::drive::DriveCredentialToken;

fn token() -> DriveCredentialToken {
    DriveCredentialToken {
        refresh_token: format!("1/{}", "a".repeat(43)),
        client_id: "abc123.apps.googleusercontent.com".to_string(),
        client_secret: "s".repeat(24),
        scopes: vec!["https://www.googleapis.com/auth/drive".to_string()],
    }
}

fn gcred(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gcred").unwrap();
    cmd.env("GCRED_CONFIG", config_dir.path().join("config.json"))
        .env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// decode-blob Tests
// ============================================================================

mod decode_blob_tests {
    use super::*;

    #[test]
    fn test_decode_blob_json() {
        let dir = TempDir::new().unwrap();
        gcred(&dir)
            .args(["decode-blob", "--json", &token().to_blob()])
            .assert()
            .success()
            .stdout(predicate::str::contains("abc123.apps.googleusercontent.com"))
            .stdout(predicate::str::contains("\"client_secret\": true"));
    }

    #[test]
    fn test_decode_blob_masks_secrets() {
        let dir = TempDir::new().unwrap();
        let secret = "s".repeat(24);
        gcred(&dir)
            .args(["decode-blob", &token().to_blob()])
            .assert()
            .success()
            .stdout(predicate::str::contains(secret.as_str()).not());
    }

    #[test]
    fn test_decode_blob_from_stdin() {
        let dir = TempDir::new().unwrap();
        gcred(&dir)
            .args(["decode-blob", "--json", "--show-secrets", "-"])
            .write_stdin(format!("{}\n", token().to_blob()))
            .assert()
            .success()
            .stdout(predicate::str::contains("s".repeat(24)));
    }

    #[test]
    fn test_decode_blob_bad_prefix_fails() {
        let dir = TempDir::new().unwrap();
        gcred(&dir)
            .args(["decode-blob", "XXnotablob"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("missing standard prefix"));
    }
}

// ============================================================================
// config Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_path_honors_env() {
        let dir = TempDir::new().unwrap();
        gcred(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.json"));
    }

    #[test]
    fn test_config_init_then_show() {
        let dir = TempDir::new().unwrap();
        gcred(&dir).args(["config", "init"]).assert().success();
        assert!(dir.path().join("config.json").exists());

        gcred(&dir)
            .args(["config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));

        gcred(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("dummytoken"));
    }
}

// ============================================================================
// chrome client-config Tests
// ============================================================================

mod client_config_tests {
    use super::*;

    #[test]
    fn test_client_config_from_binary() {
        let dir = TempDir::new().unwrap();
        let binary = dir.path().join("framework");
        std::fs::write(&binary, b"\x00\x01dummytoken\0AIzaSyExample\0GOOGLE_API_KEY\0").unwrap();

        gcred(&dir)
            .args(["chrome", "client-config", "--json", "--chrome-version", "99.0"])
            .arg("--binary")
            .arg(&binary)
            .assert()
            .success()
            .stdout(predicate::str::contains("AIzaSyExample"))
            .stdout(predicate::str::contains("99.0"));
    }

    #[test]
    fn test_client_config_without_signature_fails() {
        let dir = TempDir::new().unwrap();
        let binary = dir.path().join("framework");
        std::fs::write(&binary, b"no marker here").unwrap();

        gcred(&dir)
            .args(["chrome", "client-config", "--chrome-version", "1"])
            .arg("--binary")
            .arg(&binary)
            .assert()
            .failure()
            .stderr(predicate::str::contains("signature"));
    }
}
