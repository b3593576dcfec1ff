//! Tests for dotenv loading behavior.
//!
//! Responsibilities:
//! - Test that missing `.env` files are silently ignored.
//! - Test that `.env` values become visible to typed environment reads.
//! - Test that invalid `.env` files return errors without leaking secrets.
//! - Test that `DOTENV_DISABLED=1`/`true` skips dotenv loading.
//!
//! Invariants / Assumptions:
//! - Tests use `env_lock()` to prevent cross-test contamination.
//! - Tests must serialize mutations to process-global state (cwd/env).
//! - Error messages must never contain secret values from `.env` files.

use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::env::env_or;
use crate::loader::error::ConfigError;

/// RAII guard for temporarily changing the current working directory.
struct CwdGuard {
    original_dir: PathBuf,
}

impl CwdGuard {
    fn new(temp_dir: &TempDir) -> Self {
        let original_dir = std::env::current_dir().expect("Failed to get current directory");
        std::env::set_current_dir(temp_dir.path()).expect("Failed to set current directory");
        Self { original_dir }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original_dir);
    }
}

fn loader() -> ConfigLoader {
    ConfigLoader::new("config.json")
}

fn with_dotenv_gate<R>(value: Option<&str>, f: impl FnOnce() -> R) -> R {
    temp_env::with_var("DOTENV_DISABLED", value, f)
}

#[test]
#[serial]
fn test_missing_dotenv_is_ok() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    let result = with_dotenv_gate(None, || loader().load_dotenv());

    assert!(
        result.is_ok(),
        "Missing .env file should be silently ignored"
    );
}

#[test]
#[serial]
fn test_valid_dotenv_values_are_readable() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    fs::write(
        temp_dir.path().join(".env"),
        "_LAYERED_DOTENV_PORT=9191\n",
    )
    .unwrap();

    temp_env::with_var_unset("_LAYERED_DOTENV_PORT", || {
        let result = with_dotenv_gate(None, || loader().load_dotenv());
        assert!(result.is_ok(), "Valid .env file should load successfully");
        assert_eq!(env_or("_LAYERED_DOTENV_PORT", 80u16).unwrap(), 9191);
    });
}

#[test]
#[serial]
fn test_invalid_dotenv_returns_parse_error() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    // A line that has no '='
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    let result = with_dotenv_gate(None, || loader().load_dotenv());

    match result {
        Err(ConfigError::DotenvParse { .. }) => {}
        Err(other) => panic!(
            "Invalid .env should return DotenvParse error, got {}",
            other
        ),
        Ok(_) => panic!("Invalid .env should return DotenvParse error, got Ok"),
    }
}

#[test]
#[serial]
fn test_dotenv_parse_error_does_not_leak_secrets() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    let secret_value = "supersecret_token_12345";

    fs::write(
        temp_dir.path().join(".env"),
        format!("_LAYERED_DOTENV_SECRET={}\nINVALID_LINE_WITHOUT_EQUALS", secret_value),
    )
    .unwrap();

    let result = temp_env::with_var_unset("_LAYERED_DOTENV_SECRET", || {
        with_dotenv_gate(None, || loader().load_dotenv())
    });

    match &result {
        Err(e) => {
            let error_string = e.to_string();
            assert!(
                !error_string.contains(secret_value),
                "Error message should NOT contain the secret value: {}",
                error_string
            );
            assert!(
                error_string.contains("DOTENV_DISABLED"),
                "Error should hint about DOTENV_DISABLED: {}",
                error_string
            );
        }
        Ok(_) => panic!("Expected error for invalid .env file, got Ok"),
    }
}

#[test]
#[serial]
fn test_dotenv_disabled_values() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    for value in ["1", "true"] {
        let result = with_dotenv_gate(Some(value), || loader().load_dotenv());
        assert!(
            result.is_ok(),
            "DOTENV_DISABLED={value} should skip .env loading even if file is invalid"
        );
    }
}

#[test]
#[serial]
fn test_dotenv_disabled_other_values_not_disabled() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    let result = with_dotenv_gate(Some("false"), || loader().load_dotenv());

    match result {
        Err(ConfigError::DotenvParse { .. }) => {}
        Err(other) => panic!(
            "DOTENV_DISABLED=false should NOT disable dotenv loading, got {}",
            other
        ),
        Ok(_) => panic!("DOTENV_DISABLED=false should NOT disable dotenv loading, got Ok"),
    }
}
