//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//! - Carry the lower-level I/O and JSON errors as sources.
//!
//! Does NOT handle:
//! - Recovery. Missing layers are not errors and never reach this type.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Environment errors name the variable but never echo its value.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::literal::ValueKind;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}")]
    ConfigFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config file at {path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    /// The environment value resolved to a different type than its default.
    #[error("Invalid value for {var}: expected {expected}, got {actual}")]
    EnvTypeMismatch {
        var: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Failed to deserialize merged configuration")]
    Deserialize(#[source] serde_json::Error),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
