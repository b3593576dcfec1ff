//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read environment variables and coerce them to the type of a default value.
//! - Overlay environment variables onto a merged config fragment.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Literal grammar (see literal.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - An unset variable always yields the default untouched.
//! - A set variable must resolve to exactly the default's kind; anything else is an error.
//! - Text that is not a valid literal is kept as a raw string.
//! - Variable values are never logged.

use std::env::VarError;

use serde_json::Value;

use super::error::ConfigError;
use super::fragment::Fragment;
use crate::literal::{EnvLiteral, EnvValue, parse_literal};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Read `key` and coerce it to the kind of `default`.
///
/// - Unset: returns `default` unchanged.
/// - Set: parses the value as a literal; text that is not a literal is kept
///   as `EnvValue::Str`.
/// - `None` parses to `EnvValue::None`, which matches no default kind except
///   `EnvValue::None` itself; quote it (`'None'`) to get the string.
///
/// # Errors
///
/// - `ConfigError::EnvTypeMismatch` if the resolved kind differs from the default's.
/// - `ConfigError::InvalidValue` if the value is not valid unicode.
pub fn get_env_var(key: &str, default: EnvValue) -> Result<EnvValue, ConfigError> {
    let Some(raw) = read_var(key)? else {
        return Ok(default);
    };
    let value = coerce(raw);
    if value.kind() != default.kind() {
        return Err(ConfigError::EnvTypeMismatch {
            var: key.to_string(),
            expected: default.kind(),
            actual: value.kind(),
        });
    }
    Ok(value)
}

/// Typed variant of [`get_env_var`] keyed by the default's Rust type.
///
/// ```rust,ignore
/// let port: u16 = env_or("APP_PORT", 8080)?;
/// let debug = env_or("APP_DEBUG", false)?; // APP_DEBUG=True
/// ```
pub fn env_or<T: EnvLiteral>(key: &str, default: T) -> Result<T, ConfigError> {
    let Some(raw) = read_var(key)? else {
        return Ok(default);
    };
    let value = coerce(raw);
    if value.kind() != T::KIND {
        return Err(ConfigError::EnvTypeMismatch {
            var: key.to_string(),
            expected: T::KIND,
            actual: value.kind(),
        });
    }
    T::from_env_value(value).ok_or_else(|| ConfigError::InvalidValue {
        var: key.to_string(),
        message: format!("out of range for {}", std::any::type_name::<T>()),
    })
}

/// Overlay environment variables onto the top-level keys of `config`.
///
/// For each key, the variable `<prefix><KEY>` is consulted (key upper-cased,
/// non-alphanumeric characters replaced with `_`). The current value acts as
/// the typed default, so `{"port": 8080}` with prefix `APP_` reads `APP_PORT`
/// and requires an integer. Keys whose value is `null` (or contains one) are
/// skipped.
pub fn apply_env_overrides(config: &mut Fragment, prefix: &str) -> Result<(), ConfigError> {
    for (key, value) in config.iter_mut() {
        let Some(default) = EnvValue::from_json(value) else {
            continue;
        };
        let var = env_key(prefix, key);
        if std::env::var_os(&var).is_none() {
            continue;
        }
        let resolved = get_env_var(&var, default)?;
        tracing::debug!(var = %var, key = %key, "Applied environment override");
        *value = Value::from(resolved);
    }
    Ok(())
}

/// Environment variable name for a config key.
pub fn env_key(prefix: &str, key: &str) -> String {
    let mut var = String::with_capacity(prefix.len() + key.len());
    var.push_str(prefix);
    var.extend(key.chars().map(|c| {
        if c.is_ascii_alphanumeric() {
            c.to_ascii_uppercase()
        } else {
            '_'
        }
    }));
    var
}

fn read_var(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            var: key.to_string(),
            message: "must be valid unicode".to_string(),
        }),
    }
}

fn coerce(raw: String) -> EnvValue {
    match parse_literal(&raw) {
        Ok(value) => value,
        Err(_) => EnvValue::Str(raw),
    }
}
