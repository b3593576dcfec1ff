//! Configuration loader for layered files and environment variables.
//!
//! Responsibilities:
//! - Resolve the candidate directories searched for a config file.
//! - Load one JSON fragment per directory, optionally transforming decoded objects.
//! - Provide a builder-pattern `ConfigLoader` that merges layers and applies env overrides.
//! - Read typed values from environment variables.
//!
//! Does NOT handle:
//! - Merge primitives themselves (see `merge.rs`).
//! - Literal grammar for environment values (see `literal.rs`).
//!
//! Invariants / Assumptions:
//! - Missing layers are empty fragments, never errors.
//! - Environment variables take precedence over every file layer.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod dirs;
mod env;
mod error;
mod fragment;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use dirs::SearchDirs;
pub use env::{apply_env_overrides, env_key, env_or, env_var_or_none, get_env_var};
pub use error::ConfigError;
pub use fragment::{Fragment, ObjectHook, load_configs, load_fragment};
