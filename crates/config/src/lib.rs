//! Layered configuration loading.
//!
//! This crate loads a same-named JSON config file from up to three
//! directories, merges the layers with last-write-wins precedence, and
//! overlays typed environment variables. Small helpers for database URL
//! schemes and placeholder templates live alongside.

pub mod constants;
pub mod literal;
mod loader;
pub mod merge;
pub mod scheme;
pub mod template;

pub use literal::{EnvLiteral, EnvValue, LiteralError, ValueKind, parse_literal};
pub use loader::{
    ConfigError, ConfigLoader, Fragment, ObjectHook, SearchDirs, apply_env_overrides, env_key,
    env_or, env_var_or_none, get_env_var, load_configs, load_fragment,
};
pub use merge::{join_dicts, subtract_dicts};
pub use scheme::{alchemize_url, redact_url};
pub use template::{EnvVars, Template, TemplateVars, substitute_strings};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
