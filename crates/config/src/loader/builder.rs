//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Resolve search directories (explicit or discovered) and load one fragment per directory.
//! - Merge fragments, then apply environment overrides and interpolation when requested.
//! - Deserialize the merged mapping into a caller-supplied schema type.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - File reading and the object hook walk (delegated to fragment.rs).
//!
//! Invariants / Assumptions:
//! - Layers merge in directory order; the working directory layer wins.
//! - Environment overrides apply after all file layers.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::dirs::SearchDirs;
use super::env::apply_env_overrides;
use super::error::ConfigError;
use super::fragment::{Fragment, ObjectHook, load_configs};
use crate::constants::{DEFAULT_CONFIG_NAME, DOTENV_DISABLED_VAR};
use crate::merge::join_dicts;
use crate::template::{EnvVars, substitute_strings};

/// Configuration loader that builds config from layered files and the environment.
#[derive(Clone)]
pub struct ConfigLoader {
    name: String,
    app_name: Option<String>,
    search_dirs: Option<SearchDirs>,
    object_hook: Option<Arc<dyn ObjectHook>>,
    env_prefix: Option<String>,
    env_interpolation: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_NAME)
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("name", &self.name)
            .field("app_name", &self.app_name)
            .field("search_dirs", &self.search_dirs)
            .field("object_hook", &self.object_hook.is_some())
            .field("env_prefix", &self.env_prefix)
            .field("env_interpolation", &self.env_interpolation)
            .finish()
    }
}

impl ConfigLoader {
    /// Create a loader for the config file `name` (e.g. `config.json`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_name: None,
            search_dirs: None,
            object_hook: None,
            env_prefix: None,
            env_interpolation: false,
        }
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the application name used to locate the platform config directory.
    ///
    /// Defaults to the file stem of the running program.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Use explicit search directories instead of discovering them.
    pub fn with_search_dirs(mut self, dirs: SearchDirs) -> Self {
        self.search_dirs = Some(dirs);
        self
    }

    /// Transform every JSON object as config files are decoded.
    pub fn with_object_hook(mut self, hook: impl ObjectHook + 'static) -> Self {
        self.object_hook = Some(Arc::new(hook));
        self
    }

    /// Overlay `<prefix><KEY>` environment variables onto merged top-level keys.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Substitute `{VAR}` placeholders in merged string values from the environment.
    ///
    /// Bare words are placeholders too: any whole word in a string value that
    /// names a set environment variable is replaced (`HOME/cache` becomes
    /// `/home/me/cache`). Only enable this for configs whose strings are meant
    /// as templates.
    pub fn with_env_interpolation(mut self, enabled: bool) -> Self {
        self.env_interpolation = enabled;
        self
    }

    /// Config file name searched for in every directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directories this loader will search.
    pub fn search_dirs(&self) -> Result<SearchDirs, ConfigError> {
        if let Some(dirs) = &self.search_dirs {
            return Ok(dirs.clone());
        }
        SearchDirs::discover(&self.resolve_app_name()?)
    }

    fn resolve_app_name(&self) -> Result<String, ConfigError> {
        if let Some(name) = &self.app_name {
            return Ok(name.clone());
        }
        std::env::args_os()
            .next()
            .as_deref()
            .map(std::path::Path::new)
            .and_then(|p| p.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                ConfigError::ConfigDirUnavailable(
                    "Cannot derive an application name from the program path".to_string(),
                )
            })
    }

    /// Load one fragment per search directory, in precedence order.
    pub fn load(&self) -> Result<Vec<Fragment>, ConfigError> {
        let dirs = self.search_dirs()?;
        load_configs(&self.name, &dirs, self.object_hook.as_deref())
    }

    /// Load and merge all layers into a single mapping.
    ///
    /// Later directories override earlier ones key by key. Environment
    /// overrides and interpolation, when enabled, apply to the merged result.
    pub fn load_merged(&self) -> Result<Fragment, ConfigError> {
        let fragments = self.load()?;
        let mut merged = join_dicts(&fragments);

        if let Some(prefix) = &self.env_prefix {
            apply_env_overrides(&mut merged, prefix)?;
        }
        if self.env_interpolation {
            for value in merged.values_mut() {
                substitute_strings(value, &EnvVars);
            }
        }

        tracing::debug!(
            name = %self.name,
            layers = fragments.iter().filter(|f| !f.is_empty()).count(),
            keys = merged.len(),
            "Merged configuration"
        );
        Ok(merged)
    }

    /// Load, merge, and deserialize the configuration into `T`.
    pub fn load_as<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let merged = self.load_merged()?;
        serde_json::from_value(serde_json::Value::Object(merged)).map_err(ConfigError::Deserialize)
    }
}
