//! Per-directory config file loading.
//!
//! Responsibilities:
//! - Read and parse `<dir>/<name>` as a JSON object.
//! - Apply an optional object hook to every decoded JSON object.
//! - Produce one fragment per candidate directory via `load_configs`.
//!
//! Does NOT handle:
//! - Merging fragments (see merge.rs).
//! - Environment overrides (see env.rs).
//!
//! Invariants:
//! - A missing file (or a non-file at that path) yields an empty fragment, never an error.
//! - Malformed JSON is returned as `ConfigError::ConfigFileParse` and never retried.
//! - The hook runs innermost-first, so it always sees already-transformed children.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::dirs::SearchDirs;
use super::error::ConfigError;

/// One directory's parsed (or empty) configuration mapping.
pub type Fragment = Map<String, Value>;

/// Transformation applied to every JSON object while a config file is decoded.
///
/// The returned value replaces the object in its parent. The top-level
/// result must still be an object.
pub trait ObjectHook: Send + Sync {
    fn transform(&self, object: Map<String, Value>) -> Value;
}

impl<F> ObjectHook for F
where
    F: Fn(Map<String, Value>) -> Value + Send + Sync,
{
    fn transform(&self, object: Map<String, Value>) -> Value {
        self(object)
    }
}

/// Load one fragment from `path`.
///
/// Returns an empty fragment if `path` is not a regular file.
pub fn load_fragment(
    path: &Path,
    object_hook: Option<&dyn ObjectHook>,
) -> Result<Fragment, ConfigError> {
    if !path.is_file() {
        tracing::trace!(path = %path.display(), "Config layer not present");
        return Ok(Fragment::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value = match object_hook {
        Some(hook) => apply_hook(value, hook),
        None => value,
    };

    match value {
        Value::Object(fragment) => {
            tracing::debug!(
                path = %path.display(),
                keys = fragment.len(),
                "Loaded config layer"
            );
            Ok(fragment)
        }
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Load `name` from every candidate directory in `dirs`.
///
/// Always returns one fragment per candidate position. A directory that
/// appears more than once is read once and its fragment is repeated.
pub fn load_configs(
    name: &str,
    dirs: &SearchDirs,
    object_hook: Option<&dyn ObjectHook>,
) -> Result<Vec<Fragment>, ConfigError> {
    let mut loaded: HashMap<&Path, Fragment> = HashMap::new();
    for dir in dirs.unique() {
        let fragment = load_fragment(&dir.join(name), object_hook)?;
        loaded.insert(dir, fragment);
    }

    Ok(dirs
        .candidates()
        .iter()
        .map(|dir| loaded.get(dir.as_path()).cloned().unwrap_or_default())
        .collect())
}

fn apply_hook(value: Value, hook: &dyn ObjectHook) -> Value {
    match value {
        Value::Object(object) => {
            let object = object
                .into_iter()
                .map(|(key, child)| (key, apply_hook(child, hook)))
                .collect();
            hook.transform(object)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|item| apply_hook(item, hook)).collect())
        }
        other => other,
    }
}
