//! Best-effort placeholder substitution for configuration strings.
//!
//! A placeholder is an identifier `[_A-Za-z][_A-Za-z0-9]*`, either braced
//! (`{name}`) or bare. A bare identifier is the longest run of identifier
//! characters starting at a letter or `_`, so `names` never matches `name`,
//! while the digit in `1abc` does not belong to the run and `abc` is still
//! looked up. Identifiers with no value are copied through verbatim.
//!
//! ```text
//! vars: scheme=https host=example.com
//! "{scheme}://{host}:{port}"   -> "https://example.com:{port}"  (port unknown)
//! "host:port"                  -> "example.com:port"
//! "hosts 1host host-a"         -> "hosts 1example.com example.com-a"
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::loader::Fragment;

/// Source of values for template placeholders.
pub trait TemplateVars {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl TemplateVars for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl TemplateVars for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Strings substitute as-is, numbers and booleans as their JSON text.
/// `null`, arrays, and objects leave the placeholder unresolved.
impl TemplateVars for Fragment {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Process environment as a placeholder source.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVars;

impl TemplateVars for EnvVars {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        std::env::var(name).ok().map(Cow::Owned)
    }
}

/// A template string with `{name}` and bare `name` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'a> {
    text: &'a str,
}

impl<'a> Template<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Substitute every resolvable placeholder; never fails.
    ///
    /// Returns `Cow::Borrowed` when nothing was replaced.
    pub fn safe_substitute(&self, vars: &dyn TemplateVars) -> Cow<'a, str> {
        let text = self.text;
        let bytes = text.as_bytes();

        let mut out = String::new();
        let mut modified = false;
        let mut copied_to = 0;
        let mut pos = 0;

        // Every slice boundary below sits next to an ASCII byte, so it is a
        // char boundary even when the text holds multi-byte characters.
        while pos < bytes.len() {
            let (name_start, name_len, end) = if bytes[pos] == b'{' {
                let len = identifier_len(&bytes[pos + 1..]);
                if len == 0 || bytes.get(pos + 1 + len) != Some(&b'}') {
                    pos += 1;
                    continue;
                }
                (pos + 1, len, pos + len + 2)
            } else {
                let len = identifier_len(&bytes[pos..]);
                if len == 0 {
                    pos += 1;
                    continue;
                }
                (pos, len, pos + len)
            };

            if let Some(value) = vars.lookup(&text[name_start..name_start + name_len]) {
                out.push_str(&text[copied_to..pos]);
                out.push_str(&value);
                copied_to = end;
                modified = true;
            }
            pos = end;
        }

        if !modified {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[copied_to..]);
        Cow::Owned(out)
    }
}

/// Length of the identifier at the start of `bytes`, or 0 if none starts there.
fn identifier_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}

/// Substitute placeholders in every string value of `value`, in place.
///
/// Object keys are left untouched.
pub fn substitute_strings(value: &mut Value, vars: &dyn TemplateVars) {
    match value {
        Value::String(s) => {
            let replaced = match Template::new(s.as_str()).safe_substitute(vars) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                *s = replaced;
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_strings(item, vars);
            }
        }
        Value::Object(map) => {
            for child in map.values_mut() {
                substitute_strings(child, vars);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
