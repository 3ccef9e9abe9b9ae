//! Localized text lookup.
//!
//! Command descriptions are resolved once, while commands are registered.
//! Templates use positional markers: `{0}`, `{1}`, and so on.
//!
//! ```rust,ignore
//! let table = LanguageTable::from_json_str(r#"{ "Greeting": "Hello, {0}!" }"#)?;
//! assert_eq!(table.resolve("Greeting", &["Ada"]), "Hello, Ada!");
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::error::LanguageError;

/// Resolves a string key to localized text.
pub trait TextResolver: Send + Sync {
    /// Returns the text for `key` with positional markers replaced by `args`.
    fn resolve(&self, key: &str, args: &[&str]) -> String;
}

/// A flat key → template table, usually loaded from a JSON object.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    strings: HashMap<String, String>,
}

impl LanguageTable {
    /// Creates an empty table. Every lookup falls back to the key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object whose values are all strings.
    pub fn from_json_str(json: &str) -> Result<Self, LanguageError> {
        let map: HashMap<String, Value> = serde_json::from_str(json)?;
        let mut strings = HashMap::with_capacity(map.len());

        for (key, value) in map {
            match value {
                Value::String(text) => {
                    strings.insert(key, text);
                }
                _ => return Err(LanguageError::NotAString(key)),
            }
        }

        Ok(Self { strings })
    }

    /// Adds a template (builder pattern).
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.strings.insert(key.into(), template.into());
        self
    }

    /// Returns the raw template for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if the table has no templates.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl TextResolver for LanguageTable {
    fn resolve(&self, key: &str, args: &[&str]) -> String {
        match self.strings.get(key) {
            Some(template) => interpolate(template, args),
            None => {
                warn!(key, "Missing language entry, using key");
                key.to_string()
            }
        }
    }
}

/// Replaces `{N}` markers in `template` with `args[N]`.
///
/// Markers without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
