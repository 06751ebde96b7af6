//! Pipeline arguments after parsing.
//!
//! Named lookups are case-insensitive so `--arg Target=x` and `--target x`
//! address the same value.

use std::collections::BTreeMap;

use crate::core::text::eq_ignore_case;

pub const DEFAULT_TARGET: &str = "Default";
pub const DEFAULT_CONFIGURATION: &str = "Release";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    /// Explicit pipeline goal; [`Arguments::target`] applies the default.
    pub target: Option<String>,
    /// Explicit build configuration; [`Arguments::configuration`] applies the default.
    pub configuration: Option<String>,
    /// Explicit version prefix.
    pub version: Option<String>,
    /// Explicit version suffix.
    pub suffix: Option<String>,
    pub force_publish: bool,
    /// Additional named arguments (`--arg key=value`).
    pub extra: BTreeMap<String, String>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            target: None,
            configuration: None,
            version: None,
            suffix: None,
            force_publish: false,
            extra: BTreeMap::new(),
        }
    }
}

impl Arguments {
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    pub fn configuration(&self) -> &str {
        self.configuration.as_deref().unwrap_or(DEFAULT_CONFIGURATION)
    }

    /// Look up an argument by name. Returns `None` when it was not supplied;
    /// defaults are not arguments.
    pub fn get(&self, name: &str) -> Option<&str> {
        let known = match name.to_ascii_lowercase().as_str() {
            "target" => self.target.as_deref(),
            "configuration" => self.configuration.as_deref(),
            "version" => self.version.as_deref(),
            "suffix" => self.suffix.as_deref(),
            _ => None,
        };
        known.or_else(|| {
            self.extra
                .iter()
                .find(|(key, _)| eq_ignore_case(key, name))
                .map(|(_, value)| value.as_str())
        })
    }
}

/// Split a `key=value` pair. The key must be non-empty; the value may be.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty argument name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
