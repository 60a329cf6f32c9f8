// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptor parsing.
//!
//! A descriptor is a JSON object describing one feature plugin. Only the
//! fields that drive resolution are read; everything else in the document
//! is ignored.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Parsed, immutable plugin descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    /// Plugin name, taken from the descriptor file stem.
    pub name: String,
    /// `EnabledByDefault`, `None` when absent.
    pub enabled_by_default: Option<bool>,
    /// `ExplicitlyLoaded`, `None` when absent.
    pub explicitly_loaded: Option<bool>,
    pub editor_only: bool,
    pub restrict_to_branch: Option<String>,
    pub never_build: bool,
    /// Declared references in document order.
    pub references: Vec<PluginReference>,
}

impl PluginDescriptor {
    /// Names of references marked enabled, in document order.
    pub fn enabled_references(&self) -> impl Iterator<Item = &str> {
        self.references
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.name.as_str())
    }
}

/// One entry of the descriptor's `Plugins` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReference {
    pub name: String,
    pub enabled: bool,
}

/// A descriptor that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse descriptor for plugin {plugin}: {cause}")]
pub struct ParseFailure {
    pub plugin: String,
    pub cause: String,
}

impl ParseFailure {
    pub fn new(plugin: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            plugin: plugin.into(),
            cause: cause.to_string(),
        }
    }
}

/// Parse descriptor JSON for the plugin `name`.
///
/// Only invalid JSON or a root that is not an object fails. Each field is
/// read leniently: a value of the wrong type reads as absent. A leading
/// UTF-8 byte-order mark is tolerated. References without a string `Name`
/// are dropped; a missing or non-boolean `Enabled` reads as `false`.
pub fn parse_descriptor(name: &str, content: &str) -> Result<PluginDescriptor, ParseFailure> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let root: Value = serde_json::from_str(content).map_err(|e| ParseFailure::new(name, e))?;
    let Some(fields) = root.as_object() else {
        return Err(ParseFailure::new(name, "descriptor root is not a JSON object"));
    };

    Ok(PluginDescriptor {
        name: name.to_string(),
        enabled_by_default: bool_field(fields, "EnabledByDefault"),
        explicitly_loaded: bool_field(fields, "ExplicitlyLoaded"),
        editor_only: bool_field(fields, "EditorOnly").unwrap_or(false),
        restrict_to_branch: fields
            .get("RestrictToBranch")
            .and_then(Value::as_str)
            .map(str::to_string),
        never_build: bool_field(fields, "NeverBuild").unwrap_or(false),
        references: references(fields),
    })
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

fn references(fields: &Map<String, Value>) -> Vec<PluginReference> {
    let Some(entries) = fields.get("Plugins").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let name = entry.get("Name").and_then(Value::as_str)?;
            Some(PluginReference {
                name: name.to_string(),
                enabled: bool_field(entry, "Enabled").unwrap_or(false),
            })
        })
        .collect()
}
