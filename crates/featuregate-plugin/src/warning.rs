// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured warning records and the sinks that receive them.

use std::sync::mpsc::Sender;

use serde::Serialize;
use strum::Display;

/// Category of a warning raised during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Descriptor unreadable or malformed; the plugin was force-disabled.
    ParseFailure,
    /// `EnabledByDefault` is true or absent.
    EnabledByDefault,
    /// `ExplicitlyLoaded` is false or absent.
    NotExplicitlyLoaded,
    /// A second descriptor with an already-seen name was skipped.
    DuplicateDescriptor,
    /// Feature plugins cannot be configured in a shared build environment.
    SharedEnvironment,
}

/// A warning attributable to a plugin (when one is involved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginWarning {
    pub plugin: Option<String>,
    pub kind: WarningKind,
    pub message: String,
}

impl PluginWarning {
    pub fn for_plugin(
        plugin: impl Into<String>,
        kind: WarningKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            plugin: Some(plugin.into()),
            kind,
            message: message.into(),
        }
    }

    pub fn general(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            plugin: None,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PluginWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.plugin {
            Some(plugin) => write!(f, "[{}] {plugin}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Receives warnings as a pass produces them.
pub trait WarningSink {
    fn warn(&mut self, warning: PluginWarning);
}

impl WarningSink for Vec<PluginWarning> {
    fn warn(&mut self, warning: PluginWarning) {
        self.push(warning);
    }
}

/// Forwards into a channel. A disconnected receiver drops the warning.
impl WarningSink for Sender<PluginWarning> {
    fn warn(&mut self, warning: PluginWarning) {
        let _ = self.send(warning);
    }
}
