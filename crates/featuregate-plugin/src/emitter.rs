// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes decisions into a build target's plugin lists.

use featuregate_core::{BuildEnvironment, Decision, TargetContext};
use serde::Serialize;

/// Receiver of enable/disable instructions for one target.
pub trait PluginTarget {
    fn enable_plugin(&mut self, name: &str);
    fn disable_plugin(&mut self, name: &str);
}

/// In-memory target holding the two ordered plugin lists.
///
/// A name never appears in both lists: disabling removes a prior enable, and
/// enabling a name that is already disabled has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    pub enable_plugins: Vec<String>,
    pub disable_plugins: Vec<String>,
}

impl BuildTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enable_plugins.iter().any(|n| n == name)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disable_plugins.iter().any(|n| n == name)
    }
}

impl PluginTarget for BuildTarget {
    fn enable_plugin(&mut self, name: &str) {
        if !self.is_disabled(name) && !self.is_enabled(name) {
            self.enable_plugins.push(name.to_string());
        }
    }

    fn disable_plugin(&mut self, name: &str) {
        self.enable_plugins.retain(|n| n != name);
        if !self.is_disabled(name) {
            self.disable_plugins.push(name.to_string());
        }
    }
}

/// A named decision, as produced by one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDecision {
    pub name: String,
    pub decision: Decision,
}

/// Apply decisions to `target` in order. Ignored plugins are not touched.
pub fn emit(decisions: &[PluginDecision], target: &mut dyn PluginTarget) {
    for d in decisions {
        match d.decision {
            Decision::Enabled => target.enable_plugin(&d.name),
            Decision::ForceDisabled => target.disable_plugin(&d.name),
            Decision::Ignored => {}
        }
    }
}

/// Fixed per-target plugin lists applied after feature plugin resolution.
pub fn apply_target_lists(
    ctx: &TargetContext,
    non_editor_disabled: &[String],
    editor_enabled: &[String],
    target: &mut dyn PluginTarget,
) {
    if ctx.is_editor() {
        for name in editor_enabled {
            target.enable_plugin(name);
        }
    } else if ctx.environment == BuildEnvironment::Unique {
        for name in non_editor_disabled {
            target.disable_plugin(name);
        }
    }
}
