// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::{Path, PathBuf};

use featuregate_core::{BuildEnvironment, TargetContext, TargetKind};
use serde::{Deserialize, Serialize};

/// Top-level featuregate configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureGateConfig {
    /// Build target settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Descriptor discovery and target-level plugin lists.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl FeatureGateConfig {
    /// Builds the evaluation context for the configured target, reading the
    /// build-machine variable from the process environment.
    pub fn target_context(&self) -> TargetContext {
        self.target_context_for(self.build.target)
    }

    /// Same as [`target_context`](Self::target_context) for another target kind.
    pub fn target_context_for(&self, target: TargetKind) -> TargetContext {
        TargetContext::new(target, self.build.branch.clone())
            .with_build_all(self.build.build_all_requested(|key| std::env::var(key).ok()))
            .with_environment(self.build.environment)
    }
}

/// Build target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Branch the build is running on.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Target kind to configure.
    #[serde(default = "default_target")]
    pub target: TargetKind,

    /// Unique or shared engine build.
    #[serde(default)]
    pub environment: BuildEnvironment,

    /// Force every feature plugin on (subject to force-disable rules).
    #[serde(default)]
    pub build_all_plugins: bool,

    /// Environment variable that marks an automated build machine.
    /// When it equals `"true"`, build-all is requested.
    #[serde(default = "default_build_machine_var")]
    pub build_machine_var: String,
}

impl BuildConfig {
    /// Whether build-all is requested, either explicitly or because the
    /// build-machine variable is set to `"true"`.
    ///
    /// `lookup` resolves an environment variable name to its value.
    pub fn build_all_requested<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        self.build_all_plugins
            || lookup(&self.build_machine_var).is_some_and(|value| value == "true")
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            target: default_target(),
            environment: BuildEnvironment::default(),
            build_all_plugins: false,
            build_machine_var: default_build_machine_var(),
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_target() -> TargetKind {
    TargetKind::Game
}

fn default_build_machine_var() -> String {
    "IsBuildMachine".to_string()
}

/// Descriptor discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Project directory; descriptor roots are derived from its extension dirs.
    #[serde(default = "default_project_dir")]
    pub project_dir: String,

    /// Path below each extension dir that holds feature plugins.
    #[serde(default = "default_subdirectory")]
    pub subdirectory: String,

    /// Additional explicit descriptor roots.
    #[serde(default)]
    pub roots: Vec<String>,

    /// Descriptor file extension, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Plugins always disabled for non-editor targets in a unique environment.
    #[serde(default = "default_non_editor_disabled")]
    pub non_editor_disabled: Vec<String>,

    /// Plugins always enabled for editor targets.
    #[serde(default = "default_editor_enabled")]
    pub editor_enabled: Vec<String>,
}

impl PluginsConfig {
    /// Explicit roots as paths.
    pub fn explicit_roots(&self) -> Vec<PathBuf> {
        self.roots.iter().map(PathBuf::from).collect()
    }

    pub fn project_path(&self) -> &Path {
        Path::new(&self.project_dir)
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            subdirectory: default_subdirectory(),
            roots: Vec::new(),
            extension: default_extension(),
            non_editor_disabled: default_non_editor_disabled(),
            editor_enabled: default_editor_enabled(),
        }
    }
}

fn default_project_dir() -> String {
    ".".to_string()
}

fn default_subdirectory() -> String {
    "Plugins/GameFeatures".to_string()
}

fn default_extension() -> String {
    "uplugin".to_string()
}

fn default_non_editor_disabled() -> Vec<String> {
    vec!["OpenImageDenoise".to_string()]
}

fn default_editor_enabled() -> Vec<String> {
    vec!["RemoteSession".to_string()]
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
