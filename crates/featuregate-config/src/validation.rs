// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::FeatureGateConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &FeatureGateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.build.branch.trim().is_empty() {
        errors.push(validation("build.branch must not be empty"));
    }

    if config.build.build_machine_var.trim().is_empty() {
        errors.push(validation("build.build_machine_var must not be empty"));
    }

    if config.plugins.subdirectory.trim().is_empty() {
        errors.push(validation("plugins.subdirectory must not be empty"));
    }

    let extension = config.plugins.extension.trim();
    if extension.is_empty() {
        errors.push(validation("plugins.extension must not be empty"));
    } else if extension.starts_with('.') {
        errors.push(validation(format!(
            "plugins.extension `{extension}` must not start with a dot"
        )));
    }

    for (list, names) in [
        ("non_editor_disabled", &config.plugins.non_editor_disabled),
        ("editor_enabled", &config.plugins.editor_enabled),
    ] {
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(validation(format!("plugins.{list}[{i}] must not be empty")));
            }
        }
    }

    // A plugin cannot be both forced off and forced on for targets.
    let disabled: HashSet<&str> = config
        .plugins
        .non_editor_disabled
        .iter()
        .map(String::as_str)
        .collect();
    for name in &config.plugins.editor_enabled {
        if disabled.contains(name.as_str()) {
            errors.push(validation(format!(
                "plugin `{name}` is listed in both plugins.non_editor_disabled and plugins.editor_enabled"
            )));
        }
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(validation(format!(
            "log.level `{}` is not one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
