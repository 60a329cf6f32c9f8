// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup: `./featuregate.toml` > `~/.config/featuregate/featuregate.toml`,
//! with environment variable overrides via the `FEATUREGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FeatureGateConfig;

/// Name of the config file looked up in the working directory and user config dir.
pub const CONFIG_FILE_NAME: &str = "featuregate.toml";

/// Config sections that environment variables may target.
const SECTIONS: [&str; 3] = ["build", "plugins", "log"];

/// Load configuration from the standard lookup with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/featuregate/featuregate.toml` (user config)
/// 3. `./featuregate.toml` (local directory)
/// 4. `FEATUREGATE_*` environment variables
pub fn load_config() -> Result<FeatureGateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FeatureGateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeatureGateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// The user and local config files are not consulted.
pub fn load_config_from_path(path: &Path) -> Result<FeatureGateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeatureGateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard lookup.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FeatureGateConfig::default()))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("featuregate").join(CONFIG_FILE_NAME))
}

/// Environment provider mapping `FEATUREGATE_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after the section name is a separator, so
/// `FEATUREGATE_BUILD_BUILD_ALL_PLUGINS` maps to `build.build_all_plugins`.
fn env_provider() -> Env {
    Env::prefixed("FEATUREGATE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
