// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared types describing a build target and the decisions made for it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of build target being configured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum TargetKind {
    Game,
    Editor,
    Server,
    Client,
    Program,
}

impl TargetKind {
    /// All target kinds, in declaration order.
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Game,
        TargetKind::Editor,
        TargetKind::Server,
        TargetKind::Client,
        TargetKind::Program,
    ];
}

/// Whether the target builds against its own engine binaries or reuses an
/// installed, shared engine build.
///
/// A shared build cannot toggle plugins, so only editor targets get feature
/// plugin resolution there.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildEnvironment {
    #[default]
    Unique,
    Shared,
}

/// Outcome of evaluating one plugin for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Compiled into the target.
    Enabled,
    /// Excluded from the target; overrides any enable signal.
    ForceDisabled,
    /// Left to the default plugin activation rules.
    Ignored,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Enabled => write!(f, "enable"),
            Decision::ForceDisabled => write!(f, "disable"),
            Decision::Ignored => write!(f, "ignore"),
        }
    }
}

/// Input to one evaluation pass. Built once per pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetContext {
    pub target_kind: TargetKind,
    pub branch_name: String,
    pub build_all_plugins: bool,
    #[serde(default)]
    pub environment: BuildEnvironment,
}

impl TargetContext {
    /// Context for a unique-environment pass with build-all off.
    pub fn new(target_kind: TargetKind, branch_name: impl Into<String>) -> Self {
        Self {
            target_kind,
            branch_name: branch_name.into(),
            build_all_plugins: false,
            environment: BuildEnvironment::Unique,
        }
    }

    pub fn with_build_all(mut self, build_all_plugins: bool) -> Self {
        self.build_all_plugins = build_all_plugins;
        self
    }

    pub fn with_environment(mut self, environment: BuildEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn is_editor(&self) -> bool {
        self.target_kind == TargetKind::Editor
    }
}
