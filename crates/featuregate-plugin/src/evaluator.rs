// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enable/disable policy for a single feature plugin.
//!
//! Rules, in order:
//! 1. start not enabled;
//! 2. build-all enables;
//! 3. an editor-only plugin is force-disabled for non-editor targets unless build-all is set;
//! 4. a branch restriction that does not match the current branch (ignoring case)
//!    force-disables, build-all or not;
//! 5. `NeverBuild` force-disables;
//! 6. a descriptor that failed to parse force-disables.
//!
//! Any force-disable wins over enable. Advisory checks only add warnings.

use featuregate_core::{Decision, TargetContext};

use crate::descriptor::{ParseFailure, PluginDescriptor};
use crate::warning::{PluginWarning, WarningKind};

/// Why a plugin was force-disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisableReason {
    EditorOnly,
    BranchMismatch { required: String },
    NeverBuild,
    ParseFailure,
}

impl std::fmt::Display for DisableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisableReason::EditorOnly => write!(f, "editor-only plugin on a non-editor target"),
            DisableReason::BranchMismatch { required } => {
                write!(f, "restricted to branch {required}")
            }
            DisableReason::NeverBuild => write!(f, "marked NeverBuild"),
            DisableReason::ParseFailure => write!(f, "descriptor failed to parse"),
        }
    }
}

/// Result of evaluating one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: Decision,
    /// Every force-disable trigger that fired, in rule order.
    pub reasons: Vec<DisableReason>,
    /// Advisory and parse-failure warnings. Never affect the decision.
    pub warnings: Vec<PluginWarning>,
}

/// Evaluate a resolved descriptor (or its parse failure) against a target.
pub fn evaluate(
    resolved: Result<&PluginDescriptor, &ParseFailure>,
    ctx: &TargetContext,
) -> Evaluation {
    let enabled = ctx.build_all_plugins;
    let mut reasons = Vec::new();
    let mut warnings = Vec::new();

    match resolved {
        Ok(descriptor) => {
            warnings.extend(advisories(descriptor));

            if descriptor.editor_only && !ctx.is_editor() && !ctx.build_all_plugins {
                reasons.push(DisableReason::EditorOnly);
            }

            if let Some(required) = &descriptor.restrict_to_branch {
                if !branch_matches(required, &ctx.branch_name) {
                    reasons.push(DisableReason::BranchMismatch {
                        required: required.clone(),
                    });
                }
            }

            if descriptor.never_build {
                reasons.push(DisableReason::NeverBuild);
            }
        }
        Err(failure) => {
            warnings.push(PluginWarning::for_plugin(
                &failure.plugin,
                WarningKind::ParseFailure,
                format!("failed to parse descriptor, disabling: {}", failure.cause),
            ));
            reasons.push(DisableReason::ParseFailure);
        }
    }

    let decision = if !reasons.is_empty() {
        Decision::ForceDisabled
    } else if enabled {
        Decision::Enabled
    } else {
        Decision::Ignored
    };

    Evaluation {
        decision,
        reasons,
        warnings,
    }
}

fn branch_matches(required: &str, current: &str) -> bool {
    required == current || required.to_lowercase() == current.to_lowercase()
}

fn advisories(descriptor: &PluginDescriptor) -> Vec<PluginWarning> {
    let mut warnings = Vec::new();
    if descriptor.enabled_by_default != Some(false) {
        warnings.push(PluginWarning::for_plugin(
            &descriptor.name,
            WarningKind::EnabledByDefault,
            "does not set EnabledByDefault to false; built-in feature plugins should default to off",
        ));
    }
    if descriptor.explicitly_loaded != Some(true) {
        warnings.push(PluginWarning::for_plugin(
            &descriptor.name,
            WarningKind::NotExplicitlyLoaded,
            "does not set ExplicitlyLoaded to true; feature plugins must load on demand",
        ));
    }
    warnings
}
