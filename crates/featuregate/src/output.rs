// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable and JSON rendering of command results.

use colored::Colorize;
use featuregate_config::FeatureGateConfig;
use featuregate_core::{Decision, FeatureGateError};
use featuregate_plugin::ReferenceGraph;
use serde::Serialize;

use crate::resolve::PassOutcome;

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), FeatureGateError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| FeatureGateError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn print_config(config: &FeatureGateConfig) -> Result<(), FeatureGateError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| FeatureGateError::Config(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Print one pass with optional colors.
pub fn print_outcome(outcome: &PassOutcome, use_color: bool) {
    let ctx = &outcome.report.target;
    let build_all = if ctx.build_all_plugins { "on" } else { "off" };

    println!();
    println!(
        "  {} target, branch {} ({} environment, build-all {build_all})",
        ctx.target_kind, ctx.branch_name, ctx.environment
    );
    println!("  {}", "-".repeat(50));

    if outcome.report.skipped {
        println!("    skipped: feature plugins are not configured here");
        return;
    }

    for d in &outcome.report.decisions {
        let verb = d.decision.to_string();
        let verb = if use_color {
            match d.decision {
                Decision::Enabled => verb.green().to_string(),
                Decision::ForceDisabled => verb.red().to_string(),
                Decision::Ignored => verb.dimmed().to_string(),
            }
        } else {
            verb
        };
        println!("    {:<32} {verb}", d.name);
    }

    println!();
    println!("  enable:  {}", list(&outcome.target.enable_plugins));
    println!("  disable: {}", list(&outcome.target.disable_plugins));

    for root in &outcome.report.missing_roots {
        println!("  missing root: {}", root.display());
    }
    if !outcome.warnings.is_empty() {
        let header = format!("  {} warning(s):", outcome.warnings.len());
        if use_color {
            println!("{}", header.yellow());
        } else {
            println!("{header}");
        }
        for warning in &outcome.warnings {
            println!("    {warning}");
        }
    }
}

/// Print one `referencer -> referenced` line per edge.
pub fn print_graph(graph: &ReferenceGraph) {
    if graph.is_empty() {
        println!("no enabled plugin references");
        return;
    }
    for (from, to) in graph.edges() {
        println!("{from} -> {to}");
    }
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
