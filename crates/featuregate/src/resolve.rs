// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `featuregate evaluate`, `matrix` and `refs` command implementations.

use featuregate_config::FeatureGateConfig;
use featuregate_core::{FeatureGateError, TargetContext, TargetKind};
use featuregate_plugin::{BuildTarget, PassReport, PluginWarning, ResolutionSession, SessionOptions};
use serde::Serialize;
use tracing::info;

use crate::output;

/// Everything one pass produced, for printing or `--json`.
#[derive(Debug, Serialize)]
pub struct PassOutcome {
    pub report: PassReport,
    pub target: BuildTarget,
    pub warnings: Vec<PluginWarning>,
}

fn session_for(config: &FeatureGateConfig) -> ResolutionSession {
    ResolutionSession::new(SessionOptions::from_config(&config.plugins))
}

/// Run one pass against a fresh in-memory build target.
pub fn run_pass(session: &ResolutionSession, ctx: &TargetContext) -> PassOutcome {
    let mut target = BuildTarget::new();
    let mut warnings: Vec<PluginWarning> = Vec::new();
    let report = session.evaluate(ctx, &mut target, &mut warnings);
    PassOutcome {
        report,
        target,
        warnings,
    }
}

/// Evaluate every context on its own thread against one shared session.
///
/// Results come back in the order of `contexts`.
pub fn run_parallel(
    session: &ResolutionSession,
    contexts: &[TargetContext],
) -> Result<Vec<PassOutcome>, FeatureGateError> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = contexts
            .iter()
            .map(|ctx| scope.spawn(move || run_pass(session, ctx)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle.join().map_err(|_| {
                    FeatureGateError::Internal("evaluation thread panicked".to_string())
                })
            })
            .collect()
    })
}

/// Run the `featuregate evaluate` command.
pub fn run_evaluate(
    config: &FeatureGateConfig,
    json: bool,
    use_color: bool,
) -> Result<(), FeatureGateError> {
    let session = session_for(config);
    let outcome = run_pass(&session, &config.target_context());

    if json {
        output::print_json(&outcome)
    } else {
        output::print_outcome(&outcome, use_color);
        Ok(())
    }
}

/// Run the `featuregate matrix` command. An empty `targets` means every kind.
pub fn run_matrix(
    config: &FeatureGateConfig,
    targets: &[TargetKind],
    json: bool,
    use_color: bool,
) -> Result<(), FeatureGateError> {
    let kinds: Vec<TargetKind> = if targets.is_empty() {
        TargetKind::ALL.to_vec()
    } else {
        targets.to_vec()
    };
    let contexts: Vec<TargetContext> = kinds
        .iter()
        .map(|&kind| config.target_context_for(kind))
        .collect();

    let session = session_for(config);
    let outcomes = run_parallel(&session, &contexts)?;
    info!(
        targets = outcomes.len(),
        descriptors = session.cache().len(),
        "matrix evaluated"
    );

    if json {
        output::print_json(&outcomes)
    } else {
        for outcome in &outcomes {
            output::print_outcome(outcome, use_color);
        }
        Ok(())
    }
}

/// Run the `featuregate refs` command.
pub fn run_refs(config: &FeatureGateConfig, json: bool) -> Result<(), FeatureGateError> {
    let session = session_for(config);
    run_pass(&session, &config.target_context());
    let graph = session.reference_graph();

    if json {
        output::print_json(&graph)
    } else {
        output::print_graph(&graph);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuregate_core::Decision;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join("Plugins/GameFeatures");
        for (name, body) in [
            ("Arena", r#"{"EnabledByDefault": false, "ExplicitlyLoaded": true, "EditorOnly": true}"#),
            ("Lobby", r#"{"EnabledByDefault": false, "ExplicitlyLoaded": true, "Plugins": [{"Name": "Arena", "Enabled": true}]}"#),
        ] {
            let plugin_dir = plugins.join(name);
            fs::create_dir_all(&plugin_dir).unwrap();
            fs::write(plugin_dir.join(format!("{name}.uplugin")), body).unwrap();
        }
        dir
    }

    fn config_for(dir: &tempfile::TempDir) -> FeatureGateConfig {
        let mut config = FeatureGateConfig::default();
        config.plugins.project_dir = dir.path().display().to_string();
        config.build.branch = "dev".to_string();
        config
    }

    #[test]
    fn parallel_results_keep_context_order() {
        let dir = project();
        let config = config_for(&dir);
        let session = session_for(&config);
        let contexts = vec![
            TargetContext::new(TargetKind::Server, "dev"),
            TargetContext::new(TargetKind::Editor, "dev"),
            TargetContext::new(TargetKind::Game, "dev"),
        ];

        let outcomes = run_parallel(&session, &contexts).unwrap();

        let kinds: Vec<TargetKind> = outcomes.iter().map(|o| o.report.target.target_kind).collect();
        assert_eq!(kinds, vec![TargetKind::Server, TargetKind::Editor, TargetKind::Game]);
        assert_eq!(outcomes[1].report.decision_for("Arena"), Some(Decision::Ignored));
        assert_eq!(outcomes[0].report.decision_for("Arena"), Some(Decision::ForceDisabled));
        assert!(outcomes[1].target.is_enabled("RemoteSession"));
        assert!(outcomes[2].target.is_disabled("OpenImageDenoise"));
        assert_eq!(session.cache().len(), 2);
    }

    #[test]
    fn pass_outcome_serializes_lists() {
        let dir = project();
        let config = config_for(&dir);
        let session = session_for(&config);
        let outcome = run_pass(&session, &TargetContext::new(TargetKind::Game, "dev"));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["target"]["disable_plugins"][0], "Arena");
        assert_eq!(json["report"]["decisions"][1]["name"], "Lobby");
        assert_eq!(json["report"]["decisions"][1]["decision"], "Ignored");
        assert_eq!(json["report"]["skipped"], false);
    }
}
