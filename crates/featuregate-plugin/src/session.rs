// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evaluation passes over discovered feature plugins.
//!
//! A [`ResolutionSession`] owns the descriptor cache and reference tracker for
//! one build invocation. Each call to [`ResolutionSession::evaluate`] is one
//! pass for one target: discover, resolve through the cache, record references,
//! evaluate, then emit. Passes for different targets may run concurrently.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use featuregate_config::model::PluginsConfig;
use featuregate_core::{BuildEnvironment, Decision, TargetContext};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::DescriptorCache;
use crate::emitter::{PluginDecision, PluginTarget, apply_target_lists, emit};
use crate::evaluator::evaluate;
use crate::references::{ReferenceGraph, ReferenceTracker};
use crate::store::{DescriptorSource, FsSource, discover, extension_dirs};
use crate::warning::{PluginWarning, WarningKind, WarningSink};

/// Inputs that stay fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Descriptor roots, walked in order.
    pub roots: Vec<PathBuf>,
    /// Descriptor file extension, without the dot.
    pub extension: String,
    /// Disabled for every non-editor target in a unique environment.
    pub non_editor_disabled: Vec<String>,
    /// Enabled for editor targets.
    pub editor_enabled: Vec<String>,
}

impl SessionOptions {
    /// Options with the given roots, the `uplugin` extension and no target lists.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            extension: "uplugin".to_string(),
            non_editor_disabled: Vec::new(),
            editor_enabled: Vec::new(),
        }
    }

    /// Derive options from the `[plugins]` section: the project's extension
    /// directories first, then any explicit roots.
    pub fn from_config(plugins: &PluginsConfig) -> Self {
        let mut roots = extension_dirs(plugins.project_path(), &plugins.subdirectory);
        roots.extend(plugins.explicit_roots());
        Self {
            roots,
            extension: plugins.extension.clone(),
            non_editor_disabled: plugins.non_editor_disabled.clone(),
            editor_enabled: plugins.editor_enabled.clone(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_target_lists(
        mut self,
        non_editor_disabled: Vec<String>,
        editor_enabled: Vec<String>,
    ) -> Self {
        self.non_editor_disabled = non_editor_disabled;
        self.editor_enabled = editor_enabled;
        self
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub target: TargetContext,
    /// One entry per distinct plugin name, in discovery order.
    pub decisions: Vec<PluginDecision>,
    pub missing_roots: Vec<PathBuf>,
    /// True when the pass did not run (shared environment, non-editor target).
    pub skipped: bool,
}

impl PassReport {
    fn new(target: &TargetContext) -> Self {
        Self {
            target: target.clone(),
            decisions: Vec::new(),
            missing_roots: Vec::new(),
            skipped: false,
        }
    }

    pub fn decision_for(&self, plugin: &str) -> Option<Decision> {
        self.decisions
            .iter()
            .find(|d| d.name == plugin)
            .map(|d| d.decision)
    }

    pub fn count(&self, decision: Decision) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.decision == decision)
            .count()
    }
}

/// Log lines emitted at most once per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Announcement {
    Branch(String),
    SharedEnvironment,
}

/// Session-scoped state shared by every pass of one build invocation.
#[derive(Debug)]
pub struct ResolutionSession {
    options: SessionOptions,
    cache: DescriptorCache,
    references: ReferenceTracker,
    announced: Mutex<HashSet<Announcement>>,
}

impl ResolutionSession {
    pub fn new(options: SessionOptions) -> Self {
        Self::with_source(options, FsSource)
    }

    /// Session reading descriptors through a custom source.
    pub fn with_source(options: SessionOptions, source: impl DescriptorSource + 'static) -> Self {
        Self {
            options,
            cache: DescriptorCache::new(source),
            references: ReferenceTracker::new(),
            announced: Mutex::new(HashSet::new()),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    /// Snapshot of every reference edge recorded so far.
    pub fn reference_graph(&self) -> ReferenceGraph {
        self.references.snapshot()
    }

    /// Run one pass for `ctx`, writing decisions to `target` and warnings to `sink`.
    pub fn evaluate(
        &self,
        ctx: &TargetContext,
        target: &mut dyn PluginTarget,
        sink: &mut dyn WarningSink,
    ) -> PassReport {
        let mut report = PassReport::new(ctx);

        if ctx.environment == BuildEnvironment::Shared && !ctx.is_editor() {
            if self.first_time(Announcement::SharedEnvironment) {
                warn!(
                    target_kind = %ctx.target_kind,
                    "feature plugins cannot be configured in a shared build environment, skipping"
                );
                sink.warn(PluginWarning::general(
                    WarningKind::SharedEnvironment,
                    format!(
                        "feature plugins are not configured for {} targets in a shared build environment",
                        ctx.target_kind
                    ),
                ));
            }
            report.skipped = true;
            return report;
        }

        if self.first_time(Announcement::Branch(ctx.branch_name.clone())) {
            info!(
                branch = %ctx.branch_name,
                "compiling feature plugins in branch {}",
                ctx.branch_name
            );
        }

        let discovery = discover(&self.options.roots, &self.options.extension);
        report.missing_roots = discovery.missing_roots;

        let mut seen = HashSet::new();
        for found in discovery.descriptors {
            if !seen.insert(found.name.clone()) {
                warn!(
                    plugin = %found.name,
                    path = %found.path.display(),
                    "duplicate descriptor name, skipping"
                );
                sink.warn(PluginWarning::for_plugin(
                    &found.name,
                    WarningKind::DuplicateDescriptor,
                    format!("skipped duplicate descriptor at {}", found.path.display()),
                ));
                continue;
            }

            let resolved = self.cache.resolve(&found.name, &found.path);
            if let Ok(descriptor) = &resolved {
                self.references.record(descriptor);
            }

            let evaluation = evaluate(resolved.as_deref(), ctx);
            for warning in evaluation.warnings {
                warn!(plugin = %found.name, kind = %warning.kind, "{}", warning.message);
                sink.warn(warning);
            }
            debug!(
                plugin = %found.name,
                target_kind = %ctx.target_kind,
                reasons = ?evaluation.reasons,
                "decided to {}",
                evaluation.decision
            );

            report.decisions.push(PluginDecision {
                name: found.name,
                decision: evaluation.decision,
            });
        }

        emit(&report.decisions, target);
        apply_target_lists(
            ctx,
            &self.options.non_editor_disabled,
            &self.options.editor_enabled,
            target,
        );
        report
    }

    fn first_time(&self, announcement: Announcement) -> bool {
        self.announced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(announcement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::CountingSource;
    use crate::emitter::BuildTarget;
    use featuregate_core::TargetKind;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tracing_test::traced_test;

    fn write(dir: &std::path::Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    const CLEAN: &str = r#"{"EnabledByDefault": false, "ExplicitlyLoaded": true}"#;

    #[test]
    #[traced_test]
    fn parse_failure_is_logged_with_plugin_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Broken/Broken.uplugin", "{ not json");
        let session = ResolutionSession::new(SessionOptions::new(vec![dir.path().to_path_buf()]));

        let mut target = BuildTarget::new();
        let mut warnings: Vec<PluginWarning> = Vec::new();
        let report = session.evaluate(
            &TargetContext::new(TargetKind::Game, "dev"),
            &mut target,
            &mut warnings,
        );

        assert_eq!(report.decision_for("Broken"), Some(Decision::ForceDisabled));
        assert_eq!(target.disable_plugins, vec!["Broken"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ParseFailure);
        assert!(logs_contain("Broken"));
        assert!(logs_contain("failed to parse descriptor"));
    }

    #[test]
    #[traced_test]
    fn branch_is_announced_once_per_branch() {
        let dir = tempfile::tempdir().unwrap();
        let session = ResolutionSession::new(SessionOptions::new(vec![dir.path().to_path_buf()]));
        let mut sink: Vec<PluginWarning> = Vec::new();
        for kind in [TargetKind::Game, TargetKind::Server] {
            session.evaluate(&TargetContext::new(kind, "dev"), &mut BuildTarget::new(), &mut sink);
        }
        session.evaluate(
            &TargetContext::new(TargetKind::Game, "release"),
            &mut BuildTarget::new(),
            &mut sink,
        );

        logs_assert(|lines: &[&str]| {
            let dev = lines
                .iter()
                .filter(|l| l.contains("compiling feature plugins in branch dev"))
                .count();
            let release = lines
                .iter()
                .filter(|l| l.contains("compiling feature plugins in branch release"))
                .count();
            if dev == 1 && release == 1 {
                Ok(())
            } else {
                Err(format!("expected one announcement each, got dev={dev} release={release}"))
            }
        });
    }

    #[test]
    fn shared_environment_skips_non_editor_and_warns_once() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Foo/Foo.uplugin", CLEAN);
        let options = SessionOptions::new(vec![dir.path().to_path_buf()])
            .with_target_lists(vec!["OpenImageDenoise".into()], vec!["RemoteSession".into()]);
        let session = ResolutionSession::new(options);
        let mut warnings: Vec<PluginWarning> = Vec::new();

        for kind in [TargetKind::Game, TargetKind::Server] {
            let ctx = TargetContext::new(kind, "dev")
                .with_build_all(true)
                .with_environment(BuildEnvironment::Shared);
            let mut target = BuildTarget::new();
            let report = session.evaluate(&ctx, &mut target, &mut warnings);
            assert!(report.skipped);
            assert!(report.decisions.is_empty());
            assert_eq!(target, BuildTarget::new());
        }
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::SharedEnvironment);

        let editor = TargetContext::new(TargetKind::Editor, "dev")
            .with_build_all(true)
            .with_environment(BuildEnvironment::Shared);
        let mut target = BuildTarget::new();
        let report = session.evaluate(&editor, &mut target, &mut warnings);
        assert!(!report.skipped);
        assert_eq!(target.enable_plugins, vec!["Foo", "RemoteSession"]);
    }

    #[test]
    fn duplicate_names_get_one_decision() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a");
        let second = dir.path().join("b");
        write(&first, "Foo/Foo.uplugin", CLEAN);
        write(&second, "Foo/Foo.uplugin", r#"{"NeverBuild": true}"#);
        let session = ResolutionSession::new(SessionOptions::new(vec![first, second]));

        let mut warnings: Vec<PluginWarning> = Vec::new();
        let report = session.evaluate(
            &TargetContext::new(TargetKind::Game, "dev").with_build_all(true),
            &mut BuildTarget::new(),
            &mut warnings,
        );

        assert_eq!(report.decisions.len(), 1);
        assert_eq!(report.decision_for("Foo"), Some(Decision::Enabled));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DuplicateDescriptor);
    }

    #[test]
    fn repeated_passes_read_each_descriptor_once() {
        let dir = tempfile::tempdir().unwrap();
        let foo = write(dir.path(), "Foo/Foo.uplugin", "");
        let bar = write(dir.path(), "Bar/Bar.uplugin", "");

        // Discovery sees the real files; content comes from the counting source.
        let mut source = CountingSource::default();
        source.files.insert(foo, CLEAN.to_string());
        source.files.insert(
            bar,
            r#"{"EnabledByDefault": false, "ExplicitlyLoaded": true, "Plugins": [{"Name": "Foo", "Enabled": true}]}"#
                .to_string(),
        );
        let reads = Arc::clone(&source.reads);
        let options = SessionOptions::new(vec![dir.path().to_path_buf()]);
        let session = ResolutionSession::with_source(options, source);

        for kind in TargetKind::ALL {
            session.evaluate(
                &TargetContext::new(kind, "dev"),
                &mut BuildTarget::new(),
                &mut Vec::<PluginWarning>::new(),
            );
        }

        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(session.cache().len(), 2);
        let graph = session.reference_graph();
        assert!(graph.contains_edge("Bar", "Foo"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn unreadable_descriptor_contributes_no_edges() {
        let dir = tempfile::tempdir().unwrap();
        let linked = r#"{"EnabledByDefault": false, "ExplicitlyLoaded": true, "Plugins": [{"Name": "Core", "Enabled": true}]}"#;
        write(dir.path(), "Lost/Lost.uplugin", linked);
        let kept = write(dir.path(), "Kept/Kept.uplugin", linked);

        // Only Kept is readable through the source; Lost fails to resolve.
        let mut source = CountingSource::default();
        source.files.insert(kept, linked.to_string());
        let options = SessionOptions::new(vec![dir.path().to_path_buf()]);
        let session = ResolutionSession::with_source(options, source);

        let mut warnings: Vec<PluginWarning> = Vec::new();
        let report = session.evaluate(
            &TargetContext::new(TargetKind::Game, "dev").with_build_all(true),
            &mut BuildTarget::new(),
            &mut warnings,
        );

        assert_eq!(report.decision_for("Lost"), Some(Decision::ForceDisabled));
        assert_eq!(report.decision_for("Kept"), Some(Decision::Enabled));
        let graph = session.reference_graph();
        assert!(graph.references_of("Lost").is_empty());
        assert!(graph.contains_edge("Kept", "Core"));
        assert_eq!(graph.referencers_of("Core"), vec!["Kept"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].plugin.as_deref(), Some("Lost"));
    }

    #[test]
    fn missing_roots_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Foo/Foo.uplugin", CLEAN);
        let missing = dir.path().join("nope");
        let session = ResolutionSession::new(SessionOptions::new(vec![
            missing.clone(),
            dir.path().to_path_buf(),
        ]));

        let mut warnings: Vec<PluginWarning> = Vec::new();
        let report = session.evaluate(
            &TargetContext::new(TargetKind::Game, "dev"),
            &mut BuildTarget::new(),
            &mut warnings,
        );
        assert_eq!(report.missing_roots, vec![missing]);
        assert_eq!(report.decision_for("Foo"), Some(Decision::Ignored));
        assert!(warnings.is_empty());
    }

    #[test]
    fn target_lists_respect_force_disable() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "RemoteSession/RemoteSession.uplugin", r#"{"NeverBuild": true}"#);
        let options = SessionOptions::new(vec![dir.path().to_path_buf()])
            .with_target_lists(Vec::new(), vec!["RemoteSession".into()]);
        let session = ResolutionSession::new(options);

        let mut target = BuildTarget::new();
        session.evaluate(
            &TargetContext::new(TargetKind::Editor, "dev"),
            &mut target,
            &mut Vec::<PluginWarning>::new(),
        );
        assert!(target.enable_plugins.is_empty());
        assert_eq!(target.disable_plugins, vec!["RemoteSession"]);
    }
}
