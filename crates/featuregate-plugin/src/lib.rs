// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature plugin resolution for featuregate.
//!
//! Discovers plugin descriptor files, parses each one at most once per
//! session, decides per build target whether the plugin is enabled,
//! force-disabled or left alone, and records the references plugins declare
//! on each other.
//!
//! # Usage
//!
//! ```no_run
//! use featuregate_core::{TargetContext, TargetKind};
//! use featuregate_plugin::{BuildTarget, PluginWarning, ResolutionSession, SessionOptions};
//!
//! let session = ResolutionSession::new(SessionOptions::new(vec!["Plugins/GameFeatures".into()]));
//! let mut target = BuildTarget::new();
//! let mut warnings: Vec<PluginWarning> = Vec::new();
//! let report = session.evaluate(
//!     &TargetContext::new(TargetKind::Game, "main"),
//!     &mut target,
//!     &mut warnings,
//! );
//! println!("{} plugins evaluated", report.decisions.len());
//! ```

pub mod cache;
pub mod descriptor;
pub mod emitter;
pub mod evaluator;
pub mod references;
pub mod session;
pub mod store;
pub mod warning;

pub use cache::DescriptorCache;
pub use descriptor::{ParseFailure, PluginDescriptor, PluginReference, parse_descriptor};
pub use emitter::{BuildTarget, PluginDecision, PluginTarget, apply_target_lists, emit};
pub use evaluator::{DisableReason, Evaluation, evaluate};
pub use references::{ReferenceGraph, ReferenceTracker};
pub use session::{PassReport, ResolutionSession, SessionOptions};
pub use store::{
    DescriptorSource, DiscoveredDescriptor, Discovery, FsSource, discover, extension_dirs,
};
pub use warning::{PluginWarning, WarningKind, WarningSink};
