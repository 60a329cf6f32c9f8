// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for featuregate.
//!
//! Holds the error type and the small set of types shared by the
//! configuration layer, the plugin resolution engine and the CLI.

pub mod error;
pub mod types;

pub use error::FeatureGateError;
pub use types::{BuildEnvironment, Decision, TargetContext, TargetKind};
