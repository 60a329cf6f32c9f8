// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for featuregate.

use thiserror::Error;

/// The primary error type used across the featuregate crates.
///
/// Plugin-level problems (unreadable or malformed descriptors, policy
/// violations) are not errors at this level: they are reported as warnings
/// and resolved to a decision. This type covers the failures that stop a
/// command from producing output at all.
#[derive(Debug, Error)]
pub enum FeatureGateError {
    /// Configuration errors (invalid TOML, bad values, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
