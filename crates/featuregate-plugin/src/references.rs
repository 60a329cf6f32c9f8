// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records which feature plugins reference which other plugins.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::descriptor::PluginDescriptor;

/// Thread-safe accumulator of plugin reference edges.
///
/// Edges are recorded the first time a referencer is seen; later records of
/// the same plugin are no-ops, so repeated passes never duplicate edges.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    edges: Mutex<HashMap<String, Vec<String>>>,
}

impl ReferenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the enabled references of `descriptor`. Returns `true` if this
    /// was the first time the referencer was recorded.
    pub fn record(&self, descriptor: &PluginDescriptor) -> bool {
        let mut edges = self.edges.lock().unwrap_or_else(PoisonError::into_inner);
        if edges.contains_key(&descriptor.name) {
            return false;
        }
        let targets = descriptor
            .enabled_references()
            .map(str::to_string)
            .collect();
        edges.insert(descriptor.name.clone(), targets);
        true
    }

    /// Immutable, ordered copy of the current edges.
    pub fn snapshot(&self) -> ReferenceGraph {
        let edges = self.edges.lock().unwrap_or_else(PoisonError::into_inner);
        ReferenceGraph {
            edges: edges
                .iter()
                .filter(|(_, targets)| !targets.is_empty())
                .map(|(from, targets)| (from.clone(), targets.clone()))
                .collect(),
        }
    }
}

/// Referencer -> referenced plugin names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl ReferenceGraph {
    pub fn references_of(&self, plugin: &str) -> &[String] {
        self.edges.get(plugin).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn referencers_of(&self, plugin: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, targets)| targets.iter().any(|t| t == plugin))
            .map(|(from, _)| from.as_str())
            .collect()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.references_of(from).iter().any(|t| t == to)
    }

    /// Every `(referencer, referenced)` pair, ordered by referencer.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |t| (from.as_str(), t.as_str())))
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
