// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse-once descriptor cache keyed by plugin name.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::descriptor::{ParseFailure, PluginDescriptor, parse_descriptor};
use crate::store::{DescriptorSource, FsSource};

/// Memoizes parsed descriptors for the lifetime of one session.
///
/// The name is the key: once a name resolves successfully, later calls
/// return the same `Arc` without reading storage, whatever path they pass.
/// Failures are not stored.
pub struct DescriptorCache {
    source: Box<dyn DescriptorSource>,
    entries: Mutex<HashMap<String, Arc<PluginDescriptor>>>,
}

impl DescriptorCache {
    pub fn new(source: impl DescriptorSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the descriptor for `name`, reading and parsing `path` on first use.
    ///
    /// Check, parse and insert happen under one lock.
    pub fn resolve(&self, name: &str, path: &Path) -> Result<Arc<PluginDescriptor>, ParseFailure> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(descriptor) = entries.get(name) {
            return Ok(Arc::clone(descriptor));
        }

        let content = self
            .source
            .read(path)
            .map_err(|e| ParseFailure::new(name, format!("{}: {e}", path.display())))?;
        let descriptor = Arc::new(parse_descriptor(name, &content)?);
        debug!(plugin = %name, path = %path.display(), "descriptor parsed and cached");
        entries.insert(name.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Cached descriptor for `name`, if it has been resolved.
    pub fn get(&self, name: &str) -> Option<Arc<PluginDescriptor>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new(FsSource)
    }
}

impl std::fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("entries", &self.len())
            .finish()
    }
}
