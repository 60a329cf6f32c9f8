// SPDX-FileCopyrightText: 2026 featuregate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptor discovery and loading.
//!
//! Roots are walked recursively in lexical order. A directory that holds a
//! descriptor is a plugin directory: descriptors nested further below it
//! (content, test fixtures) are not plugins of their own.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;
use tracing::debug;

/// Reads raw descriptor documents.
pub trait DescriptorSource: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads descriptors from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl DescriptorSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// A descriptor file found under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDescriptor {
    /// Plugin name (file stem).
    pub name: String,
    pub path: PathBuf,
}

/// Result of walking a set of roots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Descriptors in discovery order: roots in the order given, lexical within a root.
    pub descriptors: Vec<DiscoveredDescriptor>,
    /// Roots that do not exist or are not directories.
    pub missing_roots: Vec<PathBuf>,
}

/// Descriptor roots for a project: `<project>/<sub>`, then
/// `<project>/Platforms/<P>/<sub>` and `<project>/Restricted/<R>/<sub>` for
/// every platform and restricted directory present, each group in lexical order.
pub fn extension_dirs(project_dir: &Path, subdirectory: &str) -> Vec<PathBuf> {
    let mut dirs = vec![project_dir.join(subdirectory)];
    for group in ["Platforms", "Restricted"] {
        let mut children: Vec<PathBuf> = match fs::read_dir(project_dir.join(group)) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
                .map(|e| e.path())
                .collect(),
            Err(_) => Vec::new(),
        };
        children.sort();
        dirs.extend(children.into_iter().map(|c| c.join(subdirectory)));
    }
    dirs
}

/// Walk `roots` and collect every file with the given extension.
///
/// The extension comparison ignores ASCII case. Missing roots are recorded
/// and skipped; unreadable entries below a root are skipped.
pub fn discover(roots: &[PathBuf], extension: &str) -> Discovery {
    let mut discovery = Discovery::default();
    for root in roots {
        if !root.is_dir() {
            debug!(root = %root.display(), "descriptor root missing, skipping");
            discovery.missing_roots.push(root.clone());
            continue;
        }
        discovery.descriptors.extend(discover_root(root, extension));
    }
    discovery
}

fn discover_root(root: &Path, extension: &str) -> Vec<DiscoveredDescriptor> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut found = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            debug!(path = %path.display(), "descriptor name is not valid UTF-8, skipping");
            continue;
        };
        found.push(DiscoveredDescriptor {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    drop_nested(root, found)
}

/// Remove descriptors that sit below another plugin's directory.
fn drop_nested(root: &Path, found: Vec<DiscoveredDescriptor>) -> Vec<DiscoveredDescriptor> {
    let plugin_dirs: HashSet<PathBuf> = found
        .iter()
        .filter_map(|d| d.path.parent().map(Path::to_path_buf))
        .collect();

    found
        .into_iter()
        .filter(|d| {
            let Some(parent) = d.path.parent() else {
                return true;
            };
            let nested = parent
                .ancestors()
                .skip(1)
                .take_while(|dir| dir.starts_with(root))
                .any(|dir| plugin_dirs.contains(dir));
            if nested {
                debug!(path = %d.path.display(), "descriptor nested inside another plugin, skipping");
            }
            !nested
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    fn names(discovery: &Discovery) -> Vec<&str> {
        discovery
            .descriptors
            .iter()
            .map(|d| d.name.as_str())
            .collect()
    }

    #[test]
    fn discovers_recursively_in_lexical_order() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("Zeta/Zeta.uplugin"));
        touch(&root.join("Alpha/Alpha.uplugin"));
        touch(&root.join("Group/Mid/Mid.uplugin"));
        touch(&root.join("Alpha/readme.txt"));

        let discovery = discover(&[root.to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Alpha", "Mid", "Zeta"]);
        assert!(discovery.missing_roots.is_empty());
    }

    #[test]
    fn extension_match_ignores_case() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("Loud/Loud.UPLUGIN"));

        let discovery = discover(&[tmp.path().to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Loud"]);
    }

    #[test]
    fn missing_root_yields_nothing_and_is_recorded() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("Real/Real.uplugin"));
        let missing = tmp.path().join("does-not-exist");

        let discovery = discover(&[missing.clone(), tmp.path().to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Real"]);
        assert_eq!(discovery.missing_roots, vec![missing]);
    }

    #[test]
    fn roots_keep_given_order() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        touch(&a.path().join("Zed/Zed.uplugin"));
        touch(&b.path().join("Abe/Abe.uplugin"));

        let discovery = discover(&[a.path().to_path_buf(), b.path().to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Zed", "Abe"]);
    }

    #[test]
    fn nested_descriptors_inside_a_plugin_are_skipped() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("Outer/Outer.uplugin"));
        touch(&tmp.path().join("Outer/Content/Inner/Inner.uplugin"));
        touch(&tmp.path().join("Sibling/Sibling.uplugin"));

        let discovery = discover(&[tmp.path().to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Outer", "Sibling"]);
    }

    #[test]
    fn hidden_directories_are_walked() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join(".staging/Hidden/Hidden.uplugin"));

        let discovery = discover(&[tmp.path().to_path_buf()], "uplugin");
        assert_eq!(names(&discovery), vec!["Hidden"]);
    }

    #[test]
    fn extension_dirs_include_platforms_and_restricted() {
        let tmp = tempdir().unwrap();
        let project = tmp.path();
        fs::create_dir_all(project.join("Platforms/Linux")).unwrap();
        fs::create_dir_all(project.join("Platforms/Android")).unwrap();
        fs::create_dir_all(project.join("Restricted/NotForLicensees")).unwrap();
        fs::write(project.join("Platforms/notes.txt"), "").unwrap();

        let dirs = extension_dirs(project, "Plugins/GameFeatures");
        assert_eq!(
            dirs,
            vec![
                project.join("Plugins/GameFeatures"),
                project.join("Platforms/Android/Plugins/GameFeatures"),
                project.join("Platforms/Linux/Plugins/GameFeatures"),
                project.join("Restricted/NotForLicensees/Plugins/GameFeatures"),
            ]
        );
    }

    #[test]
    fn extension_dirs_without_platforms() {
        let tmp = tempdir().unwrap();
        let dirs = extension_dirs(tmp.path(), "Plugins/GameFeatures");
        assert_eq!(dirs, vec![tmp.path().join("Plugins/GameFeatures")]);
    }
}
