//! Parsed manifest structure

use super::{FileKind, PackageManager};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered map of package name to declared version specification
pub type DependencyMap = IndexMap<String, String>;

/// Dependencies extracted from a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedManifest {
    /// Kind of manifest the content was parsed as
    pub kind: FileKind,
    /// Regular dependencies in document order
    pub dependencies: DependencyMap,
    /// Development dependencies, absent when the manifest declares none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<DependencyMap>,
    /// Package manager that resolves these dependencies
    pub package_manager: PackageManager,
}

impl ParsedManifest {
    /// Creates a manifest, dropping the dev map if it is empty
    pub fn new(kind: FileKind, dependencies: DependencyMap, dev_dependencies: DependencyMap) -> Self {
        Self {
            kind,
            dependencies,
            dev_dependencies: if dev_dependencies.is_empty() {
                None
            } else {
                Some(dev_dependencies)
            },
            package_manager: kind.package_manager(),
        }
    }

    /// Total number of declared entries across both maps
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.as_ref().map_or(0, |d| d.len())
    }

    /// Returns true if the manifest declares no dependencies at all
    pub fn is_empty(&self) -> bool {
        self.dependency_count() == 0
    }
}
