//! Manifest file detection and parsing
//!
//! This module provides functionality to:
//! - Recognize package.json, requirements.txt and pubspec.yaml content
//! - Parse declared dependencies in document order
//! - Merge regular and development dependencies for registry lookups

mod detector;
mod package_json;
mod pubspec_yaml;
mod requirements_txt;

pub use detector::detect_file_type;
pub use package_json::PackageJsonParser;
pub use pubspec_yaml::PubspecParser;
pub use requirements_txt::RequirementsParser;

use crate::domain::{DependencyMap, FileKind, PackageManager, ParsedManifest};
use crate::error::ParseError;

/// Trait for parsing manifest files
pub trait ManifestParser: Send + Sync {
    /// Returns the manifest kind this parser handles
    fn file_kind(&self) -> FileKind;

    /// Returns the package manager for parsed manifests
    fn package_manager(&self) -> PackageManager {
        self.file_kind().package_manager()
    }

    /// Returns true if this parser recognizes the content
    ///
    /// A matching file name takes priority over content heuristics.
    fn can_parse(&self, content: &str, file_name: Option<&str>) -> bool;

    /// Parse dependencies from manifest content
    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError>;
}

/// Returns all parsers in detection priority order
pub fn parsers() -> [Box<dyn ManifestParser>; 3] {
    [
        Box::new(PackageJsonParser),
        Box::new(RequirementsParser),
        Box::new(PubspecParser),
    ]
}

/// Get the manifest parser for the specified file kind
pub fn parser_for(kind: FileKind) -> Box<dyn ManifestParser> {
    match kind {
        FileKind::PackageJson => Box::new(PackageJsonParser),
        FileKind::RequirementsTxt => Box::new(RequirementsParser),
        FileKind::PubspecYaml => Box::new(PubspecParser),
    }
}

/// Merges dependencies and dev dependencies into one lookup map
///
/// A dev entry sharing a name with a regular dependency overrides its
/// version but keeps the regular entry's position.
pub fn get_all_dependencies(manifest: &ParsedManifest) -> DependencyMap {
    let mut all = manifest.dependencies.clone();
    if let Some(dev) = &manifest.dev_dependencies {
        for (name, version) in dev {
            all.insert(name.clone(), version.clone());
        }
    }
    all
}
