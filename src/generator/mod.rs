//! Manifest regeneration
//!
//! This module provides:
//! - One update strategy per manifest kind
//! - Format detection (line endings, JSON indentation)
//! - A best-effort entry point that never fails its caller
//! - Reading and writing manifest files

mod format;
mod npm;
mod pip;
mod pubspec;
mod writer;

pub use format::{detect_indentation, detect_line_ending};
pub use npm::NpmStrategy;
pub use pip::PipStrategy;
pub use pubspec::PubStrategy;
pub use writer::{read_manifest, write_manifest};

use crate::domain::{FileKind, PackageInfo, PackageStatus};
use crate::error::GenerateError;
use crate::manifest::detect_file_type;
use crate::update::{should_update_version, UpdateOptions};
use tracing::{debug, warn};

/// Trait for rewriting versions in a manifest
pub trait UpdateStrategy: Send + Sync {
    /// Returns the manifest kind this strategy rewrites
    fn file_kind(&self) -> FileKind;

    /// Applies the selected updates to `original`
    fn generate(
        &self,
        original: &str,
        packages: &[PackageInfo],
        options: &UpdateOptions,
    ) -> Result<String, GenerateError>;
}

/// Get the update strategy for the specified file kind
pub fn strategy_for(kind: FileKind) -> Box<dyn UpdateStrategy> {
    match kind {
        FileKind::PackageJson => Box::new(NpmStrategy),
        FileKind::RequirementsTxt => Box::new(PipStrategy),
        FileKind::PubspecYaml => Box::new(PubStrategy),
    }
}

/// Packages that are outdated and whose change type `options` enables
pub fn packages_to_update<'a>(
    packages: &'a [PackageInfo],
    options: &'a UpdateOptions,
) -> impl Iterator<Item = &'a PackageInfo> + 'a {
    packages.iter().filter(move |p| {
        p.status == PackageStatus::Outdated
            && !p.latest_version.is_empty()
            && should_update_version(&p.current_version, &p.latest_version, options)
    })
}

/// Regenerates a manifest, reporting failures
pub fn try_generate_updated_manifest(
    original: &str,
    packages: &[PackageInfo],
    options: &UpdateOptions,
    file_name: Option<&str>,
) -> Result<String, GenerateError> {
    let detected = detect_file_type(original, file_name)?;
    debug!(
        kind = %detected.kind,
        packages = packages.len(),
        "Generating updated manifest"
    );
    strategy_for(detected.kind).generate(original, packages, options)
}

/// Regenerates a manifest, falling back to the original content on failure
///
/// Whether anything changed is observable by comparing the result with
/// `original`.
pub fn generate_updated_manifest(
    original: &str,
    packages: &[PackageInfo],
    options: &UpdateOptions,
    file_name: Option<&str>,
) -> String {
    match try_generate_updated_manifest(original, packages, options, file_name) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to generate updated manifest; keeping original");
            original.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageManager;

    fn info(name: &str, current: &str, latest: &str, status: PackageStatus) -> PackageInfo {
        PackageInfo::new(name, current, latest, status, PackageManager::Npm)
    }

    #[test]
    fn test_strategy_for_kind() {
        for kind in FileKind::all() {
            assert_eq!(strategy_for(*kind).file_kind(), *kind);
        }
    }

    #[test]
    fn test_packages_to_update_filters() {
        let packages = vec![
            info("a", "1.0.0", "1.0.1", PackageStatus::Outdated),
            info("b", "1.0.0", "2.0.0", PackageStatus::Outdated),
            info("c", "1.0.0", "1.0.0", PackageStatus::UpToDate),
            info("d", "1.0.0", "", PackageStatus::Outdated),
            info("e", "1.0.0", "unknown", PackageStatus::Error),
        ];
        let options = UpdateOptions::default();
        let names: Vec<_> = packages_to_update(&packages, &options)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_generate_package_json() {
        let original = "{\n  \"dependencies\": {\n    \"lodash\": \"4.17.20\"\n  }\n}\n";
        let packages = vec![info("lodash", "4.17.20", "4.17.21", PackageStatus::Outdated)];
        let result = generate_updated_manifest(
            original,
            &packages,
            &UpdateOptions::none().with_patch(true),
            Some("package.json"),
        );
        assert!(result.contains("\"lodash\": \"4.17.21\""));
    }

    #[test]
    fn test_generate_detects_without_file_name() {
        let original = "name: app\ndependencies:\n  http: ^0.13.5\n";
        let packages = vec![info("http", "^0.13.5", "0.13.6", PackageStatus::Outdated)];
        let result =
            generate_updated_manifest(original, &packages, &UpdateOptions::default(), None);
        assert_eq!(result, "name: app\ndependencies:\n  http: ^0.13.6\n");
    }

    #[test]
    fn test_all_flags_false_round_trip() {
        let manifests = [
            ("{\n    \"dependencies\": {\"a\": \"^1.0.0\"}\n}", "package.json"),
            ("Django==4.1.0\n# comment\n-e .\n", "requirements.txt"),
            ("name: app\ndependencies:\n  http: ^0.13.5\n", "pubspec.yaml"),
        ];
        let packages = vec![
            info("a", "^1.0.0", "2.1.3", PackageStatus::Outdated),
            info("Django", "4.1.0", "4.2.7", PackageStatus::Outdated),
            info("http", "^0.13.5", "0.13.6", PackageStatus::Outdated),
        ];
        for (original, name) in manifests {
            let result =
                generate_updated_manifest(original, &packages, &UpdateOptions::none(), Some(name));
            assert_eq!(result, original, "round trip failed for {}", name);
        }
    }

    #[test]
    fn test_failure_returns_original() {
        let original = "{ this is not json";
        let packages = vec![info("a", "1.0.0", "1.0.1", PackageStatus::Outdated)];

        let err = try_generate_updated_manifest(
            original,
            &packages,
            &UpdateOptions::all(),
            Some("package.json"),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));

        let result = generate_updated_manifest(
            original,
            &packages,
            &UpdateOptions::all(),
            Some("package.json"),
        );
        assert_eq!(result, original);
    }

    #[test]
    fn test_undetectable_content_returns_original() {
        let original = "just prose";
        let result = generate_updated_manifest(original, &[], &UpdateOptions::all(), None);
        assert_eq!(result, original);
    }
}
