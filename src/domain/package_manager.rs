//! Package manager and manifest file kind definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm / yarn / pnpm (package.json)
    Npm,
    /// pip (requirements.txt)
    Pip,
    /// Dart / Flutter pub (pubspec.yaml)
    Pub,
}

impl PackageManager {
    /// Returns the manifest file kind handled by this package manager
    pub fn file_kind(&self) -> FileKind {
        match self {
            PackageManager::Npm => FileKind::PackageJson,
            PackageManager::Pip => FileKind::RequirementsTxt,
            PackageManager::Pub => FileKind::PubspecYaml,
        }
    }

    /// Returns the name of the registry queried for this package manager
    pub fn registry_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pip => "PyPI",
            PackageManager::Pub => "pub.dev",
        }
    }

    /// Returns the short identifier used in cache keys and output
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pip => "pip",
            PackageManager::Pub => "pub",
        }
    }

    /// Returns the public registry page for a package
    pub fn package_url(&self, name: &str) -> String {
        match self {
            PackageManager::Npm => format!("https://www.npmjs.com/package/{}", name),
            PackageManager::Pip => format!("https://pypi.org/project/{}/", name),
            PackageManager::Pub => format!("https://pub.dev/packages/{}", name),
        }
    }

    /// Returns all supported package managers
    pub fn all() -> &'static [PackageManager] {
        &[PackageManager::Npm, PackageManager::Pip, PackageManager::Pub]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Manifest file kinds that can be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// package.json
    #[serde(rename = "package.json")]
    PackageJson,
    /// requirements.txt
    #[serde(rename = "requirements.txt")]
    RequirementsTxt,
    /// pubspec.yaml
    #[serde(rename = "pubspec.yaml")]
    PubspecYaml,
}

impl FileKind {
    /// Returns the canonical file name
    pub fn file_name(&self) -> &'static str {
        match self {
            FileKind::PackageJson => "package.json",
            FileKind::RequirementsTxt => "requirements.txt",
            FileKind::PubspecYaml => "pubspec.yaml",
        }
    }

    /// Returns the package manager for this file kind
    pub fn package_manager(&self) -> PackageManager {
        match self {
            FileKind::PackageJson => PackageManager::Npm,
            FileKind::RequirementsTxt => PackageManager::Pip,
            FileKind::PubspecYaml => PackageManager::Pub,
        }
    }

    /// Returns all supported file kinds in detection order
    pub fn all() -> &'static [FileKind] {
        &[
            FileKind::PackageJson,
            FileKind::RequirementsTxt,
            FileKind::PubspecYaml,
        ]
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_round_trip_through_manager() {
        for kind in FileKind::all() {
            assert_eq!(kind.package_manager().file_kind(), *kind);
        }
    }

    #[test]
    fn test_registry_names() {
        assert_eq!(PackageManager::Npm.registry_name(), "npm");
        assert_eq!(PackageManager::Pip.registry_name(), "PyPI");
        assert_eq!(PackageManager::Pub.registry_name(), "pub.dev");
    }

    #[test]
    fn test_package_urls() {
        assert_eq!(
            PackageManager::Npm.package_url("react"),
            "https://www.npmjs.com/package/react"
        );
        assert_eq!(
            PackageManager::Pip.package_url("django"),
            "https://pypi.org/project/django/"
        );
        assert_eq!(
            PackageManager::Pub.package_url("http"),
            "https://pub.dev/packages/http"
        );
    }

    #[test]
    fn test_serde_serialization() {
        assert_eq!(
            serde_json::to_string(&PackageManager::Pip).unwrap(),
            "\"pip\""
        );
        assert_eq!(
            serde_json::to_string(&FileKind::PubspecYaml).unwrap(),
            "\"pubspec.yaml\""
        );
        let manager: PackageManager = serde_json::from_str("\"pub\"").unwrap();
        assert_eq!(manager, PackageManager::Pub);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PackageManager::Npm), "npm");
        assert_eq!(format!("{}", FileKind::RequirementsTxt), "requirements.txt");
    }
}
