//! Package lookup and analysis records

use super::PackageManager;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder version used when the registry could not provide one
pub const UNKNOWN_VERSION: &str = "unknown";

/// A single registry lookup request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageQuery {
    /// Package name as declared in the manifest
    pub name: String,
    /// Registry to query
    pub manager: PackageManager,
}

impl PackageQuery {
    /// Creates a new query
    pub fn new(name: impl Into<String>, manager: PackageManager) -> Self {
        Self {
            name: name.into(),
            manager,
        }
    }
}

/// Latest-version metadata returned by a registry lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersionInfo {
    /// Package name
    pub name: String,
    /// Latest published version, `unknown` on failure
    pub latest_version: String,
    /// Short description from the registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Homepage or repository URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Failure message if the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PackageVersionInfo {
    /// Creates a successful lookup result
    pub fn found(name: impl Into<String>, latest_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest_version: latest_version.into(),
            description: None,
            homepage: None,
            error: None,
        }
    }

    /// Creates a failed lookup result
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest_version: UNKNOWN_VERSION.to_string(),
            description: None,
            homepage: None,
            error: Some(error.into()),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the homepage
    pub fn with_homepage(mut self, homepage: Option<String>) -> Self {
        self.homepage = homepage;
        self
    }

    /// Returns true if the lookup failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of comparing a declared version against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageStatus {
    /// Declared version is the latest (or cannot be outdated)
    UpToDate,
    /// A newer version is available
    Outdated,
    /// Lookup or comparison failed
    Error,
}

impl PackageStatus {
    /// Returns the serialized label
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::UpToDate => "up-to-date",
            PackageStatus::Outdated => "outdated",
            PackageStatus::Error => "error",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final per-dependency analysis record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    /// Package name
    pub name: String,
    /// Version specification declared in the manifest
    pub current_version: String,
    /// Latest version reported by the registry
    pub latest_version: String,
    /// Comparison outcome
    pub status: PackageStatus,
    /// Package manager the package belongs to
    pub package_manager: PackageManager,
    /// Registry description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Homepage or repository URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Failure message, present exactly when `status` is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PackageInfo {
    /// Creates a record with the given status and no metadata
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
        status: PackageStatus,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            latest_version: latest_version.into(),
            status,
            package_manager,
            description: None,
            homepage: None,
            error: None,
        }
    }

    /// Creates an error record
    pub fn error(
        name: impl Into<String>,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
        package_manager: PackageManager,
        message: impl Into<String>,
    ) -> Self {
        let mut info = Self::new(
            name,
            current_version,
            latest_version,
            PackageStatus::Error,
            package_manager,
        );
        info.error = Some(message.into());
        info
    }

    /// Returns true if a newer version is available
    pub fn is_outdated(&self) -> bool {
        self.status == PackageStatus::Outdated
    }

    /// Returns the public registry page for this package
    pub fn registry_url(&self) -> String {
        self.package_manager.package_url(&self.name)
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} -> {} [{}]",
            self.name, self.current_version, self.latest_version, self.status
        )
    }
}
