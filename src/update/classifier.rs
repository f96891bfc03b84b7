//! Version comparison and change-type classification
//!
//! Two related but distinct judgments live here:
//! - [`compare_versions`] decides the top-level package status
//! - [`get_change_type`] decides how large an upgrade is, which drives
//!   [`should_update_version`]

use super::version::{clean_version, coerce_version};
use super::UpdateOptions;
use crate::domain::{PackageStatus, UNKNOWN_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag meaning "whatever the registry considers newest"
const LATEST_TAG: &str = "latest";

/// Size of the step between two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Major,
    Minor,
    Patch,
    /// Versions are identical after coercion
    None,
    /// At least one side could not be coerced
    Error,
}

impl ChangeType {
    /// Returns the label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Major => "major",
            ChangeType::Minor => "minor",
            ChangeType::Patch => "patch",
            ChangeType::None => "none",
            ChangeType::Error => "error",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies the change from `current` to `latest`
pub fn get_change_type(current: &str, latest: &str) -> ChangeType {
    let (Some(current), Some(latest)) = (
        coerce_version(&clean_version(current)),
        coerce_version(&clean_version(latest)),
    ) else {
        return ChangeType::Error;
    };

    // Coerced versions never carry pre-release tags, so the diff is purely
    // positional.
    if current.major != latest.major {
        ChangeType::Major
    } else if current.minor != latest.minor {
        ChangeType::Minor
    } else if current.patch != latest.patch {
        ChangeType::Patch
    } else {
        ChangeType::None
    }
}

/// Determines the package status for a declared version and the registry's latest
pub fn compare_versions(current: &str, latest: &str) -> PackageStatus {
    if current == UNKNOWN_VERSION || latest == UNKNOWN_VERSION {
        return PackageStatus::Error;
    }
    if current == LATEST_TAG || latest == LATEST_TAG {
        return PackageStatus::UpToDate;
    }

    let clean_current = clean_version(current);
    let clean_latest = clean_version(latest);

    if matches!(clean_current.as_str(), "any" | "*" | "x") {
        return PackageStatus::UpToDate;
    }
    if clean_current == clean_latest {
        return PackageStatus::UpToDate;
    }

    match (coerce_version(&clean_current), coerce_version(&clean_latest)) {
        (Some(c), Some(l)) if c < l => PackageStatus::Outdated,
        (Some(_), Some(_)) => PackageStatus::UpToDate,
        _ => PackageStatus::Error,
    }
}

/// Returns true if the change from `current` to `latest` is enabled by `options`
pub fn should_update_version(current: &str, latest: &str, options: &UpdateOptions) -> bool {
    match get_change_type(current, latest) {
        ChangeType::Major => options.update_major,
        ChangeType::Minor => options.update_minor,
        ChangeType::Patch => options.update_patch,
        ChangeType::None | ChangeType::Error => false,
    }
}
