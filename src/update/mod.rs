//! Version classification and update selection
//!
//! This module provides:
//! - Version string cleaning and semantic-version coercion
//! - Package status comparison and change-type classification
//! - Update options selecting which change types to apply
//! - Statistics over the outdated packages of an analysis

mod classifier;
mod options;
mod version;

pub use classifier::{compare_versions, get_change_type, should_update_version, ChangeType};
pub use options::UpdateOptions;
pub use version::{clean_version, coerce_version, version_prefix};

use crate::domain::PackageInfo;
use serde::{Deserialize, Serialize};

/// Counts of outdated packages by change type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStats {
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
    /// Number of outdated packages, including ones that could not be classified
    pub total: usize,
}

impl UpdateStats {
    /// Tallies the outdated packages in an analysis result
    pub fn from_packages(packages: &[PackageInfo]) -> Self {
        let mut stats = Self::default();
        for package in packages.iter().filter(|p| p.is_outdated()) {
            stats.total += 1;
            match get_change_type(&package.current_version, &package.latest_version) {
                ChangeType::Major => stats.major += 1,
                ChangeType::Minor => stats.minor += 1,
                ChangeType::Patch => stats.patch += 1,
                ChangeType::None | ChangeType::Error => {}
            }
        }
        stats
    }

    /// Number of packages that the given options would update
    pub fn selected(&self, options: &UpdateOptions) -> usize {
        let mut count = 0;
        if options.update_major {
            count += self.major;
        }
        if options.update_minor {
            count += self.minor;
        }
        if options.update_patch {
            count += self.patch;
        }
        count
    }
}
