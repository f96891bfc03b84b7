//! Analysis summary types
//!
//! Provides the aggregate counts returned alongside the per-package records.

use super::{PackageInfo, PackageStatus};
use serde::{Deserialize, Serialize};

/// Counts of packages by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Number of packages analyzed
    pub total: usize,
    /// Packages at the latest version
    pub up_to_date: usize,
    /// Packages with a newer version available
    pub outdated: usize,
    /// Packages whose lookup or comparison failed
    pub errors: usize,
}

impl AnalysisSummary {
    /// Partitions the package list by status
    pub fn from_packages(packages: &[PackageInfo]) -> Self {
        let mut summary = Self::default();
        for package in packages {
            summary.total += 1;
            match package.status {
                PackageStatus::UpToDate => summary.up_to_date += 1,
                PackageStatus::Outdated => summary.outdated += 1,
                PackageStatus::Error => summary.errors += 1,
            }
        }
        summary
    }

    /// Returns true if any package has an update available
    pub fn has_outdated(&self) -> bool {
        self.outdated > 0
    }

    /// Returns true if any package failed
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Full analysis response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Per-package records in manifest order
    pub packages: Vec<PackageInfo>,
    /// Aggregate counts
    pub summary: AnalysisSummary,
}

impl AnalysisResponse {
    /// Builds a response and its summary from the package records
    pub fn from_packages(packages: Vec<PackageInfo>) -> Self {
        let summary = AnalysisSummary::from_packages(&packages);
        Self { packages, summary }
    }

    /// Response for a manifest without dependencies
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns all outdated packages
    pub fn outdated(&self) -> impl Iterator<Item = &PackageInfo> {
        self.packages.iter().filter(|p| p.is_outdated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageManager;

    fn package(name: &str, status: PackageStatus) -> PackageInfo {
        PackageInfo::new(name, "1.0.0", "1.0.0", status, PackageManager::Npm)
    }

    #[test]
    fn test_summary_partition_adds_up() {
        let packages = vec![
            package("a", PackageStatus::UpToDate),
            package("b", PackageStatus::Outdated),
            package("c", PackageStatus::Outdated),
            package("d", PackageStatus::Error),
        ];
        let summary = AnalysisSummary::from_packages(&packages);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.up_to_date, 1);
        assert_eq!(summary.outdated, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(
            summary.total,
            summary.up_to_date + summary.outdated + summary.errors
        );
        assert!(summary.has_outdated());
        assert!(summary.has_errors());
    }

    #[test]
    fn test_empty_response_shape() {
        let json = serde_json::to_value(AnalysisResponse::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "packages": [],
                "summary": {"total": 0, "upToDate": 0, "outdated": 0, "errors": 0}
            })
        );
    }

    #[test]
    fn test_outdated_iterator() {
        let response = AnalysisResponse::from_packages(vec![
            package("a", PackageStatus::UpToDate),
            package("b", PackageStatus::Outdated),
        ]);
        let names: Vec<_> = response.outdated().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }
}
