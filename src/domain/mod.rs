//! Core domain models for packcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Package manager and manifest file kinds
//! - Parsed manifest structure
//! - Registry lookup requests and results
//! - Per-package analysis records and the aggregate summary

mod manifest;
mod package;
mod package_manager;
mod summary;

pub use manifest::{DependencyMap, ParsedManifest};
pub use package::{PackageInfo, PackageQuery, PackageStatus, PackageVersionInfo, UNKNOWN_VERSION};
pub use package_manager::{FileKind, PackageManager};
pub use summary::{AnalysisResponse, AnalysisSummary};
