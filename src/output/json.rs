//! JSON output formatter for machine processing
//!
//! The document is the analysis response (`packages` and `summary`) plus the
//! detected file kind, a timestamp and change-type statistics.

use crate::domain::{AnalysisSummary, FileKind, PackageInfo};
use crate::output::{OutputFormatter, Report, Verbosity};
use crate::update::{UpdateOptions, UpdateStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a report
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    file_kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
    analyzed_at: DateTime<Utc>,
    packages: &'a [PackageInfo],
    summary: AnalysisSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_stats: Option<UpdateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_options: Option<UpdateOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_content: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let response = &report.analysis.response;
        let stats = report.update_stats();
        let verbose = self.verbosity == Verbosity::Verbose;

        let output = JsonOutput {
            file_kind: report.analysis.file_kind,
            file_name: report.analysis.file_name.as_deref(),
            analyzed_at: report.analyzed_at,
            packages: &response.packages,
            summary: response.summary,
            update_stats: (stats.total > 0).then_some(stats),
            update_options: verbose.then_some(report.options),
            updated_content: if verbose && report.has_changes() {
                report.updated
            } else {
                None
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
