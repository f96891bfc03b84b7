//! Output formatting for analysis results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - Diff output for showing manifest changes

mod diff;
mod json;
mod text;

pub use diff::{diff_lines, DiffFormatter, DiffLine};
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::orchestrator::Analysis;
use crate::update::{UpdateOptions, UpdateStats};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
    /// Line diff of the regenerated manifest
    Diff,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json, diff)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, diff: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else if diff {
            OutputFormat::Diff
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Set whether to use colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Everything a formatter may show about one run
#[derive(Debug, Clone)]
pub struct Report<'a> {
    /// Analysis result
    pub analysis: &'a Analysis,
    /// Update types selected for regeneration
    pub options: UpdateOptions,
    /// Manifest as read
    pub original: &'a str,
    /// Regenerated manifest, when one was requested
    pub updated: Option<&'a str>,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl<'a> Report<'a> {
    /// Create a report for an analysis without a regenerated manifest
    pub fn new(analysis: &'a Analysis, original: &'a str) -> Self {
        Self {
            analysis,
            options: UpdateOptions::default(),
            original,
            updated: None,
            analyzed_at: Utc::now(),
        }
    }

    /// Set the selected update types
    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the regenerated manifest
    pub fn with_updated(mut self, updated: &'a str) -> Self {
        self.updated = Some(updated);
        self
    }

    /// Set the analysis timestamp
    pub fn with_timestamp(mut self, analyzed_at: DateTime<Utc>) -> Self {
        self.analyzed_at = analyzed_at;
        self
    }

    /// Change-type counts over the outdated packages
    pub fn update_stats(&self) -> UpdateStats {
        UpdateStats::from_packages(&self.analysis.response.packages)
    }

    /// Returns true if the regenerated manifest differs from the original
    pub fn has_changes(&self) -> bool {
        self.updated.is_some_and(|updated| updated != self.original)
    }

    /// File name shown in headers
    pub fn display_name(&self) -> &str {
        self.analysis
            .file_name
            .as_deref()
            .unwrap_or_else(|| self.analysis.file_kind.file_name())
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write a report
    fn format(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create a formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Diff => Box::new(DiffFormatter::with_color(config.color)),
    }
}
