//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Outdated packages with semantic change type (major/minor/patch)
//! - Failed lookups with their error messages
//! - Up-to-date packages in verbose mode
//! - Summary line with update statistics

use crate::domain::{PackageInfo, PackageStatus};
use crate::output::{OutputFormatter, Report, Verbosity};
use crate::update::{get_change_type, should_update_version, ChangeType};
use colored::Colorize;
use std::io::Write;

/// Minimum width of the name column
const MIN_NAME_WIDTH: usize = 20;

/// Get the colored display label for a change type
fn colored_label(change: ChangeType) -> String {
    match change {
        ChangeType::Major => "major".red().bold().to_string(),
        ChangeType::Minor => "minor".yellow().to_string(),
        ChangeType::Patch => "patch".green().to_string(),
        ChangeType::None | ChangeType::Error => "?".dimmed().to_string(),
    }
}

/// Get the plain display label for a change type
fn plain_label(change: ChangeType) -> &'static str {
    match change {
        ChangeType::Major => "major",
        ChangeType::Minor => "minor",
        ChangeType::Patch => "patch",
        ChangeType::None | ChangeType::Error => "?",
    }
}

/// Homepage of a package, or its registry page when none is known
fn package_link(package: &PackageInfo) -> String {
    package
        .homepage
        .clone()
        .unwrap_or_else(|| package.registry_url())
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn name_width(packages: &[&PackageInfo]) -> usize {
        packages
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH)
    }

    /// Format a single outdated package line
    fn format_outdated_line(
        &self,
        package: &PackageInfo,
        selected: bool,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change = get_change_type(&package.current_version, &package.latest_version);
        let marker = if selected { "" } else { " (not selected)" };

        if self.color {
            let name_display = format!("{:width$}", package.name, width = width);
            writeln!(
                writer,
                "  {} {} {} {} [{}]{}",
                name_display,
                package.current_version.dimmed(),
                "→".dimmed(),
                package.latest_version.bright_white().bold(),
                colored_label(change),
                marker.dimmed()
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                package.name,
                package.current_version,
                package.latest_version,
                plain_label(change),
                marker,
                width = width
            )?;
        }
        self.format_link(package, writer)
    }

    /// In verbose mode, print the package link below its row
    fn format_link(&self, package: &PackageInfo, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Verbose {
            return Ok(());
        }
        let link = package_link(package);
        if self.color {
            writeln!(writer, "    {}", link.dimmed())
        } else {
            writeln!(writer, "    {}", link)
        }
    }

    /// Format a single failed package line
    fn format_error_line(
        &self,
        package: &PackageInfo,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let message = package.error.as_deref().unwrap_or("unknown error");
        if self.color {
            let name_display = format!("{:width$}", package.name, width = width);
            writeln!(
                writer,
                "  {} {} {}",
                name_display,
                package.current_version.dimmed(),
                format!("({})", message).red()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} ({})",
                package.name,
                package.current_version,
                message,
                width = width
            )
        }
    }

    /// Format a single up-to-date package line
    fn format_current_line(
        &self,
        package: &PackageInfo,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            let name_display = format!("{:width$}", package.name, width = width);
            writeln!(
                writer,
                "  {} {}",
                name_display.dimmed(),
                package.current_version.dimmed()
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {}",
                package.name,
                package.current_version,
                width = width
            )?;
        }
        self.format_link(package, writer)
    }

    fn format_section_title(
        &self,
        title: &str,
        count: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{} ({})", title.bold(), count)
        } else {
            writeln!(writer, "{} ({})", title, count)
        }
    }

    /// Format the summary line
    fn format_summary(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &report.analysis.response.summary;
        let stats = report.update_stats();

        if self.color {
            writeln!(
                writer,
                "{} packages: {} up to date, {} outdated, {} errors",
                summary.total,
                summary.up_to_date.to_string().green(),
                summary.outdated.to_string().yellow(),
                summary.errors.to_string().red()
            )?;
        } else {
            writeln!(
                writer,
                "{} packages: {} up to date, {} outdated, {} errors",
                summary.total, summary.up_to_date, summary.outdated, summary.errors
            )?;
        }

        if stats.total > 0 && self.verbosity != Verbosity::Quiet {
            writeln!(
                writer,
                "Updates available: {} major, {} minor, {} patch ({} selected)",
                stats.major,
                stats.minor,
                stats.patch,
                stats.selected(&report.options)
            )?;
        }
        Ok(())
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(report, writer);
        }

        let packages = &report.analysis.response.packages;
        let by_status = |status: PackageStatus| -> Vec<&PackageInfo> {
            packages.iter().filter(|p| p.status == status).collect()
        };
        let outdated = by_status(PackageStatus::Outdated);
        let errors = by_status(PackageStatus::Error);
        let current = by_status(PackageStatus::UpToDate);

        let all: Vec<&PackageInfo> = packages.iter().collect();
        let width = Self::name_width(&all);

        let header = format!(
            "{} ({})",
            report.display_name(),
            report.analysis.file_kind.package_manager().registry_name()
        );
        if self.color {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer)?;

        if !outdated.is_empty() {
            self.format_section_title("Outdated", outdated.len(), writer)?;
            for package in &outdated {
                let selected = should_update_version(
                    &package.current_version,
                    &package.latest_version,
                    &report.options,
                );
                self.format_outdated_line(package, selected, width, writer)?;
            }
            writeln!(writer)?;
        }

        if !errors.is_empty() {
            self.format_section_title("Errors", errors.len(), writer)?;
            for package in &errors {
                self.format_error_line(package, width, writer)?;
            }
            writeln!(writer)?;
        }

        if self.verbosity == Verbosity::Verbose && !current.is_empty() {
            self.format_section_title("Up to date", current.len(), writer)?;
            for package in &current {
                self.format_current_line(package, width, writer)?;
            }
            writeln!(writer)?;
        }

        self.format_summary(report, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_analysis;
    use crate::update::UpdateOptions;

    fn render(formatter: TextFormatter, report: &Report<'_>) -> String {
        let mut buf = Vec::new();
        formatter.format(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_normal_output() {
        let analysis = sample_analysis();
        let report = Report::new(&analysis, "");
        let output = render(TextFormatter::with_color(Verbosity::Normal, false), &report);

        assert!(output.starts_with("package.json (npm)\n"));
        assert!(output.contains("Outdated (2)"));
        assert!(output.contains("4.17.20 -> 4.17.21 [patch]"));
        assert!(output.contains("^17.0.2 -> 18.2.0 [major] (not selected)"));
        assert!(output.contains("Errors (1)"));
        assert!(output.contains("1.0.0 (Package not found)"));
        assert!(!output.contains("Up to date ("));
        assert!(output.contains("4 packages: 1 up to date, 2 outdated, 1 errors"));
        assert!(output.contains("Updates available: 1 major, 0 minor, 1 patch (1 selected)"));
    }

    #[test]
    fn test_verbose_lists_up_to_date() {
        let analysis = sample_analysis();
        let report = Report::new(&analysis, "").with_options(UpdateOptions::all());
        let output = render(TextFormatter::with_color(Verbosity::Verbose, false), &report);

        assert!(output.contains("Up to date (1)"));
        assert!(output.contains("axios"));
        assert!(!output.contains("(not selected)"));
        assert!(output.contains("(2 selected)"));
    }

    #[test]
    fn test_verbose_links_homepage_or_registry_page() {
        let mut analysis = sample_analysis();
        analysis.response.packages[0].homepage = Some("https://lodash.com/".to_string());
        let report = Report::new(&analysis, "");
        let output = render(TextFormatter::with_color(Verbosity::Verbose, false), &report);

        assert!(output.contains("[patch]\n    https://lodash.com/\n"));
        assert!(output.contains("    https://www.npmjs.com/package/react\n"));
        assert!(output.contains("    https://www.npmjs.com/package/axios\n"));
        assert!(!output.contains("package/lodash"));
        assert!(!output.contains("package/left-pad-nope"));
    }

    #[test]
    fn test_normal_output_has_no_links() {
        let analysis = sample_analysis();
        let report = Report::new(&analysis, "");
        let output = render(TextFormatter::with_color(Verbosity::Normal, false), &report);
        assert!(!output.contains("https://"));
    }

    #[test]
    fn test_quiet_prints_summary_only() {
        let analysis = sample_analysis();
        let report = Report::new(&analysis, "");
        let output = render(TextFormatter::with_color(Verbosity::Quiet, false), &report);

        assert_eq!(output, "4 packages: 1 up to date, 2 outdated, 1 errors\n");
    }

    #[test]
    fn test_colored_output_contains_names() {
        let analysis = sample_analysis();
        let report = Report::new(&analysis, "");
        let output = render(TextFormatter::new(Verbosity::Normal), &report);
        assert!(output.contains("lodash"));
        assert!(output.contains("Package not found"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(plain_label(ChangeType::Minor), "minor");
        assert_eq!(plain_label(ChangeType::Error), "?");
    }
}
