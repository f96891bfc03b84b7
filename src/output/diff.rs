//! Diff output formatter for showing manifest changes
//!
//! This module provides:
//! - A line diff between the original and regenerated manifest
//! - Unified-style hunks without context lines

use crate::output::{OutputFormatter, Report};
use colored::Colorize;
use std::io::Write;

/// Above this many line pairs the middle section is reported as replaced
/// wholesale instead of running the quadratic diff
const MAX_DIFF_CELLS: usize = 4_000_000;

/// One line of a line diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Same(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

/// Computes a line diff of `old` and `new` using a longest common subsequence
///
/// Line terminators are not part of the compared text, so a CRLF manifest
/// diffs cleanly against itself.
pub fn diff_lines<'a>(old: &'a str, new: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut result: Vec<DiffLine<'a>> = old[..prefix].iter().copied().map(DiffLine::Same).collect();

    if old_mid.len().saturating_mul(new_mid.len()) > MAX_DIFF_CELLS {
        result.extend(old_mid.iter().copied().map(DiffLine::Removed));
        result.extend(new_mid.iter().copied().map(DiffLine::Added));
    } else {
        result.extend(lcs_diff(old_mid, new_mid));
    }

    result.extend(old[old.len() - suffix..].iter().copied().map(DiffLine::Same));
    result
}

fn lcs_diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffLine<'a>> {
    let (n, m) = (old.len(), new.len());
    // lengths[i][j] = LCS length of old[i..] and new[j..]
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if old[i] == new[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            out.push(DiffLine::Same(old[i]));
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            out.push(DiffLine::Removed(old[i]));
            i += 1;
        } else {
            out.push(DiffLine::Added(new[j]));
            j += 1;
        }
    }
    out.extend(old[i..].iter().copied().map(DiffLine::Removed));
    out.extend(new[j..].iter().copied().map(DiffLine::Added));
    out
}

/// Diff formatter for showing manifest changes
pub struct DiffFormatter {
    /// Whether to use colors
    color: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Create a new diff formatter with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn write_line(&self, line: &DiffLine<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        match (line, self.color) {
            (DiffLine::Removed(text), true) => writeln!(writer, "{}", format!("-{}", text).red()),
            (DiffLine::Added(text), true) => writeln!(writer, "{}", format!("+{}", text).green()),
            (DiffLine::Removed(text), false) => writeln!(writer, "-{}", text),
            (DiffLine::Added(text), false) => writeln!(writer, "+{}", text),
            (DiffLine::Same(text), _) => writeln!(writer, " {}", text),
        }
    }
}

impl Default for DiffFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let updated = report.updated.unwrap_or(report.original);
        let lines = diff_lines(report.original, updated);
        let name = report.display_name();

        let mut changed = 0;
        let mut header_written = false;
        let (mut old_line, mut new_line) = (1usize, 1usize);
        let mut idx = 0;

        while idx < lines.len() {
            if let DiffLine::Same(_) = lines[idx] {
                old_line += 1;
                new_line += 1;
                idx += 1;
                continue;
            }

            let start = idx;
            while idx < lines.len() && !matches!(lines[idx], DiffLine::Same(_)) {
                idx += 1;
            }
            let hunk = &lines[start..idx];
            let removed = hunk
                .iter()
                .filter(|l| matches!(l, DiffLine::Removed(_)))
                .count();
            let added = hunk.len() - removed;

            if !header_written {
                writeln!(writer, "--- a/{}", name)?;
                writeln!(writer, "+++ b/{}", name)?;
                header_written = true;
            }
            let hunk_header = format!(
                "@@ -{},{} +{},{} @@",
                old_line, removed, new_line, added
            );
            if self.color {
                writeln!(writer, "{}", hunk_header.cyan())?;
            } else {
                writeln!(writer, "{}", hunk_header)?;
            }
            for line in hunk {
                self.write_line(line, writer)?;
            }

            changed += removed.max(added);
            old_line += removed;
            new_line += added;
        }

        if changed == 0 {
            writeln!(writer, "# No changes for the selected update types")?;
        } else {
            writeln!(writer, "# {} line(s) changed", changed)?;
        }
        Ok(())
    }
}
