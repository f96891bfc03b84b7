//! requirements.txt parser for pip projects
//!
//! Line-oriented. Handles:
//! - Pinned and ranged requirements (`==`, `>=`, `<=`, `~=`, `!=`, `>`, `<`)
//! - Extras (`name[extra]`), environment markers, inline comments and hash pins
//!
//! Options (`-r`, `-e`, `--index-url`, ...), VCS and URL requirements are skipped.

use crate::domain::{DependencyMap, FileKind, ParsedManifest};
use crate::error::ParseError;
use crate::manifest::ManifestParser;
use regex::Regex;
use std::sync::LazyLock;

/// Version operators; two-character operators first so they win ties
const OPERATORS: &[&str] = &["==", ">=", "<=", "~=", "!=", ">", "<"];

/// Prefixes of requirements that point at a VCS or URL instead of the index
const URL_PREFIXES: &[&str] = &[
    "git+", "hg+", "svn+", "bzr+", "http://", "https://", "file://",
];

/// Version used when a requirement has no usable bound
pub(crate) const LATEST: &str = "latest";

static PIP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\w-]+(?:==|>=|~=)\d|[\w-]+\[[\w,]+\]|-e\s+|git\+)").unwrap()
});

static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#").unwrap());

static DIRECT_REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+(?:\[[^\]]*\])?\s*@").unwrap());

/// Parser for requirements.txt files
pub struct RequirementsParser;

impl ManifestParser for RequirementsParser {
    fn file_kind(&self) -> FileKind {
        FileKind::RequirementsTxt
    }

    fn can_parse(&self, content: &str, file_name: Option<&str>) -> bool {
        if file_name.is_some_and(|n| n.to_lowercase().contains("requirements")) {
            return true;
        }

        let mut lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();

        if lines.is_empty() && !content.trim().is_empty() {
            lines.push(content.trim());
        }

        lines.iter().any(|line| PIP_LINE_RE.is_match(line))
    }

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        let dependencies: DependencyMap = content.lines().filter_map(parse_requirement).collect();

        Ok(ParsedManifest::new(
            self.file_kind(),
            dependencies,
            DependencyMap::new(),
        ))
    }
}

/// Parses a single requirement line into `(name, version)`
fn parse_requirement(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }

    let lower = line.to_lowercase();
    if URL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    let mut requirement = line;
    if let Some(m) = INLINE_COMMENT_RE.find(requirement) {
        requirement = &requirement[..m.start()];
    }
    if let Some(idx) = requirement.find("--hash") {
        requirement = &requirement[..idx];
    }
    if let Some(idx) = requirement.find(';') {
        requirement = &requirement[..idx];
    }
    let requirement = requirement.trim().trim_end_matches('\\').trim();

    if DIRECT_REFERENCE_RE.is_match(requirement) {
        return None;
    }

    let (name_part, version) = match split_operator(requirement) {
        Some((pos, op)) => {
            let bound = requirement[pos + op.len()..].split(',').next().unwrap_or("");
            let version: String = bound
                .chars()
                .filter(|c| !matches!(c, '<' | '>' | '=' | '!' | '~'))
                .collect();
            let version = version.trim();
            let version = if version.is_empty() { LATEST } else { version };
            (&requirement[..pos], version.to_string())
        }
        None => (requirement, LATEST.to_string()),
    };

    let name = name_part.split('[').next().unwrap_or("").trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), version))
}

/// Finds the earliest operator in the requirement
fn split_operator(requirement: &str) -> Option<(usize, &'static str)> {
    let mut best: Option<(usize, &'static str)> = None;
    for op in OPERATORS {
        if let Some(pos) = requirement.find(op) {
            if best.is_none_or(|(best_pos, _)| pos < best_pos) {
                best = Some((pos, op));
            }
        }
    }
    best
}
