//! Manifest type detection
//!
//! Parsers are probed in a fixed priority order (package.json, then
//! requirements.txt, then pubspec.yaml); the first that claims the content
//! parses it. Content no parser claims gets a last-resort classification.

use super::{parsers, ManifestParser, RequirementsParser};
use crate::domain::ParsedManifest;
use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SINGLE_REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+(==|>=|<=|~=|!=|>|<)[\d.]+").unwrap());

/// Detects the manifest kind of `content` and parses it
///
/// `file_name` is only a hint; each parser decides whether it applies.
pub fn detect_file_type(
    content: &str,
    file_name: Option<&str>,
) -> Result<ParsedManifest, ParseError> {
    for parser in parsers() {
        if parser.can_parse(content, file_name) {
            debug!(kind = %parser.file_kind(), "Detected manifest type");
            return parser.parse(content);
        }
    }

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyContent);
    }
    if trimmed.starts_with('{') {
        return Err(ParseError::InvalidJson);
    }
    if !trimmed.contains('\n') && SINGLE_REQUIREMENT_RE.is_match(trimmed) {
        debug!("Falling back to requirements.txt for single requirement line");
        return RequirementsParser.parse(content);
    }

    Err(ParseError::UnsupportedFormat)
}
