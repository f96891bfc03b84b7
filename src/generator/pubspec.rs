//! pubspec.yaml regeneration

use super::{packages_to_update, UpdateStrategy};
use crate::domain::{FileKind, PackageInfo};
use crate::error::GenerateError;
use crate::update::UpdateOptions;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

/// Range prefix applied when the current constraint has none
const DEFAULT_PREFIX: char = '^';

static TRAILING_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#.*$").unwrap());

/// Rewrites indented `name: constraint` lines
pub struct PubStrategy;

impl UpdateStrategy for PubStrategy {
    fn file_kind(&self) -> FileKind {
        FileKind::PubspecYaml
    }

    fn generate(
        &self,
        original: &str,
        packages: &[PackageInfo],
        options: &UpdateOptions,
    ) -> Result<String, GenerateError> {
        let mut content = original.to_string();

        for package in packages_to_update(packages, options) {
            let pattern = format!(r"(?mR)^([ \t]+{}:[ \t]*)(.*)$", regex::escape(&package.name));
            let re = Regex::new(&pattern)
                .map_err(|e| GenerateError::pattern(&package.name, e.to_string()))?;

            if !re.is_match(&content) {
                continue;
            }
            content = re
                .replace_all(&content, |caps: &Captures| {
                    rewrite_line(&caps[1], &caps[2], &package.latest_version)
                })
                .into_owned();
            debug!(
                package = %package.name,
                to = %package.latest_version,
                "Updated pubspec dependency"
            );
        }

        Ok(content)
    }
}

/// Builds the replacement for one matched line
///
/// Keeps quotes and a trailing comment; a line without a value is left
/// alone since it introduces a nested source map.
fn rewrite_line(lead: &str, value: &str, latest: &str) -> String {
    if value.trim().is_empty() {
        return format!("{}{}", lead, value);
    }

    let (constraint, comment) = match TRAILING_COMMENT_RE.find(value) {
        Some(m) => (&value[..m.start()], &value[m.start()..]),
        None => (value, ""),
    };

    let quote = constraint
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '\'');
    let inner = match quote {
        Some(q) => constraint.trim_matches(q),
        None => constraint,
    };
    let prefix = inner
        .chars()
        .next()
        .filter(|c| *c == '^' || *c == '~')
        .unwrap_or(DEFAULT_PREFIX);

    let q = quote.map(String::from).unwrap_or_default();
    format!("{lead}{q}{prefix}{latest}{q}{comment}")
}
