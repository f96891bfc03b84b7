//! Version string normalization
//!
//! Manifests declare versions with range operators (`^1.2.3`, `>=2.0`, `~1.0`)
//! and occasionally a `v` prefix. These helpers strip that decoration and
//! coerce the remainder into a `semver::Version`.

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

static VERSION_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\^~>=<]+").unwrap());

static COERCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|\D)").unwrap()
});

const RANGE_OPERATORS: &[char] = &['^', '~', '>', '<', '='];

/// Removes leading range operators and a `v`/`V` prefix
///
/// ```
/// use packcheck::update::clean_version;
///
/// assert_eq!(clean_version("^1.2.3"), "1.2.3");
/// assert_eq!(clean_version(">= v2.0"), "2.0");
/// ```
pub fn clean_version(version: &str) -> String {
    let trimmed = version.trim().trim_start_matches(RANGE_OPERATORS).trim_start();
    trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Returns the leading run of range operator characters, or an empty string
pub fn version_prefix(version: &str) -> &str {
    VERSION_PREFIX_RE
        .find(version)
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Coerces a loose version string into a semantic version
///
/// Takes the first `major[.minor[.patch]]` run of digits found anywhere in
/// the string; missing components become zero and any pre-release or build
/// suffix is dropped.
pub fn coerce_version(version: &str) -> Option<Version> {
    let caps = COERCE_RE.captures(version)?;
    let component = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}
