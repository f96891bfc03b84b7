//! package.json parser for npm projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//!
//! peerDependencies only count towards detection; they are rewritten by the
//! generator but never looked up.

use crate::domain::{DependencyMap, FileKind, ParsedManifest};
use crate::error::ParseError;
use crate::manifest::ManifestParser;
use serde_json::{Map, Value};

/// Keys whose presence marks a JSON object as a package.json
const MARKER_KEYS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Parser for package.json files
pub struct PackageJsonParser;

impl ManifestParser for PackageJsonParser {
    fn file_kind(&self) -> FileKind {
        FileKind::PackageJson
    }

    fn can_parse(&self, content: &str, file_name: Option<&str>) -> bool {
        if file_name.is_some_and(|n| n.to_lowercase().contains("package.json")) {
            return true;
        }

        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(obj)) => {
                MARKER_KEYS.iter().any(|key| obj.contains_key(*key))
                    || (obj.contains_key("name") && obj.contains_key("version"))
            }
            _ => false,
        }
    }

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        let json: Value =
            serde_json::from_str(content).map_err(|e| ParseError::json(e.to_string()))?;

        let dependencies = json
            .get("dependencies")
            .and_then(|v| v.as_object())
            .map(collect_dependencies)
            .unwrap_or_default();

        let dev_dependencies = json
            .get("devDependencies")
            .and_then(|v| v.as_object())
            .map(collect_dependencies)
            .unwrap_or_default();

        Ok(ParsedManifest::new(
            self.file_kind(),
            dependencies,
            dev_dependencies,
        ))
    }
}

/// Collects string-valued entries in document order
fn collect_dependencies(deps: &Map<String, Value>) -> DependencyMap {
    deps.iter()
        .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
        .collect()
}
