//! package.json regeneration

use super::format::{detect_indentation, detect_line_ending, with_line_ending};
use super::{packages_to_update, UpdateStrategy};
use crate::domain::{FileKind, PackageInfo};
use crate::error::GenerateError;
use crate::update::{version_prefix, UpdateOptions};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::debug;

/// Dependency maps rewritten in place
const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Rewrites versions in package.json dependency maps
pub struct NpmStrategy;

impl UpdateStrategy for NpmStrategy {
    fn file_kind(&self) -> FileKind {
        FileKind::PackageJson
    }

    fn generate(
        &self,
        original: &str,
        packages: &[PackageInfo],
        options: &UpdateOptions,
    ) -> Result<String, GenerateError> {
        let mut json: Value =
            serde_json::from_str(original).map_err(|e| GenerateError::json(e.to_string()))?;

        let mut replaced = 0;
        for package in packages_to_update(packages, options) {
            let new_version = format!(
                "{}{}",
                version_prefix(&package.current_version),
                package.latest_version
            );

            for section in DEPENDENCY_SECTIONS {
                let Some(entry) = json
                    .get_mut(*section)
                    .and_then(|deps| deps.get_mut(&package.name))
                else {
                    continue;
                };
                if entry.as_str().is_some_and(|v| !v.is_empty()) {
                    debug!(
                        package = %package.name,
                        section = %section,
                        from = %package.current_version,
                        to = %new_version,
                        "Updated package.json entry"
                    );
                    *entry = Value::String(new_version.clone());
                    replaced += 1;
                }
            }
        }

        if replaced == 0 {
            return Ok(original.to_string());
        }

        let indent = detect_indentation(original);
        let eol = detect_line_ending(original);

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut serializer)
            .map_err(|e| GenerateError::json(e.to_string()))?;
        let text = String::from_utf8(buf).map_err(|e| GenerateError::json(e.to_string()))?;

        Ok(with_line_ending(&text, eol) + eol)
    }
}
