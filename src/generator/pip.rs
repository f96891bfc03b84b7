//! requirements.txt regeneration

use super::{packages_to_update, UpdateStrategy};
use crate::domain::{FileKind, PackageInfo};
use crate::error::GenerateError;
use crate::update::UpdateOptions;
use regex::{NoExpand, Regex};
use tracing::debug;

/// Rewrites requirement lines to `name==latest`
pub struct PipStrategy;

impl UpdateStrategy for PipStrategy {
    fn file_kind(&self) -> FileKind {
        FileKind::RequirementsTxt
    }

    fn generate(
        &self,
        original: &str,
        packages: &[PackageInfo],
        options: &UpdateOptions,
    ) -> Result<String, GenerateError> {
        let mut content = original.to_string();

        for package in packages_to_update(packages, options) {
            // CRLF mode keeps `$` in front of `\r\n` so line terminators survive.
            let pattern = format!(
                r"(?mR)^({})(==|>=|<=|>|<|~=|!=)?(.*)$",
                regex::escape(&package.name)
            );
            let re = Regex::new(&pattern)
                .map_err(|e| GenerateError::pattern(&package.name, e.to_string()))?;

            let replacement = format!("{}=={}", package.name, package.latest_version);
            if !re.is_match(&content) {
                continue;
            }
            content = re.replace(&content, NoExpand(&replacement)).into_owned();
            debug!(
                package = %package.name,
                to = %replacement,
                "Updated requirement"
            );
        }

        Ok(content)
    }
}
