//! pubspec.yaml parser for Dart / Flutter projects
//!
//! Reads the `dependencies:` and `dev_dependencies:` blocks line by line,
//! keeping only entries at the block's direct child indentation. Entries
//! whose value is a nested map (SDK, path, git or hosted sources) are skipped,
//! which also keeps `flutter` and `flutter_test` out of the result.

use crate::domain::{DependencyMap, FileKind, ParsedManifest};
use crate::error::ParseError;
use crate::manifest::ManifestParser;
use regex::Regex;
use std::sync::LazyLock;

/// Version recorded for entries that declare no constraint
const ANY_VERSION: &str = "any";

static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#.*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dependencies,
    DevDependencies,
}

#[derive(Debug)]
struct OpenSection {
    kind: Section,
    header_indent: usize,
    child_indent: Option<usize>,
}

/// Parser for pubspec.yaml files
pub struct PubspecParser;

impl ManifestParser for PubspecParser {
    fn file_kind(&self) -> FileKind {
        FileKind::PubspecYaml
    }

    fn can_parse(&self, content: &str, file_name: Option<&str>) -> bool {
        if file_name.is_some_and(|n| n.to_lowercase().contains("pubspec")) {
            return true;
        }

        let has_sections =
            content.contains("dependencies:") || content.contains("dev_dependencies:");
        let has_dart_fields = content.contains("name:")
            || content.contains("version:")
            || content.contains("sdk: flutter");

        has_sections && has_dart_fields
    }

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut dependencies = DependencyMap::new();
        let mut dev_dependencies = DependencyMap::new();
        let mut section: Option<OpenSection> = None;

        for (i, line) in lines.iter().enumerate() {
            let text = strip_comment(line.trim());
            if text.is_empty() {
                continue;
            }
            let indent = indentation(line);

            let header = match text {
                "dependencies:" => Some(Section::Dependencies),
                "dev_dependencies:" => Some(Section::DevDependencies),
                _ => None,
            };
            if let Some(kind) = header {
                section = Some(OpenSection {
                    kind,
                    header_indent: indent,
                    child_indent: None,
                });
                continue;
            }

            let Some(open) = section.as_mut() else {
                continue;
            };
            if indent <= open.header_indent {
                section = None;
                continue;
            }

            let child_indent = *open.child_indent.get_or_insert(indent);
            if indent != child_indent {
                continue;
            }

            let Some((name, value)) = text.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let value = value.trim();
            let version = if value.is_empty() {
                if next_line_is_nested(&lines[i + 1..], indent) {
                    continue;
                }
                ANY_VERSION.to_string()
            } else {
                value.replace(['"', '\''], "")
            };

            let target = match open.kind {
                Section::Dependencies => &mut dependencies,
                Section::DevDependencies => &mut dev_dependencies,
            };
            target.insert(name.to_string(), version);
        }

        Ok(ParsedManifest::new(
            self.file_kind(),
            dependencies,
            dev_dependencies,
        ))
    }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn strip_comment(text: &str) -> &str {
    if text.starts_with('#') {
        return "";
    }
    match INLINE_COMMENT_RE.find(text) {
        Some(m) => text[..m.start()].trim_end(),
        None => text,
    }
}

/// Returns true if the next meaningful line is indented deeper than `indent`
fn next_line_is_nested(rest: &[&str], indent: usize) -> bool {
    rest.iter()
        .find(|l| !strip_comment(l.trim()).is_empty())
        .is_some_and(|l| indentation(l) > indent)
}
