//! Formatting detection for regenerated manifests

const CRLF: &str = "\r\n";
const LF: &str = "\n";
const DEFAULT_INDENT: &str = "  ";

/// Returns `\r\n` if the content uses it anywhere, otherwise `\n`
pub fn detect_line_ending(content: &str) -> &'static str {
    if content.contains(CRLF) {
        CRLF
    } else {
        LF
    }
}

/// Returns the leading whitespace of the first indented line
///
/// Falls back to two spaces when no line is indented.
pub fn detect_indentation(content: &str) -> &str {
    content
        .lines()
        .find_map(|line| {
            let rest = line.trim_start();
            let indent = &line[..line.len() - rest.len()];
            (!indent.is_empty() && !rest.is_empty()).then_some(indent)
        })
        .unwrap_or(DEFAULT_INDENT)
}

/// Converts `\n` line endings to `eol`
pub fn with_line_ending(text: &str, eol: &str) -> String {
    if eol == LF {
        text.to_string()
    } else {
        text.replace(LF, eol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(detect_line_ending("a\nb\n"), "\n");
        assert_eq!(detect_line_ending("a\r\nb\r\n"), "\r\n");
        assert_eq!(detect_line_ending("a\nb\r\n"), "\r\n");
        assert_eq!(detect_line_ending("single"), "\n");
    }

    #[test]
    fn test_detect_indentation() {
        assert_eq!(detect_indentation("{\n    \"a\": 1\n}"), "    ");
        assert_eq!(detect_indentation("{\n\t\"a\": 1\n}"), "\t");
        assert_eq!(detect_indentation("{\r\n  \"a\": 1\r\n}"), "  ");
        assert_eq!(detect_indentation("{\"a\": 1}"), "  ");
    }

    #[test]
    fn test_detect_indentation_ignores_blank_lines() {
        assert_eq!(detect_indentation("{\n   \n   \"a\": 1\n}"), "   ");
    }

    #[test]
    fn test_with_line_ending() {
        assert_eq!(with_line_ending("a\nb", "\r\n"), "a\r\nb");
        assert_eq!(with_line_ending("a\nb", "\n"), "a\nb");
    }
}
