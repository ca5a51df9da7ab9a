//! Line-based comment extraction.
//!
//! Recognition is purely per physical line: `#` comments, `//` comments and
//! `/* ... */` blocks that open and close on the same line. No state is kept
//! across lines, so multi-line block comments are not recognized.

/// Extract comment contents from source text.
///
/// Returns the recognized comment lines, stripped of their markers, in file
/// order, joined with newlines. Lines that are not comments are skipped; no
/// deduplication is applied.
pub fn extract_comments(content: &str) -> String {
    content
        .lines()
        .filter_map(|line| comment_text(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The comment content of a single trimmed line, if it is one.
fn comment_text(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        Some(line.trim_start_matches(['#', ' ']).trim_end())
    } else if line.starts_with("//") {
        Some(line.trim_start_matches(['/', ' ']).trim_end())
    } else if line.starts_with("/*") && line.ends_with("*/") {
        Some(line.trim_matches(['/', '*']).trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_comment_styles() {
        let source = "# hello\nx = 1\n// world";
        assert_eq!(extract_comments(source), "hello\nworld");
    }

    #[test]
    fn test_hash_comments() {
        let source = "#!/usr/bin/env python\n# config values\nvalue = 3";
        assert_eq!(extract_comments(source), "!/usr/bin/env python\nconfig values");
    }

    #[test]
    fn test_double_hash_is_stripped() {
        assert_eq!(extract_comments("## section header"), "section header");
    }

    #[test]
    fn test_slash_comments_with_indentation() {
        let source = "function f() {\n    // inner comment\n}";
        assert_eq!(extract_comments(source), "inner comment");
    }

    #[test]
    fn test_single_line_block_comment() {
        assert_eq!(extract_comments("/* reset styles */"), "reset styles");
    }

    #[test]
    fn test_multi_line_block_comment_is_not_recognized() {
        let source = "/* first\nsecond\n*/";
        assert_eq!(extract_comments(source), "");
    }

    #[test]
    fn test_no_comments() {
        assert_eq!(extract_comments("let x = 1;\nlet y = 2;"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_comments(""), "");
    }

    #[test]
    fn test_order_preserved_without_deduplication() {
        let source = "# same\ncode()\n# same";
        assert_eq!(extract_comments(source), "same\nsame");
    }

    #[test]
    fn test_bare_marker_yields_empty_line() {
        assert_eq!(extract_comments("#\nx = 1"), "");
    }
}
