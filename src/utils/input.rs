//! Input utilities for the single-line composer.

use unicode_segmentation::UnicodeSegmentation;

/// Sanitize text input to prevent TUI corruption
///
/// This function:
/// - Converts tabs to 4 spaces
/// - Converts carriage returns and newlines to single spaces
/// - Filters out other control characters
pub fn sanitize_single_line(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push(' ');
            }
            '\n' => sanitized.push(' '),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// Removes the last user-perceived character from `text`.
pub fn pop_grapheme(text: &mut String) -> Option<String> {
    let (offset, grapheme) = text.grapheme_indices(true).next_back()?;
    let grapheme = grapheme.to_string();
    text.truncate(offset);
    Some(grapheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_single_line("hello world"), "hello world");
    }

    #[test]
    fn test_sanitize_tabs() {
        assert_eq!(sanitize_single_line("hello\tworld"), "hello    world");
    }

    #[test]
    fn test_sanitize_line_breaks() {
        assert_eq!(sanitize_single_line("a\r\nb\nc\rd"), "a b c d");
    }

    #[test]
    fn test_sanitize_mixed_control_chars() {
        assert_eq!(
            sanitize_single_line("hello\x07\tworld\x1b[31m"),
            "hello    world[31m"
        );
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_single_line("héllo 👋 世界"), "héllo 👋 世界");
    }

    #[test]
    fn test_pop_grapheme_handles_combining_sequences() {
        let mut text = String::from("ae\u{301}");
        assert_eq!(pop_grapheme(&mut text).as_deref(), Some("e\u{301}"));
        assert_eq!(text, "a");

        let mut family = String::from("x👨‍👩‍👧");
        pop_grapheme(&mut family);
        assert_eq!(family, "x");

        let mut empty = String::new();
        assert_eq!(pop_grapheme(&mut empty), None);
    }
}
