use unicode_width::UnicodeWidthChar;

/// Hard-wrap `text` to `width` display columns.
///
/// Explicit newlines always break; an empty input yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut line = String::new();
        let mut used = 0;
        for c in raw.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            line.push(c);
            used += w;
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_at_width() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("", 4), vec![""]);
    }

    #[test]
    fn test_keeps_explicit_newlines() {
        assert_eq!(wrap_text("ab\n\ncd", 10), vec!["ab", "", "cd"]);
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }
}
