//! Char/byte index helpers.
//!
//! egui cursors count chars, Rust strings index bytes. These keep the
//! conversion in one place and never slice inside a UTF-8 sequence.

/// Byte offset of the `char_idx`-th char, clamped to the end of `s`.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(b, _)| b).unwrap_or(s.len())
}

/// Chars `start..end` of `s`. Out-of-range bounds are clamped.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start_b = char_to_byte(s, start);
    let end_b = char_to_byte(s, end.max(start));
    &s[start_b..end_b]
}

/// 0-based (line, column) of a char index, both counted in chars.
pub fn line_col(s: &str, char_idx: usize) -> (usize, usize) {
    let before = &s[..char_to_byte(s, char_idx)];
    let line = before.matches('\n').count();
    let col = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count(),
        None => before.chars().count(),
    };
    (line, col)
}

/// Number of logical lines. An empty string is one (empty) line.
pub fn line_count(s: &str) -> usize {
    s.matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte() {
        let s = "café au lait";
        assert_eq!(char_to_byte(s, 3), 3);
        assert_eq!(char_to_byte(s, 4), 5);
        assert_eq!(char_to_byte(s, 99), s.len());
    }

    #[test]
    fn test_char_slice() {
        let s = "naïve text";
        assert_eq!(char_slice(s, 0, 5), "naïve");
        assert_eq!(char_slice(s, 6, 100), "text");
        assert_eq!(char_slice(s, 4, 2), "");
    }

    #[test]
    fn test_line_col() {
        let s = "ab\ncdé\n\nx";
        assert_eq!(line_col(s, 0), (0, 0));
        assert_eq!(line_col(s, 2), (0, 2));
        assert_eq!(line_col(s, 3), (1, 0));
        assert_eq!(line_col(s, 6), (1, 3));
        assert_eq!(line_col(s, 7), (2, 0));
        assert_eq!(line_col(s, 9), (3, 1));
        assert_eq!(line_col(s, 500), (3, 1));
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\n"), 2);
        assert_eq!(line_count("a\nb\nc"), 3);
    }
}
