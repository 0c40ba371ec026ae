//! Status bar contents: caret position and word count.

use padcore::text;
use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is a valid regex"));

/// Number of `\b\w+\b` matches.
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// 1-based
    pub line: usize,
    /// 1-based, in chars
    pub column: usize,
    pub words: usize,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self { line: 1, column: 1, words: 0 }
    }
}

impl StatusLine {
    /// Recompute the position for a caret at char index `caret`.
    pub fn update_position(&mut self, text: &str, caret: usize) {
        let (line, col) = text::line_col(text, caret);
        self.line = line + 1;
        self.column = col + 1;
    }

    pub fn update_words(&mut self, text: &str) {
        self.words = word_count(text);
    }

    pub fn position_label(&self) -> String {
        format!("Ln {}, Col {}", self.line, self.column)
    }

    pub fn words_label(&self) -> String {
        format!("Words: {}", self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert!(WORD.is_match("word"));
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  \n\t "), 0);
        assert_eq!(word_count("don't stop"), 3);
        assert_eq!(word_count("line_one\nline_two"), 2);
    }

    #[test]
    fn test_position_labels() {
        let mut status = StatusLine::default();
        assert_eq!(status.position_label(), "Ln 1, Col 1");
        status.update_position("first\nsecond", 9);
        assert_eq!(status.position_label(), "Ln 2, Col 4");
        status.update_words("first\nsecond");
        assert_eq!(status.words_label(), "Words: 2");
    }
}
