//! Cursor over a single line of user input.

/// Separator between words. Only the ASCII space counts; tabs are word text.
pub const DELIMITER: char = ' ';

/// Reads whitespace-delimited words, or the rest of the line, from one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Input<'a> {
    rest: &'a str,
}

impl<'a> Input<'a> {
    /// Start at the beginning of `line`.
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// Next word, skipping leading delimiters.
    ///
    /// Advances past the word and the single delimiter after it, so a
    /// following [`read_line`](Self::read_line) keeps any further spacing.
    pub fn read_word(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start_matches(DELIMITER);
        if trimmed.is_empty() {
            return None;
        }
        let (word, rest) = trimmed.split_once(DELIMITER).unwrap_or((trimmed, ""));
        self.rest = rest;
        Some(word)
    }

    /// Everything left on the line, verbatim, unless only delimiters remain.
    pub fn read_line(&mut self) -> Option<&'a str> {
        if self.is_over() {
            return None;
        }
        Some(std::mem::take(&mut self.rest))
    }

    /// Whether no word remains.
    pub fn is_over(&self) -> bool {
        self.rest.chars().all(|c| c == DELIMITER)
    }
}
