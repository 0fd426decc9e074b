//! Diagnostics produced while parsing, and errors for invalid edits.

use line_index::{LineCol, LineIndex};
use text_size::{TextRange, TextSize};
use thiserror::Error;

/// What went wrong at a [`ParseError`]'s range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The lexer could not finish a token (an unterminated block comment).
    LexError,
    /// A token that does not fit where it appears. Unrecognised character
    /// runs are reported with this kind too.
    UnexpectedToken,
    /// A required piece is absent; the range is empty.
    MissingToken,
    /// A section is still open at end of input; the range is its keyword.
    UnterminatedSection,
    /// A numeric literal that is not a number (`1.2.3`).
    InvalidNumber,
}

/// A recoverable syntax error.
///
/// Errors never stop the parse: the tree is always produced and the errors
/// are reported alongside it, sorted by range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub range: TextRange,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
        }
    }

    /// Zero-based line and column of the start of the error.
    pub fn line_col(&self, index: &LineIndex) -> LineCol {
        index.line_col(self.range.start())
    }

    pub(crate) fn shifted(mut self, delta: i64) -> Self {
        self.range = shift_range(self.range, delta);
        self
    }
}

/// Sorts errors by range and applies the configured cap.
pub(crate) fn finish_errors(errors: &mut Vec<ParseError>, max_errors: Option<usize>) {
    errors.sort_by_key(|error| (error.range.start(), error.range.end()));
    if let Some(max) = max_errors {
        errors.truncate(max);
    }
}

pub(crate) fn shift_range(range: TextRange, delta: i64) -> TextRange {
    TextRange::new(shift_size(range.start(), delta), shift_size(range.end(), delta))
}

pub(crate) fn shift_size(offset: TextSize, delta: i64) -> TextSize {
    let shifted = i64::from(u32::from(offset)) + delta;
    TextSize::new(u32::try_from(shifted).unwrap_or(0))
}

/// An edit that cannot be applied to the text it targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is outside the text (length {len:?})")]
    OutOfBounds { range: TextRange, len: TextSize },

    #[error("edit boundary {offset:?} is not on a character boundary")]
    NotCharBoundary { offset: TextSize },
}
