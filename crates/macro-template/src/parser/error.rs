//! Parse error types.

use thiserror::Error;

/// An error that occurred while scanning template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A start marker without a matching end marker, or a start marker
    /// nested inside a token. `position` is the byte offset of the start
    /// marker in the scanned text.
    #[error("unmatched delimiter {delimiter:?} at position {position}")]
    UnmatchedDelimiter { delimiter: String, position: usize },
}

impl ParseError {
    pub(crate) fn unmatched(delimiter: &str, position: usize) -> Self {
        ParseError::UnmatchedDelimiter {
            delimiter: delimiter.to_owned(),
            position,
        }
    }
}
