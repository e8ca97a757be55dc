//! Delimiter scanning using winnow.
//!
//! Finds the next `start ... end` pair in template text. Handles:
//! - Literal text before the token (the prefix)
//! - Missing end markers (unmatched delimiter)
//! - A second start marker before the end marker (also unmatched)
//! - Whitespace around the token text

use winnow::combinator::terminated;
use winnow::prelude::*;
use winnow::token::take_until;

use super::error::ParseError;
use crate::types::Delimiters;

/// A token located by [`find_next_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned<'s> {
    /// Literal text between the scan position and the start marker.
    pub prefix: &'s str,
    /// Token text between the markers, trimmed of surrounding whitespace.
    pub token: &'s str,
    /// Byte offset just past the end marker, where scanning resumes.
    pub next: usize,
}

/// Find the first token in `source` at or after byte offset `pos`.
///
/// Returns `Ok(None)` when no start marker remains; `source[pos..]` is then
/// literal tail. Positions in errors are offsets into `source`.
///
/// # Example
///
/// ```
/// use macro_template::Delimiters;
/// use macro_template::parser::find_next_token;
///
/// let delimiters = Delimiters::default();
/// let scanned = find_next_token("a ${ foo } b", 0, &delimiters).unwrap().unwrap();
/// assert_eq!(scanned.prefix, "a ");
/// assert_eq!(scanned.token, "foo");
/// assert_eq!(scanned.next, 10);
/// assert!(find_next_token("a ${ foo } b", 10, &delimiters).unwrap().is_none());
/// assert!(find_next_token("a ${foo", 0, &delimiters).is_err());
/// ```
pub fn find_next_token<'s>(
    source: &'s str,
    pos: usize,
    delimiters: &Delimiters,
) -> Result<Option<Scanned<'s>>, ParseError> {
    let Some(mut input) = source.get(pos..) else {
        return Ok(None);
    };
    let (start, end) = (delimiters.start(), delimiters.end());

    let prefix: ModalResult<&str> = terminated(take_until(0.., start), start).parse_next(&mut input);
    let Ok(prefix) = prefix else {
        return Ok(None);
    };
    let position = pos + prefix.len();

    let body: ModalResult<&str> = terminated(take_until(0.., end), end).parse_next(&mut input);
    let body = body.map_err(|_| ParseError::unmatched(start, position))?;
    if body.contains(start) {
        return Err(ParseError::unmatched(start, position));
    }

    Ok(Some(Scanned {
        prefix,
        token: body.trim(),
        next: source.len() - input.len(),
    }))
}
