//! Tokens: a macro name followed by an optional chain of filter names.
//!
//! A token is the text found between a pair of delimiters, e.g. `name:hex:upper`.
//! The macro name is everything before the first [`FILTER_DELIMITER`]; the
//! filters are the non-empty segments after it, in order.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Deref;

/// Separator between a macro name and its filters, and between filters.
pub const FILTER_DELIMITER: char = ':';

/// Split token text into its macro name and filter suffix.
///
/// The suffix keeps its leading `:` and is empty when the token has no
/// filters.
///
/// ```
/// use macro_template::types::token::split;
///
/// assert_eq!(split("foo:hex:upper"), ("foo", ":hex:upper"));
/// assert_eq!(split("foo"), ("foo", ""));
/// ```
pub fn split(token: &str) -> (&str, &str) {
    match token.find(FILTER_DELIMITER) {
        Some(pos) => token.split_at(pos),
        None => (token, ""),
    }
}

/// Iterate the filter names of a filter suffix, skipping empty segments.
pub fn filter_names(suffix: &str) -> impl Iterator<Item = &str> {
    suffix
        .split(FILTER_DELIMITER)
        .filter(|name| !name.is_empty())
}

/// An owned token in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Build a token from a macro name and filter names.
    ///
    /// Empty filter names are dropped, so the result is always canonical.
    ///
    /// ```
    /// use macro_template::Token;
    ///
    /// let token = Token::new("foo", ["hex", "", "upper"]);
    /// assert_eq!(token.as_str(), "foo:hex:upper");
    /// assert_eq!(Token::new("foo", [] as [&str; 0]).as_str(), "foo");
    /// ```
    pub fn new<'f>(macro_name: &str, filters: impl IntoIterator<Item = &'f str>) -> Self {
        let mut text = String::from(macro_name);
        for filter in filters.into_iter().filter(|name| !name.is_empty()) {
            text.push(FILTER_DELIMITER);
            text.push_str(filter);
        }
        Self(text)
    }

    /// Parse token text, trimming surrounding whitespace.
    pub fn parse(text: &str) -> Self {
        let (macro_name, suffix) = split(text.trim());
        Self::new(macro_name.trim_end(), filter_names(suffix))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into macro name and filter suffix.
    pub fn split(&self) -> (&str, &str) {
        split(&self.0)
    }

    /// The macro name.
    pub fn macro_name(&self) -> &str {
        self.split().0
    }

    /// The filter names, in application order.
    pub fn filters(&self) -> impl Iterator<Item = &str> {
        filter_names(self.split().1)
    }

    /// Whether this token names at least one filter.
    pub fn has_filters(&self) -> bool {
        self.filters().next().is_some()
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
