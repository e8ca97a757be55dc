use std::borrow::Cow;

use super::token;
use crate::replacer::ConfigError;

/// Default start marker.
pub const DEFAULT_START: &str = "${";

/// Default end marker.
pub const DEFAULT_END: &str = "}";

/// The pair of markers surrounding a token in template text.
///
/// Both markers are trimmed of surrounding whitespace and must be non-empty.
/// The default pair is `${` and `}`.
///
/// # Example
///
/// ```
/// use macro_template::Delimiters;
///
/// let delimiters = Delimiters::new(" {{", "}} ").unwrap();
/// assert_eq!(delimiters.start(), "{{");
/// assert_eq!(delimiters.end(), "}}");
/// assert!(Delimiters::new("", "}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    start: Cow<'static, str>,
    end: Cow<'static, str>,
}

impl Delimiters {
    /// Create a delimiter pair, trimming both markers.
    pub fn new(start: impl AsRef<str>, end: impl AsRef<str>) -> Result<Self, ConfigError> {
        let start = start.as_ref().trim();
        if start.is_empty() {
            return Err(ConfigError::EmptyDelimiter { which: "start" });
        }
        let end = end.as_ref().trim();
        if end.is_empty() {
            return Err(ConfigError::EmptyDelimiter { which: "end" });
        }
        Ok(Self {
            start: Cow::Owned(start.to_owned()),
            end: Cow::Owned(end.to_owned()),
        })
    }

    /// The start marker.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The end marker.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Append `start + macro_name + filters + end` to `buf`.
    ///
    /// `filters` is a filter suffix as returned by [`Token::split`](crate::Token::split).
    /// It is written in canonical form, with empty filter segments dropped.
    pub fn append_token(&self, buf: &mut Vec<u8>, macro_name: &str, filters: &str) {
        buf.reserve(self.start.len() + macro_name.len() + filters.len() + self.end.len());
        buf.extend_from_slice(self.start.as_bytes());
        buf.extend_from_slice(macro_name.as_bytes());
        for name in token::filter_names(filters) {
            buf.push(b':');
            buf.extend_from_slice(name.as_bytes());
        }
        buf.extend_from_slice(self.end.as_bytes());
    }

    /// Write `start + token + end` to a string.
    pub fn write_token(&self, out: &mut String, token: &str) {
        out.push_str(&self.start);
        out.push_str(token);
        out.push_str(&self.end);
    }

    /// Format `token` as placeholder text.
    pub fn placeholder(&self, token: &str) -> String {
        let mut out = String::with_capacity(self.start.len() + token.len() + self.end.len());
        self.write_token(&mut out, token);
        out
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: Cow::Borrowed(DEFAULT_START),
            end: Cow::Borrowed(DEFAULT_END),
        }
    }
}
