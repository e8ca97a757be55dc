use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Error as FmtError, Formatter, Result as FmtResult};
use std::io::Write;
use std::ops::Deref;
use std::vec::IntoIter;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use thiserror::Error;

use crate::parser::Template;

/// Boxed error returned by caller-supplied filters and appendable values.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A caller-defined value that knows how to serialize itself into a buffer.
///
/// Implementations append their bytes to `buf` and must not touch anything
/// already in it. On error the renderer truncates whatever was appended.
pub trait Appendable {
    /// Append this value's bytes to `buf`.
    fn append_to(&self, buf: &mut Vec<u8>) -> Result<(), BoxError>;
}

/// Error produced while appending a [`Value`].
#[derive(Debug, Error)]
pub enum AppendError {
    /// The value is [`Value::None`].
    #[error("no value")]
    Missing,

    /// A caller-supplied value failed to serialize.
    #[error(transparent)]
    Custom(BoxError),
}

/// A replacement value for a macro.
///
/// Values borrow where they can so that a binding list can be built on the
/// stack for each render call without allocating.
///
/// # Example
///
/// ```
/// use macro_template::Value;
///
/// let mut buf = Vec::new();
/// Value::from(4.2).append_to(&mut buf).unwrap();
/// buf.push(b' ');
/// Value::from(-42).append_to(&mut buf).unwrap();
/// assert_eq!(buf, b"4.2 -42");
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// Explicit absence of a value.
    None,

    /// A UTF-8 string, appended verbatim.
    String(Cow<'a, str>),

    /// Raw bytes, appended verbatim. Need not be UTF-8.
    Bytes(Cow<'a, [u8]>),

    /// A float, appended as its shortest round-trip decimal form without an exponent.
    /// Non-finite floats append as `NaN`, `+Inf` or `-Inf`.
    Float(f64),

    /// A signed integer.
    Int(i64),

    /// An unsigned integer.
    Uint(u64),

    /// `true` or `false`.
    Bool(bool),

    /// String items joined with a separator.
    Concat {
        separator: &'a str,
        items: &'a [&'a str],
    },

    /// Any displayable value, formatted with `{}`.
    Display(&'a dyn Display),

    /// A caller-defined appendable value.
    Custom(&'a dyn Appendable),

    /// A point in time, formatted with a chrono format string.
    Time {
        time: DateTime<FixedOffset>,
        format: &'a str,
    },

    /// A point in time, appended as its Unix timestamp in seconds.
    Unix(DateTime<Utc>),

    /// A compiled template, rendered with the same bindings as the
    /// surrounding render call.
    ///
    /// Outside a render call, [`Value::append_to`] appends the template's
    /// source text instead.
    Template(&'a Template),
}

impl<'a> Value<'a> {
    /// Create a value formatted through its [`Display`] implementation.
    pub fn display(value: &'a dyn Display) -> Self {
        Value::Display(value)
    }

    /// Create a value from a caller-defined [`Appendable`].
    pub fn custom(value: &'a dyn Appendable) -> Self {
        Value::Custom(value)
    }

    /// Create a value joining `items` with `separator`.
    pub fn concat(separator: &'a str, items: &'a [&'a str]) -> Self {
        Value::Concat { separator, items }
    }

    /// Create a value formatting `time` with `format` (chrono `strftime` syntax).
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use macro_template::Value;
    ///
    /// let time = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
    /// let value = Value::time(&time, "%Y-%m-%d %H:%M");
    /// assert_eq!(value.to_string(), "2024-03-09 07:05");
    /// ```
    pub fn time<Tz: TimeZone>(time: &DateTime<Tz>, format: &'a str) -> Self {
        Value::Time {
            time: time.fixed_offset(),
            format,
        }
    }

    /// Create a value appending the Unix timestamp of `time`.
    pub fn unix<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Value::Unix(time.with_timezone(&Utc))
    }

    /// Check if this is [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Append this value's serialized bytes to `buf`.
    ///
    /// On error nothing is guaranteed about the bytes appended so far; callers
    /// that need rollback record `buf.len()` first.
    pub fn append_to(&self, buf: &mut Vec<u8>) -> Result<(), AppendError> {
        match self {
            Value::None => return Err(AppendError::Missing),
            Value::String(s) => buf.extend_from_slice(s.as_bytes()),
            Value::Bytes(b) => buf.extend_from_slice(b),
            Value::Float(n) if n.is_nan() => buf.extend_from_slice(b"NaN"),
            Value::Float(n) if n.is_infinite() => {
                buf.extend_from_slice(if n.is_sign_positive() { b"+Inf" } else { b"-Inf" });
            }
            Value::Float(n) => write!(buf, "{n}").map_err(|e| AppendError::Custom(e.into()))?,
            Value::Int(n) => write!(buf, "{n}").map_err(|e| AppendError::Custom(e.into()))?,
            Value::Uint(n) => write!(buf, "{n}").map_err(|e| AppendError::Custom(e.into()))?,
            Value::Bool(true) => buf.extend_from_slice(b"true"),
            Value::Bool(false) => buf.extend_from_slice(b"false"),
            Value::Concat { separator, items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        buf.extend_from_slice(separator.as_bytes());
                    }
                    buf.extend_from_slice(item.as_bytes());
                }
            }
            Value::Display(v) => write!(buf, "{v}").map_err(|e| AppendError::Custom(e.into()))?,
            Value::Custom(v) => v.append_to(buf).map_err(AppendError::Custom)?,
            Value::Time { time, format } => {
                write!(buf, "{}", time.format(format)).map_err(|e| AppendError::Custom(e.into()))?;
            }
            Value::Unix(time) => write!(buf, "{}", time.timestamp())
                .map_err(|e| AppendError::Custom(e.into()))?,
            Value::Template(template) => write!(buf, "{template}")
                .map_err(|e| AppendError::Custom(e.into()))?,
        }
        Ok(())
    }
}

impl Debug for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::None => f.write_str("None"),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Concat { separator, items } => f
                .debug_struct("Concat")
                .field("separator", separator)
                .field("items", items)
                .finish(),
            Value::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
            Value::Custom(_) => f.write_str("Custom(..)"),
            Value::Time { time, format } => f
                .debug_struct("Time")
                .field("time", time)
                .field("format", format)
                .finish(),
            Value::Unix(time) => f.debug_tuple("Unix").field(time).finish(),
            Value::Template(template) => {
                f.debug_tuple("Template").field(&template.to_string()).finish()
            }
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut buf = Vec::new();
        self.append_to(&mut buf).map_err(|_| FmtError)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

// From implementations for common types

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Value<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Value::Bytes(Cow::Borrowed(b.as_slice()))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(b))
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value<'_> {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i16> for Value<'_> {
    fn from(n: i16) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i8> for Value<'_> {
    fn from(n: i8) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<isize> for Value<'_> {
    fn from(n: isize) -> Self {
        i64::try_from(n).map_or_else(|_| Value::String(Cow::Owned(n.to_string())), Value::Int)
    }
}

impl From<u64> for Value<'_> {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<u32> for Value<'_> {
    fn from(n: u32) -> Self {
        Value::Uint(u64::from(n))
    }
}

impl From<u16> for Value<'_> {
    fn from(n: u16) -> Self {
        Value::Uint(u64::from(n))
    }
}

impl From<u8> for Value<'_> {
    fn from(n: u8) -> Self {
        Value::Uint(u64::from(n))
    }
}

impl From<usize> for Value<'_> {
    fn from(n: usize) -> Self {
        u64::try_from(n).map_or_else(|_| Value::String(Cow::Owned(n.to_string())), Value::Uint)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value<'_> {
    fn from(time: DateTime<Tz>) -> Self {
        Value::unix(&time)
    }
}

impl<'a> From<&'a Template> for Value<'a> {
    fn from(template: &'a Template) -> Self {
        Value::Template(template)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// A [`Value`] bound to a macro name.
#[derive(Debug, Clone)]
pub struct MacroValue<'a> {
    name: Cow<'a, str>,
    value: Value<'a>,
}

impl<'a> MacroValue<'a> {
    /// Bind `value` to the macro `name`.
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The macro name this value is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound value.
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }
}

/// Find the first value bound to `name`.
///
/// This is a linear scan, so earlier bindings shadow later ones.
pub fn lookup<'v, 'a>(values: &'v [MacroValue<'a>], name: &str) -> Option<&'v Value<'a>> {
    values
        .iter()
        .find(|binding| binding.name == name)
        .map(|binding| &binding.value)
}

/// An ordered list of macro bindings.
///
/// Duplicates are kept: [`MacroValues::lookup`] returns the first match, so a
/// binding shadows any later binding for the same macro.
///
/// # Example
///
/// ```
/// use macro_template::{MacroValues, Value};
///
/// let values = MacroValues::new().bind("foo", "bar").bind("foo", "baz");
/// assert_eq!(values.len(), 2);
/// assert_eq!(values.lookup("foo").unwrap().to_string(), "bar");
/// assert!(values.lookup("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MacroValues<'a>(Vec<MacroValue<'a>>);

impl<'a> MacroValues<'a> {
    /// Create an empty binding list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty binding list with room for `capacity` bindings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a binding, returning the list.
    #[must_use]
    pub fn bind(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        self.push(MacroValue::new(name, value));
        self
    }

    /// Append a binding.
    pub fn push(&mut self, binding: MacroValue<'a>) {
        self.0.push(binding);
    }

    /// Find the first value bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<&Value<'a>> {
        lookup(&self.0, name)
    }
}

impl<'a> Deref for MacroValues<'a> {
    type Target = [MacroValue<'a>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> FromIterator<MacroValue<'a>> for MacroValues<'a> {
    fn from_iter<I: IntoIterator<Item = MacroValue<'a>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> From<Vec<MacroValue<'a>>> for MacroValues<'a> {
    fn from(values: Vec<MacroValue<'a>>) -> Self {
        Self(values)
    }
}

impl<'a> IntoIterator for MacroValues<'a> {
    type Item = MacroValue<'a>;
    type IntoIter = IntoIter<MacroValue<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
