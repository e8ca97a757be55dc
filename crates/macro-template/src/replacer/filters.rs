//! Filter registry and built-in filters.
//!
//! Filters are pure byte transforms applied to a token's serialized value,
//! in the order the token names them (`${name:hex:upper}`).

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use url::form_urlencoded;

use crate::types::BoxError;

/// Filter function signature.
///
/// Takes:
/// - `dst`: The buffer to append the filtered value to
/// - `value`: The current value bytes
///
/// Filters append only; they never read or modify what is already in `dst`.
pub type FilterFn = fn(&mut Vec<u8>, &[u8]) -> Result<(), BoxError>;

/// Registry mapping filter names to filter functions.
///
/// Registering a name twice keeps the last function.
///
/// # Example
///
/// ```
/// use macro_template::FilterRegistry;
/// use macro_template::replacer::filters;
///
/// let registry = FilterRegistry::new().register("hex", filters::hex);
/// let hex = registry.get("hex").unwrap();
/// let mut out = Vec::new();
/// hex(&mut out, b"\x00\xff").unwrap();
/// assert_eq!(out, b"00ff");
/// assert!(registry.get("base64").is_none());
/// ```
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: BTreeMap<String, FilterFn>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in filters: `hex`, `base64`,
    /// `base64url`, `urlquery`, `upper` and `lower`.
    pub fn builtin() -> Self {
        Self::new()
            .register("hex", hex)
            .register("base64", base64)
            .register("base64url", base64_url)
            .register("urlquery", url_query)
            .register("upper", upper)
            .register("lower", lower)
    }

    /// Register `filter` under `name`, returning the registry.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, filter: FilterFn) -> Self {
        self.insert(name, filter);
        self
    }

    /// Register `filter` under `name`, replacing any earlier filter.
    pub fn insert(&mut self, name: impl Into<String>, filter: FilterFn) {
        self.filters.insert(name.into(), filter);
    }

    /// Get a filter by name.
    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).copied()
    }

    /// Check if a filter is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Iterate registered filter names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Debug for FilterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<S: Into<String>> FromIterator<(S, FilterFn)> for FilterRegistry {
    fn from_iter<I: IntoIterator<Item = (S, FilterFn)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, filter) in iter {
            registry.insert(name, filter);
        }
        registry
    }
}

/// Lowercase hexadecimal encoding.
pub fn hex(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    dst.reserve(value.len() * 2);
    for &byte in value {
        dst.push(DIGITS[usize::from(byte >> 4)]);
        dst.push(DIGITS[usize::from(byte & 0x0f)]);
    }
    Ok(())
}

/// Standard padded base64.
pub fn base64(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    encode_base64(&STANDARD, dst, value)
}

/// URL-safe padded base64.
pub fn base64_url(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    encode_base64(&URL_SAFE, dst, value)
}

fn encode_base64(engine: &impl base64::Engine, dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    let len = base64::encoded_len(value.len(), true).ok_or("base64 output length overflows usize")?;
    let offset = dst.len();
    dst.resize(offset + len, 0);
    let written = engine.encode_slice(value, &mut dst[offset..])?;
    dst.truncate(offset + written);
    Ok(())
}

/// Query-component escaping (`application/x-www-form-urlencoded`, space as `+`).
pub fn url_query(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    for part in form_urlencoded::byte_serialize(value) {
        dst.extend_from_slice(part.as_bytes());
    }
    Ok(())
}

/// ASCII uppercase.
pub fn upper(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    dst.extend(value.iter().map(u8::to_ascii_uppercase));
    Ok(())
}

/// ASCII lowercase.
pub fn lower(dst: &mut Vec<u8>, value: &[u8]) -> Result<(), BoxError> {
    dst.extend(value.iter().map(u8::to_ascii_lowercase));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(filter: FilterFn, value: &[u8]) -> Vec<u8> {
        let mut out = b"keep".to_vec();
        filter(&mut out, value).unwrap();
        out.split_off(4)
    }

    #[test]
    fn hex_encodes_lowercase() {
        assert_eq!(apply(hex, b"Hello world!"), b"48656c6c6f20776f726c6421");
    }

    #[test]
    fn base64_variants() {
        assert_eq!(apply(base64, b"Hello world!"), b"SGVsbG8gd29ybGQh");
        assert_eq!(apply(base64, b"\xfb\xff"), b"+/8=");
        assert_eq!(apply(base64_url, b"\xfb\xff"), b"-_8=");
    }

    #[test]
    fn url_query_escapes_space_as_plus() {
        assert_eq!(apply(url_query, b"Hello world!"), b"Hello+world%21");
    }

    #[test]
    fn case_filters_are_ascii_only() {
        assert_eq!(apply(upper, "abc é".as_bytes()), "ABC é".as_bytes());
        assert_eq!(apply(lower, b"ABC"), b"abc");
    }

    #[test]
    fn filters_append_after_existing_bytes() {
        let mut out = b"x=".to_vec();
        hex(&mut out, b"\x01").unwrap();
        assert_eq!(out, b"x=01");
    }

    #[test]
    fn builtin_names() {
        let registry = FilterRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["base64", "base64url", "hex", "lower", "upper", "urlquery"]);
    }
}
