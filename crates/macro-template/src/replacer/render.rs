//! Rendering: substituting bound values for tokens.
//!
//! All rendering appends to a caller-owned byte buffer. Every fallible step
//! records the buffer length before writing and truncates back to it on
//! failure, so an aborted render leaves the buffer exactly as it was.
//!
//! For each token:
//! 1. Resolve the macro through the alias map, once (inline rendering only;
//!    compiled tokens and expansion bodies are already resolved).
//! 2. Render expansion macros from their compiled body.
//! 3. Echo skipped macros back as placeholder text.
//! 4. Append the first matching binding, else the default value. A bound
//!    template renders with the same bindings.
//! 5. Run the filter chain over the appended bytes and splice the result in
//!    place of them.

use std::mem;

use log::debug;

use super::engine::Replacer;
use super::error::{RenderError, compute_suggestions};
use crate::parser::{Template, find_next_token};
use crate::types::{AppendError, MacroValue, Value, lookup, token};

/// How deeply template values may nest inside each other.
pub const MAX_TEMPLATE_DEPTH: usize = 32;

/// Reusable state for a render call.
///
/// Filters read the current value from one buffer and write the next value
/// into the other. A scratch must not be shared between concurrent renders.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    input: Vec<u8>,
    output: Vec<u8>,
    depth: usize,
}

impl Replacer {
    /// Append a compiled template to `buf`, replacing tokens with values.
    ///
    /// # Errors
    ///
    /// Returns an error if a macro has no value, a filter is missing or
    /// fails, or a custom value fails to serialize. `buf` is left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use macro_template::{Replacer, values};
    ///
    /// let replacer = Replacer::default();
    /// let template = replacer.parse("${foo} ${bar}").unwrap();
    ///
    /// let mut buf = b"> ".to_vec();
    /// replacer
    ///     .render(&mut buf, &template, &values! { "foo" => "bar", "bar" => 4.2 })
    ///     .unwrap();
    /// assert_eq!(buf, b"> bar 4.2");
    /// ```
    pub fn render(
        &self,
        buf: &mut Vec<u8>,
        template: &Template,
        values: &[MacroValue<'_>],
    ) -> Result<(), RenderError> {
        self.render_with(buf, template, values, &mut Scratch::default())
    }

    /// Render a compiled template into a new string.
    pub fn render_string(
        &self,
        template: &Template,
        values: &[MacroValue<'_>],
    ) -> Result<String, RenderError> {
        let mut buf = Vec::with_capacity(template.estimate_size(16));
        self.render(&mut buf, template, values)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Append template text to `buf`, scanning and replacing in one pass.
    ///
    /// Equivalent to compiling `text` with [`Replacer::parse`] and rendering
    /// the result, without building a [`Template`].
    ///
    /// # Errors
    ///
    /// As [`Replacer::render`], plus [`RenderError::Parse`] for unmatched
    /// delimiters. `buf` is left unchanged.
    pub fn replace(
        &self,
        buf: &mut Vec<u8>,
        text: &str,
        values: &[MacroValue<'_>],
    ) -> Result<(), RenderError> {
        self.replace_with(buf, text, values, &mut Scratch::default())
    }

    /// Replace tokens in template text, returning a new string.
    pub fn replace_string(
        &self,
        text: &str,
        values: &[MacroValue<'_>],
    ) -> Result<String, RenderError> {
        let mut buf = Vec::with_capacity(text.len());
        self.replace(&mut buf, text, values)?;
        Ok(String::from_utf8(buf)?)
    }

    pub(crate) fn render_with(
        &self,
        buf: &mut Vec<u8>,
        template: &Template,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let original = buf.len();
        let result = self.append_template(buf, template, values, scratch);
        if result.is_err() {
            buf.truncate(original);
        }
        result
    }

    pub(crate) fn replace_with(
        &self,
        buf: &mut Vec<u8>,
        text: &str,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let original = buf.len();
        let result = self.append_text(buf, text, values, scratch);
        if result.is_err() {
            buf.truncate(original);
        }
        result
    }

    fn append_template(
        &self,
        buf: &mut Vec<u8>,
        template: &Template,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        buf.reserve(template.estimate_size(0));
        for chunk in template.chunks() {
            buf.extend_from_slice(chunk.prefix().as_bytes());
            let (macro_name, filters) = chunk.token().split();
            self.replace_resolved(buf, macro_name, filters, values, scratch)?;
        }
        buf.extend_from_slice(template.tail().as_bytes());
        Ok(())
    }

    fn append_text(
        &self,
        buf: &mut Vec<u8>,
        text: &str,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let mut pos = 0;
        loop {
            let Some(scanned) = find_next_token(text, pos, self.delimiters())? else {
                break;
            };
            buf.extend_from_slice(scanned.prefix.as_bytes());
            self.replace_token(buf, scanned.token, values, scratch)?;
            pos = scanned.next;
        }
        buf.extend_from_slice(text[pos..].as_bytes());
        Ok(())
    }

    /// Replace raw token text, resolving its alias.
    fn replace_token(
        &self,
        buf: &mut Vec<u8>,
        token: &str,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let (macro_name, filters) = token::split(token);
        let macro_name = self.aliases().resolve(macro_name);
        self.replace_resolved(buf, macro_name, filters, values, scratch)
    }

    /// Replace an alias-resolved macro, rendering expansion macros from their
    /// compiled body.
    fn replace_resolved(
        &self,
        buf: &mut Vec<u8>,
        macro_name: &str,
        filters: &str,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let Some(expansion) = self.expansion(macro_name) else {
            return self.replace_macro(buf, macro_name, filters, values, scratch);
        };
        if token::filter_names(filters).next().is_some() {
            debug!("filters '{filters}' ignored on expansion macro '{macro_name}'");
        }
        let offset = buf.len();
        let result = self.append_template(buf, expansion, values, scratch);
        if result.is_err() {
            buf.truncate(offset);
        }
        result
    }

    /// Replace a resolved macro and apply its filters.
    fn replace_macro(
        &self,
        buf: &mut Vec<u8>,
        macro_name: &str,
        filters: &str,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        if self.is_skipped(macro_name) {
            self.delimiters().append_token(buf, macro_name, filters);
            return Ok(());
        }

        let offset = buf.len();
        let appended = match (lookup(values, macro_name), self.default_value()) {
            (Some(Value::Template(template)), _) => {
                if let Err(err) = self.append_nested(buf, macro_name, template, values, scratch) {
                    buf.truncate(offset);
                    return Err(err);
                }
                Ok(())
            }
            (Some(value), _) => value.append_to(buf),
            (None, Some(default)) => {
                buf.extend_from_slice(default.as_bytes());
                Ok(())
            }
            (None, None) => Err(AppendError::Missing),
        };
        if let Err(err) = appended {
            buf.truncate(offset);
            return Err(match err {
                AppendError::Missing => RenderError::MacroNotFound {
                    name: macro_name.to_owned(),
                },
                AppendError::Custom(source) => RenderError::Value {
                    name: macro_name.to_owned(),
                    source,
                },
            });
        }

        if let Err(err) = self.apply_filters(buf, offset, filters, scratch) {
            buf.truncate(offset);
            return Err(err);
        }
        Ok(())
    }

    /// Render a template bound as the value of `macro_name`.
    fn append_nested(
        &self,
        buf: &mut Vec<u8>,
        macro_name: &str,
        template: &Template,
        values: &[MacroValue<'_>],
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        if scratch.depth >= MAX_TEMPLATE_DEPTH {
            return Err(RenderError::TemplateDepth {
                name: macro_name.to_owned(),
                limit: MAX_TEMPLATE_DEPTH,
            });
        }
        scratch.depth += 1;
        let result = self.append_template(buf, template, values, scratch);
        scratch.depth -= 1;
        result
    }

    /// Run the filter chain over `buf[offset..]`, replacing it with the
    /// final filtered value.
    fn apply_filters(
        &self,
        buf: &mut Vec<u8>,
        offset: usize,
        filters: &str,
        scratch: &mut Scratch,
    ) -> Result<(), RenderError> {
        let Scratch { input, output, .. } = scratch;
        let mut filtered = false;

        for name in token::filter_names(filters) {
            let Some(filter) = self.filters().get(name) else {
                return Err(RenderError::MissingFilter {
                    name: name.to_owned(),
                    suggestions: compute_suggestions(name, self.filters().names()),
                });
            };
            output.clear();
            let value = if filtered { input.as_slice() } else { &buf[offset..] };
            filter(output, value).map_err(|source| RenderError::Filter {
                name: name.to_owned(),
                source,
            })?;
            mem::swap(input, output);
            filtered = true;
        }

        if filtered {
            buf.truncate(offset);
            buf.extend_from_slice(input);
        }
        Ok(())
    }
}
