//! Formatted output to writers with reusable buffers.

use std::io::Write;

use super::engine::Replacer;
use super::error::RenderError;
use super::render::Scratch;
use crate::parser::Template;
use crate::types::MacroValue;

const MIN_CAPACITY: usize = 64;

/// Renders templates into an internal buffer before writing them out.
///
/// Output reaches the sink only after the whole template rendered, so a
/// failed render never writes partial output. The buffers are reused across
/// calls. A printer is not meant to be shared between threads; create one
/// per worker.
///
/// # Example
///
/// ```
/// use macro_template::{Printer, Replacer, values};
///
/// let replacer = Replacer::default();
/// let mut printer = Printer::new(&replacer);
///
/// let mut out = Vec::new();
/// let written = printer
///     .fprintf(&mut out, "${greeting}, ${name}!", &values! { "greeting" => "Hi", "name" => "Ann" })
///     .unwrap();
/// assert_eq!(written, 8);
/// assert_eq!(out, b"Hi, Ann!");
/// ```
#[derive(Debug)]
pub struct Printer<'r> {
    replacer: &'r Replacer,
    buffer: Vec<u8>,
    scratch: Scratch,
}

impl<'r> Printer<'r> {
    /// Create a printer rendering with `replacer`.
    pub fn new(replacer: &'r Replacer) -> Self {
        Self::with_capacity(replacer, MIN_CAPACITY)
    }

    /// Create a printer whose buffer starts with at least `capacity` bytes.
    pub fn with_capacity(replacer: &'r Replacer, capacity: usize) -> Self {
        Self {
            replacer,
            buffer: Vec::with_capacity(capacity.max(MIN_CAPACITY)),
            scratch: Scratch::default(),
        }
    }

    /// The replacer this printer renders with.
    pub fn replacer(&self) -> &'r Replacer {
        self.replacer
    }

    /// Render a compiled template and write it to `w`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns any render error before writing anything, or
    /// [`RenderError::Io`] if the write fails.
    pub fn execute<W: Write>(
        &mut self,
        w: &mut W,
        template: &Template,
        values: &[MacroValue<'_>],
    ) -> Result<usize, RenderError> {
        self.buffer.clear();
        self.replacer
            .render_with(&mut self.buffer, template, values, &mut self.scratch)?;
        w.write_all(&self.buffer)?;
        Ok(self.buffer.len())
    }

    /// Replace tokens in `text` and write the result to `w`.
    ///
    /// Returns the number of bytes written.
    pub fn fprintf<W: Write>(
        &mut self,
        w: &mut W,
        text: &str,
        values: &[MacroValue<'_>],
    ) -> Result<usize, RenderError> {
        self.sprintf(text, values)?;
        w.write_all(&self.buffer)?;
        Ok(self.buffer.len())
    }

    /// Replace tokens in `text`, returning the rendered bytes.
    ///
    /// The returned slice is valid until the next call on this printer.
    pub fn sprintf(&mut self, text: &str, values: &[MacroValue<'_>]) -> Result<&[u8], RenderError> {
        self.buffer.clear();
        self.replacer
            .replace_with(&mut self.buffer, text, values, &mut self.scratch)?;
        Ok(&self.buffer)
    }

    /// The bytes produced by the last call, empty if it failed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}
