//! Template compilation.
//!
//! Compiling scans the source once, resolving each token's macro through the
//! alias map exactly once. Expansion macros are not compiled to chunks of
//! their own: the chunks of their compiled body are spliced in place of the
//! token, with the surrounding literal text merged into the chunk prefixes.

use std::mem;

use log::{debug, trace};

use super::error::ParseError;
use super::scanner::find_next_token;
use super::template::{Chunk, Template};
use crate::replacer::Replacer;
use crate::types::{Token, token};

impl Replacer {
    /// Compile `source` into a reusable [`Template`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnmatchedDelimiter`] for a start marker without
    /// an end marker, or with another start marker before its end marker.
    /// No partial template is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use macro_template::{AliasMap, Replacer};
    ///
    /// let replacer = Replacer::builder()
    ///     .aliases(AliasMap::new().alias("foo", ["Foo"]))
    ///     .build()
    ///     .unwrap();
    /// let template = replacer.parse("${ Foo:hex } bar").unwrap();
    /// assert_eq!(template.chunks().len(), 1);
    /// assert_eq!(template.to_string(), "${foo:hex} bar");
    /// ```
    pub fn parse(&self, source: &str) -> Result<Template, ParseError> {
        let mut chunks = Vec::new();
        let mut pending = String::new();
        let mut pos = 0;

        loop {
            let Some(scanned) = find_next_token(source, pos, self.delimiters())? else {
                break;
            };
            pending.push_str(scanned.prefix);
            let (macro_name, filters) = token::split(scanned.token);
            let macro_name = self.aliases().resolve(macro_name);
            if self.expansion(macro_name).is_some() {
                debug!("expanding macro '{macro_name}' at offset {pos}");
            }
            self.push_resolved(&mut chunks, &mut pending, macro_name, filters);
            pos = scanned.next;
        }

        pending.push_str(&source[pos..]);
        Ok(Template::new(chunks, pending, self.delimiters().clone()))
    }

    /// Render a template back to source text using this replacer's
    /// delimiters, inlining any expansion macros.
    ///
    /// This is for diagnostics; it never looks at values.
    pub fn render_source(&self, template: &Template) -> String {
        let mut out = String::with_capacity(template.estimate_size(8));
        self.write_source(&mut out, template);
        out
    }

    /// Push a chunk for an alias-resolved macro, splicing in the compiled
    /// chunks of an expansion macro instead.
    ///
    /// Expansion bodies were resolved when they were compiled, so their
    /// macros are not resolved again here.
    fn push_resolved(
        &self,
        chunks: &mut Vec<Chunk>,
        pending: &mut String,
        macro_name: &str,
        filters: &str,
    ) {
        let Some(expansion) = self.expansion(macro_name) else {
            let token = Token::new(macro_name, token::filter_names(filters));
            trace!("chunk {}: {token}", chunks.len());
            chunks.push(Chunk::new(mem::take(pending), token));
            return;
        };
        if token::filter_names(filters).next().is_some() {
            debug!("filters '{filters}' ignored on expansion macro '{macro_name}'");
        }
        for chunk in expansion.chunks() {
            pending.push_str(chunk.prefix());
            let (macro_name, filters) = chunk.token().split();
            self.push_resolved(chunks, pending, macro_name, filters);
        }
        pending.push_str(expansion.tail());
    }

    fn write_source(&self, out: &mut String, template: &Template) {
        for chunk in template.chunks() {
            out.push_str(chunk.prefix());
            match self.expansion(chunk.token().macro_name()) {
                Some(expansion) => self.write_source(out, expansion),
                None => self.delimiters().write_token(out, chunk.token()),
            }
        }
        out.push_str(template.tail());
    }
}
