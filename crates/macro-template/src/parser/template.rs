use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::types::{Delimiters, Token};

/// One compiled unit: literal text followed by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub(crate) prefix: String,
    pub(crate) token: Token,
}

impl Chunk {
    /// Create a chunk from a literal prefix and a token.
    pub fn new(prefix: impl Into<String>, token: Token) -> Self {
        Self {
            prefix: prefix.into(),
            token,
        }
    }

    /// Literal text preceding the token.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The token, with its macro already resolved through the alias map.
    pub fn token(&self) -> &Token {
        &self.token
    }
}

/// A compiled template.
///
/// Produced by [`Replacer::parse`](crate::Replacer::parse). Immutable, so a
/// single template can be rendered many times, from many threads, with
/// different bindings.
///
/// Displaying a template reproduces its source with the delimiters it was
/// compiled with and resolved macro names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) tail: String,
    pub(crate) delimiters: Delimiters,
}

impl Template {
    /// Create a template from chunks and a tail.
    pub fn new(chunks: Vec<Chunk>, tail: impl Into<String>, delimiters: Delimiters) -> Self {
        Self {
            chunks,
            tail: tail.into(),
            delimiters,
        }
    }

    /// The compiled chunks, in source order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Literal text after the last token.
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// The delimiters this template was compiled with.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Check if the template contains no tokens.
    pub fn is_literal(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate the tokens, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.chunks.iter().map(Chunk::token)
    }

    /// Estimate the rendered size, allowing `per_token` bytes for each token.
    ///
    /// Useful for sizing a buffer before rendering.
    pub fn estimate_size(&self, per_token: usize) -> usize {
        self.chunks
            .iter()
            .map(|chunk| chunk.prefix.len() + per_token)
            .sum::<usize>()
            + self.tail.len()
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for chunk in &self.chunks {
            f.write_str(&chunk.prefix)?;
            f.write_str(self.delimiters.start())?;
            f.write_str(&chunk.token)?;
            f.write_str(self.delimiters.end())?;
        }
        f.write_str(&self.tail)
    }
}
