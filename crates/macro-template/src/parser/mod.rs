//! Template scanning and compilation.
//!
//! The scanner finds delimited tokens in raw text. The compiler turns a
//! template string into a [`Template`]: an ordered list of literal-prefix /
//! token chunks plus a literal tail, with aliases resolved and expansion
//! macros spliced in.

mod compile;
pub mod error;
mod scanner;
mod template;

pub use error::ParseError;
pub use scanner::{Scanned, find_next_token};
pub use template::{Chunk, Template};
