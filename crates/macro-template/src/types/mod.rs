//! Core types: delimiters, tokens and replacement values.

mod delimiters;
pub mod token;
mod value;

pub use delimiters::{DEFAULT_END, DEFAULT_START, Delimiters};
pub use token::{FILTER_DELIMITER, Token};
pub use value::{AppendError, Appendable, BoxError, MacroValue, MacroValues, Value, lookup};
