//! The replacement engine: configuration, filters and rendering.

mod config;
mod engine;
mod error;
pub mod filters;
mod printer;
mod render;
mod url_template;

pub use config::{AliasMap, Expansions, ReplacerConfig, SkipList};
pub use engine::Replacer;
pub use error::{ConfigError, RenderError, compute_suggestions};
pub use filters::{FilterFn, FilterRegistry};
pub use printer::Printer;
pub use render::MAX_TEMPLATE_DEPTH;
