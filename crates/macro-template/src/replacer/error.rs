//! Error types for configuring and rendering.

use std::io::Error as IoError;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::parser::ParseError;
use crate::types::BoxError;

/// Errors that occur while building a [`Replacer`](crate::Replacer).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A delimiter was empty after trimming.
    #[error("invalid {which} delimiter: must not be empty")]
    EmptyDelimiter { which: &'static str },

    /// An expansion body failed to parse.
    #[error("expansion for macro '{name}' failed to parse: {source}")]
    Expansion {
        name: String,
        #[source]
        source: ParseError,
    },

    /// Expansion bodies reference each other in a cycle.
    #[error("cyclic macro expansion: {}", .chain.join(" -> "))]
    ExpansionCycle { chain: Vec<String> },
}

/// An error that aborted a render call.
///
/// Every render error leaves the caller's buffer exactly as long as it was
/// before the call.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template text has an unmatched delimiter.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No binding matched and no default value is configured, or the
    /// binding is [`Value::None`](crate::Value::None).
    #[error("macro not found: '{name}'")]
    MacroNotFound { name: String },

    /// A token names a filter that is not registered.
    #[error("missing filter '{name}'{}", format_suggestions(.suggestions))]
    MissingFilter {
        name: String,
        suggestions: Vec<String>,
    },

    /// A filter returned an error.
    #[error("filter '{name}' failed: {source}")]
    Filter {
        name: String,
        #[source]
        source: BoxError,
    },

    /// A caller-supplied value failed to serialize.
    #[error("value for macro '{name}' failed to serialize: {source}")]
    Value {
        name: String,
        #[source]
        source: BoxError,
    },

    /// Template values nest deeper than the render limit, usually because a
    /// template is bound inside its own bindings.
    #[error("template value for macro '{name}' nests deeper than {limit} levels")]
    TemplateDepth { name: String, limit: usize },

    /// Writing rendered output to a sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] IoError),

    /// Rendered output requested as a string is not UTF-8.
    #[error("rendered output is not valid UTF-8")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl RenderError {
    /// Check if this is [`RenderError::MacroNotFound`].
    pub fn is_macro_not_found(&self) -> bool {
        matches!(self, RenderError::MacroNotFound { .. })
    }

    /// The macro or filter name this error refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            RenderError::MacroNotFound { name }
            | RenderError::MissingFilter { name, .. }
            | RenderError::Filter { name, .. }
            | RenderError::Value { name, .. }
            | RenderError::TemplateDepth { name, .. } => Some(name),
            RenderError::Parse(_) | RenderError::Io(_) | RenderError::InvalidUtf8(_) => None,
        }
    }
}

/// Format a suggestions list for error messages.
fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Suggest up to three names from `available` that are close to `name`.
///
/// Uses Levenshtein distance: at most 1 for names of three characters or
/// fewer, at most 2 otherwise. Closest names come first.
pub fn compute_suggestions<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut candidates: Vec<(usize, &str)> = available
        .into_iter()
        .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort_unstable();
    candidates
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_are_sorted_and_limited() {
        let available = ["hex", "hexx", "heks", "base64", "hax", "he"];
        let suggestions = compute_suggestions("hexs", available);
        assert_eq!(suggestions, vec!["heks", "hex", "hexx"]);
    }

    #[test]
    fn short_names_allow_one_edit() {
        assert_eq!(compute_suggestions("hx", ["hex", "upper"]), vec!["hex"]);
        assert!(compute_suggestions("ab", ["hex"]).is_empty());
    }

    #[test]
    fn missing_filter_message_lists_suggestions() {
        let err = RenderError::MissingFilter {
            name: "hexx".into(),
            suggestions: vec!["hex".into()],
        };
        assert_eq!(err.to_string(), "missing filter 'hexx'; did you mean: hex?");
        let err = RenderError::MissingFilter {
            name: "zzz".into(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "missing filter 'zzz'");
    }
}
