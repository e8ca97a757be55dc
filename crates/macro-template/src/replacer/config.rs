//! Configuration collections for a [`Replacer`](crate::Replacer).
//!
//! Macro names given to these collections are reduced to their macro part,
//! so `foo:hex` and `foo` declare the same thing.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::token;

/// Maps alias macro names to their canonical macro name.
///
/// Aliasing is applied once: an alias of an alias is not followed.
///
/// # Example
///
/// ```
/// use macro_template::AliasMap;
///
/// let aliases = AliasMap::new().alias("foo", ["FOO", "Foo"]);
/// assert_eq!(aliases.resolve("Foo"), "foo");
/// assert_eq!(aliases.resolve("FOO"), "foo");
/// assert_eq!(aliases.resolve("foo"), "foo");
/// assert_eq!(aliases.resolve("bar"), "bar");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap(HashMap<String, String>);

impl AliasMap {
    /// Create an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `aliases` as alternative names for `canonical`, returning the map.
    #[must_use]
    pub fn alias<I, S>(mut self, canonical: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(canonical, aliases);
        self
    }

    /// Declare `aliases` as alternative names for `canonical`.
    ///
    /// A later declaration for the same alias replaces an earlier one.
    pub fn insert<I, S>(&mut self, canonical: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (canonical, _) = token::split(canonical.trim());
        for alias in aliases {
            let (alias, _) = token::split(alias.as_ref().trim());
            self.0.insert(alias.to_owned(), canonical.to_owned());
        }
    }

    /// Resolve `name` to its canonical macro name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map_or(name, String::as_str)
    }

    /// Number of declared aliases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no aliases are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Macros whose tokens are echoed back verbatim instead of replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList(HashSet<String>);

impl SkipList {
    /// Create an empty skip list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a macro to the skip list.
    pub fn insert(&mut self, name: &str) {
        let (name, _) = token::split(name.trim());
        self.0.insert(name.to_owned());
    }

    /// Check if `name` is skipped.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of skipped macros.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing is skipped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkipList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for name in iter {
            list.insert(name.as_ref());
        }
        list
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for SkipList {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<String>> for SkipList {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

/// Expansion macros and the template text each one expands to.
///
/// The text is compiled when the replacer is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansions(BTreeMap<String, String>);

impl Expansions {
    /// Create an empty expansion map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the template `text`, returning the map.
    #[must_use]
    pub fn expand(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Bind `name` to the template `text`, replacing any earlier binding.
    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        let (name, _) = token::split(name.trim());
        self.0.insert(name.to_owned(), text.into());
    }

    /// Iterate the bindings in macro name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Number of expansion macros.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no expansions are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Expansions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, text) in iter {
            map.insert(name.as_ref(), text);
        }
        map
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for Expansions {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Expansions {
    fn from(pairs: BTreeMap<String, String>) -> Self {
        pairs.into_iter().collect()
    }
}

/// Plain-data replacer configuration, loadable with serde.
///
/// Filters are code and cannot be described here; pass them to
/// [`Replacer::from_config`](crate::Replacer::from_config) separately.
///
/// # Example
///
/// ```
/// use macro_template::ReplacerConfig;
///
/// let config: ReplacerConfig = serde_json::from_str(r#"{
///     "start": "{{",
///     "end": "}}",
///     "aliases": { "user": ["USER", "login"] },
///     "skip": ["secret"]
/// }"#).unwrap();
/// assert_eq!(config.start.as_deref(), Some("{{"));
/// assert!(config.expansions.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplacerConfig {
    /// Start marker; `${` when absent.
    pub start: Option<String>,
    /// End marker; `}` when absent.
    pub end: Option<String>,
    /// Value used when no binding matches.
    pub default_value: Option<String>,
    /// Canonical macro name to its aliases.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Macros echoed back verbatim.
    pub skip: Vec<String>,
    /// Expansion macro name to template text.
    pub expansions: BTreeMap<String, String>,
}

impl ReplacerConfig {
    /// Build the alias map described by this configuration.
    pub fn alias_map(&self) -> AliasMap {
        let mut map = AliasMap::new();
        for (canonical, aliases) in &self.aliases {
            map.insert(canonical, aliases);
        }
        map
    }
}
