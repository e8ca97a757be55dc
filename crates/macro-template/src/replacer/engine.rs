//! The replacer: an immutable engine configuration.
//!
//! A `Replacer` owns everything rendering needs besides the bindings:
//! delimiters, filters, aliases, the skip list, compiled expansions and the
//! default value. It is built once and shared by reference afterwards.

use std::collections::{BTreeMap, HashSet};

use bon::bon;
use log::debug;

use super::config::{AliasMap, Expansions, ReplacerConfig, SkipList};
use super::error::ConfigError;
use super::filters::FilterRegistry;
use crate::parser::Template;
use crate::types::{DEFAULT_END, DEFAULT_START, Delimiters, Token, token};

/// Macro template engine.
///
/// # Example
///
/// ```
/// use macro_template::{FilterRegistry, Replacer, values};
///
/// let replacer = Replacer::builder()
///     .filters(FilterRegistry::builtin())
///     .skip(["secret"])
///     .expansions([("greeting", "Hello, ${name:upper}")])
///     .build()
///     .unwrap();
///
/// let out = replacer
///     .replace_string("${greeting}! ${secret}", &values! { "name" => "world" })
///     .unwrap();
/// assert_eq!(out, "Hello, WORLD! ${secret}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    delimiters: Delimiters,
    filters: FilterRegistry,
    aliases: AliasMap,
    skip: SkipList,
    expansions: BTreeMap<String, Template>,
    default_value: Option<String>,
}

#[bon]
impl Replacer {
    /// Build a replacer. Every setter is optional.
    ///
    /// Expansion bodies are compiled here with the given delimiters and
    /// aliases; their macros are resolved once, at this point.
    ///
    /// # Errors
    ///
    /// Returns an error if an expansion body fails to parse, or if expansion
    /// bodies reference each other in a cycle.
    #[builder]
    pub fn new(
        #[builder(default)] delimiters: Delimiters,
        #[builder(default)] filters: FilterRegistry,
        #[builder(default)] aliases: AliasMap,
        #[builder(default, into)] skip: SkipList,
        #[builder(default, into)] expansions: Expansions,
        #[builder(into)] default_value: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut replacer = Self {
            delimiters,
            filters,
            aliases,
            skip,
            expansions: BTreeMap::new(),
            default_value,
        };

        let mut compiled = BTreeMap::new();
        for (name, text) in expansions.iter() {
            let template = replacer
                .parse(text)
                .map_err(|source| ConfigError::Expansion {
                    name: name.to_owned(),
                    source,
                })?;
            compiled.insert(name.to_owned(), template);
        }
        check_expansion_cycles(&compiled)?;
        replacer.expansions = compiled;

        debug!(
            "replacer built: delimiters {:?}/{:?}, {} filters, {} aliases, {} skipped, {} expansions",
            replacer.delimiters.start(),
            replacer.delimiters.end(),
            replacer.filters.len(),
            replacer.aliases.len(),
            replacer.skip.len(),
            replacer.expansions.len(),
        );
        Ok(replacer)
    }

    /// Build a replacer from a plain-data configuration plus filters.
    pub fn from_config(
        config: ReplacerConfig,
        filters: FilterRegistry,
    ) -> Result<Self, ConfigError> {
        let delimiters = Delimiters::new(
            config.start.as_deref().unwrap_or(DEFAULT_START),
            config.end.as_deref().unwrap_or(DEFAULT_END),
        )?;
        let aliases = config.alias_map();
        Self::builder()
            .delimiters(delimiters)
            .filters(filters)
            .aliases(aliases)
            .skip(config.skip)
            .expansions(config.expansions)
            .maybe_default_value(config.default_value)
            .build()
    }

    /// The delimiters.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// The filter registry.
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// The alias map.
    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// The default value, if configured.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Check if `name` is on the skip list.
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip.contains(name)
    }

    /// The compiled expansion for macro `name`, if any.
    pub fn expansion(&self, name: &str) -> Option<&Template> {
        self.expansions.get(name)
    }

    /// Resolve the macro of `token` through the alias map, keeping its filters.
    ///
    /// ```
    /// use macro_template::{AliasMap, Replacer};
    ///
    /// let replacer = Replacer::builder()
    ///     .aliases(AliasMap::new().alias("foo", ["FOO", "Foo"]))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(replacer.alias("Foo").as_str(), "foo");
    /// assert_eq!(replacer.alias("FOO:hex").as_str(), "foo:hex");
    /// assert_eq!(replacer.alias("bar").as_str(), "bar");
    /// ```
    pub fn alias(&self, token: &str) -> Token {
        let (macro_name, filters) = token::split(token.trim());
        Token::new(
            self.aliases.resolve(macro_name),
            token::filter_names(filters),
        )
    }
}

/// Reject expansion bodies that reach their own macro, directly or through
/// other expansions.
///
/// Body tokens hold macros already resolved through the alias map, which is
/// exactly what splicing looks up, so the graph is walked without resolving
/// again.
fn check_expansion_cycles(expansions: &BTreeMap<String, Template>) -> Result<(), ConfigError> {
    let mut done = HashSet::new();
    for name in expansions.keys() {
        let mut stack = Vec::new();
        visit_expansion(name, expansions, &mut stack, &mut done)?;
    }
    Ok(())
}

fn visit_expansion<'a>(
    name: &'a str,
    expansions: &'a BTreeMap<String, Template>,
    stack: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<(), ConfigError> {
    if done.contains(name) {
        return Ok(());
    }
    if let Some(pos) = stack.iter().position(|entry| *entry == name) {
        let mut chain: Vec<String> = stack[pos..].iter().map(ToString::to_string).collect();
        chain.push(name.to_owned());
        return Err(ConfigError::ExpansionCycle { chain });
    }
    let Some(template) = expansions.get(name) else {
        return Ok(());
    };

    stack.push(name);
    for referenced in template.tokens() {
        visit_expansion(referenced.macro_name(), expansions, stack, done)?;
    }
    stack.pop();
    done.insert(name);
    Ok(())
}
