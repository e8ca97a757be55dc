pub mod parser;
pub mod replacer;
pub mod types;

use std::sync::LazyLock;

pub use parser::{Chunk, ParseError, Template};
pub use replacer::{
    AliasMap, ConfigError, Expansions, FilterFn, FilterRegistry, MAX_TEMPLATE_DEPTH, Printer,
    RenderError, Replacer, ReplacerConfig, SkipList, compute_suggestions,
};
pub use types::{
    AppendError, Appendable, BoxError, Delimiters, MacroValue, MacroValues, Token, Value,
};

static DEFAULT_REPLACER: LazyLock<Replacer> = LazyLock::new(|| {
    Replacer::builder()
        .filters(FilterRegistry::builtin())
        .build()
        .unwrap_or_default()
});

/// Replace tokens in `text` using the default delimiters and the built-in
/// filters, appending the result to `buf`.
///
/// # Example
///
/// ```
/// use macro_template::values;
///
/// let mut buf = Vec::new();
/// macro_template::replace(&mut buf, "id=${id:hex}", &values! { "id" => b"\x0a\xff" }).unwrap();
/// assert_eq!(buf, b"id=0aff");
/// ```
pub fn replace(buf: &mut Vec<u8>, text: &str, values: &[MacroValue<'_>]) -> Result<(), RenderError> {
    DEFAULT_REPLACER.replace(buf, text, values)
}

/// Creates a [`MacroValues`] list from name-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// byte strings and `Option`s can be passed directly. Earlier pairs shadow
/// later pairs with the same name.
///
/// # Example
///
/// ```
/// use macro_template::{Value, values};
///
/// let v = values! { "count" => 3, "name" => "Alice", "count" => 4 };
/// assert_eq!(v.len(), 3);
/// assert!(matches!(v.lookup("count"), Some(Value::Int(3))));
/// assert!(v.lookup("missing").is_none());
/// ```
#[macro_export]
macro_rules! values {
    {} => {
        $crate::MacroValues::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut values = $crate::MacroValues::new();
            $(
                values.push($crate::MacroValue::new($key, ::std::convert::Into::<$crate::Value>::into($value)));
            )+
            values
        }
    };
}
