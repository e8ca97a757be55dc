//! Integration tests for plain-data configuration

use macro_template::{
    AliasMap, ConfigError, Expansions, FilterRegistry, Replacer, ReplacerConfig, SkipList, values,
};

fn load(json: &str) -> ReplacerConfig {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_config_from_json() {
    let config = load(
        r#"{
            "start": "{{",
            "end": "}}",
            "default_value": "n/a",
            "aliases": { "user": ["USER", "login"] },
            "skip": ["secret"],
            "expansions": { "greeting": "Hello {{user:upper}}" }
        }"#,
    );
    let replacer = Replacer::from_config(config, FilterRegistry::builtin()).unwrap();
    let out = replacer
        .replace_string(
            "{{greeting}}, {{secret}} {{missing}} {{login}}",
            &values! { "user" => "ann" },
        )
        .unwrap();
    assert_eq!(out, "Hello ANN, {{secret}} n/a ann");
}

#[test]
fn test_empty_config_uses_defaults() {
    let replacer = Replacer::from_config(load("{}"), FilterRegistry::new()).unwrap();
    assert_eq!(replacer.delimiters().start(), "${");
    assert_eq!(replacer.delimiters().end(), "}");
    assert!(replacer.default_value().is_none());
    assert!(replacer.filters().is_empty());
}

#[test]
fn test_unknown_fields_are_rejected() {
    let err = serde_json::from_str::<ReplacerConfig>(r#"{ "delimiter": "%" }"#).unwrap_err();
    assert!(err.to_string().contains("unknown field `delimiter`"));
}

#[test]
fn test_blank_delimiter_in_config() {
    let err = Replacer::from_config(load(r#"{ "end": "  " }"#), FilterRegistry::new()).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyDelimiter { which: "end" }));
}

#[test]
fn test_config_serializes_field_names() {
    insta::assert_snapshot!(
        serde_json::to_string(&ReplacerConfig::default()).unwrap(),
        @r#"{"start":null,"end":null,"default_value":null,"aliases":{},"skip":[],"expansions":{}}"#
    );
}

#[test]
fn test_config_alias_map() {
    let config = load(r#"{ "aliases": { "foo": ["Foo", "FOO:hex"] } }"#);
    assert_eq!(config.alias_map(), AliasMap::new().alias("foo", ["Foo", "FOO"]));
}

#[test]
fn test_alias_map_last_declaration_wins() {
    let aliases = AliasMap::new().alias("a", ["x"]).alias("b", ["x"]);
    assert_eq!(aliases.resolve("x"), "b");
    assert_eq!(aliases.len(), 1);
}

#[test]
fn test_collections_strip_filters_from_names() {
    let skip: SkipList = ["secret:hex", " token "].into_iter().collect();
    assert!(skip.contains("secret"));
    assert!(skip.contains("token"));
    assert_eq!(skip.len(), 2);

    let expansions = Expansions::new().expand("name:upper", "${first}").expand("name", "${last}");
    assert_eq!(expansions.iter().collect::<Vec<_>>(), vec![("name", "${last}")]);
}

#[test]
fn test_filter_registry_last_registration_wins() {
    use macro_template::replacer::filters;

    let registry = FilterRegistry::new()
        .register("enc", filters::hex)
        .register("enc", filters::base64);
    let replacer = Replacer::builder().filters(registry).build().unwrap();
    let out = replacer
        .replace_string("${a:enc}", &values! { "a" => "hi" })
        .unwrap();
    assert_eq!(out, "aGk=");
}
