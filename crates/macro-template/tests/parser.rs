//! Integration tests for template compilation

use macro_template::{AliasMap, Delimiters, Expansions, ParseError, Replacer, Token};

fn replacer_with_expansions(pairs: &[(&str, &str)]) -> Replacer {
    Replacer::builder()
        .expansions(pairs.iter().copied().collect::<Expansions>())
        .build()
        .unwrap()
}

fn tokens(replacer: &Replacer, source: &str) -> Vec<(String, String)> {
    replacer
        .parse(source)
        .unwrap()
        .chunks()
        .iter()
        .map(|chunk| (chunk.prefix().to_owned(), chunk.token().to_string()))
        .collect()
}

#[test]
fn test_literal_template() {
    let replacer = Replacer::default();
    let template = replacer.parse("just text } here").unwrap();
    assert!(template.is_literal());
    assert_eq!(template.tail(), "just text } here");
    assert_eq!(replacer.render_source(&template), "just text } here");
}

#[test]
fn test_empty_template() {
    let template = Replacer::default().parse("").unwrap();
    assert!(template.is_literal());
    assert_eq!(template.tail(), "");
}

#[test]
fn test_chunks_and_tail() {
    let replacer = Replacer::default();
    let template = replacer.parse("a ${foo:hex} b ${ bar }!").unwrap();
    assert_eq!(template.chunks().len(), 2);
    assert_eq!(template.chunks()[0].prefix(), "a ");
    assert_eq!(template.chunks()[0].token(), &Token::new("foo", ["hex"]));
    assert_eq!(template.chunks()[1].prefix(), " b ");
    assert_eq!(template.chunks()[1].token().as_str(), "bar");
    assert_eq!(template.tail(), "!");
    assert_eq!(template.to_string(), "a ${foo:hex} b ${bar}!");
}

#[test]
fn test_adjacent_tokens() {
    let replacer = Replacer::default();
    assert_eq!(
        tokens(&replacer, "${a}${b}"),
        vec![
            (String::new(), "a".to_owned()),
            (String::new(), "b".to_owned())
        ]
    );
}

#[test]
fn test_empty_filter_segments_are_dropped() {
    let replacer = Replacer::default();
    assert_eq!(
        tokens(&replacer, "${a::hex:}"),
        vec![(String::new(), "a:hex".to_owned())]
    );
}

#[test]
fn test_aliases_are_resolved_at_compile_time() {
    let replacer = Replacer::builder()
        .aliases(AliasMap::new().alias("foo", ["FOO", "Foo"]))
        .build()
        .unwrap();
    let template = replacer.parse("${ Foo:hex } bar").unwrap();
    assert_eq!(template.chunks()[0].token().as_str(), "foo:hex");
    assert_eq!(replacer.render_source(&template), "${foo:hex} bar");
}

#[test]
fn test_aliases_are_not_chained() {
    let replacer = Replacer::builder()
        .aliases(AliasMap::new().alias("b", ["a"]).alias("c", ["b"]))
        .build()
        .unwrap();
    assert_eq!(tokens(&replacer, "${a}"), vec![(String::new(), "b".to_owned())]);
}

#[test]
fn test_expansion_is_spliced() {
    let replacer = replacer_with_expansions(&[("baz", "${foo} ${bar}")]);
    let template = replacer.parse("x ${baz} y").unwrap();
    assert_eq!(
        tokens(&replacer, "x ${baz} y"),
        vec![
            ("x ".to_owned(), "foo".to_owned()),
            (" ".to_owned(), "bar".to_owned())
        ]
    );
    assert_eq!(template.tail(), " y");
    assert_eq!(replacer.render_source(&template), "x ${foo} ${bar} y");
}

#[test]
fn test_nested_expansions() {
    let replacer = replacer_with_expansions(&[("a", "[${b}]"), ("b", "${c}!")]);
    let template = replacer.parse("${a}").unwrap();
    assert_eq!(template.chunks().len(), 1);
    assert_eq!(template.chunks()[0].prefix(), "[");
    assert_eq!(template.chunks()[0].token().as_str(), "c");
    assert_eq!(template.tail(), "!]");
}

#[test]
fn test_expansion_body_aliases_are_not_chained() {
    let replacer = Replacer::builder()
        .aliases(AliasMap::new().alias("z", ["y"]).alias("w", ["z"]).alias("x", ["w"]))
        .expansions([("x", "<${y}>")])
        .build()
        .unwrap();
    let template = replacer.parse("${x}").unwrap();
    assert_eq!(tokens(&replacer, "${x}"), vec![("<".to_owned(), "z".to_owned())]);
    assert_eq!(template.tail(), ">");
    assert_eq!(replacer.render_source(&template), "<${z}>");
}

#[test]
fn test_expansion_filters_are_ignored() {
    let replacer = replacer_with_expansions(&[("baz", "${foo}")]);
    assert_eq!(
        replacer.parse("${baz:hex}").unwrap(),
        replacer.parse("${baz}").unwrap()
    );
}

#[test]
fn test_expansion_body_uses_current_aliases() {
    let replacer = Replacer::builder()
        .aliases(AliasMap::new().alias("foo", ["Foo"]))
        .expansions([("greet", "hi ${Foo:upper}")])
        .build()
        .unwrap();
    assert_eq!(
        tokens(&replacer, "${greet}"),
        vec![("hi ".to_owned(), "foo:upper".to_owned())]
    );
}

#[test]
fn test_expansion_with_custom_delimiters() {
    let replacer = Replacer::builder()
        .delimiters(Delimiters::new("{{", "}}").unwrap())
        .expansions([("name", "{{first}} {{last}}")])
        .build()
        .unwrap();
    let template = replacer.parse("Dear {{name}},").unwrap();
    assert_eq!(replacer.render_source(&template), "Dear {{first}} {{last}},");
}

#[test]
fn test_unmatched_start() {
    let err = Replacer::default().parse("foo ${bar").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnmatchedDelimiter {
            delimiter: "${".to_owned(),
            position: 4
        }
    );
    assert_eq!(err.to_string(), r#"unmatched delimiter "${" at position 4"#);
}

#[test]
fn test_nested_start_is_unmatched() {
    let err = Replacer::default().parse("${a ${b}}").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnmatchedDelimiter { position: 0, .. }
    ));
}

#[test]
fn test_error_position_after_expansion() {
    let replacer = replacer_with_expansions(&[("e", "abc")]);
    let err = replacer.parse("${e} ${x").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnmatchedDelimiter { position: 5, .. }
    ));
}

#[test]
fn test_same_start_and_end_delimiters() {
    let replacer = Replacer::builder()
        .delimiters(Delimiters::new("%", "%").unwrap())
        .build()
        .unwrap();
    let err = replacer.parse("foo %bar% 100%").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnmatchedDelimiter { position: 13, .. }
    ));
    assert_eq!(tokens(&replacer, "foo %bar%"), vec![("foo ".to_owned(), "bar".to_owned())]);
}

#[test]
fn test_estimate_size() {
    let template = Replacer::default().parse("ab${x}cd${y}e").unwrap();
    assert_eq!(template.estimate_size(0), 5);
    assert_eq!(template.estimate_size(10), 25);
}
