//! Integration tests for tokens and delimiters

use macro_template::types::token;
use macro_template::{Delimiters, Token};

#[test]
fn test_split_without_filters() {
    assert_eq!(token::split("foo"), ("foo", ""));
}

#[test]
fn test_split_keeps_filter_delimiter() {
    assert_eq!(token::split("foo:hex:upper"), ("foo", ":hex:upper"));
}

#[test]
fn test_filter_names_skip_empty_segments() {
    let names: Vec<_> = token::filter_names("::hex::upper:").collect();
    assert_eq!(names, vec!["hex", "upper"]);
}

#[test]
fn test_token_from_parts() {
    let token = Token::new("foo", ["hex", "", "upper"]);
    assert_eq!(token.as_str(), "foo:hex:upper");
    assert_eq!(token.macro_name(), "foo");
    assert_eq!(token.filters().collect::<Vec<_>>(), vec!["hex", "upper"]);
    assert!(token.has_filters());
}

#[test]
fn test_token_parse_trims_and_canonicalizes() {
    let token = Token::parse("  foo:hex::  ");
    assert_eq!(token.as_str(), "foo:hex");
    assert_eq!(Token::from("bar").as_str(), "bar");
    assert!(!Token::from("bar").has_filters());
}

#[test]
fn test_macro_names_are_case_sensitive() {
    assert_ne!(Token::from("Foo"), Token::from("foo"));
}

#[test]
fn test_default_delimiters() {
    let delimiters = Delimiters::default();
    assert_eq!(delimiters.start(), "${");
    assert_eq!(delimiters.end(), "}");
    assert_eq!(delimiters, Delimiters::new("${", "}").unwrap());
}

#[test]
fn test_empty_delimiters_are_rejected() {
    let err = Delimiters::new("  ", "}").unwrap_err();
    assert_eq!(err.to_string(), "invalid start delimiter: must not be empty");
    let err = Delimiters::new("{{", "").unwrap_err();
    assert_eq!(err.to_string(), "invalid end delimiter: must not be empty");
}

#[test]
fn test_placeholder_text() {
    let delimiters = Delimiters::new("<%", "%>").unwrap();
    assert_eq!(delimiters.placeholder("foo:hex"), "<%foo:hex%>");

    let mut buf = b"> ".to_vec();
    delimiters.append_token(&mut buf, "foo", ":hex");
    assert_eq!(buf, b"> <%foo:hex%>");
}
