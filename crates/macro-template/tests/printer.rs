//! Integration tests for the printer

use macro_template::{FilterRegistry, Printer, Replacer, values};

#[test]
fn test_execute_compiled_template() {
    let replacer = Replacer::builder()
        .filters(FilterRegistry::builtin())
        .build()
        .unwrap();
    let template = replacer.parse("GET /?q=${q:urlquery}\n").unwrap();
    let mut printer = Printer::new(&replacer);

    let mut out = Vec::new();
    let n = printer
        .execute(&mut out, &template, &values! { "q" => "a b&c" })
        .unwrap();
    let n2 = printer
        .execute(&mut out, &template, &values! { "q" => "x" })
        .unwrap();
    assert_eq!(out, b"GET /?q=a+b%26c\nGET /?q=x\n");
    assert_eq!(n + n2, out.len());
}

#[test]
fn test_failed_execute_writes_nothing() {
    let replacer = Replacer::default();
    let template = replacer.parse("${a}${b}").unwrap();
    let mut printer = Printer::new(&replacer);

    let mut out = b"head ".to_vec();
    let err = printer
        .execute(&mut out, &template, &values! { "a" => "x" })
        .unwrap_err();
    assert_eq!(err.name(), Some("b"));
    assert_eq!(out, b"head ");
    assert!(printer.as_bytes().is_empty());
}

#[test]
fn test_sprintf() {
    let replacer = Replacer::default();
    let mut printer = Printer::with_capacity(&replacer, 0);
    let bytes = printer.sprintf("${a}-${b}", &values! { "a" => 1, "b" => true }).unwrap();
    assert_eq!(bytes, b"1-true");
}
