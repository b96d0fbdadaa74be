//! Black-box tests against the crate's public API: parse full source files
//! through [`shift_parser::parse_file`] and assert on the resulting AST and
//! diagnostics, not on any parser-internal state.

use shift_common::{DiagnosticSink, SourceMap, TokenKind};
use shift_parser::{parse_file, StmtKind};

fn parse(src: &str) -> (shift_parser::ParsedFile, DiagnosticSink) {
    let map = SourceMap::new(src.to_string());
    let mut sink = DiagnosticSink::new();
    let file = parse_file(&map, "t.sh", &mut sink);
    (file, sink)
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let (file, mut sink) = parse("module m; class C { int f() { return a * b + c; } } ");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    let func = &file.classes[0].functions[0];
    let StmtKind::Return { value: Some(expr) } = &file.stmts.get(func.body[0]).kind else {
        panic!("expected return");
    };
    let root = file.exprs.get(*expr);
    assert_eq!(root.kind, TokenKind::PLUS);
    let left = file.exprs.get(root.children[0]);
    assert_eq!(left.kind, TokenKind::MULTIPLY);
}

#[test]
fn cast_vs_bracket_is_not_a_cast() {
    let (_file, mut sink) = parse("module m; class C { int f() { return (x)5; } } ");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(has_error);
    assert!(rendered.iter().any(|l| l.contains("unexpected number literal in expression")));
}

#[test]
fn class_with_base_parses_base_name() {
    let (file, mut sink) = parse("module m; class Base {} class Derived : Base {}");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert_eq!(file.classes[1].base_name.as_ref().unwrap().text, "Base");
}

#[test]
fn nested_class_records_its_enclosing_class() {
    let (file, mut sink) = parse("module m; class Outer { class Inner {} }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert_eq!(file.classes[1].enclosing_class, Some(0));
}

#[test]
fn overloaded_methods_are_both_recorded() {
    let (file, mut sink) = parse("module m; class C { void f() {} void f(int x) {} }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert_eq!(file.classes[0].functions.len(), 2);
}

#[test]
fn extern_function_without_body_is_accepted() {
    let (file, mut sink) = parse("module m; class C { extern void f(); }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert!(file.classes[0].functions[0].body.is_empty());
}

#[test]
fn extern_function_with_body_is_an_error() {
    let (_file, mut sink) = parse("module m; class C { extern void f() {} }");
    let (_rendered, has_error) = sink.print_exit_clear();
    assert!(has_error);
}

#[test]
fn missing_closing_paren_is_reported() {
    let (_file, mut sink) = parse("module m; class C { int f() { return (1 + 2; } }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(has_error);
    assert!(rendered.iter().any(|l| l.contains("expected ')'")));
}

#[test]
fn field_and_global_variable_declarations_parse() {
    let (file, mut sink) = parse("module m; int g; class C { int x; }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert_eq!(file.variables[0].name, "g");
    assert_eq!(file.classes[0].variables[0].name, "x");
}
