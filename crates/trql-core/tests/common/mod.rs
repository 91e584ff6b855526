#![allow(dead_code)]

use serde_json::Value;
use trql_core::ast::{Expr, ExprKind, JoinExpr, Program, Query, SelectQuery, TemplateString};
use trql_core::{parse, EntryPoint, ParseError, Parsed, Parser};

pub fn expr(input: &str) -> Expr {
    Parser::new(input)
        .parse_expr()
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"))
}

pub fn expr_err(input: &str) -> ParseError {
    Parser::new(input)
        .parse_expr()
        .expect_err(&format!("Expected parse error for: {input}"))
}

pub fn program(input: &str) -> Program {
    Parser::new(input)
        .parse_program()
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"))
}

pub fn program_err(input: &str) -> ParseError {
    Parser::new(input)
        .parse_program()
        .expect_err(&format!("Expected parse error for: {input}"))
}

pub fn query(input: &str) -> Query {
    Parser::new(input)
        .parse_select()
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"))
}

pub fn query_err(input: &str) -> ParseError {
    Parser::new(input)
        .parse_select()
        .expect_err(&format!("Expected parse error for: {input}"))
}

pub fn select(input: &str) -> SelectQuery {
    match query(input) {
        Query::Select(select) => *select,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn from(input: &str) -> JoinExpr {
    select(input)
        .from
        .unwrap_or_else(|| panic!("Expected FROM clause in: {input}"))
}

pub fn string_template(input: &str) -> TemplateString {
    Parser::new(input)
        .parse_string_template()
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"))
}

/// Unwraps any number of parentheses.
pub fn unparen(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Parens(inner) => unparen(inner),
        _ => expr,
    }
}

/// Asserts that the printed form parses back to the same tree, ignoring
/// spans, and that printing that tree again gives the same text.
pub fn round_trip(entry: EntryPoint, input: &str) -> String {
    let parsed = parse(entry, input)
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"));
    let printed = parsed.to_string();
    let reparsed = parse(entry, &printed)
        .unwrap_or_else(|e| panic!("Failed to reparse: {printed}\nError: {e}"));
    assert_eq!(
        shape(&parsed),
        shape(&reparsed),
        "reparsed tree differs for: {input}\nprinted: {printed}"
    );
    assert_eq!(
        printed,
        reparsed.to_string(),
        "print is not a fixed point for: {input}"
    );
    printed
}

/// The serialized tree with every span removed.
pub fn shape(parsed: &Parsed) -> Value {
    let mut value = serde_json::to_value(parsed).expect("tree serializes");
    strip_spans(&mut value);
    value
}

fn strip_spans(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("span");
            map.values_mut().for_each(strip_spans);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_spans),
        _ => {}
    }
}

/// Asserts that an error points inside the input and says something.
pub fn assert_located(err: &ParseError, input: &str) {
    assert!(!err.message.is_empty(), "empty message for: {input}");
    assert!(
        err.span.start <= input.len() && err.span.end <= input.len(),
        "span {:?} outside input: {input}",
        err.span
    );
    assert!(err.span.line >= 1 && err.span.column >= 1);
}
