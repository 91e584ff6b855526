//! Tests for parser error cases.

mod common;
use common::*;

use trql_core::{
    parse_with_options, EntryPoint, LexError, ParseErrorKind, Parser, ParserOptions,
    DEFAULT_MAX_DEPTH,
};

#[test]
fn error_select_without_columns() {
    let input = "SELECT FROM";
    let err = query_err(input);
    assert_located(&err, input);
    assert_eq!(err.span.start, 7);
}

#[test]
fn error_unterminated_string() {
    let input = "SELECT 'abc";
    let err = query_err(input);
    assert_eq!(err.kind, ParseErrorKind::Lexical(LexError::UnterminatedString));
    assert_located(&err, input);
}

#[test]
fn error_unmatched_paren() {
    let input = "SELECT (1 + 2";
    let err = query_err(input);
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert_located(&err, input);
}

#[test]
fn error_unmatched_closing_paren() {
    let input = "1 + 2)";
    let err = expr_err(input);
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert_eq!(err.span.start, 5);
}

#[test]
fn error_empty_input() {
    let err = expr_err("");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn error_join_without_constraint() {
    let input = "SELECT * FROM a INNER JOIN b WHERE a.id = 1";
    assert_located(&query_err(input), input);
}

#[test]
fn error_outer_without_side() {
    let err = query_err("SELECT * FROM a OUTER JOIN b ON x");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
}

#[test]
fn error_invalid_escape() {
    let err = expr_err(r"'\xZZ'");
    assert!(matches!(
        err.kind,
        ParseErrorKind::Lexical(LexError::InvalidEscape(_))
    ));
}

#[test]
fn error_unterminated_block_comment() {
    let err = expr_err("1 /* never closed");
    assert_eq!(
        err.kind,
        ParseErrorKind::Lexical(LexError::UnterminatedComment)
    );
}

#[test]
fn error_position_is_line_and_column() {
    let err = program_err("let a := 1\nlet b := )");
    assert_eq!(err.span.line, 2);
    assert_eq!(err.span.column, 10);
}

#[test]
fn error_message_names_expectation() {
    let err = expr_err("f(1, 2");
    assert!(err.message.contains("')'"), "message: {}", err.message);
    assert_eq!(err.found.as_deref(), Some("end of input"));
}

#[test]
fn error_serializes() {
    let err = expr_err("(");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "UnexpectedEof");
    assert!(json["span"]["start"].is_u64());
}

// ===================================================================
// Recursion limit
// ===================================================================

#[test]
fn deep_nesting_hits_the_limit() {
    let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
    let err = expr_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
    assert_located(&err, &input);
}

#[test]
fn moderate_nesting_is_accepted() {
    let input = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    let parsed = expr(&input);
    assert_eq!(parsed.to_string(), input);
}

#[test]
fn deep_statement_nesting_hits_the_limit() {
    let input = format!("{}{}", "{".repeat(5_000), "}".repeat(5_000));
    let err = program_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn deep_subqueries_hit_the_limit() {
    let input = format!("{}SELECT 1{}", "SELECT * FROM (".repeat(2_000), ")".repeat(2_000));
    let err = query_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn moderate_subquery_nesting_is_accepted() {
    let input = format!("{}SELECT 1{}", "SELECT * FROM (".repeat(8), ")".repeat(8));
    assert!(Parser::new(&input).parse_select().is_ok());
}

#[test]
fn deep_scalar_subqueries_hit_the_limit() {
    let input = format!("{}1{}", "SELECT (".repeat(2_000), ")".repeat(2_000));
    let err = query_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn long_operator_chain_hits_the_limit() {
    let input = format!("{}1", "1 + ".repeat(200_000));
    let err = expr_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
    assert_located(&err, &input);
}

#[test]
fn moderate_operator_chain_is_accepted() {
    let input = format!("{}1", "x AND ".repeat(150));
    assert_eq!(expr(&input).to_string(), input);
}

#[test]
fn long_postfix_chain_hits_the_limit() {
    let input = format!("x{}", "[0]".repeat(200_000));
    assert_eq!(expr_err(&input).kind, ParseErrorKind::RecursionLimit);
    let input = format!("f{}", "()".repeat(200_000));
    assert_eq!(expr_err(&input).kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn long_join_chain_hits_the_limit() {
    let input = format!("SELECT * FROM a{}", " JOIN b ON x".repeat(100_000));
    assert_eq!(query_err(&input).kind, ParseErrorKind::RecursionLimit);
    let input = format!("SELECT * FROM a{}", ", b".repeat(100_000));
    assert_eq!(query_err(&input).kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn deep_tags_hit_the_limit() {
    let input = format!("{}{}", "<a>".repeat(2_000), "</a>".repeat(2_000));
    let err = expr_err(&input);
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
}

#[test]
fn limit_is_configurable() {
    let input = "((((1))))";
    assert!(Parser::new(input).parse_expr().is_ok());
    let err = parse_with_options(EntryPoint::Expr, input, ParserOptions { max_depth: 3 })
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
    assert_eq!(ParserOptions::default().max_depth, DEFAULT_MAX_DEPTH);
}
