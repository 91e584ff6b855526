//! Tests for column type expressions and the identifier entry point.

mod common;
use common::*;

use trql_core::ast::ColumnTypeKind;
use trql_core::{parse_column_type, parse_identifier, EntryPoint, ParseErrorKind};

fn kind(input: &str) -> ColumnTypeKind {
    parse_column_type(input)
        .unwrap_or_else(|e| panic!("Failed to parse: {input}\nError: {e}"))
        .kind
}

#[test]
fn simple_type() {
    assert_eq!(kind("DateTime"), ColumnTypeKind::Simple("DateTime".into()));
    assert_eq!(kind("Date"), ColumnTypeKind::Simple("Date".into()));
}

#[test]
fn complex_types_nest() {
    let ColumnTypeKind::Complex { name, args } = kind("Map(String, Array(Tuple(UInt8, String)))")
    else {
        panic!("Expected complex type");
    };
    assert_eq!(name, "Map");
    assert_eq!(args.len(), 2);
    assert!(matches!(args[1].kind, ColumnTypeKind::Complex { .. }));
}

#[test]
fn parametric_types() {
    assert!(matches!(
        kind("FixedString(16)"),
        ColumnTypeKind::Param { ref args, .. } if args.len() == 1
    ));
    assert!(matches!(
        kind("Decimal(18, 4)"),
        ColumnTypeKind::Param { ref args, .. } if args.len() == 2
    ));
}

#[test]
fn nested_type() {
    let ColumnTypeKind::Nested { fields, .. } = kind("Nested(key String, value UInt64)") else {
        panic!("Expected nested type");
    };
    assert_eq!(fields[0].name, "key");
    assert_eq!(fields[1].data_type.to_string(), "UInt64");
}

#[test]
fn enum_type() {
    let ColumnTypeKind::Enum { values, .. } = kind("Enum16('on' = 1, 'off' = 0)") else {
        panic!("Expected enum type");
    };
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].name, "on");
    assert_eq!(values[1].value, 0);
}

#[test]
fn unclosed_type() {
    let input = "Array(String";
    let err = parse_column_type(input).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert_located(&err, input);
}

#[test]
fn identifier_entry() {
    assert_eq!(parse_identifier("`my column`").unwrap().name, "my column");
    assert_eq!(parse_identifier("key").unwrap().name, "key");
    assert!(parse_identifier("where").is_err());
    assert_eq!(
        parse_identifier("a.b").unwrap_err().kind,
        ParseErrorKind::TrailingInput
    );
}

#[test]
fn print_is_a_fixed_point() {
    for input in [
        "UInt64",
        "Array(Nullable(String))",
        "Nested(a String, b Array(UInt8))",
        "Enum8('a' = 1, 'b' = -1)",
        "DateTime64(3, 'UTC')",
    ] {
        round_trip(EntryPoint::ColumnType, input);
    }
    for input in ["events", "`select`", "`has space`"] {
        round_trip(EntryPoint::Identifier, input);
    }
}
