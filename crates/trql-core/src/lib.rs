//! # trql-core
//!
//! Lexer, parser and syntax tree for TRQL, a ClickHouse-flavoured query
//! language with an embedded scripting sublanguage and template strings.
//!
//! This crate provides:
//! - A hand-written, mode-aware lexer
//! - A recursive descent parser with precedence climbing for expressions
//! - A span-annotated AST whose `Display` output parses back to itself
//! - Structured errors with source positions and a nesting-depth guard
//!
//! ## Parsing
//!
//! ```rust
//! use trql_core::{parse_select, Query};
//!
//! let query = parse_select("SELECT event, count() FROM events GROUP BY event").unwrap();
//! assert!(matches!(query, Query::Select(_)));
//! ```
//!
//! ## Choosing an entry point by name
//!
//! ```rust
//! use trql_core::{parse, EntryPoint};
//!
//! let entry: EntryPoint = "string_template".parse().unwrap();
//! let parsed = parse(entry, "'hello {1 + 1} world'").unwrap();
//! assert_eq!(parsed.to_string(), "'hello {1 + 1} world'");
//! ```

pub mod ast;
mod entry;
pub mod lexer;
pub mod parser;

pub use ast::{ColumnType, Expr, Program, Query, Statement, TemplateString};
pub use entry::{
    parse, parse_column_type, parse_expr, parse_full_template_string, parse_identifier,
    parse_program, parse_select, parse_string_template, parse_with_options, EntryPoint, Parsed,
    UnknownEntryPoint,
};
pub use lexer::{LexError, LexMode, Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, ParseErrorKind, Parser, ParserOptions, DEFAULT_MAX_DEPTH};
