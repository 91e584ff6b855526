//! Named entry points.
//!
//! [`EntryPoint`] lets callers that only have a name, such as the command
//! line tool, choose which grammar rule the whole input must match.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::ast::{ColumnType, Expr, Identifier, Program, Query, TemplateString};
use crate::parser::{ParseError, Parser, ParserOptions};

/// The grammar rule an input is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    /// A sequence of declarations.
    #[default]
    Program,
    /// A single expression.
    Expr,
    /// A SELECT query or set of queries.
    Select,
    /// A whole document of template text with `{expr}` holes.
    FullTemplate,
    /// One quoted template literal.
    StringTemplate,
    /// A single identifier.
    Identifier,
    /// A column type.
    ColumnType,
}

impl EntryPoint {
    /// All entry points, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Program,
        Self::Expr,
        Self::Select,
        Self::FullTemplate,
        Self::StringTemplate,
        Self::Identifier,
        Self::ColumnType,
    ];

    /// Returns the entry point name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Expr => "expr",
            Self::Select => "select",
            Self::FullTemplate => "full_template",
            Self::StringTemplate => "string_template",
            Self::Identifier => "identifier",
            Self::ColumnType => "column_type",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an entry point name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry point '{0}'")]
pub struct UnknownEntryPoint(pub String);

impl FromStr for EntryPoint {
    type Err = UnknownEntryPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|entry| entry.as_str() == name)
            .ok_or_else(|| UnknownEntryPoint(s.to_string()))
    }
}

/// The tree produced by an entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entry", content = "tree", rename_all = "snake_case")]
pub enum Parsed {
    Program(Program),
    Expr(Expr),
    Select(Query),
    FullTemplate(TemplateString),
    StringTemplate(TemplateString),
    Identifier(Identifier),
    ColumnType(ColumnType),
}

impl Parsed {
    /// Returns the entry point that produced this tree.
    #[must_use]
    pub const fn entry_point(&self) -> EntryPoint {
        match self {
            Self::Program(_) => EntryPoint::Program,
            Self::Expr(_) => EntryPoint::Expr,
            Self::Select(_) => EntryPoint::Select,
            Self::FullTemplate(_) => EntryPoint::FullTemplate,
            Self::StringTemplate(_) => EntryPoint::StringTemplate,
            Self::Identifier(_) => EntryPoint::Identifier,
            Self::ColumnType(_) => EntryPoint::ColumnType,
        }
    }
}

/// Prints the tree in the form its own entry point reads back.
impl fmt::Display for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program(program) => program.fmt(f),
            Self::Expr(expr) => expr.fmt(f),
            Self::Select(query) => query.fmt(f),
            Self::FullTemplate(template) => template.as_full_template().fmt(f),
            Self::StringTemplate(template) => template.as_string_literal().fmt(f),
            Self::Identifier(identifier) => identifier.fmt(f),
            Self::ColumnType(column_type) => column_type.fmt(f),
        }
    }
}

/// Parses `input` with the given entry point and default options.
///
/// ```
/// use trql_core::{parse, EntryPoint};
///
/// let parsed = parse(EntryPoint::Expr, "a ?? b").unwrap();
/// assert_eq!(parsed.to_string(), "a ?? b");
/// ```
///
/// # Errors
///
/// Returns a `ParseError` if the input does not match the entry point.
pub fn parse(entry: EntryPoint, input: &str) -> Result<Parsed, ParseError> {
    parse_with_options(entry, input, ParserOptions::default())
}

/// Parses `input` with the given entry point and options.
///
/// # Errors
///
/// Returns a `ParseError` if the input does not match the entry point.
pub fn parse_with_options(
    entry: EntryPoint,
    input: &str,
    options: ParserOptions,
) -> Result<Parsed, ParseError> {
    let mut parser = Parser::with_options(input, options);
    Ok(match entry {
        EntryPoint::Program => Parsed::Program(parser.parse_program()?),
        EntryPoint::Expr => Parsed::Expr(parser.parse_expr()?),
        EntryPoint::Select => Parsed::Select(parser.parse_select()?),
        EntryPoint::FullTemplate => Parsed::FullTemplate(parser.parse_full_template_string()?),
        EntryPoint::StringTemplate => Parsed::StringTemplate(parser.parse_string_template()?),
        EntryPoint::Identifier => Parsed::Identifier(parser.parse_identifier()?),
        EntryPoint::ColumnType => Parsed::ColumnType(parser.parse_column_type()?),
    })
}

/// Parses a program.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not a valid program.
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    Parser::new(input).parse_program()
}

/// Parses a single expression.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not a single expression.
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    Parser::new(input).parse_expr()
}

/// Parses a SELECT query.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not a valid query.
pub fn parse_select(input: &str) -> Result<Query, ParseError> {
    Parser::new(input).parse_select()
}

/// Parses a whole document as template text.
///
/// # Errors
///
/// Returns a `ParseError` if a hole is not a valid expression.
pub fn parse_full_template_string(input: &str) -> Result<TemplateString, ParseError> {
    Parser::new(input).parse_full_template_string()
}

/// Parses one quoted literal as a template.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not one template literal.
pub fn parse_string_template(input: &str) -> Result<TemplateString, ParseError> {
    Parser::new(input).parse_string_template()
}

/// Parses a single identifier.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not exactly one identifier.
pub fn parse_identifier(input: &str) -> Result<Identifier, ParseError> {
    Parser::new(input).parse_identifier()
}

/// Parses a column type.
///
/// # Errors
///
/// Returns a `ParseError` if the input is not a column type.
pub fn parse_column_type(input: &str) -> Result<ColumnType, ParseError> {
    Parser::new(input).parse_column_type()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;

    #[test]
    fn test_entry_point_names() {
        for entry in EntryPoint::ALL {
            assert_eq!(entry.to_string().parse::<EntryPoint>(), Ok(entry));
        }
        assert_eq!("full-template".parse(), Ok(EntryPoint::FullTemplate));
        assert_eq!(
            "query".parse::<EntryPoint>(),
            Err(UnknownEntryPoint("query".into()))
        );
    }

    #[test]
    fn test_dispatch() {
        let parsed = parse(EntryPoint::ColumnType, "Array(String)").unwrap();
        assert_eq!(parsed.entry_point(), EntryPoint::ColumnType);
        assert_eq!(parsed.to_string(), "Array(String)");
    }

    #[test]
    fn test_templates_print_in_their_entry_form() {
        let full = parse(EntryPoint::FullTemplate, "Hi {name}").unwrap();
        assert_eq!(full.to_string(), "Hi {name}");
        let quoted = parse(EntryPoint::StringTemplate, "'Hi {name}'").unwrap();
        assert_eq!(quoted.to_string(), "'Hi {name}'");
    }

    #[test]
    fn test_options_are_applied() {
        let err = parse_with_options(
            EntryPoint::Expr,
            "((1))",
            ParserOptions { max_depth: 2 },
        )
        .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::RecursionLimit);
    }

    #[test]
    fn test_parsed_serializes_with_entry_tag() {
        let parsed = parse(EntryPoint::Identifier, "events").unwrap();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["entry"], "identifier");
        assert_eq!(json["tree"]["name"], "events");
    }
}
