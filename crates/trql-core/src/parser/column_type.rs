//! Column type expressions.

use super::error::ParseError;
use super::parser::{is_identifier_kind, Parser};
use crate::ast::{ColumnType, ColumnTypeKind, EnumValue, Literal, NestedField};
use crate::lexer::TokenKind;

/// The kinds of argument list a parametrized type name can take.
enum ArgumentShape {
    /// `'a' = 1, ...`
    Enum,
    /// `name Type, ...`
    Nested,
    /// `Type, ...`
    Types,
    /// Arbitrary expressions.
    Values,
}

impl Parser<'_> {
    /// Parses a column type such as `UInt64`, `Array(String)`,
    /// `Nested(a String)`, `Enum8('a' = 1)` or `FixedString(16)`.
    pub(super) fn parse_column_type_expr(&mut self) -> Result<ColumnType, ParseError> {
        self.nested(|p| {
            let start = p.current.span;
            let name = p.expect_identifier()?;
            if !p.eat(&TokenKind::LeftParen) {
                return Ok(ColumnType::new(
                    ColumnTypeKind::Simple(name),
                    p.span_from(start),
                ));
            }

            let kind = match p.argument_shape() {
                ArgumentShape::Enum => ColumnTypeKind::Enum {
                    name,
                    values: p.parse_enum_values()?,
                },
                ArgumentShape::Nested => ColumnTypeKind::Nested {
                    name,
                    fields: p.parse_nested_fields()?,
                },
                ArgumentShape::Types => ColumnTypeKind::Complex {
                    name,
                    args: p.parse_type_args()?,
                },
                ArgumentShape::Values => ColumnTypeKind::Param {
                    name,
                    args: p.parse_expression_list_until(&TokenKind::RightParen)?,
                },
            };
            p.expect(&TokenKind::RightParen)?;

            Ok(ColumnType::new(kind, p.span_from(start)))
        })
    }

    /// Decides what the arguments after `(` are from their first two tokens.
    fn argument_shape(&self) -> ArgumentShape {
        let current = &self.current.kind;
        let next = self.peek().map(|t| t.kind);
        if matches!(current, TokenKind::String(_)) && next == Some(TokenKind::Eq) {
            ArgumentShape::Enum
        } else if !is_identifier_kind(current) {
            ArgumentShape::Values
        } else if next.as_ref().is_some_and(is_identifier_kind) {
            ArgumentShape::Nested
        } else if matches!(
            next,
            Some(TokenKind::Comma | TokenKind::RightParen | TokenKind::LeftParen)
        ) {
            ArgumentShape::Types
        } else {
            ArgumentShape::Values
        }
    }

    fn parse_enum_values(&mut self) -> Result<Vec<EnumValue>, ParseError> {
        let mut values = Vec::new();
        while let TokenKind::String(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            self.expect(&TokenKind::Eq)?;
            let number = self.parse_number_expr()?;
            let Some(Literal::Integer(value)) = number.as_literal() else {
                return Err(ParseError::invalid_literal(
                    format!("enum value {number} is not an integer"),
                    number.span,
                ));
            };
            values.push(EnumValue {
                name,
                value: *value,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(values)
    }

    fn parse_nested_fields(&mut self) -> Result<Vec<NestedField>, ParseError> {
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            let name = self.expect_identifier()?;
            let data_type = self.parse_column_type_expr()?;
            fields.push(NestedField { name, data_type });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(fields)
    }

    fn parse_type_args(&mut self) -> Result<Vec<ColumnType>, ParseError> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            args.push(self.parse_column_type_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;

    fn column_type(input: &str) -> ColumnType {
        Parser::new(input).parse_column_type().unwrap()
    }

    #[test]
    fn test_simple_and_complex() {
        assert_eq!(column_type("UInt64").kind, ColumnTypeKind::Simple("UInt64".into()));
        let ty = column_type("Array(Nullable(String))");
        let ColumnTypeKind::Complex { name, args } = ty.kind else {
            panic!("expected complex type");
        };
        assert_eq!(name, "Array");
        assert_eq!(args[0].name(), "Nullable");
    }

    #[test]
    fn test_nested_fields() {
        let ColumnTypeKind::Nested { fields, .. } =
            column_type("Nested(id UInt64, tags Array(String),)").kind
        else {
            panic!("expected nested type");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "tags");
    }

    #[test]
    fn test_enum_values() {
        let ColumnTypeKind::Enum { values, .. } = column_type("Enum8('a' = 1, 'b' = -2)").kind
        else {
            panic!("expected enum type");
        };
        assert_eq!(values[1].value, -2);
    }

    #[test]
    fn test_enum_value_must_be_integer() {
        let err = Parser::new("Enum8('a' = 1.5)")
            .parse_column_type()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    }

    #[test]
    fn test_parametric() {
        let ColumnTypeKind::Param { args, .. } = column_type("DateTime64(3, 'UTC')").kind else {
            panic!("expected parametric type");
        };
        assert_eq!(args.len(), 2);
    }
}
