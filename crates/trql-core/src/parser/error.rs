//! Parser error types.

use serde::Serialize;

use crate::lexer::{LexError, Span, TokenKind};

/// The category of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// The lexer rejected the input.
    Lexical(LexError),
    /// No grammar alternative starts with the current token.
    NoViableAlternative,
    /// A specific token or token set was required.
    UnexpectedToken,
    /// The input ended while more was required.
    UnexpectedEof,
    /// The entry point finished but input remains.
    TrailingInput,
    /// A literal could not be converted to its value.
    InvalidLiteral,
    /// The input nests deeper than the configured limit.
    RecursionLimit,
}

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} at line {}, column {}", .message, .span.line, .span.column)]
pub struct ParseError {
    /// The error category.
    pub kind: ParseErrorKind,
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found (if applicable).
    pub found: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an error for a token that does not fit the grammar.
    ///
    /// Lexer error tokens and end of input are reported with their own kinds.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &TokenKind, span: Span) -> Self {
        let expected: String = expected.into();
        match found {
            TokenKind::Error(err) => Self::lexical(err.clone(), span),
            TokenKind::Eof => Self::unexpected_eof(expected, span),
            _ => Self {
                kind: ParseErrorKind::UnexpectedToken,
                message: format!("unexpected {found}, expected {expected}"),
                span,
                expected: Some(expected),
                found: Some(found.to_string()),
            },
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            kind: ParseErrorKind::UnexpectedEof,
            message: format!("unexpected end of input, expected {expected}"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof.to_string()),
        }
    }

    /// Creates an error for a token that starts no alternative.
    #[must_use]
    pub fn no_viable_alternative(what: &str, found: &TokenKind, span: Span) -> Self {
        match found {
            TokenKind::Error(_) | TokenKind::Eof => Self::unexpected(what, found, span),
            _ => Self {
                kind: ParseErrorKind::NoViableAlternative,
                message: format!("no viable alternative at {found} while parsing {what}"),
                span,
                expected: Some(what.to_string()),
                found: Some(found.to_string()),
            },
        }
    }

    /// Creates an error for input left over after a complete parse.
    #[must_use]
    pub fn trailing_input(found: &TokenKind, span: Span) -> Self {
        if let TokenKind::Error(err) = found {
            return Self::lexical(err.clone(), span);
        }
        Self {
            kind: ParseErrorKind::TrailingInput,
            message: format!("unexpected {found} after the end of the input"),
            span,
            expected: Some(TokenKind::Eof.to_string()),
            found: Some(found.to_string()),
        }
    }

    /// Creates a lexical error.
    #[must_use]
    pub fn lexical(err: LexError, span: Span) -> Self {
        Self::new(ParseErrorKind::Lexical(err.clone()), err.to_string(), span)
    }

    /// Creates an error for a literal whose value cannot be represented.
    #[must_use]
    pub fn invalid_literal(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::InvalidLiteral, message, span)
    }

    /// Creates an error for input nested deeper than `max_depth`.
    #[must_use]
    pub fn recursion_limit(max_depth: usize, span: Span) -> Self {
        Self::new(
            ParseErrorKind::RecursionLimit,
            format!("maximum nesting depth of {max_depth} exceeded"),
            span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::unexpected(
            "')'",
            &TokenKind::Keyword(Keyword::From),
            Span::new(7, 11, 1, 8),
        );
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.message, "unexpected keyword FROM, expected ')'");
        assert_eq!(
            err.to_string(),
            "unexpected keyword FROM, expected ')' at line 1, column 8"
        );
    }

    #[test]
    fn test_unexpected_eof_kind() {
        let err = ParseError::unexpected("expression", &TokenKind::Eof, Span::new(3, 3, 1, 4));
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.expected.as_deref(), Some("expression"));
    }

    #[test]
    fn test_lexer_error_token_becomes_lexical() {
        let err = ParseError::unexpected(
            "expression",
            &TokenKind::Error(LexError::UnterminatedString),
            Span::new(0, 4, 1, 1),
        );
        assert_eq!(
            err.kind,
            ParseErrorKind::Lexical(LexError::UnterminatedString)
        );
        assert_eq!(err.message, "unterminated string literal");
    }
}
