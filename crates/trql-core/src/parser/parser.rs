//! TRQL parser core: token handling, lookahead, the depth guard and the
//! public entry points.
//!
//! Tokens are pulled from the lexer one at a time, in whatever [`LexMode`]
//! the grammar is in at that point. Lookahead always reads code tokens from a
//! copy of the lexer, so peeking never disturbs the real position.

use tracing::debug;

use super::error::ParseError;
use crate::ast::{ColumnType, Expr, Identifier, Program, Query, TemplateString};
use crate::lexer::{Keyword, LexMode, Lexer, Span, Token, TokenKind};

/// The default limit on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Depth units charged for each nested query. A query level runs through
/// much larger stack frames than an expression level.
pub(super) const QUERY_DEPTH_UNITS: usize = 4;

/// Depth units charged for each nested join tree.
pub(super) const JOIN_DEPTH_UNITS: usize = 2;

/// Loop-built tree levels, such as the operands of `a + b + c`, that cost
/// one unit of depth.
const FOLDS_PER_DEPTH_UNIT: usize = 4;

/// Counts the tree levels a parsing loop has stacked up.
#[derive(Debug, Default)]
pub(super) struct Folds(usize);

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// How deeply expressions, statements, queries, joins and tags may nest
    /// before parsing fails with a recursion-limit error.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// TRQL parser.
///
/// Each entry point consumes the whole input and fails on anything left
/// over.
///
/// ```
/// use trql_core::Parser;
///
/// let expr = Parser::new("1 + 2 * 3").parse_expr().unwrap();
/// assert_eq!(expr.to_string(), "1 + 2 * 3");
/// ```
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    pub(super) current: Token,
    pub(super) previous: Token,
    options: ParserOptions,
    depth: usize,
}

/// Returns true if the token may be read as an identifier.
pub(super) const fn is_identifier_kind(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
        TokenKind::Keyword(kw) => !kw.is_reserved(),
        _ => false,
    }
}

/// Code tokens following the current one.
pub(super) struct Lookahead<'a> {
    lexer: Lexer<'a>,
    done: bool,
}

impl Iterator for Lookahead<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.lexer.next_token(LexMode::Code);
        self.done = token.is_eof();
        Some(token)
    }
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a new parser with explicit options.
    #[must_use]
    pub fn with_options(input: &'a str, options: ParserOptions) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token(LexMode::Code);
        Self {
            input,
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::default()),
            options,
            depth: 0,
        }
    }

    /// Parses a whole program: a sequence of declarations.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.entry("program", Self::parse_program_body)
    }

    /// Parses a single expression.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.entry("expr", Self::parse_expression)
    }

    /// Parses a SELECT query, a set of SELECTs, or a tag element standing in
    /// for a query. A trailing `;` is allowed.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid query.
    pub fn parse_select(&mut self) -> Result<Query, ParseError> {
        self.entry("select", |p| {
            let query = p.parse_select_entry()?;
            p.eat(&TokenKind::Semicolon);
            Ok(query)
        })
    }

    /// Parses the whole input as template text with `{expr}` holes. Quotes
    /// are ordinary text.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if a hole is not a valid expression.
    pub fn parse_full_template_string(&mut self) -> Result<TemplateString, ParseError> {
        self.restart(|lexer| lexer.next_token(LexMode::FullTemplate));
        self.entry("full_template", Self::parse_full_template_body)
    }

    /// Parses a single quoted literal, `'...'` or `f'...'`, as a template.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not one template literal.
    pub fn parse_string_template(&mut self) -> Result<TemplateString, ParseError> {
        self.restart(Lexer::next_template_start);
        self.entry("string_template", Self::parse_template_string)
    }

    /// Parses a single identifier.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not exactly one identifier.
    pub fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        self.entry("identifier", |p| {
            let span = p.current.span;
            let name = p.expect_identifier()?;
            Ok(Identifier { name, span })
        })
    }

    /// Parses a column type such as `Array(Nullable(String))`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a column type.
    pub fn parse_column_type(&mut self) -> Result<ColumnType, ParseError> {
        self.entry("column_type", Self::parse_column_type_expr)
    }

    /// Runs an entry point and requires the input to be fully consumed.
    fn entry<T>(
        &mut self,
        name: &'static str,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        debug!(entry = name, len = self.input.len(), "parsing");
        let result = parse(self).and_then(|value| {
            self.expect_end()?;
            Ok(value)
        });
        if let Err(err) = &result {
            debug!(
                entry = name,
                kind = ?err.kind,
                line = err.span.line,
                column = err.span.column,
                "parse failed"
            );
        }
        result
    }

    /// Restarts lexing from the beginning, scanning the first token with
    /// `first`.
    fn restart(&mut self, first: impl FnOnce(&mut Lexer<'a>) -> Token) {
        self.lexer = Lexer::new(self.input);
        self.current = first(&mut self.lexer);
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.current.is_eof() {
            Ok(())
        } else {
            Err(ParseError::trailing_input(
                &self.current.kind,
                self.current.span,
            ))
        }
    }

    // ==================== Depth guard ====================

    /// Runs `parse` one nesting level deeper, failing once the configured
    /// maximum is reached.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.nested_by(1, parse)
    }

    /// Runs `parse` charging `units` of the depth budget.
    pub(super) fn nested_by<T>(
        &mut self,
        units: usize,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.charge(units)?;
        let result = parse(self);
        self.depth -= units;
        result
    }

    /// Records one more tree level built by a loop rather than by recursion.
    /// Every [`FOLDS_PER_DEPTH_UNIT`] levels cost one unit of the budget
    /// until [`Parser::release`] hands them back.
    pub(super) fn fold(&mut self, folds: &mut Folds) -> Result<(), ParseError> {
        let next = folds.0 + 1;
        if next % FOLDS_PER_DEPTH_UNIT == 0 {
            self.charge(1)?;
        }
        folds.0 = next;
        Ok(())
    }

    /// Returns the budget charged by [`Parser::fold`].
    pub(super) fn release(&mut self, folds: Folds) {
        self.depth -= folds.0 / FOLDS_PER_DEPTH_UNIT;
    }

    fn charge(&mut self, units: usize) -> Result<(), ParseError> {
        if self.depth + units > self.options.max_depth {
            return Err(ParseError::recursion_limit(
                self.options.max_depth,
                self.current.span,
            ));
        }
        self.depth += units;
        Ok(())
    }

    // ==================== Token handling ====================

    /// Advances to the next code token.
    pub(super) fn advance(&mut self) {
        self.advance_in(LexMode::Code);
    }

    /// Advances, lexing the next token in `mode`.
    pub(super) fn advance_in(&mut self, mode: LexMode) {
        let next = self.lexer.next_token(mode);
        self.previous = core::mem::replace(&mut self.current, next);
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Advances past the current token if it matches `kind`.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances past the current token if it is `keyword`.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        self.expect_in(kind, LexMode::Code)
    }

    /// Expects the given kind, then lexes the following token in `mode`.
    pub(super) fn expect_in(&mut self, kind: &TokenKind, mode: LexMode) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance_in(mode);
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier. Non-reserved keywords are read as
    /// identifiers with their source spelling.
    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => self.current_text().to_string(),
            _ => return Err(self.unexpected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    /// Reads a name after `.`, where every keyword is a valid name.
    pub(super) fn expect_member_name(&mut self) -> Result<String, ParseError> {
        if self.current.is_keyword() {
            let name = self.current_text().to_string();
            self.advance();
            return Ok(name);
        }
        self.expect_identifier()
    }

    /// Reads the name after `AS`: an identifier or a string.
    pub(super) fn parse_alias_name(&mut self) -> Result<String, ParseError> {
        if let TokenKind::String(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        self.expect_identifier()
    }

    /// Reads an alias written without `AS`, if one follows.
    pub(super) fn parse_implicit_alias(&mut self) -> Option<String> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Keyword(kw) if kw.is_alias_keyword() => self.current_text().to_string(),
            _ => return None,
        };
        self.advance();
        Some(name)
    }

    /// Builds an error for an unexpected current token.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, &self.current.kind, self.current.span)
    }

    /// Builds an error for a current token that starts no alternative.
    pub(super) fn no_viable_alternative(&self, what: &str) -> ParseError {
        ParseError::no_viable_alternative(what, &self.current.kind, self.current.span)
    }

    /// Returns the source text of the current token.
    pub(super) fn current_text(&self) -> &'a str {
        self.token_text(&self.current)
    }

    /// Returns the source text of a token.
    pub(super) fn token_text(&self, token: &Token) -> &'a str {
        self.input
            .get(token.span.start..token.span.end)
            .unwrap_or_default()
    }

    /// Returns the raw input after the current token.
    pub(super) fn source_after_current(&self) -> &'a str {
        self.lexer.remaining()
    }

    /// Returns a span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        let end = self.previous.span.end.max(start.start);
        Span::new(start.start, end, start.line, start.column)
    }

    /// Returns the span of the whole input.
    pub(super) fn input_span(&self) -> Span {
        Span::new(0, self.input.len(), 1, 1)
    }

    // ==================== Lookahead ====================

    /// Returns the code tokens after the current one.
    pub(super) fn lookahead(&self) -> Lookahead<'a> {
        Lookahead {
            lexer: self.lexer.clone(),
            done: self.current.is_eof(),
        }
    }

    /// Returns the `n`th code token after the current one, starting at 0.
    pub(super) fn peek_nth(&self, n: usize) -> Option<Token> {
        self.lookahead().nth(n)
    }

    /// Returns the code token after the current one.
    pub(super) fn peek(&self) -> Option<Token> {
        self.peek_nth(0)
    }

    /// Checks the kind of the token after the current one.
    pub(super) fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| {
            core::mem::discriminant(&token.kind) == core::mem::discriminant(kind)
        })
    }

    /// Checks if the token after the current one is `keyword`.
    pub(super) fn peek_is_keyword(&self, keyword: Keyword) -> bool {
        self.peek()
            .is_some_and(|token| token.as_keyword() == Some(keyword))
    }
}
