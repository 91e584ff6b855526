//! TRQL tokenizer implementation.
//!
//! The lexer is pulled one token at a time. Template strings and tag markup
//! change what a character means, so every call to [`Lexer::next_token`]
//! names the [`LexMode`] the caller is in.

use super::{Keyword, LexError, Span, Token, TokenKind};

/// The lexical context for the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Ordinary expression, statement and query code.
    #[default]
    Code,
    /// Inside `f'...'`: text runs, `{` holes and the closing quote.
    Template,
    /// A whole input that is template text. Quotes are plain text and the
    /// template ends at end of input.
    FullTemplate,
    /// Inside a tag opening: attribute names, `=`, values, `>` and `/>`.
    TagAttribute,
    /// Between tags: text runs, child tags and `{` expression children.
    TagText,
}

/// A lexer that tokenizes TRQL input.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// Line of the current position (1-based).
    line: u32,
    /// Column of the current position (1-based, in characters).
    column: u32,
    /// The byte position of the start of the current token.
    start: usize,
    start_line: u32,
    start_column: u32,
}

const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

const fn is_tag_name_char(c: char) -> bool {
    is_identifier_char(c) || matches!(c, '-' | '.' | ':')
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the input that has not been consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advances if the current character is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Returns an error token for an unterminated block comment.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();

            let line_comment = match (self.peek(), self.peek_next()) {
                (Some('-'), Some('-')) | (Some('/'), Some('/')) => true,
                (Some('#'), _) => true,
                _ => false,
            };
            if line_comment {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.begin_token();
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => {
                            return Some(
                                self.make_token(TokenKind::Error(LexError::UnterminatedComment)),
                            );
                        }
                        _ => {}
                    }
                }
                continue;
            }

            return None;
        }
    }

    fn begin_token(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos, self.start_line, self.start_column)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];

        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(text.to_string()))
        }
    }

    /// Scans a number.
    ///
    /// Only the integer part (with an optional exponent) is consumed. A
    /// fraction such as `1.5` arrives as `1`, `.`, `5` and is put together by
    /// the parser, which keeps `t.1.2` readable as two tuple accesses.
    fn scan_number(&mut self) -> Token {
        let first = self.advance();

        if first == Some('0')
            && matches!(self.peek(), Some('x' | 'X'))
            && self.peek_next().is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance(); // x
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return self.make_token(TokenKind::Number(
                self.input[self.start..self.pos].to_string(),
            ));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let mut rest = self.input[self.pos..].chars().skip(1);
            let exponent_follows = match rest.next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                self.advance(); // e/E
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        self.make_token(TokenKind::Number(
            self.input[self.start..self.pos].to_string(),
        ))
    }

    /// Resolves the escape sequence after a consumed backslash into `value`.
    ///
    /// Unknown escapes are kept verbatim, backslash included.
    fn scan_escape(&mut self, value: &mut String) -> Result<(), LexError> {
        let Some(c) = self.advance() else {
            return Ok(());
        };
        let resolved = match c {
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'a' => '\u{7}',
            'v' => '\u{b}',
            '\\' | '\'' | '"' | '`' | '{' | '}' => c,
            'x' => {
                let digits: String = self.input[self.pos..].chars().take(2).collect();
                if digits.len() == 2 && digits.chars().all(|d| d.is_ascii_hexdigit()) {
                    self.advance();
                    self.advance();
                    u8::from_str_radix(&digits, 16)
                        .map(char::from)
                        .map_err(|_| LexError::InvalidEscape(format!("\\x{digits}")))?
                } else {
                    return Err(LexError::InvalidEscape(format!("\\x{digits}")));
                }
            }
            other => {
                value.push('\\');
                other
            }
        };
        value.push(resolved);
        Ok(())
    }

    /// Scans a quoted run up to the closing `quote`. A doubled quote stands
    /// for one quote character.
    fn scan_quoted(&mut self, quote: char, unterminated: LexError) -> Result<String, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.eat(quote) {
                        value.push(quote);
                    } else {
                        return Ok(value);
                    }
                }
                Some('\\') => self.scan_escape(&mut value)?,
                Some(c) => value.push(c),
                None => return Err(unterminated),
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> Token {
        match self.scan_quoted(quote, LexError::UnterminatedString) {
            Ok(value) => self.make_token(TokenKind::String(value)),
            Err(err) => self.make_token(TokenKind::Error(err)),
        }
    }

    fn scan_quoted_identifier(&mut self, quote: char) -> Token {
        match self.scan_quoted(quote, LexError::UnterminatedQuotedIdentifier) {
            Ok(value) => self.make_token(TokenKind::QuotedIdentifier(value)),
            Err(err) => self.make_token(TokenKind::Error(err)),
        }
    }

    /// Scans the next token in the given mode.
    #[must_use]
    pub fn next_token(&mut self, mode: LexMode) -> Token {
        match mode {
            LexMode::Code => self.next_code_token(),
            LexMode::Template => self.next_template_token(false),
            LexMode::FullTemplate => self.next_template_token(true),
            LexMode::TagAttribute => self.next_tag_attribute_token(),
            LexMode::TagText => self.next_tag_text_token(),
        }
    }

    /// Scans the opening of a template literal. A plain `'` opens a template
    /// here just like `f'`; anything else is scanned as a code token.
    #[must_use]
    pub fn next_template_start(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        self.begin_token();
        if self.eat('\'') {
            return self.make_token(TokenKind::TemplateOpen);
        }
        self.next_code_token()
    }

    fn next_code_token(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        self.begin_token();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' => return self.scan_string('\''),
            '"' | '`' => return self.scan_quoted_identifier(c),
            'f' | 'F' if self.peek_next() == Some('\'') => {
                self.advance();
                self.advance();
                return self.make_token(TokenKind::TemplateOpen);
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            c if is_identifier_start(c) => return self.scan_identifier(),
            _ => {}
        }

        self.advance();
        let kind = match c {
            // Single-character tokens
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            // Potentially multi-character tokens
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else if self.eat('~') {
                    if self.eat('*') {
                        TokenKind::IRegex
                    } else {
                        TokenKind::Regex
                    }
                } else {
                    TokenKind::Eq
                }
            }
            '~' => {
                if self.eat('*') {
                    TokenKind::IRegex
                } else {
                    TokenKind::Regex
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else if self.eat('~') {
                    if self.eat('*') {
                        TokenKind::NotIRegex
                    } else {
                        TokenKind::NotRegex
                    }
                } else {
                    TokenKind::Error(LexError::UnexpectedCharacter('!'))
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('>') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Concat
                } else {
                    TokenKind::Error(LexError::UnexpectedCharacter('|'))
                }
            }
            '?' => {
                if self.eat('.') {
                    TokenKind::NullProperty
                } else if self.eat('?') {
                    TokenKind::Nullish
                } else {
                    TokenKind::Question
                }
            }
            other => TokenKind::Error(LexError::UnexpectedCharacter(other)),
        };
        self.make_token(kind)
    }

    /// Scans inside a template string. `full` templates have no closing
    /// quote and run to the end of input.
    fn next_template_token(&mut self, full: bool) -> Token {
        self.begin_token();

        match self.peek() {
            None if full => return self.make_token(TokenKind::Eof),
            None => return self.make_token(TokenKind::Error(LexError::UnterminatedTemplate)),
            Some('{') => {
                self.advance();
                return self.make_token(TokenKind::LeftBrace);
            }
            Some('\'') if !full && self.peek_next() != Some('\'') => {
                self.advance();
                return self.make_token(TokenKind::TemplateClose);
            }
            _ => {}
        }

        let mut text = String::new();
        loop {
            match self.peek() {
                None | Some('{') => break,
                Some('\'') if !full => {
                    if self.peek_next() == Some('\'') {
                        self.advance();
                        self.advance();
                        text.push('\'');
                    } else {
                        break;
                    }
                }
                Some('\\') => {
                    self.advance();
                    if let Err(err) = self.scan_escape(&mut text) {
                        return self.make_token(TokenKind::Error(err));
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        self.make_token(TokenKind::TemplateText(text))
    }

    fn next_tag_attribute_token(&mut self) -> Token {
        self.skip_whitespace();
        self.begin_token();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' | '"' => return self.scan_string(c),
            c if is_identifier_start(c) => {
                while self.peek().is_some_and(is_tag_name_char) {
                    self.advance();
                }
                let name = self.input[self.start..self.pos].to_string();
                return self.make_token(TokenKind::Identifier(name));
            }
            _ => {}
        }

        self.advance();
        let kind = match c {
            '=' => TokenKind::Eq,
            '{' => TokenKind::LeftBrace,
            '>' => TokenKind::Gt,
            '/' if self.eat('>') => TokenKind::SlashGt,
            other => TokenKind::Error(LexError::UnexpectedCharacter(other)),
        };
        self.make_token(kind)
    }

    fn next_tag_text_token(&mut self) -> Token {
        self.begin_token();

        match self.peek() {
            None => return self.make_token(TokenKind::Error(LexError::UnterminatedTag)),
            Some('<') => {
                self.advance();
                let kind = if self.eat('/') {
                    TokenKind::TagCloseOpen
                } else {
                    TokenKind::Lt
                };
                return self.make_token(kind);
            }
            Some('{') => {
                self.advance();
                return self.make_token(TokenKind::LeftBrace);
            }
            Some(_) => {}
        }

        while self.peek().is_some_and(|c| c != '<' && c != '{') {
            self.advance();
        }
        let text = self.input[self.start..self.pos].to_string();
        self.make_token(TokenKind::TagText(text))
    }

    /// Tokenizes the entire input as code and returns all tokens.
    ///
    /// Template and tag contents are only lexed correctly when driven by the
    /// parser, which switches modes as it goes.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(LexMode::Code);
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn mode_kinds(input: &str, modes: &[LexMode]) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        modes.iter().map(|mode| lexer.next_token(*mode).kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn number(text: &str) -> TokenKind {
        TokenKind::Number(text.to_string())
    }

    fn string(text: &str) -> TokenKind {
        TokenKind::String(text.to_string())
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize("   \n\t  ");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, TokenKind::Eof));
    }

    #[test]
    fn test_line_comments() {
        assert_eq!(
            token_kinds("SELECT -- one\n// two\n# three\nFROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            token_kinds("SELECT /* comment */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = tokenize("1 /* never closed");
        assert_eq!(
            tokens[1].kind,
            TokenKind::Error(LexError::UnterminatedComment)
        );
        assert_eq!(tokens[1].span.start, 2);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz _qux $var"),
            vec![
                ident("foo"),
                ident("bar_baz"),
                ident("_qux"),
                ident("$var"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"column name\" `select` `a``b`"),
            vec![
                TokenKind::QuotedIdentifier("column name".to_string()),
                TokenKind::QuotedIdentifier("select".to_string()),
                TokenKind::QuotedIdentifier("a`b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_keep_raw_text() {
        assert_eq!(
            token_kinds("42 0x1F 017 1e10 2E-3"),
            vec![
                number("42"),
                number("0x1F"),
                number("017"),
                number("1e10"),
                number("2E-3"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_fraction_is_split_at_dot() {
        assert_eq!(
            token_kinds("3.14"),
            vec![number("3"), TokenKind::Dot, number("14"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_number_followed_by_identifier_e() {
        assert_eq!(
            token_kinds("1e"),
            vec![number("1"), ident("e"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s' 'a\\'b'"),
            vec![string("hello"), string("it's"), string("a'b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            token_kinds(r"'\n\t\\\x41\q'"),
            vec![string("\n\t\\A\\q"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_invalid_hex_escape() {
        assert_eq!(
            token_kinds(r"'\xZZ'")[0],
            TokenKind::Error(LexError::InvalidEscape("\\xZZ".to_string()))
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            token_kinds("'abc")[0],
            TokenKind::Error(LexError::UnterminatedString)
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % = == != <> < <= > >= || ->"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_regex_operators() {
        assert_eq!(
            token_kinds("=~ =~* ~ ~* !~ !~*"),
            vec![
                TokenKind::Regex,
                TokenKind::IRegex,
                TokenKind::Regex,
                TokenKind::IRegex,
                TokenKind::NotRegex,
                TokenKind::NotIRegex,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_null_operators() {
        assert_eq!(
            token_kinds("a ?? b ?.c ? d"),
            vec![
                ident("a"),
                TokenKind::Nullish,
                ident("b"),
                TokenKind::NullProperty,
                ident("c"),
                TokenKind::Question,
                ident("d"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            token_kinds("( ) [ ] { } , ; . :"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            token_kinds("@")[0],
            TokenKind::Error(LexError::UnexpectedCharacter('@'))
        );
    }

    #[test]
    fn test_template_open() {
        assert_eq!(
            token_kinds("f'")[0],
            TokenKind::TemplateOpen
        );
        assert_eq!(token_kinds("f")[0], ident("f"));
    }

    #[test]
    fn test_template_mode() {
        assert_eq!(
            mode_kinds(
                "f'a {x} b''c'",
                &[
                    LexMode::Code,
                    LexMode::Template,
                    LexMode::Template,
                    LexMode::Code,
                    LexMode::Code,
                    LexMode::Template,
                    LexMode::Template,
                    LexMode::Code,
                ],
            ),
            vec![
                TokenKind::TemplateOpen,
                TokenKind::TemplateText("a ".to_string()),
                TokenKind::LeftBrace,
                ident("x"),
                TokenKind::RightBrace,
                TokenKind::TemplateText(" b'c".to_string()),
                TokenKind::TemplateClose,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_template_escaped_brace() {
        assert_eq!(
            mode_kinds(r"a \{b\}", &[LexMode::FullTemplate, LexMode::FullTemplate]),
            vec![TokenKind::TemplateText("a {b}".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_full_template_quotes_are_text() {
        assert_eq!(
            mode_kinds("it's", &[LexMode::FullTemplate]),
            vec![TokenKind::TemplateText("it's".to_string())]
        );
    }

    #[test]
    fn test_unterminated_template() {
        assert_eq!(
            mode_kinds("abc", &[LexMode::Template, LexMode::Template]),
            vec![
                TokenKind::TemplateText("abc".to_string()),
                TokenKind::Error(LexError::UnterminatedTemplate),
            ]
        );
    }

    #[test]
    fn test_template_start_accepts_plain_quote() {
        let mut lexer = Lexer::new("  'a {b}'");
        let open = lexer.next_template_start();
        assert_eq!(open.kind, TokenKind::TemplateOpen);
        assert_eq!(open.span, Span::new(2, 3, 1, 3));
        assert_eq!(
            lexer.next_token(LexMode::Template).kind,
            TokenKind::TemplateText("a ".to_string())
        );

        let mut lexer = Lexer::new("f'x'");
        assert_eq!(lexer.next_template_start().kind, TokenKind::TemplateOpen);

        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_template_start().kind, ident("x"));
    }

    #[test]
    fn test_tag_attribute_mode() {
        let attr = LexMode::TagAttribute;
        assert_eq!(
            mode_kinds(
                "data-id=\"x\" on:click={ />",
                &[attr, attr, attr, attr, attr, attr, attr]
            ),
            vec![
                ident("data-id"),
                TokenKind::Eq,
                string("x"),
                ident("on:click"),
                TokenKind::Eq,
                TokenKind::LeftBrace,
                TokenKind::SlashGt,
            ]
        );
    }

    #[test]
    fn test_tag_text_mode() {
        let text = LexMode::TagText;
        let attr = LexMode::TagAttribute;
        assert_eq!(
            mode_kinds(
                "hello {x</b><i",
                &[text, text, LexMode::Code, text, attr, attr, text]
            ),
            vec![
                TokenKind::TagText("hello ".to_string()),
                TokenKind::LeftBrace,
                ident("x"),
                TokenKind::TagCloseOpen,
                ident("b"),
                TokenKind::Gt,
                TokenKind::Lt,
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_text() {
        assert_eq!(
            mode_kinds("", &[LexMode::TagText]),
            vec![TokenKind::Error(LexError::UnterminatedTag)]
        );
    }

    #[test]
    fn test_simple_select() {
        let sql = "SELECT id, name FROM users WHERE active = 1";
        assert_eq!(
            token_kinds(sql),
            vec![
                TokenKind::Keyword(Keyword::Select),
                ident("id"),
                TokenKind::Comma,
                ident("name"),
                TokenKind::Keyword(Keyword::From),
                ident("users"),
                TokenKind::Keyword(Keyword::Where),
                ident("active"),
                TokenKind::Eq,
                number("1"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("SELECT id\n  FROM t");
        assert_eq!(tokens[0].span, Span::new(0, 6, 1, 1));
        assert_eq!(tokens[1].span, Span::new(7, 9, 1, 8));
        assert_eq!(tokens[2].span, Span::new(12, 16, 2, 3));
    }
}
