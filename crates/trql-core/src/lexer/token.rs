//! Token types for the TRQL lexer.

use core::fmt;

use serde::Serialize;

use super::Span;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// TRQL keywords.
        ///
        /// Keywords are matched case-insensitively. Whether a keyword may also
        /// stand in for a plain identifier is decided by [`Keyword::is_reserved`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Keyword {
            $(
                #[doc = $text]
                $variant,
            )*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL_KEYWORDS: &'static [Self] = &[$(Self::$variant,)*];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the keyword as it is written in normalized output.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    All => "ALL",
    And => "AND",
    Anti => "ANTI",
    Any => "ANY",
    Array => "ARRAY",
    As => "AS",
    Asc => "ASC",
    Ascending => "ASCENDING",
    Asof => "ASOF",
    Between => "BETWEEN",
    Both => "BOTH",
    By => "BY",
    Case => "CASE",
    Cast => "CAST",
    Catch => "CATCH",
    Cohort => "COHORT",
    Collate => "COLLATE",
    Cross => "CROSS",
    Cube => "CUBE",
    Current => "CURRENT",
    Date => "DATE",
    Day => "DAY",
    Desc => "DESC",
    Descending => "DESCENDING",
    Distinct => "DISTINCT",
    Else => "ELSE",
    End => "END",
    Except => "EXCEPT",
    False => "FALSE",
    Final => "FINAL",
    Finally => "FINALLY",
    First => "FIRST",
    Fn => "FN",
    Following => "FOLLOWING",
    For => "FOR",
    From => "FROM",
    Full => "FULL",
    Fun => "FUN",
    Group => "GROUP",
    Having => "HAVING",
    Hour => "HOUR",
    If => "IF",
    ILike => "ILIKE",
    In => "IN",
    Inf => "INF",
    Inner => "INNER",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Is => "IS",
    Join => "JOIN",
    Key => "KEY",
    Last => "LAST",
    Leading => "LEADING",
    Left => "LEFT",
    Let => "LET",
    Like => "LIKE",
    Limit => "LIMIT",
    Minute => "MINUTE",
    Month => "MONTH",
    Nan => "NAN",
    Not => "NOT",
    Null => "NULL",
    Nulls => "NULLS",
    Offset => "OFFSET",
    On => "ON",
    Or => "OR",
    Order => "ORDER",
    Outer => "OUTER",
    Over => "OVER",
    Partition => "PARTITION",
    Preceding => "PRECEDING",
    Prewhere => "PREWHERE",
    Quarter => "QUARTER",
    Range => "RANGE",
    Return => "RETURN",
    Right => "RIGHT",
    Rollup => "ROLLUP",
    Row => "ROW",
    Rows => "ROWS",
    Sample => "SAMPLE",
    Second => "SECOND",
    Select => "SELECT",
    Semi => "SEMI",
    Settings => "SETTINGS",
    Substring => "SUBSTRING",
    Then => "THEN",
    Throw => "THROW",
    Ties => "TIES",
    Timestamp => "TIMESTAMP",
    Top => "TOP",
    Totals => "TOTALS",
    Trailing => "TRAILING",
    Trim => "TRIM",
    True => "TRUE",
    Try => "TRY",
    Unbounded => "UNBOUNDED",
    Union => "UNION",
    Using => "USING",
    Week => "WEEK",
    When => "WHEN",
    Where => "WHERE",
    While => "WHILE",
    Window => "WINDOW",
    With => "WITH",
    Year => "YEAR",
}

impl Keyword {
    /// Returns true if this keyword can never be used as a plain identifier.
    ///
    /// Every other keyword is accepted wherever the grammar asks for an
    /// identifier, so `SELECT date, key FROM t` reads two columns.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Anti
                | Self::As
                | Self::Asof
                | Self::Between
                | Self::Case
                | Self::Catch
                | Self::Cross
                | Self::Distinct
                | Self::Else
                | Self::End
                | Self::Except
                | Self::False
                | Self::Final
                | Self::Finally
                | Self::Fn
                | Self::From
                | Self::Full
                | Self::Fun
                | Self::Group
                | Self::Having
                | Self::ILike
                | Self::In
                | Self::Inf
                | Self::Inner
                | Self::Intersect
                | Self::Is
                | Self::Join
                | Self::Let
                | Self::Like
                | Self::Limit
                | Self::Nan
                | Self::Not
                | Self::Null
                | Self::Offset
                | Self::On
                | Self::Or
                | Self::Order
                | Self::Outer
                | Self::Prewhere
                | Self::Sample
                | Self::Select
                | Self::Semi
                | Self::Settings
                | Self::Then
                | Self::Throw
                | Self::True
                | Self::Try
                | Self::Union
                | Self::Using
                | Self::When
                | Self::Where
                | Self::While
                | Self::Window
                | Self::With
        )
    }

    /// Returns true if this keyword may be used as an implicit table alias
    /// (an alias written without `AS`).
    #[must_use]
    pub const fn is_alias_keyword(self) -> bool {
        matches!(self, Self::Date | Self::First | Self::Key)
    }

    /// Returns true if this keyword names an interval unit.
    #[must_use]
    pub const fn is_interval_unit(self) -> bool {
        matches!(
            self,
            Self::Second
                | Self::Minute
                | Self::Hour
                | Self::Day
                | Self::Week
                | Self::Month
                | Self::Quarter
                | Self::Year
        )
    }
}

/// A lexical error, carried inside [`TokenKind::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum LexError {
    /// A string literal reached the end of input.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A quoted identifier reached the end of input.
    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,
    /// A template string reached the end of input.
    #[error("unterminated template string")]
    UnterminatedTemplate,
    /// A tag element was never closed.
    #[error("unterminated tag")]
    UnterminatedTag,
    /// A block comment reached the end of input.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A malformed escape sequence.
    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),
    /// A character that starts no token.
    #[error("unexpected character: {0}")]
    UnexpectedCharacter(char),
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, kept verbatim (e.g. `42`, `0x1F`, `017`, `1e10`)
    Number(String),
    /// String literal with escapes resolved (e.g. 'hello')
    String(String),

    // Identifiers and keywords
    /// Bare identifier (e.g. column_name)
    Identifier(String),
    /// Quoted identifier (e.g. "column name" or `column name`)
    QuotedIdentifier(String),
    /// TRQL keyword
    Keyword(Keyword),

    // Template strings
    /// f'
    TemplateOpen,
    /// A literal text run inside a template string
    TemplateText(String),
    /// The quote closing a template string
    TemplateClose,

    // Tag markup
    /// A literal text run between tags
    TagText(String),
    /// </
    TagCloseOpen,
    /// />
    SlashGt,

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ||
    Concat,
    /// =
    Eq,
    /// ==
    EqEq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// =~ or ~
    Regex,
    /// =~* or ~*
    IRegex,
    /// !~
    NotRegex,
    /// !~*
    NotIRegex,
    /// ?
    Question,
    /// ?.
    NullProperty,
    /// ??
    Nullish,
    /// ->
    Arrow,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,

    // Special
    /// End of input
    Eof,
    /// Invalid input
    Error(LexError),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Number(n) => return write!(f, "number {n}"),
            Self::String(s) => return write!(f, "string '{s}'"),
            Self::Identifier(name) => return write!(f, "identifier {name}"),
            Self::QuotedIdentifier(name) => return write!(f, "identifier \"{name}\""),
            Self::Keyword(kw) => return write!(f, "keyword {}", kw.as_str()),
            Self::TemplateText(_) => "template text",
            Self::TagText(_) => "tag text",
            Self::Error(err) => return write!(f, "{err}"),
            Self::TemplateOpen => "f'",
            Self::TemplateClose => "'",
            Self::TagCloseOpen => "</",
            Self::SlashGt => "/>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Concat => "||",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Regex => "=~",
            Self::IRegex => "=~*",
            Self::NotRegex => "!~",
            Self::NotIRegex => "!~*",
            Self::Question => "?",
            Self::NullProperty => "?.",
            Self::Nullish => "??",
            Self::Arrow => "->",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Eof => return f.write_str("end of input"),
        };
        write!(f, "'{symbol}'")
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("ilike"), Some(Keyword::ILike));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trips() {
        for kw in Keyword::ALL_KEYWORDS {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(*kw));
        }
    }

    #[test]
    fn test_reserved_and_alias_sets() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::From.is_reserved());
        assert!(!Keyword::Date.is_reserved());
        assert!(!Keyword::Key.is_reserved());
        assert!(!Keyword::If.is_reserved());
        assert!(Keyword::Date.is_alias_keyword());
        assert!(!Keyword::Left.is_alias_keyword());
        // Alias keywords must be usable as identifiers in the first place.
        for kw in Keyword::ALL_KEYWORDS {
            if kw.is_alias_keyword() {
                assert!(!kw.is_reserved(), "{kw:?}");
            }
        }
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::default());
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6, 1, 1));
        assert!(eof.is_eof());
        assert!(!select.is_eof());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6, 1, 1));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1, 1, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::LeftParen.to_string(), "'('");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
        assert_eq!(
            TokenKind::Keyword(Keyword::Select).to_string(),
            "keyword SELECT"
        );
    }
}
