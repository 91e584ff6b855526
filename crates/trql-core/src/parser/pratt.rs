//! Binding powers for precedence climbing.
//!
//! Higher binding power binds tighter. Infix operators are described by a
//! `(left_bp, right_bp)` pair: left associative when `left_bp < right_bp`.

use crate::ast::BinaryOp;
use crate::lexer::{Keyword, Token, TokenKind};

/// Binding power constants, loosest first.
pub mod bp {
    /// `e AS alias`
    pub const ALIAS: u8 = 2;
    /// `cond ? a : b`
    pub const TERNARY: u8 = 4;
    /// `e [NOT] BETWEEN low AND high`
    pub const BETWEEN: u8 = 6;
    pub const OR: u8 = 8;
    pub const AND: u8 = 10;
    /// `a ?? b`
    pub const NULLISH: u8 = 12;
    /// Operand of prefix `NOT`.
    pub const NOT: u8 = 14;
    /// `e IS [NOT] NULL`
    pub const IS_NULL: u8 = 16;
    /// `=`, `<`, `IN`, `LIKE`, `=~` and friends.
    pub const COMPARISON: u8 = 18;
    /// `+`, `-`, `||`
    pub const ADDITIVE: u8 = 20;
    /// `*`, `/`, `%`
    pub const MULTIPLICATIVE: u8 = 22;
    /// Operand of prefix `-`.
    pub const NEGATE: u8 = 24;
}

/// An infix or postfix operator recognized after an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    /// A binary operator spelled with `tokens` tokens (`NOT IN COHORT` is 3).
    Binary { op: BinaryOp, tokens: usize },
    /// `IS [NOT] NULL`
    IsNull,
    /// `[NOT] BETWEEN`
    Between { negated: bool },
    /// `? :`
    Ternary,
    /// `AS name`
    Alias,
}

impl InfixOp {
    /// Returns `(left_bp, right_bp)` for the operator.
    #[must_use]
    pub const fn binding_power(self) -> (u8, u8) {
        match self {
            Self::Binary { op, .. } => binary_binding_power(op),
            Self::IsNull => (bp::IS_NULL, bp::IS_NULL + 1),
            // The upper bound is parsed with `BETWEEN + 1`; the lower bound
            // must stop before AND and is parsed separately.
            Self::Between { .. } => (bp::BETWEEN, bp::BETWEEN + 1),
            // Right associative on the else branch.
            Self::Ternary => (bp::TERNARY, bp::TERNARY),
            Self::Alias => (bp::ALIAS, bp::ALIAS + 1),
        }
    }
}

/// Returns the binding power of a binary operator.
#[must_use]
pub const fn binary_binding_power(op: BinaryOp) -> (u8, u8) {
    let left = match op {
        BinaryOp::Or => bp::OR,
        BinaryOp::And => bp::AND,
        BinaryOp::Nullish => bp::NULLISH,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => bp::ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => bp::MULTIPLICATIVE,
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::NotIn
        | BinaryOp::InCohort
        | BinaryOp::NotInCohort
        | BinaryOp::Like
        | BinaryOp::NotLike
        | BinaryOp::ILike
        | BinaryOp::NotILike
        | BinaryOp::Regex
        | BinaryOp::IRegex
        | BinaryOp::NotRegex
        | BinaryOp::NotIRegex => bp::COMPARISON,
    };
    (left, left + 1)
}

/// Converts a single token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::Eq | TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Regex => Some(BinaryOp::Regex),
        TokenKind::IRegex => Some(BinaryOp::IRegex),
        TokenKind::NotRegex => Some(BinaryOp::NotRegex),
        TokenKind::NotIRegex => Some(BinaryOp::NotIRegex),
        TokenKind::Nullish => Some(BinaryOp::Nullish),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::Keyword(Keyword::ILike) => Some(BinaryOp::ILike),
        _ => None,
    }
}

const fn keyword_of(token: Option<&Token>) -> Option<Keyword> {
    match token {
        Some(token) => token.as_keyword(),
        None => None,
    }
}

/// Recognizes the operator starting at `current`, using the following tokens
/// for multi-word operators such as `NOT IN COHORT`.
///
/// `next` and `after_next` are the two tokens after `current`.
#[must_use]
pub fn infix_op(current: &TokenKind, next: Option<&Token>, after_next: Option<&Token>) -> Option<InfixOp> {
    if let Some(op) = token_to_binary_op(current) {
        return Some(InfixOp::Binary { op, tokens: 1 });
    }
    let binary = |op, tokens| Some(InfixOp::Binary { op, tokens });
    match current {
        TokenKind::Question => Some(InfixOp::Ternary),
        TokenKind::Keyword(Keyword::Is) => Some(InfixOp::IsNull),
        TokenKind::Keyword(Keyword::Between) => Some(InfixOp::Between { negated: false }),
        TokenKind::Keyword(Keyword::As) => Some(InfixOp::Alias),
        TokenKind::Keyword(Keyword::In) => match keyword_of(next) {
            Some(Keyword::Cohort) => binary(BinaryOp::InCohort, 2),
            _ => binary(BinaryOp::In, 1),
        },
        TokenKind::Keyword(Keyword::Not) => match keyword_of(next) {
            Some(Keyword::In) => match keyword_of(after_next) {
                Some(Keyword::Cohort) => binary(BinaryOp::NotInCohort, 3),
                _ => binary(BinaryOp::NotIn, 2),
            },
            Some(Keyword::Like) => binary(BinaryOp::NotLike, 2),
            Some(Keyword::ILike) => binary(BinaryOp::NotILike, 2),
            Some(Keyword::Between) => Some(InfixOp::Between { negated: true }),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn keyword(kw: Keyword) -> Token {
        Token::new(TokenKind::Keyword(kw), Span::default())
    }

    fn left_bp(kind: &TokenKind) -> u8 {
        infix_op(kind, None, None)
            .map(|op| op.binding_power().0)
            .unwrap_or_default()
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(left_bp(&TokenKind::Star) > left_bp(&TokenKind::Plus));
        assert!(left_bp(&TokenKind::Plus) > left_bp(&TokenKind::Eq));
        assert!(left_bp(&TokenKind::Eq) > left_bp(&TokenKind::Keyword(Keyword::Is)));
        assert!(left_bp(&TokenKind::Keyword(Keyword::Is)) > bp::NOT);
        assert!(bp::NOT > left_bp(&TokenKind::Nullish));
        assert!(left_bp(&TokenKind::Nullish) > left_bp(&TokenKind::Keyword(Keyword::And)));
        assert!(
            left_bp(&TokenKind::Keyword(Keyword::And)) > left_bp(&TokenKind::Keyword(Keyword::Or))
        );
        assert!(
            left_bp(&TokenKind::Keyword(Keyword::Or))
                > left_bp(&TokenKind::Keyword(Keyword::Between))
        );
        assert!(left_bp(&TokenKind::Keyword(Keyword::Between)) > left_bp(&TokenKind::Question));
        assert!(left_bp(&TokenKind::Question) > left_bp(&TokenKind::Keyword(Keyword::As)));
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = binary_binding_power(BinaryOp::Add);
        assert!(left < right);
        let (left, right) = InfixOp::Ternary.binding_power();
        assert_eq!(left, right);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::EqEq), Some(BinaryOp::Eq));
        assert_eq!(token_to_binary_op(&TokenKind::Nullish), Some(BinaryOp::Nullish));
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn test_multi_word_operators() {
        let not = TokenKind::Keyword(Keyword::Not);
        let in_kw = keyword(Keyword::In);
        let cohort = keyword(Keyword::Cohort);
        assert_eq!(
            infix_op(&not, Some(&in_kw), Some(&cohort)),
            Some(InfixOp::Binary {
                op: BinaryOp::NotInCohort,
                tokens: 3
            })
        );
        assert_eq!(
            infix_op(&TokenKind::Keyword(Keyword::In), Some(&cohort), None),
            Some(InfixOp::Binary {
                op: BinaryOp::InCohort,
                tokens: 2
            })
        );
        assert_eq!(
            infix_op(&not, Some(&keyword(Keyword::Between)), None),
            Some(InfixOp::Between { negated: true })
        );
        assert_eq!(infix_op(&not, Some(&keyword(Keyword::Null)), None), None);
    }
}
