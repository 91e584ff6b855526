//! TRQL lexer.
//!
//! This module provides a hand-written, mode-aware lexer that produces a
//! stream of tokens on demand.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, LexError, Token, TokenKind};
pub use tokenizer::{LexMode, Lexer};
