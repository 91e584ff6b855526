//! TRQL parser
//!
//! A hand-written recursive descent parser with precedence climbing for
//! expressions. Statements, SELECT queries, templates, tag elements and
//! column types each live in their own submodule as further `impl Parser`
//! blocks.

mod column_type;
mod error;
mod expression;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod select;
mod statement;
mod template;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{DEFAULT_MAX_DEPTH, Parser, ParserOptions};
