//! Abstract Syntax Tree (AST) types for TRQL.
//!
//! Every node owns its children and carries the [`Span`](crate::lexer::Span)
//! it was parsed from. `Display` prints normalized TRQL that parses back to
//! the same tree.

mod expression;
mod format;
mod select;
mod statement;
mod template;
mod types;

pub use expression::{
    BinaryOp, Expr, ExprKind, FunctionCall, Identifier, IntervalUnit, LambdaBody, Literal,
    TrimSide, UnaryOp, WindowRef,
};
pub use select::{
    ArrayJoin, ArrayJoinKind, Cte, CteKind, FrameBound, FrameUnits, GroupBy, GroupByModifier,
    JoinConstraint, JoinExpr, JoinExprKind, JoinKind, JoinOp, JoinStrictness, LimitBy,
    NamedWindow, NullsOrder, OrderDirection, OrderExpr, Query, SampleClause, SampleRatio,
    SelectQuery, SelectSetNode, SelectSetQuery, SetOperation, SetOperator, Setting, TableExpr,
    TableExprKind, Top, WindowExpr, WindowFrame,
};
pub use statement::{Block, CatchBlock, Program, Statement, StatementKind};
pub use template::{
    TagAttribute, TagAttributeValue, TagChild, TagElement, TemplatePart, TemplateString,
};
pub use types::{ColumnType, ColumnTypeKind, EnumValue, NestedField};
