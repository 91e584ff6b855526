//! SELECT query AST types.

use core::fmt;

use serde::Serialize;

use super::format::{write_chain, write_identifier, write_list, write_string, Ident};
use super::{Expr, TagElement};
use crate::lexer::Span;

/// A complete query: a single SELECT, a chain of set operations, or a
/// top-level tag element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Query {
    /// A single SELECT.
    Select(Box<SelectQuery>),
    /// SELECTs combined with UNION / INTERSECT / EXCEPT.
    SelectSet(Box<SelectSetQuery>),
    /// A tag element standing in for a query. Only produced at the top level
    /// of the select entry point.
    Tag(Box<TagElement>),
}

impl Query {
    /// Returns the source span of the query.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Select(select) => select.span,
            Self::SelectSet(set) => set.span,
            Self::Tag(tag) => tag.span,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::SelectSet(set) => write!(f, "{set}"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Set operators, all at equal precedence and chained left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetOperator {
    UnionAll,
    UnionDistinct,
    Intersect,
    IntersectDistinct,
    Except,
}

impl SetOperator {
    /// Returns the TRQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnionAll => "UNION ALL",
            Self::UnionDistinct => "UNION DISTINCT",
            Self::Intersect => "INTERSECT",
            Self::IntersectDistinct => "INTERSECT DISTINCT",
            Self::Except => "EXCEPT",
        }
    }
}

/// One operand of a set operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SelectSetNode {
    /// A bare SELECT.
    Select(Box<SelectQuery>),
    /// A parenthesized query.
    Parens(Box<Query>),
    /// A `{expr}` placeholder.
    Placeholder(Expr),
}

impl fmt::Display for SelectSetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Parens(query) => write!(f, "({query})"),
            Self::Placeholder(expr) => write!(f, "{{{expr}}}"),
        }
    }
}

/// `operator query` following the first operand of a set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetOperation {
    pub operator: SetOperator,
    pub query: SelectSetNode,
}

/// `q1 UNION ALL q2 EXCEPT q3 ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectSetQuery {
    /// The first operand.
    pub initial: SelectSetNode,
    /// The operations applied in order.
    pub subsequent: Vec<SetOperation>,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for SelectSetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial)?;
        for op in &self.subsequent {
            write!(f, " {} {}", op.operator.as_str(), op.query)?;
        }
        Ok(())
    }
}

/// A common table expression in a WITH clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cte {
    pub kind: CteKind,
    /// Source span.
    pub span: Span,
}

/// The two CTE forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CteKind {
    /// `name AS (SELECT ...)`
    Subquery { name: String, query: Box<Query> },
    /// `expr AS name`
    Expr { name: String, expr: Expr },
}

impl Cte {
    /// Returns the name the CTE binds.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            CteKind::Subquery { name, .. } | CteKind::Expr { name, .. } => name,
        }
    }
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CteKind::Subquery { name, query } => write!(f, "{} AS ({query})", Ident(name)),
            CteKind::Expr { name, expr } => write!(f, "{expr} AS {}", Ident(name)),
        }
    }
}

/// `TOP n [WITH TIES]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Top {
    pub count: u64,
    pub with_ties: bool,
}

/// `CUBE` / `ROLLUP` grouping modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupByModifier {
    Cube,
    Rollup,
}

impl GroupByModifier {
    /// Returns the keyword spelling of the modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cube => "CUBE",
            Self::Rollup => "ROLLUP",
        }
    }
}

/// `GROUP BY [CUBE|ROLLUP] (exprs)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBy {
    /// `GROUP BY CUBE(...)` or `GROUP BY ROLLUP(...)`.
    pub modifier: Option<GroupByModifier>,
    pub exprs: Vec<Expr>,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GROUP BY ")?;
        match self.modifier {
            Some(modifier) => {
                write!(f, "{}(", modifier.as_str())?;
                write_list(f, &self.exprs)?;
                f.write_str(")")
            }
            None => write_list(f, &self.exprs),
        }
    }
}

/// The `LEFT` / `INNER` qualifier of an ARRAY JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrayJoinKind {
    Left,
    Inner,
}

/// `[LEFT|INNER] ARRAY JOIN exprs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayJoin {
    pub kind: Option<ArrayJoinKind>,
    pub exprs: Vec<Expr>,
}

impl fmt::Display for ArrayJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(ArrayJoinKind::Left) => f.write_str("LEFT ")?,
            Some(ArrayJoinKind::Inner) => f.write_str("INNER ")?,
            None => {}
        }
        f.write_str("ARRAY JOIN ")?;
        write_list(f, &self.exprs)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderDirection {
    /// Ascending (`ASC` or `ASCENDING`).
    Asc,
    /// Descending (`DESC` or `DESCENDING`).
    Desc,
}

/// Placement of NULLs in an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullsOrder {
    First,
    Last,
}

/// An ORDER BY item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderExpr {
    /// The expression to order by.
    pub expr: Expr,
    /// The sort direction, if written.
    pub direction: Option<OrderDirection>,
    /// `NULLS FIRST` / `NULLS LAST`.
    pub nulls: Option<NullsOrder>,
    /// `COLLATE 'name'`, kept as written.
    pub collate: Option<String>,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for OrderExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        match self.direction {
            Some(OrderDirection::Asc) => f.write_str(" ASC")?,
            Some(OrderDirection::Desc) => f.write_str(" DESC")?,
            None => {}
        }
        match self.nulls {
            Some(NullsOrder::First) => f.write_str(" NULLS FIRST")?,
            Some(NullsOrder::Last) => f.write_str(" NULLS LAST")?,
            None => {}
        }
        if let Some(collate) = &self.collate {
            f.write_str(" COLLATE ")?;
            write_string(f, collate, '\'')?;
        }
        Ok(())
    }
}

/// `ROWS` or `RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameUnits {
    Rows,
    Range,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    UnboundedFollowing,
    Preceding(Expr),
    Following(Expr),
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
            Self::Preceding(expr) => write!(f, "{expr} PRECEDING"),
            Self::Following(expr) => write!(f, "{expr} FOLLOWING"),
        }
    }
}

/// `ROWS|RANGE bound` or `ROWS|RANGE BETWEEN bound AND bound`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// Present for the `BETWEEN ... AND ...` form.
    pub end: Option<FrameBound>,
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.units {
            FrameUnits::Rows => "ROWS",
            FrameUnits::Range => "RANGE",
        })?;
        match &self.end {
            Some(end) => write!(f, " BETWEEN {} AND {end}", self.start),
            None => write!(f, " {}", self.start),
        }
    }
}

/// The body of an `OVER (...)` clause or a `WINDOW name AS (...)` definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowExpr {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderExpr>,
    pub frame: Option<WindowFrame>,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for WindowExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if !self.partition_by.is_empty() {
            f.write_str("PARTITION BY ")?;
            write_list(f, &self.partition_by)?;
            sep = " ";
        }
        if !self.order_by.is_empty() {
            write!(f, "{sep}ORDER BY ")?;
            write_list(f, &self.order_by)?;
            sep = " ";
        }
        if let Some(frame) = &self.frame {
            write!(f, "{sep}{frame}")?;
        }
        Ok(())
    }
}

/// `WINDOW name AS (window)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedWindow {
    pub name: String,
    pub window: WindowExpr,
}

/// `LIMIT n [OFFSET o] BY exprs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitBy {
    pub limit: Expr,
    pub offset: Option<Expr>,
    pub by: Vec<Expr>,
}

/// A `name = value` entry of the SETTINGS clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub name: String,
    pub value: Expr,
}

/// A SELECT query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectQuery {
    /// WITH clause.
    pub ctes: Vec<Cte>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// TOP clause.
    pub top: Option<Top>,
    /// The selected columns.
    pub columns: Vec<Expr>,
    /// FROM clause.
    pub from: Option<JoinExpr>,
    /// ARRAY JOIN clause.
    pub array_join: Option<ArrayJoin>,
    /// PREWHERE clause.
    pub prewhere: Option<Expr>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY clause.
    pub group_by: Option<GroupBy>,
    /// `WITH CUBE` / `WITH ROLLUP` after the grouping.
    pub with_modifier: Option<GroupByModifier>,
    /// `WITH TOTALS`.
    pub with_totals: bool,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// WINDOW clause.
    pub windows: Vec<NamedWindow>,
    /// ORDER BY clause.
    pub order_by: Vec<OrderExpr>,
    /// LIMIT ... BY clause.
    pub limit_by: Option<LimitBy>,
    /// LIMIT clause.
    pub limit: Option<Expr>,
    /// OFFSET clause, also filled by `LIMIT offset, count`.
    pub offset: Option<Expr>,
    /// `LIMIT n WITH TIES`.
    pub limit_with_ties: bool,
    /// SETTINGS clause.
    pub settings: Vec<Setting>,
    /// Source span.
    pub span: Span,
}

impl SelectQuery {
    /// Creates an empty query selecting `columns`.
    #[must_use]
    pub const fn new(columns: Vec<Expr>, span: Span) -> Self {
        Self {
            ctes: Vec::new(),
            distinct: false,
            top: None,
            columns,
            from: None,
            array_join: None,
            prewhere: None,
            where_clause: None,
            group_by: None,
            with_modifier: None,
            with_totals: false,
            having: None,
            windows: Vec::new(),
            order_by: Vec::new(),
            limit_by: None,
            limit: None,
            offset: None,
            limit_with_ties: false,
            settings: Vec::new(),
            span,
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ctes.is_empty() {
            f.write_str("WITH ")?;
            write_list(f, &self.ctes)?;
            f.write_str(" ")?;
        }
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        if let Some(top) = &self.top {
            write!(f, "TOP {} ", top.count)?;
            if top.with_ties {
                f.write_str("WITH TIES ")?;
            }
        }
        write_list(f, &self.columns)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(array_join) = &self.array_join {
            write!(f, " {array_join}")?;
        }
        if let Some(prewhere) = &self.prewhere {
            write!(f, " PREWHERE {prewhere}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " {group_by}")?;
        }
        if let Some(modifier) = self.with_modifier {
            write!(f, " WITH {}", modifier.as_str())?;
        }
        if self.with_totals {
            f.write_str(" WITH TOTALS")?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        if !self.windows.is_empty() {
            f.write_str(" WINDOW ")?;
            for (i, named) in self.windows.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} AS ({})", Ident(&named.name), named.window)?;
            }
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_list(f, &self.order_by)?;
        }
        if let Some(limit_by) = &self.limit_by {
            write!(f, " LIMIT {}", limit_by.limit)?;
            if let Some(offset) = &limit_by.offset {
                write!(f, " OFFSET {offset}")?;
            }
            f.write_str(" BY ")?;
            write_list(f, &limit_by.by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
            if self.limit_with_ties {
                f.write_str(" WITH TIES")?;
            }
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        if !self.settings.is_empty() {
            f.write_str(" SETTINGS ")?;
            for (i, setting) in self.settings.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_identifier(f, &setting.name)?;
                write!(f, " = {}", setting.value)?;
            }
        }
        Ok(())
    }
}

/// A table expression: the primary of a join tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableExpr {
    pub kind: TableExprKind,
    /// Source span.
    pub span: Span,
}

/// The table expression forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableExprKind {
    /// `events` or `db.events`
    Identifier(Vec<String>),
    /// `numbers(10)`
    Function { name: String, args: Vec<Expr> },
    /// `(SELECT ...)`
    Subquery(Box<Query>),
    /// `table [AS] alias`
    Alias {
        table: Box<TableExpr>,
        alias: String,
    },
    /// A tag element used as a table.
    Tag(Box<TagElement>),
    /// `{expr}`
    Placeholder(Expr),
}

impl fmt::Display for TableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TableExprKind::Identifier(chain) => write_chain(f, chain),
            TableExprKind::Function { name, args } => {
                write_identifier(f, name)?;
                f.write_str("(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            TableExprKind::Subquery(query) => write!(f, "({query})"),
            TableExprKind::Alias { table, alias } => write!(f, "{table} AS {}", Ident(alias)),
            TableExprKind::Tag(tag) => write!(f, "{tag}"),
            TableExprKind::Placeholder(expr) => write!(f, "{{{expr}}}"),
        }
    }
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// Join strictness qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinStrictness {
    All,
    Any,
    Asof,
    Semi,
    Anti,
}

impl JoinStrictness {
    /// Returns the keyword spelling of the strictness.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::Asof => "ASOF",
            Self::Semi => "SEMI",
            Self::Anti => "ANTI",
        }
    }
}

/// The operator of a qualified join, e.g. `ANY LEFT OUTER JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinOp {
    pub kind: JoinKind,
    pub strictness: Option<JoinStrictness>,
    pub outer: bool,
}

impl fmt::Display for JoinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(strictness) = self.strictness {
            write!(f, "{} ", strictness.as_str())?;
        }
        f.write_str(match self.kind {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        })?;
        if self.outer {
            f.write_str(" OUTER")?;
        }
        f.write_str(" JOIN")
    }
}

/// The constraint of a qualified join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinConstraint {
    /// `ON exprs`
    On(Vec<Expr>),
    /// `USING exprs` or `USING (exprs)`
    Using { exprs: Vec<Expr>, parens: bool },
}

impl fmt::Display for JoinConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On(exprs) => {
                f.write_str("ON ")?;
                write_list(f, exprs)
            }
            Self::Using {
                exprs,
                parens: true,
            } => {
                f.write_str("USING (")?;
                write_list(f, exprs)?;
                f.write_str(")")
            }
            Self::Using {
                exprs,
                parens: false,
            } => {
                f.write_str("USING ")?;
                write_list(f, exprs)
            }
        }
    }
}

/// `ratio` or `numerator/denominator` in a SAMPLE clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRatio {
    pub numerator: Expr,
    pub denominator: Option<Expr>,
}

impl fmt::Display for SampleRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numerator)?;
        if let Some(denominator) = &self.denominator {
            write!(f, "/{denominator}")?;
        }
        Ok(())
    }
}

/// `SAMPLE ratio [OFFSET ratio]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleClause {
    pub ratio: SampleRatio,
    pub offset: Option<SampleRatio>,
}

/// A node of the FROM join tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinExpr {
    pub kind: JoinExprKind,
    /// Source span.
    pub span: Span,
}

/// The join tree forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinExprKind {
    /// `table [FINAL] [SAMPLE ...]`
    Table {
        table: TableExpr,
        is_final: bool,
        sample: Option<SampleClause>,
    },
    /// `left op JOIN right constraint`
    Join {
        left: Box<JoinExpr>,
        op: JoinOp,
        right: Box<JoinExpr>,
        constraint: JoinConstraint,
    },
    /// `left CROSS JOIN right` or `left, right`
    Cross {
        left: Box<JoinExpr>,
        right: Box<JoinExpr>,
        /// Whether the comma form was used.
        comma: bool,
    },
    /// `(join)`
    Parens(Box<JoinExpr>),
}

impl fmt::Display for JoinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            JoinExprKind::Table {
                table,
                is_final,
                sample,
            } => {
                write!(f, "{table}")?;
                if *is_final {
                    f.write_str(" FINAL")?;
                }
                if let Some(sample) = sample {
                    write!(f, " SAMPLE {}", sample.ratio)?;
                    if let Some(offset) = &sample.offset {
                        write!(f, " OFFSET {offset}")?;
                    }
                }
                Ok(())
            }
            JoinExprKind::Join {
                left,
                op,
                right,
                constraint,
            } => write!(f, "{left} {op} {right} {constraint}"),
            JoinExprKind::Cross { left, right, comma } => {
                if *comma {
                    write!(f, "{left}, {right}")
                } else {
                    write!(f, "{left} CROSS JOIN {right}")
                }
            }
            JoinExprKind::Parens(inner) => write!(f, "({inner})"),
        }
    }
}
