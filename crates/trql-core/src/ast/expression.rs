//! Expression AST types.

use core::fmt;

use serde::Serialize;

use super::format::{write_chain, write_identifier, write_list, write_string, Ident};
use super::{Block, ColumnType, Query, TagElement, TemplateString, WindowExpr};
use crate::lexer::{Keyword, Span};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal, including `inf` and `nan`.
    Float(f64),
    /// String literal.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(v) if v.is_nan() => f.write_str("nan"),
            Self::Float(v) if v.is_infinite() => {
                f.write_str(if v.is_sign_negative() { "-inf" } else { "inf" })
            }
            // Debug keeps a fraction or an exponent, so floats stay floats.
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) => write_string(f, s, '\''),
            Self::Boolean(true) => f.write_str("true"),
            Self::Boolean(false) => f.write_str("false"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // String
    Concat,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Membership
    In,
    NotIn,
    InCohort,
    NotInCohort,

    // Pattern matching
    Like,
    NotLike,
    ILike,
    NotILike,
    Regex,
    IRegex,
    NotRegex,
    NotIRegex,

    // Null handling
    Nullish,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the TRQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::InCohort => "IN COHORT",
            Self::NotInCohort => "NOT IN COHORT",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
            Self::NotILike => "NOT ILIKE",
            Self::Regex => "=~",
            Self::IRegex => "=~*",
            Self::NotRegex => "!~",
            Self::NotIRegex => "!~*",
            Self::Nullish => "??",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Nullish => 3,
            Self::Eq
            | Self::NotEq
            | Self::Lt
            | Self::LtEq
            | Self::Gt
            | Self::GtEq
            | Self::In
            | Self::NotIn
            | Self::InCohort
            | Self::NotInCohort
            | Self::Like
            | Self::NotLike
            | Self::ILike
            | Self::NotILike
            | Self::Regex
            | Self::IRegex
            | Self::NotRegex
            | Self::NotIRegex => 4,
            Self::Add | Self::Sub | Self::Concat => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
}

impl UnaryOp {
    /// Returns the TRQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
        }
    }
}

/// The unit of an `INTERVAL e unit` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    /// Maps an interval-unit keyword to its unit.
    #[must_use]
    pub const fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Second => Some(Self::Second),
            Keyword::Minute => Some(Self::Minute),
            Keyword::Hour => Some(Self::Hour),
            Keyword::Day => Some(Self::Day),
            Keyword::Week => Some(Self::Week),
            Keyword::Month => Some(Self::Month),
            Keyword::Quarter => Some(Self::Quarter),
            Keyword::Year => Some(Self::Year),
            _ => None,
        }
    }

    /// Returns the keyword spelling of the unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Quarter => "QUARTER",
            Self::Year => "YEAR",
        }
    }
}

/// Which side `TRIM` strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrimSide {
    Leading,
    Trailing,
    Both,
}

impl TrimSide {
    /// Returns the keyword spelling of the side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leading => "LEADING",
            Self::Trailing => "TRAILING",
            Self::Both => "BOTH",
        }
    }
}

/// The window a function call is evaluated over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WindowRef {
    /// `OVER (PARTITION BY ...)`
    Inline(Box<WindowExpr>),
    /// `OVER name`, referring to a `WINDOW name AS (...)` definition.
    Named(String),
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// The function name.
    pub name: String,
    /// Parameters of a parametric call such as `quantile(0.9)(x)`.
    pub params: Option<Vec<Expr>>,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The `OVER` clause of a window-function call.
    pub over: Option<WindowRef>,
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.name)?;
        if let Some(params) = &self.params {
            f.write_str("(")?;
            write_list(f, params)?;
            f.write_str(")")?;
        }
        f.write_str("(")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        write_list(f, &self.args)?;
        f.write_str(")")?;
        match &self.over {
            Some(WindowRef::Inline(window)) => write!(f, " OVER ({window})"),
            Some(WindowRef::Named(name)) => write!(f, " OVER {}", Ident(name)),
            None => Ok(()),
        }
    }
}

/// The body of a lambda.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    /// `x -> x + 1`
    Expr(Box<Expr>),
    /// `x -> { return x + 1 }`
    Block(Block),
}

/// A plain identifier with its span, returned by the identifier entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    /// The identifier text, unquoted.
    pub name: String,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.name)
    }
}

/// A TRQL expression with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    /// What kind of expression this is.
    pub kind: ExprKind,
    /// Source span.
    pub span: Span,
}

/// Every expression form the language supports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),
    /// `DATE 'literal'`
    Date(String),
    /// `TIMESTAMP 'literal'`
    Timestamp(String),
    /// `INTERVAL e unit`
    Interval {
        value: Box<Expr>,
        unit: IntervalUnit,
    },
    /// `INTERVAL 'literal'`
    IntervalString(String),

    /// A (possibly qualified) column identifier such as `events.properties`.
    Field {
        /// The dotted name parts.
        chain: Vec<String>,
    },
    /// `*` or `table.*`
    Asterisk {
        /// Table qualifier (optional).
        table: Option<Vec<String>>,
    },
    /// `{expr}` placeholder.
    Placeholder(Box<Expr>),

    /// A binary expression.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },
    /// BETWEEN expression.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },
    /// `cond ? a : b`
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `expr AS alias`
    Alias {
        expr: Box<Expr>,
        alias: String,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },
    /// CAST expression.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: ColumnType,
    },
    /// `SUBSTRING(e FROM start [FOR length])`
    Substring {
        expr: Box<Expr>,
        from: Box<Expr>,
        length: Option<Box<Expr>>,
    },
    /// `TRIM(LEADING|TRAILING|BOTH chars FROM e)`
    Trim {
        side: TrimSide,
        chars: Box<Expr>,
        expr: Box<Expr>,
    },

    /// A named function or window-function call.
    Function(FunctionCall),
    /// A call on an arbitrary expression, e.g. `handlers.on_click(x)`.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `f(SELECT ...)`
    CallSelect {
        callee: Box<Expr>,
        query: Box<Query>,
    },

    /// `e[i]` or `e?.[i]`
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
        null_safe: bool,
    },
    /// `e.N` or `e?.N`
    TupleAccess {
        tuple: Box<Expr>,
        index: i64,
        null_safe: bool,
    },
    /// `e.name` or `e?.name`
    PropertyAccess {
        object: Box<Expr>,
        property: String,
        null_safe: bool,
    },

    /// `(a, b)` or `(a,)`
    Tuple(Vec<Expr>),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{k: v, ...}`
    Dict(Vec<(Expr, Expr)>),
    /// A parenthesized subquery.
    Subquery(Box<Query>),
    /// `x -> body` or `(a, b) -> body`
    Lambda {
        params: Vec<String>,
        body: LambdaBody,
    },
    /// A markup tag element.
    Tag(Box<TagElement>),
    /// `f'text {expr} text'`
    Template(TemplateString),
    /// Parenthesized expression.
    Parens(Box<Expr>),
}

impl Expr {
    /// Creates a new expression.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an unqualified field reference with an empty span.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Field {
                chain: vec![name.into()],
            },
            Span::default(),
        )
    }

    /// Creates an integer literal with an empty span.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::new(
            ExprKind::Literal(Literal::Integer(value)),
            Span::new(0, 0, 1, 1),
        )
    }

    /// Returns the literal value if this is a literal.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the dotted name parts if this is a field reference.
    #[must_use]
    pub fn as_field(&self) -> Option<&[String]> {
        match &self.kind {
            ExprKind::Field { chain } => Some(chain),
            _ => None,
        }
    }

    const fn is_number(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Literal(Literal::Integer(_) | Literal::Float(_))
        )
    }
}

/// Writes the receiver of `.N` or `.name`. A number receiver is followed by a
/// space so that `5 .1` does not lex back as the float `5.1`.
fn write_receiver(f: &mut fmt::Formatter<'_>, receiver: &Expr) -> fmt::Result {
    if receiver.is_number() {
        write!(f, "{receiver} ")
    } else {
        write!(f, "{receiver}")
    }
}

fn write_access_dot(f: &mut fmt::Formatter<'_>, null_safe: bool) -> fmt::Result {
    f.write_str(if null_safe { "?." } else { "." })
}

impl fmt::Display for Expr {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Date(value) => {
                f.write_str("DATE ")?;
                write_string(f, value, '\'')
            }
            ExprKind::Timestamp(value) => {
                f.write_str("TIMESTAMP ")?;
                write_string(f, value, '\'')
            }
            ExprKind::Interval { value, unit } => {
                write!(f, "INTERVAL {value} {}", unit.as_str())
            }
            ExprKind::IntervalString(value) => {
                f.write_str("INTERVAL ")?;
                write_string(f, value, '\'')
            }
            ExprKind::Field { chain } => write_chain(f, chain),
            ExprKind::Asterisk { table: None } => f.write_str("*"),
            ExprKind::Asterisk { table: Some(chain) } => {
                write_chain(f, chain)?;
                f.write_str(".*")
            }
            ExprKind::Placeholder(expr) => write!(f, "{{{expr}}}"),
            ExprKind::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                let operand = operand.to_string();
                if operand.starts_with('-') {
                    write!(f, "- {operand}")
                } else {
                    write!(f, "-{operand}")
                }
            }
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => write!(f, "NOT {operand}"),
            ExprKind::IsNull { expr, negated } => {
                write!(f, "{expr} IS {}NULL", if *negated { "NOT " } else { "" })
            }
            ExprKind::Between {
                expr,
                low,
                high,
                negated,
            } => write!(
                f,
                "{expr} {}BETWEEN {low} AND {high}",
                if *negated { "NOT " } else { "" }
            ),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => write!(f, "{condition} ? {then_expr} : {else_expr}"),
            ExprKind::Alias { expr, alias } => write!(f, "{expr} AS {}", Ident(alias)),
            ExprKind::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                f.write_str("CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for (when, then) in when_clauses {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(else_clause) = else_clause {
                    write!(f, " ELSE {else_clause}")?;
                }
                f.write_str(" END")
            }
            ExprKind::Cast { expr, data_type } => write!(f, "CAST({expr} AS {data_type})"),
            ExprKind::Substring { expr, from, length } => {
                write!(f, "SUBSTRING({expr} FROM {from}")?;
                if let Some(length) = length {
                    write!(f, " FOR {length}")?;
                }
                f.write_str(")")
            }
            ExprKind::Trim { side, chars, expr } => {
                write!(f, "TRIM({} {chars} FROM {expr})", side.as_str())
            }
            ExprKind::Function(call) => write!(f, "{call}"),
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::CallSelect { callee, query } => write!(f, "{callee}({query})"),
            ExprKind::ArrayAccess {
                array,
                index,
                null_safe,
            } => {
                write!(f, "{array}")?;
                if *null_safe {
                    f.write_str("?.")?;
                }
                write!(f, "[{index}]")
            }
            ExprKind::TupleAccess {
                tuple,
                index,
                null_safe,
            } => {
                write_receiver(f, tuple)?;
                write_access_dot(f, *null_safe)?;
                write!(f, "{index}")
            }
            ExprKind::PropertyAccess {
                object,
                property,
                null_safe,
            } => {
                write_receiver(f, object)?;
                write_access_dot(f, *null_safe)?;
                write_identifier(f, property)
            }
            ExprKind::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            ExprKind::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            ExprKind::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            ExprKind::Subquery(query) => write!(f, "({query})"),
            ExprKind::Lambda { params, body } => {
                if let [param] = params.as_slice() {
                    write_identifier(f, param)?;
                } else {
                    f.write_str("(")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write_identifier(f, param)?;
                    }
                    f.write_str(")")?;
                }
                match body {
                    LambdaBody::Expr(expr) => write!(f, " -> {expr}"),
                    LambdaBody::Block(block) => write!(f, " -> {block}"),
                }
            }
            ExprKind::Tag(tag) => write!(f, "{tag}"),
            ExprKind::Template(template) => write!(f, "{template}"),
            ExprKind::Parens(expr) => write!(f, "({expr})"),
        }
    }
}
