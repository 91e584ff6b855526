//! Statement AST types for the scripting sublanguage.

use core::fmt;

use serde::Serialize;

use super::format::{write_identifier, Ident};
use super::Expr;
use crate::lexer::Span;

/// A whole program: a sequence of declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub declarations: Vec<Statement>,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{declaration}")?;
        }
        Ok(())
    }
}

/// `{ declaration* }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub declarations: Vec<Statement>,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.declarations.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{")?;
        for declaration in &self.declarations {
            write!(f, " {declaration}")?;
        }
        f.write_str(" }")
    }
}

/// `catch (name: Type) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchBlock {
    /// The variable bound to the thrown value.
    pub var: Option<String>,
    /// The error type filter.
    pub catch_type: Option<String>,
    pub body: Block,
}

impl fmt::Display for CatchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("catch ")?;
        if let Some(var) = &self.var {
            write!(f, "({}", Ident(var))?;
            if let Some(catch_type) = &self.catch_type {
                write!(f, ": {}", Ident(catch_type))?;
            }
            f.write_str(") ")?;
        }
        write!(f, "{}", self.body)
    }
}

/// A statement with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Source span.
    pub span: Span,
}

/// Every statement form of the scripting sublanguage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatementKind {
    /// `let name [:= value]`
    VarDecl { name: String, value: Option<Expr> },
    /// `target := value`
    Assignment { target: Expr, value: Expr },
    /// `expr;`
    Expr(Expr),
    /// `return [expr]`
    Return(Option<Expr>),
    /// `throw [expr]`
    Throw(Option<Expr>),
    /// `if (condition) stmt [else stmt]`
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    /// `while (condition) stmt`
    While {
        condition: Expr,
        body: Box<Statement>,
    },
    /// `for (init; condition; increment) stmt`
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expr>,
        increment: Option<Box<Statement>>,
        body: Box<Statement>,
    },
    /// `for (let [key,] value in iterable) stmt`
    ForIn {
        key: Option<String>,
        value: String,
        iterable: Expr,
        body: Box<Statement>,
    },
    /// `fn name(params) { ... }`
    Function {
        name: String,
        params: Vec<String>,
        body: Block,
    },
    /// `try { ... } catch ... [finally { ... }]`
    TryCatch {
        try_block: Block,
        catches: Vec<CatchBlock>,
        finally_block: Option<Block>,
    },
    /// `{ ... }`
    Block(Block),
    /// A lone `;`.
    Empty,
}

impl Statement {
    /// Creates a new statement.
    #[must_use]
    pub const fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Writes a `for (...)` header clause, where expressions take no semicolon.
fn write_for_clause(f: &mut fmt::Formatter<'_>, clause: Option<&Statement>) -> fmt::Result {
    match clause {
        Some(Statement {
            kind: StatementKind::Expr(expr),
            ..
        }) => write!(f, "{expr}"),
        Some(stmt) => write!(f, "{stmt}"),
        None => Ok(()),
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StatementKind::VarDecl { name, value } => {
                write!(f, "let {}", Ident(name))?;
                if let Some(value) = value {
                    write!(f, " := {value}")?;
                }
                Ok(())
            }
            StatementKind::Assignment { target, value } => write!(f, "{target} := {value}"),
            StatementKind::Expr(expr) => write!(f, "{expr};"),
            StatementKind::Return(Some(expr)) => write!(f, "return {expr};"),
            StatementKind::Return(None) => f.write_str("return;"),
            StatementKind::Throw(Some(expr)) => write!(f, "throw {expr};"),
            StatementKind::Throw(None) => f.write_str("throw;"),
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({condition}) {then_branch}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
            StatementKind::While { condition, body } => write!(f, "while ({condition}) {body}"),
            StatementKind::For {
                init,
                condition,
                increment,
                body,
            } => {
                f.write_str("for (")?;
                write_for_clause(f, init.as_deref())?;
                f.write_str("; ")?;
                if let Some(condition) = condition {
                    write!(f, "{condition}")?;
                }
                f.write_str("; ")?;
                write_for_clause(f, increment.as_deref())?;
                write!(f, ") {body}")
            }
            StatementKind::ForIn {
                key,
                value,
                iterable,
                body,
            } => {
                f.write_str("for (let ")?;
                if let Some(key) = key {
                    write!(f, "{}, ", Ident(key))?;
                }
                write!(f, "{} in {iterable}) {body}", Ident(value))
            }
            StatementKind::Function { name, params, body } => {
                f.write_str("fn ")?;
                write_identifier(f, name)?;
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_identifier(f, param)?;
                }
                write!(f, ") {body}")
            }
            StatementKind::TryCatch {
                try_block,
                catches,
                finally_block,
            } => {
                write!(f, "try {try_block}")?;
                for catch in catches {
                    write!(f, " {catch}")?;
                }
                if let Some(finally_block) = finally_block {
                    write!(f, " finally {finally_block}")?;
                }
                Ok(())
            }
            StatementKind::Block(block) => write!(f, "{block}"),
            StatementKind::Empty => f.write_str(";"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(kind: StatementKind) -> Statement {
        Statement::new(kind, Span::default())
    }

    #[test]
    fn test_var_decl_display() {
        let decl = stmt(StatementKind::VarDecl {
            name: "a".into(),
            value: Some(Expr::integer(1)),
        });
        assert_eq!(decl.to_string(), "let a := 1");
    }

    #[test]
    fn test_for_header_omits_expression_semicolons() {
        let for_stmt = stmt(StatementKind::For {
            init: Some(Box::new(stmt(StatementKind::VarDecl {
                name: "i".into(),
                value: Some(Expr::integer(0)),
            }))),
            condition: Some(Expr::field("ok")),
            increment: Some(Box::new(stmt(StatementKind::Expr(Expr::field("step"))))),
            body: Box::new(stmt(StatementKind::Block(Block {
                declarations: Vec::new(),
                span: Span::default(),
            }))),
        });
        assert_eq!(for_stmt.to_string(), "for (let i := 0; ok; step) { }");
    }

    #[test]
    fn test_try_catch_display() {
        let empty = || Block {
            declarations: Vec::new(),
            span: Span::default(),
        };
        let try_stmt = stmt(StatementKind::TryCatch {
            try_block: empty(),
            catches: vec![CatchBlock {
                var: Some("e".into()),
                catch_type: Some("RetryError".into()),
                body: empty(),
            }],
            finally_block: Some(empty()),
        });
        assert_eq!(
            try_stmt.to_string(),
            "try { } catch (e: RetryError) { } finally { }"
        );
    }
}
