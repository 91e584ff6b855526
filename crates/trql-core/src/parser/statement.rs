//! The scripting sublanguage: programs, declarations, blocks and statements.

use super::error::ParseError;
use super::parser::{is_identifier_kind, Parser};
use crate::ast::{Block, CatchBlock, Expr, Program, Statement, StatementKind};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    pub(super) fn parse_program_body(&mut self) -> Result<Program, ParseError> {
        let mut declarations = Vec::new();
        while !self.current.is_eof() {
            declarations.push(self.parse_declaration()?);
        }
        Ok(Program {
            declarations,
            span: self.input_span(),
        })
    }

    /// Parses `{ declaration* }`.
    pub(super) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.current.span;
        self.expect(&TokenKind::LeftBrace)?;
        let mut declarations = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.current.is_eof() {
            declarations.push(self.parse_declaration()?);
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(Block {
            declarations,
            span: self.span_from(start),
        })
    }

    fn parse_declaration(&mut self) -> Result<Statement, ParseError> {
        if self.check_keyword(Keyword::Let) {
            self.parse_var_decl()
        } else {
            self.parse_statement()
        }
    }

    /// `let name [:= value]`
    fn parse_var_decl(&mut self) -> Result<Statement, ParseError> {
        let start = self.current.span;
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;
        let value = if self.assignment_follows() {
            self.advance(); // :
            self.advance(); // =
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Statement::new(
            StatementKind::VarDecl { name, value },
            self.span_from(start),
        ))
    }

    /// Returns true at the `:` of `:=`.
    fn assignment_follows(&self) -> bool {
        self.check(&TokenKind::Colon) && self.peek_is(&TokenKind::Eq)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(|p| {
            let start = p.current.span;
            let kind = match &p.current.kind {
                TokenKind::Keyword(Keyword::Return) => {
                    p.advance();
                    StatementKind::Return(p.parse_optional_value()?)
                }
                TokenKind::Keyword(Keyword::Throw) => {
                    p.advance();
                    StatementKind::Throw(p.parse_optional_value()?)
                }
                TokenKind::Keyword(Keyword::Try) => p.parse_try_catch()?,
                TokenKind::Keyword(Keyword::If) if p.if_statement_follows() => p.parse_if()?,
                TokenKind::Keyword(Keyword::While) => {
                    p.advance();
                    let condition = p.parse_condition()?;
                    let body = Box::new(p.parse_statement()?);
                    p.eat(&TokenKind::Semicolon);
                    StatementKind::While { condition, body }
                }
                TokenKind::Keyword(Keyword::For) if p.peek_is(&TokenKind::LeftParen) => {
                    p.parse_for()?
                }
                TokenKind::Keyword(Keyword::Fn | Keyword::Fun) => p.parse_function_decl()?,
                TokenKind::LeftBrace => StatementKind::Block(p.parse_block()?),
                TokenKind::Semicolon => {
                    p.advance();
                    StatementKind::Empty
                }
                _ => p.parse_expression_statement()?,
            };
            Ok(Statement::new(kind, p.span_from(start)))
        })
    }

    /// Parses the value of `return` or `throw`, then an optional `;`.
    fn parse_optional_value(&mut self) -> Result<Option<Expr>, ParseError> {
        let value = if self.can_start_expression() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.eat(&TokenKind::Semicolon);
        Ok(value)
    }

    fn parse_expression_statement(&mut self) -> Result<StatementKind, ParseError> {
        let expr = self.parse_expression()?;
        if self.assignment_follows() {
            self.advance(); // :
            self.advance(); // =
            let value = self.parse_expression()?;
            return Ok(StatementKind::Assignment {
                target: expr,
                value,
            });
        }
        self.eat(&TokenKind::Semicolon);
        Ok(StatementKind::Expr(expr))
    }

    /// `(condition)`
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(condition)
    }

    /// `if(a, b, c)` is a call to the `if` function; `if (a) ...` without a
    /// top-level comma inside the parentheses is a statement.
    fn if_statement_follows(&self) -> bool {
        let mut tokens = self.lookahead();
        if !tokens
            .next()
            .is_some_and(|t| t.kind == TokenKind::LeftParen)
        {
            return false;
        }
        let mut depth = 1usize;
        for token in tokens {
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                TokenKind::Comma if depth == 1 => return false,
                TokenKind::Eof => return true,
                _ => {}
            }
        }
        true
    }

    fn parse_if(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StatementKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Parses `for (...) body` in its classic or `for (let x in xs)` form.
    fn parse_for(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::For)?;
        self.expect(&TokenKind::LeftParen)?;
        let for_in = self.check_keyword(Keyword::Let)
            && self.peek().is_some_and(|t| is_identifier_kind(&t.kind))
            && self.peek_nth(1).is_some_and(|t| {
                matches!(t.kind, TokenKind::Comma | TokenKind::Keyword(Keyword::In))
            });

        let kind = if for_in {
            self.expect_keyword(Keyword::Let)?;
            let first = self.expect_identifier()?;
            let (key, value) = if self.eat(&TokenKind::Comma) {
                (Some(first), self.expect_identifier()?)
            } else {
                (None, first)
            };
            self.expect_keyword(Keyword::In)?;
            let iterable = self.parse_expression()?;
            self.expect(&TokenKind::RightParen)?;
            let body = Box::new(self.parse_statement()?);
            StatementKind::ForIn {
                key,
                value,
                iterable,
                body,
            }
        } else {
            let init = self.parse_for_clause(&TokenKind::Semicolon)?;
            self.expect(&TokenKind::Semicolon)?;
            let condition = if self.check(&TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.expect(&TokenKind::Semicolon)?;
            let increment = self.parse_for_clause(&TokenKind::RightParen)?;
            self.expect(&TokenKind::RightParen)?;
            let body = Box::new(self.parse_statement()?);
            StatementKind::For {
                init,
                condition,
                increment,
                body,
            }
        };
        self.eat(&TokenKind::Semicolon);
        Ok(kind)
    }

    /// Parses the init or increment clause of a classic `for`: a `let`, an
    /// assignment or a bare expression, none of which takes a `;`.
    fn parse_for_clause(&mut self, end: &TokenKind) -> Result<Option<Box<Statement>>, ParseError> {
        if self.check(end) {
            return Ok(None);
        }
        let start = self.current.span;
        if self.check_keyword(Keyword::Let) {
            return Ok(Some(Box::new(self.parse_var_decl()?)));
        }
        let target = self.parse_expression()?;
        let kind = if self.assignment_follows() {
            self.advance();
            self.advance();
            StatementKind::Assignment {
                target,
                value: self.parse_expression()?,
            }
        } else {
            StatementKind::Expr(target)
        };
        Ok(Some(Box::new(Statement::new(kind, self.span_from(start)))))
    }

    /// `fn name(params) { ... }` or `fun name(params) { ... }`
    fn parse_function_decl(&mut self) -> Result<StatementKind, ParseError> {
        self.advance(); // fn / fun
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LeftParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        Ok(StatementKind::Function { name, params, body })
    }

    /// `try { } catch [(name [: Type])] { } ... [finally { }]`
    fn parse_try_catch(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Try)?;
        let try_block = self.parse_block()?;

        let mut catches = Vec::new();
        while self.eat_keyword(Keyword::Catch) {
            let (var, catch_type) = if self.eat(&TokenKind::LeftParen) {
                let var = self.expect_identifier()?;
                let catch_type = if self.eat(&TokenKind::Colon) {
                    Some(self.expect_identifier()?)
                } else {
                    None
                };
                self.expect(&TokenKind::RightParen)?;
                (Some(var), catch_type)
            } else {
                (None, None)
            };
            let body = self.parse_block()?;
            catches.push(CatchBlock {
                var,
                catch_type,
                body,
            });
        }

        let finally_block = if self.eat_keyword(Keyword::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(StatementKind::TryCatch {
            try_block,
            catches,
            finally_block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    fn program(input: &str) -> Program {
        Parser::new(input).parse_program().unwrap()
    }

    fn first(input: &str) -> StatementKind {
        program(input).declarations.remove(0).kind
    }

    #[test]
    fn test_var_decl_and_assignment() {
        let program = program("let a := 1\na := a + 1");
        assert_eq!(program.declarations.len(), 2);
        assert!(matches!(
            &program.declarations[0].kind,
            StatementKind::VarDecl { name, value: Some(_) } if name == "a"
        ));
        assert!(matches!(
            program.declarations[1].kind,
            StatementKind::Assignment { .. }
        ));
    }

    #[test]
    fn test_if_call_versus_statement() {
        let StatementKind::Expr(expr) = first("if(a, b, c)") else {
            panic!("expected expression statement");
        };
        assert!(matches!(expr.kind, ExprKind::Function(ref call) if call.name == "if"));
        assert!(matches!(
            first("if (a) return 1; else return 2;"),
            StatementKind::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_for_in_with_key() {
        let StatementKind::ForIn { key, value, .. } = first("for (let k, v in items) { print(v) }")
        else {
            panic!("expected for-in");
        };
        assert_eq!(key.as_deref(), Some("k"));
        assert_eq!(value, "v");
    }

    #[test]
    fn test_classic_for() {
        let StatementKind::For {
            init,
            condition,
            increment,
            ..
        } = first("for (let i := 0; i < 10; i := i + 1) { }")
        else {
            panic!("expected for");
        };
        assert!(init.is_some());
        assert!(condition.is_some());
        assert!(matches!(
            increment.map(|s| s.kind),
            Some(StatementKind::Assignment { .. })
        ));
    }

    #[test]
    fn test_try_catch_finally() {
        let StatementKind::TryCatch {
            catches,
            finally_block,
            ..
        } = first("try { throw 1 } catch (e: Error) { } catch { } finally { }")
        else {
            panic!("expected try");
        };
        assert_eq!(catches.len(), 2);
        assert_eq!(catches[0].catch_type.as_deref(), Some("Error"));
        assert!(catches[1].var.is_none());
        assert!(finally_block.is_some());
    }

    #[test]
    fn test_return_without_value() {
        assert!(matches!(first("return;"), StatementKind::Return(None)));
        assert!(matches!(first("return"), StatementKind::Return(None)));
    }

    #[test]
    fn test_unclosed_block_fails() {
        assert!(Parser::new("{ let a := 1").parse_program().is_err());
    }
}
