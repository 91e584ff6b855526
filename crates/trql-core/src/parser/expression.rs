//! Expression parsing by precedence climbing.

use super::error::ParseError;
use super::parser::{is_identifier_kind, Folds, Parser};
use super::pratt::{bp, infix_op, InfixOp};
use crate::ast::{
    Expr, ExprKind, FunctionCall, IntervalUnit, LambdaBody, Literal, SelectSetNode, TrimSide, UnaryOp,
    WindowRef,
};
use crate::lexer::{Keyword, LexMode, Span, TokenKind};

impl Parser<'_> {
    /// Parses a full expression.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_expression_bp(0)
    }

    /// Parses an expression whose operators bind at least as tightly as
    /// `min_bp`.
    pub(super) fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| {
            let mut folds = Folds::default();
            let result = p.parse_infix_chain(min_bp, &mut folds);
            p.release(folds);
            result
        })
    }

    fn parse_infix_chain(&mut self, min_bp: u8, folds: &mut Folds) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;
        while let Some(op) = self.peek_infix() {
            let (left_bp, right_bp) = op.binding_power();
            if left_bp < min_bp {
                break;
            }
            self.fold(folds)?;
            left = self.parse_infix(left, op, right_bp)?;
        }
        Ok(left)
    }

    /// Parses a comma-separated list ended by `close`, which is not consumed.
    /// The list may be empty and may end with a comma.
    pub(super) fn parse_expression_list_until(
        &mut self,
        close: &TokenKind,
    ) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    /// Parses a non-empty comma-separated list with no closing token. A
    /// trailing comma ends the list when no expression follows it.
    pub(super) fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_expression()?];
        while self.eat(&TokenKind::Comma) {
            if !self.can_start_expression() {
                break;
            }
            items.push(self.parse_expression()?);
        }
        Ok(items)
    }

    /// Returns true if the current token can begin an expression.
    pub(super) fn can_start_expression(&self) -> bool {
        match &self.current.kind {
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Identifier(_)
            | TokenKind::QuotedIdentifier(_)
            | TokenKind::TemplateOpen
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::Star
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Lt => true,
            TokenKind::Dot => self.fraction_follows(),
            TokenKind::Keyword(kw) => {
                !kw.is_reserved()
                    || matches!(
                        kw,
                        Keyword::True
                            | Keyword::False
                            | Keyword::Null
                            | Keyword::Inf
                            | Keyword::Nan
                            | Keyword::Not
                            | Keyword::Case
                    )
            }
            _ => false,
        }
    }

    fn peek_infix(&self) -> Option<InfixOp> {
        if matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::In | Keyword::Not)
        ) {
            let mut tokens = self.lookahead();
            let next = tokens.next();
            let after_next = tokens.next();
            infix_op(&self.current.kind, next.as_ref(), after_next.as_ref())
        } else {
            infix_op(&self.current.kind, None, None)
        }
    }

    fn parse_infix(&mut self, left: Expr, op: InfixOp, right_bp: u8) -> Result<Expr, ParseError> {
        let start = left.span;
        let left = Box::new(left);
        let kind = match op {
            InfixOp::Binary { op, tokens } => {
                for _ in 0..tokens {
                    self.advance();
                }
                let right = Box::new(self.parse_expression_bp(right_bp)?);
                ExprKind::Binary { op, left, right }
            }
            InfixOp::IsNull => {
                self.advance(); // IS
                let negated = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                ExprKind::IsNull {
                    expr: left,
                    negated,
                }
            }
            InfixOp::Between { negated } => {
                if negated {
                    self.advance(); // NOT
                }
                self.advance(); // BETWEEN
                let low = Box::new(self.parse_expression_bp(bp::AND + 1)?);
                self.expect_keyword(Keyword::And)?;
                let high = Box::new(self.parse_expression_bp(right_bp)?);
                ExprKind::Between {
                    expr: left,
                    low,
                    high,
                    negated,
                }
            }
            InfixOp::Ternary => {
                self.advance(); // ?
                let then_expr = Box::new(self.parse_expression()?);
                self.expect(&TokenKind::Colon)?;
                let else_expr = Box::new(self.parse_expression_bp(right_bp)?);
                ExprKind::Ternary {
                    condition: left,
                    then_expr,
                    else_expr,
                }
            }
            InfixOp::Alias => {
                self.advance(); // AS
                let alias = self.parse_alias_name()?;
                ExprKind::Alias { expr: left, alias }
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses prefix operators, then a primary with its postfix chain.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        match self.current.kind {
            TokenKind::Minus | TokenKind::Plus if self.signed_number_follows() => {
                let negative = self.check(&TokenKind::Minus);
                self.advance();
                let number = self.parse_number(negative, start)?;
                self.parse_postfix(number)
            }
            TokenKind::Minus => {
                self.advance();
                let operand = Box::new(self.parse_expression_bp(bp::NEGATE)?);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        operand,
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance();
                let operand = Box::new(self.parse_expression_bp(bp::NOT)?);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Not,
                        operand,
                    },
                    self.span_from(start),
                ))
            }
            _ => {
                let primary = self.parse_primary()?;
                self.parse_postfix(primary)
            }
        }
    }

    /// Parses calls, subscripts and member accesses after an operand.
    fn parse_postfix(&mut self, expr: Expr) -> Result<Expr, ParseError> {
        let mut folds = Folds::default();
        let result = self.parse_postfix_chain(expr, &mut folds);
        self.release(folds);
        result
    }

    fn parse_postfix_chain(
        &mut self,
        mut expr: Expr,
        folds: &mut Folds,
    ) -> Result<Expr, ParseError> {
        loop {
            let start = expr.span;
            if matches!(
                self.current.kind,
                TokenKind::LeftParen
                    | TokenKind::LeftBracket
                    | TokenKind::Dot
                    | TokenKind::NullProperty
            ) {
                self.fold(folds)?;
            }
            let kind = match self.current.kind {
                TokenKind::LeftParen => self.parse_call(expr)?,
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = Box::new(self.parse_expression()?);
                    self.expect(&TokenKind::RightBracket)?;
                    ExprKind::ArrayAccess {
                        array: Box::new(expr),
                        index,
                        null_safe: false,
                    }
                }
                TokenKind::Dot => {
                    self.advance();
                    self.parse_member(expr, false)?
                }
                TokenKind::NullProperty => {
                    self.advance();
                    if self.eat(&TokenKind::LeftBracket) {
                        let index = Box::new(self.parse_expression()?);
                        self.expect(&TokenKind::RightBracket)?;
                        ExprKind::ArrayAccess {
                            array: Box::new(expr),
                            index,
                            null_safe: true,
                        }
                    } else {
                        self.parse_member(expr, true)?
                    }
                }
                _ => return Ok(expr),
            };
            expr = Expr::new(kind, self.span_from(start));
        }
    }

    /// Parses `(args)` applied to an arbitrary callee.
    fn parse_call(&mut self, callee: Expr) -> Result<ExprKind, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let callee = Box::new(callee);
        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = Box::new(self.parse_select_set()?);
            self.expect(&TokenKind::RightParen)?;
            return Ok(ExprKind::CallSelect { callee, query });
        }
        let args = self.parse_expression_list_until(&TokenKind::RightParen)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(ExprKind::Call { callee, args })
    }

    /// Parses the name or tuple index after `.` or `?.`.
    fn parse_member(&mut self, receiver: Expr, null_safe: bool) -> Result<ExprKind, ParseError> {
        if let TokenKind::Number(text) = &self.current.kind {
            let index = text
                .parse::<i64>()
                .map_err(|_| ParseError::invalid_literal(
                    format!("invalid tuple index {text}"),
                    self.current.span,
                ))?;
            self.advance();
            return Ok(ExprKind::TupleAccess {
                tuple: Box::new(receiver),
                index,
                null_safe,
            });
        }
        let property = self
            .expect_member_name()
            .map_err(|_| self.unexpected("property name or tuple index"))?;
        Ok(ExprKind::PropertyAccess {
            object: Box::new(receiver),
            property,
            null_safe,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        match &self.current.kind {
            TokenKind::Number(_) | TokenKind::Keyword(Keyword::Inf | Keyword::Nan) => {
                self.parse_number(false, start)
            }
            TokenKind::Dot if self.fraction_follows() => self.parse_number(false, start),
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Literal(Literal::String(value)), start))
            }
            TokenKind::Keyword(Keyword::True) => self.parse_keyword_literal(Literal::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => {
                self.parse_keyword_literal(Literal::Boolean(false))
            }
            TokenKind::Keyword(Keyword::Null) => self.parse_keyword_literal(Literal::Null),
            TokenKind::Keyword(Keyword::Date | Keyword::Timestamp)
                if self.peek_is(&TokenKind::String(String::new())) =>
            {
                self.parse_typed_string()
            }
            TokenKind::Keyword(Keyword::Interval) if self.interval_follows() => {
                self.parse_interval()
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) if self.peek_is(&TokenKind::LeftParen) => {
                self.parse_cast_expression()
            }
            TokenKind::Keyword(Keyword::Substring)
                if self.peek_is(&TokenKind::LeftParen)
                    && !self
                        .peek_nth(1)
                        .is_some_and(|t| t.kind == TokenKind::RightParen) =>
            {
                self.parse_substring_expression()
            }
            TokenKind::Keyword(Keyword::Trim) if self.trim_side_follows() => {
                self.parse_trim_expression()
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::new(ExprKind::Asterisk { table: None }, start))
            }
            TokenKind::LeftParen => self.parse_paren_expression(),
            TokenKind::LeftBracket => {
                self.advance();
                let items = self.parse_expression_list_until(&TokenKind::RightBracket)?;
                self.expect(&TokenKind::RightBracket)?;
                Ok(Expr::new(ExprKind::Array(items), self.span_from(start)))
            }
            TokenKind::LeftBrace => self.parse_brace_expression(),
            TokenKind::Lt if self.tag_follows() => {
                let tag = self.parse_tag_element(LexMode::Code)?;
                Ok(Expr::new(ExprKind::Tag(Box::new(tag)), self.span_from(start)))
            }
            TokenKind::TemplateOpen => {
                let template = self.parse_template_string()?;
                Ok(Expr::new(ExprKind::Template(template), self.span_from(start)))
            }
            kind if is_identifier_kind(kind) => self.parse_identifier_expression(),
            _ => Err(self.no_viable_alternative("expression")),
        }
    }

    fn parse_keyword_literal(&mut self, literal: Literal) -> Result<Expr, ParseError> {
        let span = self.current.span;
        self.advance();
        Ok(Expr::new(ExprKind::Literal(literal), span))
    }

    // ==================== Numbers ====================

    /// Returns true if the current `.` starts a fraction such as `.5`.
    fn fraction_follows(&self) -> bool {
        let dot = &self.current;
        self.peek().is_some_and(|next| {
            matches!(&next.kind, TokenKind::Number(text) if is_decimal(text))
                && next.span.start == dot.span.end
        })
    }

    /// Returns true if the current sign is the sign of a number literal.
    fn signed_number_follows(&self) -> bool {
        let mut tokens = self.lookahead();
        let Some(next) = tokens.next() else {
            return false;
        };
        match &next.kind {
            TokenKind::Number(_) | TokenKind::Keyword(Keyword::Inf | Keyword::Nan) => true,
            TokenKind::Dot => tokens.next().is_some_and(|fraction| {
                matches!(&fraction.kind, TokenKind::Number(text) if is_decimal(text))
                    && fraction.span.start == next.span.end
            }),
            _ => false,
        }
    }

    /// Parses an optionally signed number literal.
    pub(super) fn parse_number_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let negative = match self.current.kind {
            TokenKind::Minus => true,
            TokenKind::Plus => false,
            _ => return self.parse_unsigned_number(start),
        };
        self.advance();
        self.parse_number(negative, start)
    }

    fn parse_unsigned_number(&mut self, start: Span) -> Result<Expr, ParseError> {
        let is_number = match self.current.kind {
            TokenKind::Number(_) | TokenKind::Keyword(Keyword::Inf | Keyword::Nan) => true,
            TokenKind::Dot => self.fraction_follows(),
            _ => false,
        };
        if is_number {
            self.parse_number(false, start)
        } else {
            Err(self.unexpected("number"))
        }
    }

    /// Parses a number starting at the current token. The lexer splits
    /// fractions at the dot, so `1.5` is put back together here from
    /// adjacent tokens.
    fn parse_number(&mut self, negative: bool, start: Span) -> Result<Expr, ParseError> {
        let sign = if negative { "-" } else { "" };
        let literal = match &self.current.kind {
            TokenKind::Keyword(Keyword::Inf) => {
                self.advance();
                Literal::Float(if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                })
            }
            TokenKind::Keyword(Keyword::Nan) => {
                self.advance();
                Literal::Float(f64::NAN)
            }
            TokenKind::Dot => {
                self.advance();
                let fraction = self.take_number_text()?;
                parse_float(&format!("{sign}0.{fraction}"), self.span_from(start))?
            }
            TokenKind::Number(text) => {
                let text = text.clone();
                let number_end = self.current.span.end;
                self.advance();
                if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    let value = i64::from_str_radix(hex, 16).map_err(|_| {
                        ParseError::invalid_literal(
                            format!("hexadecimal literal {text} is out of range"),
                            self.span_from(start),
                        )
                    })?;
                    Literal::Integer(if negative { -value } else { value })
                } else if self.check(&TokenKind::Dot)
                    && self.current.span.start == number_end
                    && is_decimal(&text)
                {
                    let dot_end = self.current.span.end;
                    self.advance();
                    let fraction = match &self.current.kind {
                        TokenKind::Number(fraction)
                            if is_decimal(fraction) && self.current.span.start == dot_end =>
                        {
                            self.take_number_text()?
                        }
                        _ => String::from("0"),
                    };
                    parse_float(&format!("{sign}{text}.{fraction}"), self.span_from(start))?
                } else if text.contains(['e', 'E']) {
                    parse_float(&format!("{sign}{text}"), self.span_from(start))?
                } else {
                    let digits = format!("{sign}{text}");
                    match digits.parse::<i64>() {
                        Ok(value) => Literal::Integer(value),
                        // Too large for i64: keep the magnitude as a float.
                        Err(_) => parse_float(&digits, self.span_from(start))?,
                    }
                }
            }
            _ => return Err(self.unexpected("number")),
        };
        Ok(Expr::new(ExprKind::Literal(literal), self.span_from(start)))
    }

    fn take_number_text(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Number(text) => {
                let text = text.clone();
                self.advance();
                Ok(text)
            }
            _ => Err(self.unexpected("number")),
        }
    }

    // ==================== Primaries ====================

    /// `DATE 'x'` or `TIMESTAMP 'x'`
    fn parse_typed_string(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let is_date = self.check_keyword(Keyword::Date);
        self.advance();
        let TokenKind::String(value) = &self.current.kind else {
            return Err(self.unexpected("string"));
        };
        let value = value.clone();
        self.advance();
        let kind = if is_date {
            ExprKind::Date(value)
        } else {
            ExprKind::Timestamp(value)
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Returns true if `INTERVAL` starts an interval rather than naming a
    /// column called `interval`.
    fn interval_follows(&self) -> bool {
        let Some(next) = self.peek() else {
            return false;
        };
        match &next.kind {
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::LeftParen => true,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                self.peek_nth(1).is_some_and(|unit| {
                    unit.as_keyword().is_some_and(Keyword::is_interval_unit)
                })
            }
            TokenKind::Minus | TokenKind::Plus | TokenKind::LeftBrace => true,
            _ => false,
        }
    }

    fn parse_interval(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        self.advance(); // INTERVAL

        if let TokenKind::String(value) = &self.current.kind {
            let unit_follows = self
                .peek()
                .and_then(|t| t.as_keyword())
                .is_some_and(Keyword::is_interval_unit);
            if !unit_follows {
                let value = value.clone();
                self.advance();
                return Ok(Expr::new(
                    ExprKind::IntervalString(value),
                    self.span_from(start),
                ));
            }
        }

        let value = Box::new(self.parse_expression_bp(bp::ALIAS + 1)?);
        let unit = self
            .current
            .as_keyword()
            .and_then(IntervalUnit::from_keyword)
            .ok_or_else(|| self.unexpected("interval unit"))?;
        self.advance();
        Ok(Expr::new(
            ExprKind::Interval { value, unit },
            self.span_from(start),
        ))
    }

    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        self.expect_keyword(Keyword::Case)?;

        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let mut when_clauses = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression()?;
            when_clauses.push((condition, result));
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_clause = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::new(
            ExprKind::Case {
                operand,
                when_clauses,
                else_clause,
            },
            self.span_from(start),
        ))
    }

    /// `CAST(e AS type)`, or an ordinary call such as `cast(e, 'type')`.
    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let name = self.current_text().to_string();
        self.advance(); // CAST
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression_bp(bp::ALIAS + 1)?;
        if self.eat_keyword(Keyword::As) {
            let data_type = self.parse_column_type_expr()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Cast {
                    expr: Box::new(expr),
                    data_type,
                },
                self.span_from(start),
            ));
        }
        self.finish_function_call(name, expr, start)
    }

    /// `SUBSTRING(e FROM start [FOR length])`, or an ordinary call.
    fn parse_substring_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let name = self.current_text().to_string();
        self.advance(); // SUBSTRING
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        if !self.eat_keyword(Keyword::From) {
            return self.finish_function_call(name, expr, start);
        }
        let from = Box::new(self.parse_expression()?);
        let length = if self.eat_keyword(Keyword::For) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Substring {
                expr: Box::new(expr),
                from,
                length,
            },
            self.span_from(start),
        ))
    }

    fn trim_side_follows(&self) -> bool {
        self.peek_is(&TokenKind::LeftParen)
            && self.peek_nth(1).is_some_and(|t| {
                matches!(
                    t.as_keyword(),
                    Some(Keyword::Leading | Keyword::Trailing | Keyword::Both)
                )
            })
    }

    /// `TRIM(LEADING|TRAILING|BOTH chars FROM e)`
    fn parse_trim_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        self.advance(); // TRIM
        self.expect(&TokenKind::LeftParen)?;
        let side = match self.current.as_keyword() {
            Some(Keyword::Leading) => TrimSide::Leading,
            Some(Keyword::Trailing) => TrimSide::Trailing,
            Some(Keyword::Both) => TrimSide::Both,
            _ => return Err(self.unexpected("LEADING, TRAILING or BOTH")),
        };
        self.advance();
        let chars = Box::new(self.parse_expression()?);
        self.expect_keyword(Keyword::From)?;
        let expr = Box::new(self.parse_expression()?);
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Trim { side, chars, expr },
            self.span_from(start),
        ))
    }

    /// Finishes `name(first, ...)` after the first argument was parsed.
    fn finish_function_call(
        &mut self,
        name: String,
        first: Expr,
        start: Span,
    ) -> Result<Expr, ParseError> {
        let mut args = vec![first];
        if self.eat(&TokenKind::Comma) {
            args.extend(self.parse_expression_list_until(&TokenKind::RightParen)?);
        }
        self.expect(&TokenKind::RightParen)?;
        let call = FunctionCall {
            name,
            params: None,
            args,
            distinct: false,
            over: None,
        };
        self.finish_call_suffix(call, start)
    }

    /// An identifier: a lambda parameter, a function name or a field chain.
    fn parse_identifier_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let name = self.expect_identifier()?;

        if self.check(&TokenKind::Arrow) {
            return self.parse_lambda(vec![name], start);
        }
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(name, start);
        }

        let mut chain = vec![name];
        while self.check(&TokenKind::Dot) {
            let Some(next) = self.peek() else { break };
            match next.kind {
                TokenKind::Star => {
                    self.advance(); // .
                    self.advance(); // *
                    return Ok(Expr::new(
                        ExprKind::Asterisk { table: Some(chain) },
                        self.span_from(start),
                    ));
                }
                TokenKind::Identifier(_)
                | TokenKind::QuotedIdentifier(_)
                | TokenKind::Keyword(_) => {
                    self.advance(); // .
                    chain.push(self.expect_member_name()?);
                }
                _ => break,
            }
        }
        Ok(Expr::new(ExprKind::Field { chain }, self.span_from(start)))
    }

    /// Parses `name(args)` with its optional parametric arguments and
    /// `OVER` clause. The current token is `(`.
    fn parse_function_call(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        let callee_span = self.span_from(start);
        self.expect(&TokenKind::LeftParen)?;

        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = Box::new(self.parse_select_set()?);
            self.expect(&TokenKind::RightParen)?;
            let callee = Box::new(Expr::new(ExprKind::Field { chain: vec![name] }, callee_span));
            return Ok(Expr::new(
                ExprKind::CallSelect { callee, query },
                self.span_from(start),
            ));
        }

        let (distinct, args) = self.parse_call_arguments()?;
        let mut call = FunctionCall {
            name,
            params: None,
            args,
            distinct,
            over: None,
        };

        if self.eat(&TokenKind::LeftParen) {
            let (distinct, args) = self.parse_call_arguments()?;
            call.params = Some(core::mem::replace(&mut call.args, args));
            call.distinct |= distinct;
        }

        self.finish_call_suffix(call, start)
    }

    /// Parses `[DISTINCT] args )` after an opening parenthesis.
    fn parse_call_arguments(&mut self) -> Result<(bool, Vec<Expr>), ParseError> {
        let distinct = self.eat_keyword(Keyword::Distinct);
        let args = self.parse_expression_list_until(&TokenKind::RightParen)?;
        self.expect(&TokenKind::RightParen)?;
        Ok((distinct, args))
    }

    fn finish_call_suffix(&mut self, mut call: FunctionCall, start: Span) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Over) {
            call.over = Some(if self.eat(&TokenKind::LeftParen) {
                let window = self.parse_window_expr()?;
                self.expect(&TokenKind::RightParen)?;
                WindowRef::Inline(Box::new(window))
            } else {
                WindowRef::Named(self.expect_identifier()?)
            });
        }
        Ok(Expr::new(ExprKind::Function(call), self.span_from(start)))
    }

    /// Parses what follows `(`: a subquery, a lambda, a tuple or a
    /// parenthesized expression.
    fn parse_paren_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;

        if let Some(params) = self.scan_lambda_params() {
            while !self.check(&TokenKind::Arrow) {
                self.advance();
            }
            return self.parse_lambda(params, start);
        }

        self.expect(&TokenKind::LeftParen)?;

        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = self.parse_select_set()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Subquery(Box::new(query)),
                self.span_from(start),
            ));
        }

        let inner = self.parse_expression()?;

        if self.check(&TokenKind::Comma) {
            let mut items = vec![inner];
            while self.eat(&TokenKind::Comma) {
                if self.check(&TokenKind::RightParen) {
                    break;
                }
                items.push(self.parse_expression()?);
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(ExprKind::Tuple(items), self.span_from(start)));
        }

        // `((SELECT 1) UNION ALL (SELECT 2))`: the first operand was read as
        // a subquery expression before the set operator showed up.
        let inner = match inner.kind {
            ExprKind::Subquery(query) if self.is_set_operator_start() => {
                let set = self.parse_select_set_rest(SelectSetNode::Parens(query), inner.span)?;
                Expr::new(ExprKind::Subquery(Box::new(set)), self.span_from(inner.span))
            }
            kind => Expr::new(kind, inner.span),
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Parens(Box::new(inner)),
            self.span_from(start),
        ))
    }

    /// Detects `(a, b) ->` and `() ->` without consuming anything.
    fn scan_lambda_params(&self) -> Option<Vec<String>> {
        let mut tokens = self.lookahead();
        let mut params = Vec::new();
        let mut token = tokens.next()?;
        if token.kind != TokenKind::RightParen {
            loop {
                match &token.kind {
                    TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                        params.push(name.clone());
                    }
                    TokenKind::Keyword(kw) if !kw.is_reserved() => {
                        params.push(self.token_text(&token).to_string());
                    }
                    _ => return None,
                }
                token = tokens.next()?;
                match token.kind {
                    TokenKind::Comma => {
                        token = tokens.next()?;
                        if token.kind == TokenKind::RightParen {
                            break;
                        }
                    }
                    TokenKind::RightParen => break,
                    _ => return None,
                }
            }
        }
        tokens
            .next()
            .filter(|t| t.kind == TokenKind::Arrow)
            .map(|_| params)
    }

    /// Parses `-> body`; the current token is the arrow.
    fn parse_lambda(&mut self, params: Vec<String>, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Arrow)?;
        let body = if self.check(&TokenKind::LeftBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expression()?))
        };
        Ok(Expr::new(
            ExprKind::Lambda { params, body },
            self.span_from(start),
        ))
    }

    /// `{}` is an empty dict, `{e}` a placeholder and `{k: v, ...}` a dict.
    fn parse_brace_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        self.expect(&TokenKind::LeftBrace)?;

        if self.eat(&TokenKind::RightBrace) {
            return Ok(Expr::new(ExprKind::Dict(Vec::new()), self.span_from(start)));
        }

        let first = self.parse_expression()?;
        if !self.eat(&TokenKind::Colon) {
            self.expect(&TokenKind::RightBrace)?;
            return Ok(Expr::new(
                ExprKind::Placeholder(Box::new(first)),
                self.span_from(start),
            ));
        }

        let mut entries = vec![(first, self.parse_expression()?)];
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::RightBrace) {
                break;
            }
            let key = self.parse_expression()?;
            self.expect(&TokenKind::Colon)?;
            entries.push((key, self.parse_expression()?));
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(Expr::new(ExprKind::Dict(entries), self.span_from(start)))
    }

    /// Returns true if the current `<` opens a tag: a name follows directly.
    pub(super) fn tag_follows(&self) -> bool {
        self.check(&TokenKind::Lt)
            && self
                .source_after_current()
                .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
    }
}

/// Returns true for plain decimal digits with an optional exponent.
fn is_decimal(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit()) && !text.contains(['x', 'X'])
}

fn parse_float(text: &str, span: Span) -> Result<Literal, ParseError> {
    text.parse::<f64>()
        .map(Literal::Float)
        .map_err(|_| ParseError::invalid_literal(format!("invalid number {text}"), span))
}
