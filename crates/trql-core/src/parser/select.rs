//! SELECT queries, set operations and the FROM join tree.

use super::error::{ParseError, ParseErrorKind};
use super::parser::{
    is_identifier_kind, Folds, Parser, JOIN_DEPTH_UNITS, QUERY_DEPTH_UNITS,
};
use super::pratt::bp;
use crate::ast::{
    ArrayJoin, ArrayJoinKind, Cte, CteKind, Expr, ExprKind, FrameBound, FrameUnits, GroupBy,
    GroupByModifier, JoinConstraint, JoinExpr, JoinExprKind, JoinKind, JoinOp, JoinStrictness,
    LimitBy, NamedWindow, NullsOrder, OrderDirection, OrderExpr, Query, SampleClause, SampleRatio,
    SelectQuery, SelectSetNode, SelectSetQuery, SetOperation, SetOperator, Setting, TableExpr,
    TableExprKind, Top, WindowExpr, WindowFrame,
};
use crate::lexer::{Keyword, LexMode, Span, TokenKind};

/// The most qualifier words a join operator can carry, as in
/// `ANY LEFT OUTER JOIN` plus one duplicate to report.
const MAX_JOIN_QUALIFIERS: usize = 4;

impl Parser<'_> {
    /// Parses the select entry: a tag element or a select set.
    pub(super) fn parse_select_entry(&mut self) -> Result<Query, ParseError> {
        if self.tag_follows() {
            let tag = self.parse_tag_element(LexMode::Code)?;
            return Ok(Query::Tag(Box::new(tag)));
        }
        self.parse_select_set()
    }

    /// Parses one or more SELECTs joined by set operators.
    pub(super) fn parse_select_set(&mut self) -> Result<Query, ParseError> {
        self.nested_by(QUERY_DEPTH_UNITS, |p| {
            let start = p.current.span;
            let initial = p.parse_select_set_node()?;
            p.parse_select_set_rest(initial, start)
        })
    }

    /// Parses the set operations following an already parsed first operand.
    pub(super) fn parse_select_set_rest(
        &mut self,
        initial: SelectSetNode,
        start: Span,
    ) -> Result<Query, ParseError> {
        let mut subsequent = Vec::new();
        while let Some(operator) = self.parse_set_operator()? {
            let query = self.parse_select_set_node()?;
            subsequent.push(SetOperation { operator, query });
        }

        let initial = match initial {
            SelectSetNode::Select(select) if subsequent.is_empty() => {
                return Ok(Query::Select(select));
            }
            SelectSetNode::Parens(query) if subsequent.is_empty() => return Ok(*query),
            node => node,
        };

        Ok(Query::SelectSet(Box::new(SelectSetQuery {
            initial,
            subsequent,
            span: self.span_from(start),
        })))
    }

    /// Returns true if a set operator starts at the current token.
    pub(super) fn is_set_operator_start(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(Keyword::Union | Keyword::Intersect | Keyword::Except)
        )
    }

    fn parse_set_operator(&mut self) -> Result<Option<SetOperator>, ParseError> {
        let operator = match self.current.as_keyword() {
            Some(Keyword::Union) => {
                self.advance();
                if self.eat_keyword(Keyword::All) {
                    SetOperator::UnionAll
                } else if self.eat_keyword(Keyword::Distinct) {
                    SetOperator::UnionDistinct
                } else {
                    return Err(self.unexpected("ALL or DISTINCT"));
                }
            }
            Some(Keyword::Intersect) => {
                self.advance();
                if self.eat_keyword(Keyword::Distinct) {
                    SetOperator::IntersectDistinct
                } else {
                    SetOperator::Intersect
                }
            }
            Some(Keyword::Except) => {
                self.advance();
                SetOperator::Except
            }
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    fn parse_select_set_node(&mut self) -> Result<SelectSetNode, ParseError> {
        match self.current.kind {
            TokenKind::LeftParen => {
                self.advance();
                let query = self.parse_select_set()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(SelectSetNode::Parens(Box::new(query)))
            }
            TokenKind::LeftBrace => Ok(SelectSetNode::Placeholder(self.parse_placeholder_body()?)),
            TokenKind::Keyword(Keyword::Select | Keyword::With) => {
                Ok(SelectSetNode::Select(Box::new(self.parse_select_query()?)))
            }
            _ => Err(self.no_viable_alternative("select query")),
        }
    }

    /// Parses `{expr}` and returns the inner expression.
    fn parse_placeholder_body(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftBrace)?;
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::RightBrace)?;
        Ok(expr)
    }

    fn parse_select_query(&mut self) -> Result<SelectQuery, ParseError> {
        let start = self.current.span;

        let ctes = if self.eat_keyword(Keyword::With) {
            self.parse_ctes()?
        } else {
            Vec::new()
        };

        self.expect_keyword(Keyword::Select)?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        let top = self.parse_top()?;
        let columns = self.parse_select_columns()?;

        let mut select = SelectQuery::new(columns, start);
        select.ctes = ctes;
        select.distinct = distinct;
        select.top = top;

        if self.eat_keyword(Keyword::From) {
            select.from = Some(self.parse_join_expr()?);
        }
        select.array_join = self.parse_array_join()?;
        if self.eat_keyword(Keyword::Prewhere) {
            select.prewhere = Some(self.parse_expression()?);
        }
        if self.eat_keyword(Keyword::Where) {
            select.where_clause = Some(self.parse_expression()?);
        }
        if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            select.group_by = Some(self.parse_group_by()?);
        }
        if self.check_keyword(Keyword::With) {
            let modifier = match self.peek().and_then(|t| t.as_keyword()) {
                Some(Keyword::Cube) => Some(GroupByModifier::Cube),
                Some(Keyword::Rollup) => Some(GroupByModifier::Rollup),
                _ => None,
            };
            if modifier.is_some() {
                self.advance();
                self.advance();
                select.with_modifier = modifier;
            }
        }
        if self.check_keyword(Keyword::With) && self.peek_is_keyword(Keyword::Totals) {
            self.advance();
            self.advance();
            select.with_totals = true;
        }
        if self.eat_keyword(Keyword::Having) {
            select.having = Some(self.parse_expression()?);
        }
        if self.eat_keyword(Keyword::Window) {
            select.windows = self.parse_named_windows()?;
        }
        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            select.order_by = self.parse_order_list()?;
        }
        self.parse_limit_clauses(&mut select)?;
        if self.eat_keyword(Keyword::Settings) {
            select.settings = self.parse_settings()?;
        }

        select.span = self.span_from(start);
        Ok(select)
    }

    fn parse_ctes(&mut self) -> Result<Vec<Cte>, ParseError> {
        let mut ctes = Vec::new();
        loop {
            let start = self.current.span;
            let kind = if is_identifier_kind(&self.current.kind)
                && self.peek_is_keyword(Keyword::As)
                && self
                    .peek_nth(1)
                    .is_some_and(|t| t.kind == TokenKind::LeftParen)
            {
                let name = self.expect_identifier()?;
                self.expect_keyword(Keyword::As)?;
                self.expect(&TokenKind::LeftParen)?;
                let query = Box::new(self.parse_select_set()?);
                self.expect(&TokenKind::RightParen)?;
                CteKind::Subquery { name, query }
            } else {
                let expr = self.parse_expression_bp(bp::ALIAS + 1)?;
                self.expect_keyword(Keyword::As)?;
                let name = self.expect_identifier()?;
                CteKind::Expr { name, expr }
            };
            ctes.push(Cte {
                kind,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma) || self.check_keyword(Keyword::Select) {
                break;
            }
        }
        Ok(ctes)
    }

    fn parse_top(&mut self) -> Result<Option<Top>, ParseError> {
        if !self.check_keyword(Keyword::Top) || !self.peek_is(&TokenKind::Number(String::new()))
        {
            return Ok(None);
        }
        self.advance(); // TOP
        let TokenKind::Number(text) = &self.current.kind else {
            return Err(self.unexpected("number"));
        };
        let count = text.parse::<u64>().map_err(|_| {
            ParseError::invalid_literal(format!("invalid TOP count {text}"), self.current.span)
        })?;
        self.advance();
        let with_ties = if self.check_keyword(Keyword::With) && self.peek_is_keyword(Keyword::Ties)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        Ok(Some(Top { count, with_ties }))
    }

    /// Parses the column list, where each column may carry an alias written
    /// without `AS`.
    fn parse_select_columns(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut columns = vec![self.parse_select_column()?];
        while self.eat(&TokenKind::Comma) {
            if !self.can_start_expression() {
                break;
            }
            columns.push(self.parse_select_column()?);
        }
        Ok(columns)
    }

    fn parse_select_column(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if matches!(expr.kind, ExprKind::Alias { .. }) {
            return Ok(expr);
        }
        match self.parse_implicit_alias() {
            Some(alias) => {
                let start = expr.span;
                Ok(Expr::new(
                    ExprKind::Alias {
                        expr: Box::new(expr),
                        alias,
                    },
                    self.span_from(start),
                ))
            }
            None => Ok(expr),
        }
    }

    fn parse_array_join(&mut self) -> Result<Option<ArrayJoin>, ParseError> {
        let kind = match self.current.as_keyword() {
            Some(Keyword::Left) if self.peek_is_keyword(Keyword::Array) => {
                Some(ArrayJoinKind::Left)
            }
            Some(Keyword::Inner) if self.peek_is_keyword(Keyword::Array) => {
                Some(ArrayJoinKind::Inner)
            }
            Some(Keyword::Array) if self.peek_is_keyword(Keyword::Join) => None,
            _ => return Ok(None),
        };
        if kind.is_some() {
            self.advance();
        }
        self.expect_keyword(Keyword::Array)?;
        self.expect_keyword(Keyword::Join)?;
        let exprs = self.parse_select_columns()?;
        Ok(Some(ArrayJoin { kind, exprs }))
    }

    fn parse_group_by(&mut self) -> Result<GroupBy, ParseError> {
        let modifier = match self.current.as_keyword() {
            Some(Keyword::Cube) if self.peek_is(&TokenKind::LeftParen) => {
                Some(GroupByModifier::Cube)
            }
            Some(Keyword::Rollup) if self.peek_is(&TokenKind::LeftParen) => {
                Some(GroupByModifier::Rollup)
            }
            _ => None,
        };
        let exprs = if modifier.is_some() {
            self.advance();
            self.expect(&TokenKind::LeftParen)?;
            let exprs = self.parse_expression_list_until(&TokenKind::RightParen)?;
            self.expect(&TokenKind::RightParen)?;
            exprs
        } else {
            self.parse_expression_list()?
        };
        Ok(GroupBy { modifier, exprs })
    }

    fn parse_named_windows(&mut self) -> Result<Vec<NamedWindow>, ParseError> {
        let mut windows = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let window = self.parse_window_expr()?;
            self.expect(&TokenKind::RightParen)?;
            windows.push(NamedWindow { name, window });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(windows)
    }

    /// Parses the limit clauses:
    ///
    /// ```text
    /// [LIMIT n [OFFSET o] BY exprs] [LIMIT n [WITH TIES] [OFFSET o]] [OFFSET o]
    /// ```
    ///
    /// `LIMIT o, n` is accepted wherever `LIMIT n OFFSET o` is.
    fn parse_limit_clauses(&mut self, select: &mut SelectQuery) -> Result<(), ParseError> {
        if self.eat_keyword(Keyword::Limit) {
            let (limit, offset) = self.parse_limit_expr()?;
            if self.eat_keyword(Keyword::By) {
                let by = self.parse_expression_list()?;
                select.limit_by = Some(LimitBy { limit, offset, by });
                if self.eat_keyword(Keyword::Limit) {
                    let (limit, offset) = self.parse_limit_expr()?;
                    self.finish_plain_limit(select, limit, offset)?;
                }
            } else {
                self.finish_plain_limit(select, limit, offset)?;
            }
        }
        if select.offset.is_none() && self.eat_keyword(Keyword::Offset) {
            select.offset = Some(self.parse_expression()?);
        }
        Ok(())
    }

    fn parse_limit_expr(&mut self) -> Result<(Expr, Option<Expr>), ParseError> {
        let first = self.parse_expression()?;
        if self.eat(&TokenKind::Comma) {
            let limit = self.parse_expression()?;
            return Ok((limit, Some(first)));
        }
        if self.eat_keyword(Keyword::Offset) {
            let offset = self.parse_expression()?;
            return Ok((first, Some(offset)));
        }
        Ok((first, None))
    }

    fn finish_plain_limit(
        &mut self,
        select: &mut SelectQuery,
        limit: Expr,
        offset: Option<Expr>,
    ) -> Result<(), ParseError> {
        select.limit = Some(limit);
        if self.check_keyword(Keyword::With) && self.peek_is_keyword(Keyword::Ties) {
            self.advance();
            self.advance();
            select.limit_with_ties = true;
        }
        select.offset = offset;
        if select.offset.is_none() && self.eat_keyword(Keyword::Offset) {
            select.offset = Some(self.parse_expression()?);
        }
        Ok(())
    }

    fn parse_settings(&mut self) -> Result<Vec<Setting>, ParseError> {
        let mut settings = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression_bp(bp::COMPARISON + 1)?;
            settings.push(Setting { name, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(settings)
    }

    // ==================== Windows and ordering ====================

    /// Parses the inside of `OVER (...)` or `WINDOW name AS (...)`.
    pub(super) fn parse_window_expr(&mut self) -> Result<WindowExpr, ParseError> {
        let start = self.current.span;

        let partition_by = if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            Vec::new()
        };

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_list()?
        } else {
            Vec::new()
        };

        let units = match self.current.as_keyword() {
            Some(Keyword::Rows) => Some(FrameUnits::Rows),
            Some(Keyword::Range) => Some(FrameUnits::Range),
            _ => None,
        };
        let frame = match units {
            Some(units) => {
                self.advance();
                Some(if self.eat_keyword(Keyword::Between) {
                    let start = self.parse_frame_bound()?;
                    self.expect_keyword(Keyword::And)?;
                    let end = self.parse_frame_bound()?;
                    WindowFrame {
                        units,
                        start,
                        end: Some(end),
                    }
                } else {
                    WindowFrame {
                        units,
                        start: self.parse_frame_bound()?,
                        end: None,
                    }
                })
            }
            None => None,
        };

        Ok(WindowExpr {
            partition_by,
            order_by,
            frame,
            span: self.span_from(start),
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_keyword(Keyword::Current) {
            self.expect_keyword(Keyword::Row)?;
            return Ok(FrameBound::CurrentRow);
        }
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            if self.eat_keyword(Keyword::Following) {
                return Ok(FrameBound::UnboundedFollowing);
            }
            return Err(self.unexpected("PRECEDING or FOLLOWING"));
        }
        let expr = self.parse_expression_bp(bp::AND + 1)?;
        if self.eat_keyword(Keyword::Preceding) {
            Ok(FrameBound::Preceding(expr))
        } else if self.eat_keyword(Keyword::Following) {
            Ok(FrameBound::Following(expr))
        } else {
            Err(self.unexpected("PRECEDING or FOLLOWING"))
        }
    }

    /// Parses a non-empty list of ORDER BY items.
    pub(super) fn parse_order_list(&mut self) -> Result<Vec<OrderExpr>, ParseError> {
        let mut items = vec![self.parse_order_expr()?];
        while self.eat(&TokenKind::Comma) {
            if !self.can_start_expression() {
                break;
            }
            items.push(self.parse_order_expr()?);
        }
        Ok(items)
    }

    fn parse_order_expr(&mut self) -> Result<OrderExpr, ParseError> {
        let start = self.current.span;
        let expr = self.parse_expression()?;

        let direction = match self.current.as_keyword() {
            Some(Keyword::Asc | Keyword::Ascending) => Some(OrderDirection::Asc),
            Some(Keyword::Desc | Keyword::Descending) => Some(OrderDirection::Desc),
            _ => None,
        };
        if direction.is_some() {
            self.advance();
        }

        let nulls = if self.eat_keyword(Keyword::Nulls) {
            if self.eat_keyword(Keyword::First) {
                Some(NullsOrder::First)
            } else if self.eat_keyword(Keyword::Last) {
                Some(NullsOrder::Last)
            } else {
                return Err(self.unexpected("FIRST or LAST"));
            }
        } else {
            None
        };

        let collate = if self.eat_keyword(Keyword::Collate) {
            let TokenKind::String(name) = &self.current.kind else {
                return Err(self.unexpected("collation string"));
            };
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        };

        Ok(OrderExpr {
            expr,
            direction,
            nulls,
            collate,
            span: self.span_from(start),
        })
    }

    // ==================== Join tree ====================

    /// Parses a FROM join tree. Cross joins, written as `,` or `CROSS JOIN`,
    /// bind looser than qualified joins.
    pub(super) fn parse_join_expr(&mut self) -> Result<JoinExpr, ParseError> {
        self.nested_by(JOIN_DEPTH_UNITS, |p| {
            let mut folds = Folds::default();
            let result = p.parse_cross_joins(&mut folds);
            p.release(folds);
            result
        })
    }

    fn parse_cross_joins(&mut self, folds: &mut Folds) -> Result<JoinExpr, ParseError> {
        let start = self.current.span;
        let mut left = self.parse_join_chain(folds)?;
        loop {
            let comma = if self.eat(&TokenKind::Comma) {
                true
            } else if self.check_keyword(Keyword::Cross) && self.peek_is_keyword(Keyword::Join) {
                self.advance();
                self.advance();
                false
            } else {
                break;
            };
            self.fold(folds)?;
            let right = self.parse_join_chain(folds)?;
            left = JoinExpr {
                kind: JoinExprKind::Cross {
                    left: Box::new(left),
                    right: Box::new(right),
                    comma,
                },
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    /// Parses `primary (op JOIN primary constraint)*`.
    fn parse_join_chain(&mut self, folds: &mut Folds) -> Result<JoinExpr, ParseError> {
        let start = self.current.span;
        let mut left = self.parse_join_primary()?;
        while let Some(op) = self.parse_join_op()? {
            self.fold(folds)?;
            let right = self.parse_join_primary()?;
            let constraint = self.parse_join_constraint()?;
            left = JoinExpr {
                kind: JoinExprKind::Join {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                    constraint,
                },
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    /// Parses a join operator if the qualifiers ahead end in `JOIN`.
    fn parse_join_op(&mut self) -> Result<Option<JoinOp>, ParseError> {
        let mut qualifiers = 0;
        let mut tokens = core::iter::once(self.current.clone()).chain(self.lookahead());
        let found = loop {
            match tokens.next().and_then(|t| t.as_keyword()) {
                Some(Keyword::Join) => break true,
                Some(kw) if is_join_qualifier(kw) && qualifiers < MAX_JOIN_QUALIFIERS => {
                    qualifiers += 1;
                }
                _ => break false,
            }
        };
        if !found {
            return Ok(None);
        }

        let mut kind = None;
        let mut strictness = None;
        let mut outer = false;
        for _ in 0..qualifiers {
            let span = self.current.span;
            let duplicate = match self.current.as_keyword() {
                Some(kw @ (Keyword::Inner | Keyword::Left | Keyword::Right | Keyword::Full)) => {
                    kind.replace(join_kind(kw)).is_some()
                }
                Some(Keyword::Outer) => core::mem::replace(&mut outer, true),
                Some(kw) => strictness.replace(join_strictness(kw)).is_some(),
                None => false,
            };
            if duplicate {
                return Err(ParseError::unexpected(
                    "JOIN",
                    &self.current.kind,
                    span,
                ));
            }
            self.advance();
        }
        let join_span = self.current.span;
        self.expect_keyword(Keyword::Join)?;

        if outer && !matches!(kind, Some(JoinKind::Left | JoinKind::Right | JoinKind::Full)) {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                "OUTER requires LEFT, RIGHT or FULL",
                join_span,
            ));
        }

        Ok(Some(JoinOp {
            kind: kind.unwrap_or(JoinKind::Inner),
            strictness,
            outer,
        }))
    }

    fn parse_join_constraint(&mut self) -> Result<JoinConstraint, ParseError> {
        if self.eat_keyword(Keyword::On) {
            return Ok(JoinConstraint::On(self.parse_expression_list()?));
        }
        if self.eat_keyword(Keyword::Using) {
            if self.eat(&TokenKind::LeftParen) {
                let exprs = self.parse_expression_list_until(&TokenKind::RightParen)?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(JoinConstraint::Using {
                    exprs,
                    parens: true,
                });
            }
            return Ok(JoinConstraint::Using {
                exprs: self.parse_expression_list()?,
                parens: false,
            });
        }
        Err(self.unexpected("ON or USING"))
    }

    /// Parses a parenthesized join tree or a table with its modifiers.
    fn parse_join_primary(&mut self) -> Result<JoinExpr, ParseError> {
        let start = self.current.span;
        let subquery_follows =
            self.peek_is_keyword(Keyword::Select) || self.peek_is_keyword(Keyword::With);
        if !self.check(&TokenKind::LeftParen) || subquery_follows {
            let table = self.parse_table_expr()?;
            return self.finish_join_table(table, start);
        }

        self.advance(); // (
        let inner = self.parse_join_expr()?;

        // `((SELECT 1) UNION ALL (SELECT 2))`: the first operand was read as
        // a table before the set operator showed up.
        let inner = match inner.kind {
            JoinExprKind::Table {
                table:
                    TableExpr {
                        kind: TableExprKind::Subquery(query),
                        span,
                    },
                is_final: false,
                sample: None,
            } if self.is_set_operator_start() => {
                let set = self.parse_select_set_rest(SelectSetNode::Parens(query), span)?;
                self.expect(&TokenKind::RightParen)?;
                let table = TableExpr {
                    kind: TableExprKind::Subquery(Box::new(set)),
                    span: self.span_from(start),
                };
                let table = self.parse_table_alias(table)?;
                return self.finish_join_table(table, start);
            }
            kind => JoinExpr {
                kind,
                span: inner.span,
            },
        };

        self.expect(&TokenKind::RightParen)?;
        Ok(JoinExpr {
            kind: JoinExprKind::Parens(Box::new(inner)),
            span: self.span_from(start),
        })
    }

    fn finish_join_table(&mut self, table: TableExpr, start: Span) -> Result<JoinExpr, ParseError> {
        let is_final = self.eat_keyword(Keyword::Final);
        let sample = if self.eat_keyword(Keyword::Sample) {
            let ratio = self.parse_sample_ratio()?;
            let offset = if self.eat_keyword(Keyword::Offset) {
                Some(self.parse_sample_ratio()?)
            } else {
                None
            };
            Some(SampleClause { ratio, offset })
        } else {
            None
        };
        Ok(JoinExpr {
            kind: JoinExprKind::Table {
                table,
                is_final,
                sample,
            },
            span: self.span_from(start),
        })
    }

    fn parse_sample_ratio(&mut self) -> Result<SampleRatio, ParseError> {
        let numerator = self.parse_sample_value()?;
        let denominator = if self.eat(&TokenKind::Slash) {
            Some(self.parse_sample_value()?)
        } else {
            None
        };
        Ok(SampleRatio {
            numerator,
            denominator,
        })
    }

    fn parse_sample_value(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::LeftBrace) {
            let start = self.current.span;
            let inner = self.parse_placeholder_body()?;
            return Ok(Expr::new(
                ExprKind::Placeholder(Box::new(inner)),
                self.span_from(start),
            ));
        }
        self.parse_number_expr()
    }

    /// Parses a table primary and its alias.
    fn parse_table_expr(&mut self) -> Result<TableExpr, ParseError> {
        let start = self.current.span;
        let kind = match &self.current.kind {
            TokenKind::LeftParen => {
                self.advance();
                let query = self.parse_select_set()?;
                self.expect(&TokenKind::RightParen)?;
                TableExprKind::Subquery(Box::new(query))
            }
            TokenKind::LeftBrace => TableExprKind::Placeholder(self.parse_placeholder_body()?),
            TokenKind::Lt if self.tag_follows() => {
                TableExprKind::Tag(Box::new(self.parse_tag_element(LexMode::Code)?))
            }
            kind if is_identifier_kind(kind) => {
                let name = self.expect_identifier()?;
                if self.eat(&TokenKind::LeftParen) {
                    let args = self.parse_expression_list_until(&TokenKind::RightParen)?;
                    self.expect(&TokenKind::RightParen)?;
                    TableExprKind::Function { name, args }
                } else {
                    let mut chain = vec![name];
                    while self.eat(&TokenKind::Dot) {
                        chain.push(self.expect_member_name()?);
                    }
                    TableExprKind::Identifier(chain)
                }
            }
            _ => return Err(self.no_viable_alternative("table expression")),
        };
        let table = TableExpr {
            kind,
            span: self.span_from(start),
        };
        self.parse_table_alias(table)
    }

    /// Wraps `table` in an alias if `AS name` or an implicit alias follows.
    fn parse_table_alias(&mut self, table: TableExpr) -> Result<TableExpr, ParseError> {
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_alias_name()?)
        } else {
            self.parse_implicit_alias()
        };
        Ok(match alias {
            Some(alias) => {
                let start = table.span;
                TableExpr {
                    kind: TableExprKind::Alias {
                        table: Box::new(table),
                        alias,
                    },
                    span: self.span_from(start),
                }
            }
            None => table,
        })
    }
}

const fn is_join_qualifier(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::All
            | Keyword::Any
            | Keyword::Asof
            | Keyword::Semi
            | Keyword::Anti
            | Keyword::Inner
            | Keyword::Left
            | Keyword::Right
            | Keyword::Full
            | Keyword::Outer
    )
}

const fn join_kind(keyword: Keyword) -> JoinKind {
    match keyword {
        Keyword::Left => JoinKind::Left,
        Keyword::Right => JoinKind::Right,
        Keyword::Full => JoinKind::Full,
        _ => JoinKind::Inner,
    }
}

const fn join_strictness(keyword: Keyword) -> JoinStrictness {
    match keyword {
        Keyword::Any => JoinStrictness::Any,
        Keyword::Asof => JoinStrictness::Asof,
        Keyword::Semi => JoinStrictness::Semi,
        Keyword::Anti => JoinStrictness::Anti,
        _ => JoinStrictness::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    fn select(input: &str) -> SelectQuery {
        match Parser::new(input).parse_select().unwrap() {
            Query::Select(select) => *select,
            other => panic!("expected a single SELECT, got {other:?}"),
        }
    }

    fn from(input: &str) -> JoinExpr {
        select(input).from.unwrap()
    }

    #[test]
    fn test_implicit_column_alias() {
        let query = select("SELECT a b, c AS d, e FROM t");
        assert_eq!(query.columns.len(), 3);
        assert!(matches!(
            &query.columns[0].kind,
            ExprKind::Alias { alias, .. } if alias == "b"
        ));
        assert!(matches!(
            &query.columns[1].kind,
            ExprKind::Alias { alias, .. } if alias == "d"
        ));
        assert!(query.columns[2].as_field().is_some());
    }

    #[test]
    fn test_limit_comma_is_offset_first() {
        let query = select("SELECT a FROM t LIMIT 5, 10");
        assert_eq!(
            query.limit.as_ref().and_then(Expr::as_literal),
            Some(&Literal::Integer(10))
        );
        assert_eq!(
            query.offset.as_ref().and_then(Expr::as_literal),
            Some(&Literal::Integer(5))
        );
    }

    #[test]
    fn test_limit_by_then_limit() {
        let query = select("SELECT a FROM t LIMIT 1 BY a LIMIT 10 WITH TIES OFFSET 3");
        let limit_by = query.limit_by.unwrap();
        assert_eq!(limit_by.by.len(), 1);
        assert!(query.limit.is_some());
        assert!(query.limit_with_ties);
        assert!(query.offset.is_some());
    }

    #[test]
    fn test_join_qualifiers() {
        let JoinExprKind::Join { op, constraint, .. } =
            from("SELECT 1 FROM a ANY LEFT OUTER JOIN b USING (id)").kind
        else {
            panic!("expected join");
        };
        assert_eq!(op.kind, JoinKind::Left);
        assert_eq!(op.strictness, Some(JoinStrictness::Any));
        assert!(op.outer);
        assert!(matches!(constraint, JoinConstraint::Using { parens: true, .. }));
    }

    #[test]
    fn test_plain_join_is_inner() {
        let JoinExprKind::Join { op, .. } = from("SELECT 1 FROM a JOIN b ON a.id = b.id").kind
        else {
            panic!("expected join");
        };
        assert_eq!(op.kind, JoinKind::Inner);
        assert_eq!(op.strictness, None);
    }

    #[test]
    fn test_duplicate_join_kind_is_rejected() {
        let err = Parser::new("SELECT 1 FROM a LEFT RIGHT JOIN b ON x")
            .parse_select()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_join_requires_constraint() {
        let err = Parser::new("SELECT 1 FROM a JOIN b")
            .parse_select()
            .unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("ON or USING"));
    }

    #[test]
    fn test_sample_with_offset() {
        let JoinExprKind::Table {
            is_final, sample, ..
        } = from("SELECT 1 FROM t FINAL SAMPLE 1/10 OFFSET 1/2").kind
        else {
            panic!("expected table");
        };
        assert!(is_final);
        let sample = sample.unwrap();
        assert!(sample.ratio.denominator.is_some());
        assert!(sample.offset.is_some());
    }

    #[test]
    fn test_union_requires_qualifier() {
        let err = Parser::new("SELECT 1 UNION SELECT 2")
            .parse_select()
            .unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("ALL or DISTINCT"));
    }

    #[test]
    fn test_parenthesized_select_unwraps() {
        let query = Parser::new("(SELECT 1)").parse_select().unwrap();
        assert!(matches!(query, Query::Select(_)));
    }

    #[test]
    fn test_cte_forms() {
        let query = select("WITH x AS (SELECT 1), 2 AS y, SELECT x");
        assert_eq!(query.ctes.len(), 2);
        assert!(matches!(query.ctes[0].kind, CteKind::Subquery { .. }));
        assert_eq!(query.ctes[1].name(), "y");
    }

    #[test]
    fn test_top_with_ties() {
        let query = select("SELECT TOP 5 WITH TIES a FROM t");
        assert_eq!(
            query.top,
            Some(Top {
                count: 5,
                with_ties: true
            })
        );
    }
}
