//! Template strings and markup tag elements.
//!
//! Both switch the lexer out of code mode: template bodies are read in
//! [`LexMode::Template`] or [`LexMode::FullTemplate`], tag openings in
//! [`LexMode::TagAttribute`] and tag contents in [`LexMode::TagText`]. Every
//! `{expr}` hole switches back to code until its closing brace.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    TagAttribute, TagAttributeValue, TagChild, TagElement, TemplatePart, TemplateString,
};
use crate::lexer::{LexError, LexMode, Span, TokenKind};

impl Parser<'_> {
    /// Parses `f'...'`. The current token must be the opening quote.
    pub(super) fn parse_template_string(&mut self) -> Result<TemplateString, ParseError> {
        let start = self.current.span;
        if !self.check(&TokenKind::TemplateOpen) {
            return Err(self.unexpected("template string"));
        }
        self.advance_in(LexMode::Template);

        let mut parts = Vec::new();
        while !self.check(&TokenKind::TemplateClose) {
            parts.push(self.parse_template_part(LexMode::Template, start)?);
        }
        self.advance();

        Ok(TemplateString {
            parts,
            span: self.span_from(start),
        })
    }

    /// Parses the whole input as template text. The first token has already
    /// been lexed in full-template mode.
    pub(super) fn parse_full_template_body(&mut self) -> Result<TemplateString, ParseError> {
        let start = self.current.span;
        let mut parts = Vec::new();
        while !self.current.is_eof() {
            parts.push(self.parse_template_part(LexMode::FullTemplate, start)?);
        }
        Ok(TemplateString {
            parts,
            span: self.input_span(),
        })
    }

    fn parse_template_part(
        &mut self,
        mode: LexMode,
        start: Span,
    ) -> Result<TemplatePart, ParseError> {
        match &self.current.kind {
            TokenKind::TemplateText(text) => {
                let text = text.clone();
                self.advance_in(mode);
                Ok(TemplatePart::Text(text))
            }
            TokenKind::LeftBrace => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_in(&TokenKind::RightBrace, mode)?;
                Ok(TemplatePart::Hole(expr))
            }
            TokenKind::Error(LexError::UnterminatedTemplate) => Err(ParseError::lexical(
                LexError::UnterminatedTemplate,
                start,
            )),
            _ => Err(self.unexpected("template text")),
        }
    }

    /// Parses `<name attr* />` or `<name attr*>child*</name>`. The current
    /// token must be the `<`; the token after the element is lexed in
    /// `after`.
    pub(super) fn parse_tag_element(&mut self, after: LexMode) -> Result<TagElement, ParseError> {
        self.nested(|p| {
            let start = p.current.span;
            if !p.check(&TokenKind::Lt) {
                return Err(p.unexpected("tag"));
            }
            p.advance_in(LexMode::TagAttribute);
            let name = p.expect_tag_name(start)?;

            let mut attributes = Vec::new();
            loop {
                match p.current.kind {
                    TokenKind::SlashGt => {
                        p.advance_in(after);
                        return Ok(TagElement {
                            name,
                            attributes,
                            children: Vec::new(),
                            closing_name: None,
                            span: p.span_from(start),
                        });
                    }
                    TokenKind::Gt => {
                        p.advance_in(LexMode::TagText);
                        break;
                    }
                    TokenKind::Identifier(_) => attributes.push(p.parse_tag_attribute()?),
                    _ => return Err(p.tag_error("tag attribute", start)),
                }
            }

            let mut children = Vec::new();
            let closing_name = loop {
                match &p.current.kind {
                    TokenKind::TagText(text) => {
                        if !text.trim().is_empty() {
                            children.push(TagChild::Text(text.clone()));
                        }
                        p.advance_in(LexMode::TagText);
                    }
                    TokenKind::LeftBrace => {
                        p.advance();
                        let expr = p.parse_expression()?;
                        p.expect_in(&TokenKind::RightBrace, LexMode::TagText)?;
                        children.push(TagChild::Expr(expr));
                    }
                    TokenKind::Lt => {
                        let child = p.parse_tag_element(LexMode::TagText)?;
                        children.push(TagChild::Element(child));
                    }
                    TokenKind::TagCloseOpen => {
                        p.advance_in(LexMode::TagAttribute);
                        let closing_name = p.expect_tag_name(start)?;
                        if !p.check(&TokenKind::Gt) {
                            return Err(p.tag_error("'>'", start));
                        }
                        p.advance_in(after);
                        break closing_name;
                    }
                    _ => return Err(p.tag_error("tag content", start)),
                }
            };

            Ok(TagElement {
                name,
                attributes,
                children,
                closing_name: Some(closing_name),
                span: p.span_from(start),
            })
        })
    }

    /// `name`, `name="text"` or `name={expr}`
    fn parse_tag_attribute(&mut self) -> Result<TagAttribute, ParseError> {
        let start = self.current.span;
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.unexpected("attribute name"));
        };
        let name = name.clone();
        self.advance_in(LexMode::TagAttribute);

        let value = if self.check(&TokenKind::Eq) {
            self.advance_in(LexMode::TagAttribute);
            match &self.current.kind {
                TokenKind::String(value) => {
                    let value = value.clone();
                    self.advance_in(LexMode::TagAttribute);
                    TagAttributeValue::String(value)
                }
                TokenKind::LeftBrace => {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.expect_in(&TokenKind::RightBrace, LexMode::TagAttribute)?;
                    TagAttributeValue::Expr(expr)
                }
                _ => return Err(self.unexpected("attribute value")),
            }
        } else {
            TagAttributeValue::Bare
        };

        Ok(TagAttribute {
            name,
            value,
            span: self.span_from(start),
        })
    }

    fn expect_tag_name(&mut self, start: Span) -> Result<String, ParseError> {
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.tag_error("tag name", start));
        };
        let name = name.clone();
        self.advance_in(LexMode::TagAttribute);
        Ok(name)
    }

    /// Reports running out of input as an unterminated tag at the tag start.
    fn tag_error(&self, expected: &str, start: Span) -> ParseError {
        match self.current.kind {
            TokenKind::Eof | TokenKind::Error(LexError::UnterminatedTag) => {
                ParseError::lexical(LexError::UnterminatedTag, start)
            }
            _ => self.unexpected(expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::parser::ParseErrorKind;

    fn tag(input: &str) -> TagElement {
        match Parser::new(input).parse_expr().unwrap().kind {
            ExprKind::Tag(tag) => *tag,
            other => panic!("expected tag, got {other:?}"),
        }
    }

    #[test]
    fn test_template_literal_in_code() {
        let expr = Parser::new("f'hi {name}!'").parse_expr().unwrap();
        let ExprKind::Template(template) = expr.kind else {
            panic!("expected template");
        };
        assert_eq!(template.parts.len(), 3);
        assert_eq!(template.parts[0], TemplatePart::Text("hi ".into()));
        assert!(matches!(
            &template.parts[1],
            TemplatePart::Hole(expr) if expr.as_field() == Some(&["name".to_string()][..])
        ));
        assert_eq!(template.parts[2], TemplatePart::Text("!".into()));
    }

    #[test]
    fn test_unterminated_template_points_at_start() {
        let err = Parser::new("x + f'abc {1}").parse_expr().unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Lexical(LexError::UnterminatedTemplate)
        );
        assert_eq!(err.span.start, 4);
    }

    #[test]
    fn test_self_closing_tag() {
        let element = tag("<br />");
        assert!(element.is_self_closing());
        assert_eq!(element.name, "br");
    }

    #[test]
    fn test_attributes() {
        let element = tag(r#"<a href="x" onClick={go(1)} disabled />"#);
        assert_eq!(element.attributes.len(), 3);
        assert!(matches!(
            element.attributes[0].value,
            TagAttributeValue::String(ref s) if s == "x"
        ));
        assert!(matches!(
            element.attributes[1].value,
            TagAttributeValue::Expr(_)
        ));
        assert_eq!(element.attributes[2].value, TagAttributeValue::Bare);
    }

    #[test]
    fn test_children_drop_blank_text() {
        let element = tag("<ul>\n  <li>one</li>\n  <li>{two}</li>\n</ul>");
        assert_eq!(element.children.len(), 2);
        let TagChild::Element(first) = &element.children[0] else {
            panic!("expected element");
        };
        assert_eq!(first.children, vec![TagChild::Text("one".into())]);
    }

    #[test]
    fn test_closing_name_is_not_checked() {
        let element = tag("<a>x</b>");
        assert_eq!(element.closing_name.as_deref(), Some("b"));
    }

    #[test]
    fn test_unterminated_tag() {
        let err = Parser::new("<div>text").parse_expr().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Lexical(LexError::UnterminatedTag));
        assert_eq!(err.span.start, 0);
    }

    #[test]
    fn test_tag_followed_by_operator() {
        let expr = Parser::new("<a /> ?? 1").parse_expr().unwrap();
        assert!(matches!(expr.kind, ExprKind::Binary { .. }));
    }
}
