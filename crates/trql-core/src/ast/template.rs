//! Template strings and markup tag elements.

use core::fmt;

use serde::Serialize;

use super::format::{write_string, write_template_text};
use super::Expr;
use crate::lexer::Span;

/// A piece of a template string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TemplatePart {
    /// Literal text with escapes resolved.
    Text(String),
    /// An interpolated `{expr}` hole.
    Hole(Expr),
}

/// An interpolated string: literal text runs alternating with holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateString {
    pub parts: Vec<TemplatePart>,
    /// Source span.
    pub span: Span,
}

impl TemplateString {
    fn write_body(&self, f: &mut fmt::Formatter<'_>, quoted: bool) -> fmt::Result {
        for part in &self.parts {
            match part {
                TemplatePart::Text(text) => write_template_text(f, text, quoted)?,
                TemplatePart::Hole(expr) => write!(f, "{{{expr}}}")?,
            }
        }
        Ok(())
    }

    /// Displays the template as a quoted string literal, `'text {expr}'`.
    #[must_use]
    pub fn as_string_literal(&self) -> impl fmt::Display + '_ {
        TemplateDisplay {
            template: self,
            style: TemplateStyle::Quoted,
        }
    }

    /// Displays the template as a whole document with no surrounding quotes.
    #[must_use]
    pub fn as_full_template(&self) -> impl fmt::Display + '_ {
        TemplateDisplay {
            template: self,
            style: TemplateStyle::Full,
        }
    }
}

/// Prints as an `f'...'` literal, the form templates take inside code.
impl fmt::Display for TemplateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("f'")?;
        self.write_body(f, true)?;
        f.write_str("'")
    }
}

#[derive(Clone, Copy)]
enum TemplateStyle {
    Quoted,
    Full,
}

struct TemplateDisplay<'a> {
    template: &'a TemplateString,
    style: TemplateStyle,
}

impl fmt::Display for TemplateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            TemplateStyle::Quoted => {
                f.write_str("'")?;
                self.template.write_body(f, true)?;
                f.write_str("'")
            }
            TemplateStyle::Full => self.template.write_body(f, false),
        }
    }
}

/// The value of a tag attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TagAttributeValue {
    /// `name="text"`
    String(String),
    /// `name={expr}`
    Expr(Expr),
    /// A bare `name`, boolean style.
    Bare,
}

/// A tag attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAttribute {
    pub name: String,
    pub value: TagAttributeValue,
    /// Source span.
    pub span: Span,
}

impl fmt::Display for TagAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.value {
            TagAttributeValue::String(value) => {
                f.write_str("=")?;
                write_string(f, value, '"')
            }
            TagAttributeValue::Expr(expr) => write!(f, "={{{expr}}}"),
            TagAttributeValue::Bare => Ok(()),
        }
    }
}

/// A child of a paired tag element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TagChild {
    /// A nested element.
    Element(TagElement),
    /// A literal text run, kept verbatim.
    Text(String),
    /// An interpolated `{expr}`.
    Expr(Expr),
}

impl fmt::Display for TagChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => write!(f, "{element}"),
            Self::Text(text) => f.write_str(text),
            Self::Expr(expr) => write!(f, "{{{expr}}}"),
        }
    }
}

/// `<name attr* />` or `<name attr*>child*</closing>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagElement {
    pub name: String,
    pub attributes: Vec<TagAttribute>,
    pub children: Vec<TagChild>,
    /// The name written in the closing tag; `None` for a self-closing tag.
    /// It is not required to match `name`.
    pub closing_name: Option<String>,
    /// Source span.
    pub span: Span,
}

impl TagElement {
    /// Returns true for the `<name />` form.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.closing_name.is_none()
    }
}

impl fmt::Display for TagElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }
        match &self.closing_name {
            None => f.write_str(" />"),
            Some(closing_name) => {
                f.write_str(">")?;
                for child in &self.children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{closing_name}>")
            }
        }
    }
}
