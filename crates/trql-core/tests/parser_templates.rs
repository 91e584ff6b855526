//! Tests for template strings and tag elements.

mod common;
use common::*;

use trql_core::ast::{
    BinaryOp, ExprKind, TagAttributeValue, TagChild, TemplatePart, TemplateString,
};
use trql_core::{parse_full_template_string, EntryPoint, LexError, ParseErrorKind, Parser};

fn texts(template: &TemplateString) -> Vec<&str> {
    template
        .parts
        .iter()
        .filter_map(|part| match part {
            TemplatePart::Text(text) => Some(text.as_str()),
            TemplatePart::Hole(_) => None,
        })
        .collect()
}

#[test]
fn string_template_with_hole() {
    let template = string_template("'hello {1+1} world'");
    assert_eq!(template.parts.len(), 3);
    assert_eq!(texts(&template), vec!["hello ", " world"]);
    let TemplatePart::Hole(hole) = &template.parts[1] else {
        panic!("Expected hole");
    };
    assert!(matches!(hole.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
    assert_eq!(hole.to_string(), expr("1+1").to_string());
}

#[test]
fn f_prefixed_string_template() {
    let template = string_template("f'{a}{b}'");
    assert_eq!(template.parts.len(), 2);
}

#[test]
fn string_template_escapes() {
    let template = string_template(r"'a \{literal\} {x}'");
    assert_eq!(texts(&template), vec!["a {literal} "]);
}

#[test]
fn plain_string_in_code_is_not_a_template() {
    assert!(matches!(expr("'a {b}'").kind, ExprKind::Literal(_)));
    assert!(matches!(expr("f'a {b}'").kind, ExprKind::Template(_)));
}

#[test]
fn full_template() {
    let template = parse_full_template_string("Dear {name},\nit's {days} days 'til {event}.")
        .expect("full template");
    assert_eq!(texts(&template), vec!["Dear ", ",\nit's ", " days 'til ", "."]);
    assert_eq!(template.parts.len(), 7);
}

#[test]
fn full_template_nested_braces() {
    let template = parse_full_template_string("{ {'a': 1}['a'] }").expect("full template");
    assert!(matches!(
        &template.parts[..],
        [TemplatePart::Hole(expr)] if matches!(expr.kind, ExprKind::ArrayAccess { .. })
    ));
}

#[test]
fn tag_with_attribute_and_hole() {
    let ExprKind::Tag(tag) = expr(r#"<Foo bar="baz">{x}</Foo>"#).kind else {
        panic!("Expected tag");
    };
    assert_eq!(tag.name, "Foo");
    assert_eq!(tag.attributes.len(), 1);
    assert_eq!(tag.attributes[0].name, "bar");
    assert_eq!(
        tag.attributes[0].value,
        TagAttributeValue::String("baz".into())
    );
    assert_eq!(tag.children.len(), 1);
    assert!(matches!(
        &tag.children[0],
        TagChild::Expr(child) if child.as_field() == Some(&["x".to_string()][..])
    ));
}

#[test]
fn nested_tags_keep_text() {
    let ExprKind::Tag(tag) = expr("<p>Hello, <b>{name}</b>!</p>").kind else {
        panic!("Expected tag");
    };
    assert_eq!(tag.children.len(), 3);
    assert_eq!(tag.children[0], TagChild::Text("Hello, ".into()));
    assert!(matches!(&tag.children[1], TagChild::Element(b) if b.name == "b"));
}

#[test]
fn unterminated_template() {
    let input = "'abc {x}";
    let err = Parser::new(input).parse_string_template().unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::Lexical(LexError::UnterminatedTemplate)
    );
    assert_located(&err, input);
}

#[test]
fn unterminated_tag() {
    let input = "<div><span>x</span>";
    let err = expr_err(input);
    assert_eq!(err.kind, ParseErrorKind::Lexical(LexError::UnterminatedTag));
    assert_located(&err, input);
}

#[test]
fn print_is_a_fixed_point() {
    for input in ["'hello {1+1} world'", "f'{a}-{b}'", r"'it\'s {x}'"] {
        round_trip(EntryPoint::StringTemplate, input);
    }
    for input in ["plain text", "a {b} c", "quote ' and {x}", "{a ?? 'b'}"] {
        round_trip(EntryPoint::FullTemplate, input);
    }
    for input in [
        r#"<Foo bar="baz">{x}</Foo>"#,
        "<Table data={rows} striped />",
        "<ul><li>one</li><li>{two}</li></ul>",
    ] {
        round_trip(EntryPoint::Expr, input);
    }
}
