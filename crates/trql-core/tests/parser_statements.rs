//! Tests for programs in the scripting sublanguage.

mod common;
use common::*;

use trql_core::ast::{ExprKind, LambdaBody, StatementKind};
use trql_core::EntryPoint;

fn kinds(input: &str) -> Vec<StatementKind> {
    program(input)
        .declarations
        .into_iter()
        .map(|stmt| stmt.kind)
        .collect()
}

#[test]
fn empty_program() {
    assert!(program("").declarations.is_empty());
    assert!(program("  -- nothing here\n").declarations.is_empty());
}

#[test]
fn declarations_and_assignments() {
    let kinds = kinds("let a := 1\nlet b\nb := a + 1\nprint(b)");
    assert_eq!(kinds.len(), 4);
    assert!(matches!(&kinds[0], StatementKind::VarDecl { name, value: Some(_) } if name == "a"));
    assert!(matches!(&kinds[1], StatementKind::VarDecl { value: None, .. }));
    assert!(matches!(&kinds[2], StatementKind::Assignment { .. }));
    assert!(matches!(&kinds[3], StatementKind::Expr(_)));
}

#[test]
fn member_assignment() {
    let kinds = kinds("obj.items[0] := 'x';");
    let StatementKind::Assignment { target, .. } = &kinds[0] else {
        panic!("Expected assignment");
    };
    assert!(matches!(target.kind, ExprKind::ArrayAccess { .. }));
}

#[test]
fn program_span_covers_input() {
    let input = "  let a := 1  ";
    assert_eq!(program(input).span.end, input.len());
}

#[test]
fn control_flow() {
    let kinds = kinds(
        "if (a > 1) { return a } else if (a < 0) throw 'neg'; else { return 0 }\n\
         while (i < 10) { i := i + 1 }\n\
         for (let i := 0; i < 3; i := i + 1) { print(i) }\n\
         for (let k, v in pairs) print(k, v)",
    );
    assert!(matches!(
        &kinds[0],
        StatementKind::If {
            else_branch: Some(_),
            ..
        }
    ));
    assert!(matches!(&kinds[1], StatementKind::While { .. }));
    assert!(matches!(
        &kinds[2],
        StatementKind::For {
            init: Some(_),
            condition: Some(_),
            increment: Some(_),
            ..
        }
    ));
    assert!(matches!(
        &kinds[3],
        StatementKind::ForIn { key: Some(k), value, .. } if k == "k" && value == "v"
    ));
}

#[test]
fn if_call_is_an_expression() {
    let kinds = kinds("if(a, 1, 2)");
    assert!(matches!(&kinds[0], StatementKind::Expr(_)));
}

#[test]
fn functions_and_lambdas() {
    let kinds = kinds("fn add(a, b) { return a + b }\nlet twice := x -> { return x * 2 }");
    let StatementKind::Function { name, params, body } = &kinds[0] else {
        panic!("Expected function");
    };
    assert_eq!(name, "add");
    assert_eq!(params.len(), 2);
    assert_eq!(body.declarations.len(), 1);

    let StatementKind::VarDecl {
        value: Some(value), ..
    } = &kinds[1]
    else {
        panic!("Expected declaration");
    };
    assert!(matches!(
        &value.kind,
        ExprKind::Lambda {
            body: LambdaBody::Block(_),
            ..
        }
    ));
}

#[test]
fn try_catch_finally() {
    let kinds = kinds("try { risky() } catch (e: Error) { log(e) } catch { retry() } finally { done() }");
    let StatementKind::TryCatch {
        catches,
        finally_block,
        ..
    } = &kinds[0]
    else {
        panic!("Expected try");
    };
    assert_eq!(catches.len(), 2);
    assert_eq!(catches[0].var.as_deref(), Some("e"));
    assert_eq!(catches[0].catch_type.as_deref(), Some("Error"));
    assert!(catches[1].var.is_none());
    assert!(finally_block.is_some());
}

#[test]
fn empty_statements() {
    let kinds = kinds(";;");
    assert_eq!(kinds, vec![StatementKind::Empty, StatementKind::Empty]);
}

#[test]
fn select_as_statement() {
    let kinds = kinds("let rows := (SELECT 1)");
    assert!(matches!(
        &kinds[0],
        StatementKind::VarDecl { value: Some(v), .. } if matches!(v.kind, ExprKind::Subquery(_))
    ));
}

#[test]
fn unclosed_block() {
    let input = "fn f() { return 1";
    let err = program_err(input);
    assert_located(&err, input);
}

#[test]
fn print_is_a_fixed_point() {
    for input in [
        "let a := 1\nlet b",
        "a.b := [1, 2]",
        "if (x) return 1; else { throw 'no' }",
        "while (true) { break_loop() }",
        "for (let i := 0; i < 10; i := i + 1) { }",
        "for (;;) { }",
        "for (let v in xs) print(v)",
        "fn f(a) { return a ?? 0 }",
        "try { a() } catch (e) { } finally { }",
        "return",
        ";",
    ] {
        round_trip(EntryPoint::Program, input);
    }
}
