use bcx_core::WordSize;

use super::consts::{eval_const, is_const_initializer};
use crate::diagnostics::Diagnostics;
use crate::lexer::lex;
use crate::parser::ast::Expr;
use crate::parser::parse;
use crate::source::SourceId;

/// Parse `src` as a lone file-scope initializer and return the expression.
fn expr_of(src: &str) -> Expr {
    let text = format!("x {src};");
    let mut diag = Diagnostics::new();
    let id = SourceId::default();
    let tokens = lex(&text, id, WordSize::Host, &mut diag);
    let (program, _) = parse(&text, id, tokens, 0, &mut diag);
    assert!(!diag.has_errors(), "parse failed for {src:?}");
    match program.defs.into_iter().next().unwrap() {
        crate::parser::ast::ExternalDef::Variable(mut g) => g.inits.remove(0),
        _ => unreachable!(),
    }
}

#[test]
fn literals_evaluate() {
    assert_eq!(eval_const(&expr_of("42"), WordSize::Host), Ok(42));
    assert_eq!(eval_const(&expr_of("017"), WordSize::Host), Ok(15));
    assert_eq!(eval_const(&expr_of("'A'"), WordSize::Host), Ok(65));
}

#[test]
fn negation_evaluates() {
    assert_eq!(eval_const(&expr_of("-5"), WordSize::Host), Ok(-5));
    // `--` would lex as decrement; spaced negations nest.
    assert_eq!(eval_const(&expr_of("- -5"), WordSize::Host), Ok(5));
}

#[test]
fn values_reduce_to_word_width() {
    assert_eq!(eval_const(&expr_of("65535"), WordSize::W16), Ok(-1));
    assert_eq!(eval_const(&expr_of("32768"), WordSize::W16), Ok(-32768));
    assert_eq!(eval_const(&expr_of("65535"), WordSize::W32), Ok(65535));
}

#[test]
fn non_constants_are_rejected() {
    let e = expr_of("1+2");
    assert!(eval_const(&e, WordSize::Host).is_err());

    let e = expr_of("name");
    assert!(eval_const(&e, WordSize::Host).is_err());
}

#[test]
fn initializers_allow_strings() {
    assert!(is_const_initializer(&expr_of("\"hi\""), WordSize::Host));
    assert!(is_const_initializer(&expr_of("-3"), WordSize::Host));
    assert!(!is_const_initializer(&expr_of("f(1)"), WordSize::Host));
}
