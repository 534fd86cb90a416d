//! Minimal constant evaluation.
//!
//! Only what case labels and size/initializer constants need: integer and
//! character literals, optionally negated. General folding is left to the
//! downstream C compiler.

use bcx_core::WordSize;

use crate::parser::ast::{Expr, ExprKind, UnaryOp};
use crate::span::Span;

/// Evaluate a constant expression to a word value at the configured width.
///
/// Returns the span of the offending sub-expression when the expression is
/// not constant.
pub fn eval_const(expr: &Expr, word_size: WordSize) -> Result<i64, Span> {
    match &expr.kind {
        ExprKind::Number { value, .. } => Ok(word_size.wrap(*value)),
        ExprKind::Char { value } => Ok(word_size.wrap(*value)),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            let v = eval_const(operand, word_size)?;
            Ok(word_size.wrap(v.wrapping_neg()))
        }
        _ => Err(expr.span),
    }
}

/// Whether an expression is a valid file-scope initializer: a constant per
/// [`eval_const`] or a string literal.
pub fn is_const_initializer(expr: &Expr, word_size: WordSize) -> bool {
    matches!(expr.kind, ExprKind::Str { .. }) || eval_const(expr, word_size).is_ok()
}
