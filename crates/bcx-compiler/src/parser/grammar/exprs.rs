//! Expression grammar: precedence climbing.
//!
//! Levels, lowest to highest: assignment (right-assoc, all forms at one
//! level), `?:` (right-assoc), `|`, `^`, `&`, equality, relational, shifts,
//! additive, multiplicative, unary prefix, postfix, primary. B has no
//! short-circuit connectives; `&` and `|` are ordinary binary operators.

use bcx_core::pack_chars;

use crate::lexer::{TokenKind, decode_quoted, number_value};
use crate::parser::Parser;
use crate::parser::ast::{BinOp, Expr, ExprKind, UnaryOp};

/// Binding power for a binary operator token.
fn binary_op(kind: TokenKind) -> Option<(BinOp, u8)> {
    let entry = match kind {
        TokenKind::Pipe => (BinOp::Or, 1),
        TokenKind::Caret => (BinOp::Xor, 2),
        TokenKind::Amp => (BinOp::And, 3),
        TokenKind::EqEq => (BinOp::Eq, 4),
        TokenKind::Ne => (BinOp::Ne, 4),
        TokenKind::Lt => (BinOp::Lt, 5),
        TokenKind::Le => (BinOp::Le, 5),
        TokenKind::Gt => (BinOp::Gt, 5),
        TokenKind::Ge => (BinOp::Ge, 5),
        TokenKind::Shl => (BinOp::Shl, 6),
        TokenKind::Shr => (BinOp::Shr, 6),
        TokenKind::Plus => (BinOp::Add, 7),
        TokenKind::Minus => (BinOp::Sub, 7),
        TokenKind::Star => (BinOp::Mul, 8),
        TokenKind::Slash => (BinOp::Div, 8),
        TokenKind::Percent => (BinOp::Rem, 8),
        _ => return None,
    };
    Some(entry)
}

fn prefix_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        TokenKind::Star => Some(UnaryOp::Deref),
        TokenKind::Amp => Some(UnaryOp::AddrOf),
        TokenKind::PlusPlus => Some(UnaryOp::PreInc),
        TokenKind::MinusMinus => Some(UnaryOp::PreDec),
        _ => None,
    }
}

impl Parser<'_, '_> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        if !self.enter_recursion() {
            return self.error_expr();
        }
        let expr = self.parse_assign();
        self.exit_recursion();
        expr
    }

    /// Right-associative; plain, compound, and relational assignment all
    /// live at the same level.
    fn parse_assign(&mut self) -> Expr {
        let lhs = self.parse_cond();

        let op = match self.current() {
            TokenKind::Assign => None,
            TokenKind::AssignOp(op) => Some(op),
            _ => return lhs,
        };
        self.bump();
        let value = self.parse_assign();

        let id = self.fresh_id();
        Expr {
            id,
            span: lhs.span.cover(value.span),
            kind: ExprKind::Assign {
                op,
                target: Box::new(lhs),
                value: Box::new(value),
            },
        }
    }

    fn parse_cond(&mut self) -> Expr {
        let cond = self.parse_binary(1);
        if !self.eat(TokenKind::Question) {
            return cond;
        }

        let then = self.parse_expr();
        self.expect(TokenKind::Colon);
        let otherwise = self.parse_cond();

        let id = self.fresh_id();
        Expr {
            id,
            span: cond.span.cover(otherwise.span),
            kind: ExprKind::Cond {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
        }
    }

    fn parse_binary(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_unary();

        while let Some((op, bp)) = binary_op(self.current()) {
            if bp < min_bp {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(bp + 1);
            let id = self.fresh_id();
            lhs = Expr {
                id,
                span: lhs.span.cover(rhs.span),
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        if !self.enter_recursion() {
            return self.error_expr();
        }
        let expr = match prefix_op(self.current()) {
            Some(op) => {
                let start = self.bump().span;
                let operand = self.parse_unary();
                let id = self.fresh_id();
                Expr {
                    id,
                    span: start.cover(operand.span),
                    kind: ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                }
            }
            None => self.parse_postfix(),
        };
        self.exit_recursion();
        expr
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();

        loop {
            match self.current() {
                TokenKind::PlusPlus => expr = self.postfix_incdec(expr, UnaryOp::PostInc),
                TokenKind::MinusMinus => expr = self.postfix_incdec(expr, UnaryOp::PostDec),
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect(TokenKind::RBracket);
                    let id = self.fresh_id();
                    expr = Expr {
                        id,
                        span: expr.span.cover(self.prev_span()),
                        kind: ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.at(TokenKind::RParen) && !self.at_eof() {
                        loop {
                            args.push(self.parse_expr());
                            if !self.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen);
                    let id = self.fresh_id();
                    expr = Expr {
                        id,
                        span: expr.span.cover(self.prev_span()),
                        kind: ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn postfix_incdec(&mut self, operand: Expr, op: UnaryOp) -> Expr {
        let end = self.bump().span;
        let id = self.fresh_id();
        Expr {
            id,
            span: operand.span.cover(end),
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        }
    }

    fn parse_primary(&mut self) -> Expr {
        match self.current() {
            TokenKind::Number => {
                let tok = self.bump();
                let n = number_value(self.text_of(tok));
                let id = self.fresh_id();
                Expr {
                    id,
                    span: tok.span,
                    kind: ExprKind::Number {
                        value: n.value,
                        octal: n.octal && !n.bad_octal_digit,
                    },
                }
            }
            TokenKind::CharLit | TokenKind::UnterminatedChar => {
                let tok = self.bump();
                let decoded = decode_quoted(self.text_of(tok));
                let id = self.fresh_id();
                Expr {
                    id,
                    span: tok.span,
                    kind: ExprKind::Char {
                        value: pack_chars(&decoded.bytes),
                    },
                }
            }
            TokenKind::StrLit | TokenKind::UnterminatedStr => {
                let tok = self.bump();
                let mut bytes = decode_quoted(self.text_of(tok)).bytes;
                bytes.push(4); // EOT terminator
                let id = self.fresh_id();
                Expr {
                    id,
                    span: tok.span,
                    kind: ExprKind::Str { bytes },
                }
            }
            TokenKind::Ident => {
                let tok = self.bump();
                let id = self.fresh_id();
                Expr {
                    id,
                    span: tok.span,
                    kind: ExprKind::Name {
                        name: self.text_of(tok).to_owned(),
                    },
                }
            }
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expr();
                self.expect(TokenKind::RParen);
                expr
            }
            _ => {
                self.error(format!(
                    "expected expression, found {}",
                    self.current().describe()
                ));
                // Consume the offending token unless it can close or
                // separate an enclosing construct.
                if !matches!(
                    self.current(),
                    TokenKind::Semi
                        | TokenKind::RBrace
                        | TokenKind::RParen
                        | TokenKind::RBracket
                        | TokenKind::Comma
                        | TokenKind::Eof
                ) {
                    self.bump();
                }
                self.error_expr()
            }
        }
    }

    pub(crate) fn error_expr(&mut self) -> Expr {
        Expr {
            id: self.fresh_id(),
            span: self.current_span(),
            kind: ExprKind::Error,
        }
    }
}
