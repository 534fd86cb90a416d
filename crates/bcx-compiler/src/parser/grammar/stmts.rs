//! Statement grammar.

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::parser::ast::{AutoDecl, ExprKind, ExtrnName, Stmt, StmtKind};
use crate::span::Span;

impl Parser<'_, '_> {
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        if !self.enter_recursion() {
            let stmt = self.null_stmt(self.current_span());
            self.sync_stmt();
            return stmt;
        }
        let stmt = self.parse_stmt_inner();
        self.exit_recursion();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> Stmt {
        match self.current() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semi => {
                let span = self.bump().span;
                self.null_stmt(span)
            }
            TokenKind::KwAuto => self.parse_auto(),
            TokenKind::KwExtrn => self.parse_extrn(),
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwReturn => self.parse_return(),
            TokenKind::KwGoto => self.parse_goto(),
            TokenKind::KwSwitch => self.parse_switch(),
            TokenKind::KwCase => self.parse_case(),
            TokenKind::KwDefault => self.parse_default(),
            TokenKind::KwBreak => self.parse_jump(StmtKind::Break),
            TokenKind::KwContinue => self.parse_jump(StmtKind::Continue),
            // `name :` introduces a label, `name ...` an expression.
            TokenKind::Ident if self.nth(1) == TokenKind::Colon => self.parse_label(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_block(&mut self) -> Stmt {
        let id = self.fresh_id();
        let open = self.bump();

        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            stmts.push(self.parse_stmt());
        }
        if !self.eat(TokenKind::RBrace) {
            self.error_at(open.span, "unterminated block; expected '}'");
        }

        Stmt {
            id,
            span: open.span.cover(self.prev_span()),
            kind: StmtKind::Block(stmts),
        }
    }

    /// `auto name [k]? init? , ... ;`. B initializers are juxtaposed, with
    /// no `=` (an `=` here would lex as the head of an assignment).
    fn parse_auto(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let mut decls = Vec::new();
        loop {
            if !self.at(TokenKind::Ident) {
                self.error(format!(
                    "expected name in auto declaration, found {}",
                    self.current().describe()
                ));
                break;
            }
            let tok = self.bump();
            let decl_id = self.fresh_id();
            let vector = self.parse_vector_suffix();
            let init = if self.at(TokenKind::Comma) || self.at(TokenKind::Semi) || self.at_eof()
            {
                None
            } else {
                Some(self.parse_expr())
            };
            decls.push(AutoDecl {
                id: decl_id,
                name: self.text_of(tok).to_owned(),
                name_span: tok.span,
                vector,
                init,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let span = start.cover(self.prev_span());
        self.expect_semi();
        Stmt {
            id,
            span,
            kind: StmtKind::Auto(decls),
        }
    }

    fn parse_extrn(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let mut names = Vec::new();
        loop {
            if !self.at(TokenKind::Ident) {
                self.error(format!(
                    "expected name in extrn declaration, found {}",
                    self.current().describe()
                ));
                break;
            }
            let tok = self.bump();
            let name_id = self.fresh_id();
            names.push(ExtrnName {
                id: name_id,
                name: self.text_of(tok).to_owned(),
                span: tok.span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let span = start.cover(self.prev_span());
        self.expect_semi();
        Stmt {
            id,
            span,
            kind: StmtKind::Extrn(names),
        }
    }

    fn parse_if(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        self.expect(TokenKind::LParen);
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen);
        let then = Box::new(self.parse_stmt());

        // else binds to the nearest preceding unmatched if, which recursive
        // descent gives for free.
        let otherwise = if self.eat(TokenKind::KwElse) {
            Some(Box::new(self.parse_stmt()))
        } else {
            None
        };

        let end = otherwise
            .as_deref()
            .map_or_else(|| then.span, |s| s.span);
        Stmt {
            id,
            span: start.cover(end),
            kind: StmtKind::If {
                cond,
                then,
                otherwise,
            },
        }
    }

    fn parse_while(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        self.expect(TokenKind::LParen);
        let cond = self.parse_expr();
        self.expect(TokenKind::RParen);
        let body = Box::new(self.parse_stmt());

        Stmt {
            id,
            span: start.cover(body.span),
            kind: StmtKind::While { cond, body },
        }
    }

    fn parse_return(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let value = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr())
        };
        let span = start.cover(self.prev_span());
        self.expect_semi();

        Stmt {
            id,
            span,
            kind: StmtKind::Return(value),
        }
    }

    /// `goto expr ;`. Classical B allows an expression, but only a label
    /// name has meaning; anything else is diagnosed.
    fn parse_goto(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let target = self.parse_expr();
        let span = start.cover(target.span);
        self.expect_semi();

        match target.kind {
            ExprKind::Name { name } => Stmt {
                id,
                span,
                kind: StmtKind::Goto {
                    label: name,
                    label_span: target.span,
                },
            },
            _ => {
                self.error_at(target.span, "goto target must be a label name");
                self.null_stmt(span)
            }
        }
    }

    /// `switch expr stmt`; parentheses around the scrutinee are permitted
    /// but not required (they parse as part of the expression).
    fn parse_switch(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let scrutinee = self.parse_expr();
        let body = Box::new(self.parse_stmt());

        Stmt {
            id,
            span: start.cover(body.span),
            kind: StmtKind::Switch { scrutinee, body },
        }
    }

    fn parse_case(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        let value = self.parse_expr();
        self.expect(TokenKind::Colon);
        let body = Box::new(self.parse_stmt());

        Stmt {
            id,
            span: start.cover(body.span),
            kind: StmtKind::Case { value, body },
        }
    }

    fn parse_default(&mut self) -> Stmt {
        let id = self.fresh_id();
        let start = self.bump().span;

        self.expect(TokenKind::Colon);
        let body = Box::new(self.parse_stmt());

        Stmt {
            id,
            span: start.cover(body.span),
            kind: StmtKind::Default { body },
        }
    }

    fn parse_jump(&mut self, kind: StmtKind) -> Stmt {
        let id = self.fresh_id();
        let span = self.bump().span;
        self.expect_semi();
        Stmt { id, span, kind }
    }

    fn parse_label(&mut self) -> Stmt {
        let id = self.fresh_id();
        let name_tok = self.bump();
        self.bump(); // :
        let name = self.text_of(name_tok).to_owned();
        let body = Box::new(self.parse_stmt());

        Stmt {
            id,
            span: name_tok.span.cover(body.span),
            kind: StmtKind::Label {
                name,
                name_span: name_tok.span,
                body,
            },
        }
    }

    fn parse_expr_stmt(&mut self) -> Stmt {
        let id = self.fresh_id();
        let expr = self.parse_expr();
        let span = expr.span;
        self.expect_semi();

        Stmt {
            id,
            span,
            kind: StmtKind::Expr(expr),
        }
    }

    fn null_stmt(&mut self, span: Span) -> Stmt {
        Stmt {
            id: self.fresh_id(),
            span,
            kind: StmtKind::Null,
        }
    }
}
