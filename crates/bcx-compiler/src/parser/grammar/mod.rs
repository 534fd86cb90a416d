//! Grammar rules, one `impl Parser` block per area.
//!
//! - this file: translation unit and external definitions
//! - `stmts`: statements and declarations
//! - `exprs`: expressions (precedence climbing)

mod exprs;
mod stmts;

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::parser::ast::{
    ExternalDef, FunctionDef, GlobalDef, Param, Program, VectorSize,
};

impl Parser<'_, '_> {
    /// A translation unit: a sequence of external definitions.
    pub(crate) fn parse_program(&mut self) -> Program {
        let mut defs = Vec::new();
        while !self.at_eof() {
            if let Some(def) = self.parse_external_def() {
                defs.push(def);
            }
        }
        Program { defs }
    }

    /// `name ( params ) body` or `name [size]? ivals ;`.
    fn parse_external_def(&mut self) -> Option<ExternalDef> {
        if !self.at(TokenKind::Ident) {
            self.error(format!(
                "expected definition name, found {}",
                self.current().describe()
            ));
            self.bump();
            return None;
        }

        let name_tok = self.bump();
        let name = self.text_of(name_tok).to_owned();
        let name_span = name_tok.span;

        if self.at(TokenKind::LParen) {
            return Some(self.parse_function_def(name, name_span));
        }
        Some(self.parse_global_def(name, name_span))
    }

    fn parse_function_def(
        &mut self,
        name: String,
        name_span: crate::span::Span,
    ) -> ExternalDef {
        let id = self.fresh_id();
        self.bump(); // (

        let mut params: Vec<Param> = Vec::new();
        while self.at(TokenKind::Ident) {
            let tok = self.bump();
            params.push(Param {
                name: self.text_of(tok).to_owned(),
                span: tok.span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen);

        let body = self.parse_stmt();
        let span = name_span.cover(body.span);
        ExternalDef::Function(FunctionDef {
            id,
            name,
            name_span,
            params,
            body,
            span,
        })
    }

    fn parse_global_def(
        &mut self,
        name: String,
        name_span: crate::span::Span,
    ) -> ExternalDef {
        let id = self.fresh_id();
        let vector = self.parse_vector_suffix();

        let mut inits = Vec::new();
        if !self.at(TokenKind::Semi) && !self.at_eof() {
            loop {
                inits.push(self.parse_expr());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let span = name_span.cover(self.prev_span());
        self.expect_semi();

        ExternalDef::Variable(GlobalDef {
            id,
            name,
            name_span,
            vector,
            inits,
            span,
        })
    }

    /// `[ size? ]` after a name; `None` when absent.
    pub(crate) fn parse_vector_suffix(&mut self) -> Option<VectorSize> {
        if !self.at(TokenKind::LBracket) {
            return None;
        }
        let open = self.bump();
        let size = if self.at(TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(TokenKind::RBracket);
        Some(VectorSize {
            size,
            span: open.span.cover(self.prev_span()),
        })
    }
}
