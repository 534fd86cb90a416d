//! Recursive-descent parser for B.
//!
//! The token stream is processed left-to-right with single-token lookahead
//! (two tokens for the label / expression-statement split). Errors are
//! recorded in the shared sink; recovery skips to the next `;` or the
//! matching close brace and parsing continues, so one pass reports as much
//! as possible. The parser never fails: malformed regions become
//! `ExprKind::Error` / `StmtKind::Null` nodes.

pub mod ast;
mod grammar;

#[cfg(test)]
mod parser_tests;

use crate::diagnostics::Diagnostics;
use crate::lexer::{Token, TokenKind, token_text};
use crate::source::SourceId;
use crate::span::Span;

use ast::{NodeId, Program};

/// Recursion limit for nested statements and expressions.
const MAX_DEPTH: u32 = 1024;

#[cfg(debug_assertions)]
const DEFAULT_FUEL: u32 = 256;

/// Parse one source's tokens into a [`Program`].
///
/// `first_node` seeds the node id counter so ids stay unique across all
/// sources of a translation unit; the next free id is returned.
pub fn parse(
    source: &str,
    source_id: SourceId,
    tokens: Vec<Token>,
    first_node: u32,
    diag: &mut Diagnostics,
) -> (Program, u32) {
    let mut parser = Parser {
        source,
        source_id,
        tokens,
        pos: 0,
        diag,
        depth: 0,
        last_error_pos: None,
        next_node: first_node,
        #[cfg(debug_assertions)]
        fuel: std::cell::Cell::new(DEFAULT_FUEL),
    };
    let program = parser.parse_program();
    (program, parser.next_node)
}

/// Parser state machine.
pub(crate) struct Parser<'src, 'd> {
    source: &'src str,
    source_id: SourceId,
    tokens: Vec<Token>,
    /// Current position in `tokens`. Monotonically increases.
    pos: usize,
    diag: &'d mut Diagnostics,
    depth: u32,
    /// Last error position, used to suppress cascading errors at one spot.
    last_error_pos: Option<u32>,
    next_node: u32,
    #[cfg(debug_assertions)]
    fuel: std::cell::Cell<u32>,
}

impl Parser<'_, '_> {
    pub(crate) fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Current token kind. `Eof` acts as the sentinel past the end.
    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Lookahead by `n` tokens (0 = current). Consumes fuel in debug mode.
    pub(crate) fn nth(&self, lookahead: usize) -> TokenKind {
        #[cfg(debug_assertions)]
        {
            if self.fuel.get() == 0 {
                panic!(
                    "parser is stuck: no progress made in {} iterations",
                    DEFAULT_FUEL
                );
            }
            self.fuel.set(self.fuel.get() - 1);
        }
        self.tokens
            .get(self.pos + lookahead)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or_else(|| Span::empty(self.source.len() as u32), |t| t.span)
    }

    pub(crate) fn prev_span(&self) -> Span {
        if self.pos == 0 {
            Span::empty(0)
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Consume the current token. Resets fuel. The `Eof` sentinel is never
    /// consumed.
    pub(crate) fn bump(&mut self) -> Token {
        #[cfg(debug_assertions)]
        self.fuel.set(DEFAULT_FUEL);
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)];
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Expect a token. On mismatch, report and leave it unconsumed so the
    /// caller can recover.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!(
            "expected {}, found {}",
            kind.describe(),
            self.current().describe()
        ));
        false
    }

    /// Expect `;`; on a miss, resynchronize to the next `;` or the matching
    /// close brace.
    pub(crate) fn expect_semi(&mut self) {
        if self.eat(TokenKind::Semi) {
            return;
        }
        self.error(format!(
            "expected ';', found {}",
            self.current().describe()
        ));
        self.sync_stmt();
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(span, message);
    }

    pub(crate) fn error_at(&mut self, span: Span, message: impl Into<String>) {
        if self.last_error_pos == Some(span.start) {
            return;
        }
        self.last_error_pos = Some(span.start);
        self.diag.error(self.source_id, message, span).emit();
    }

    /// Skip tokens until just past a `;` (at this brace depth) or to an
    /// unmatched `}` which the enclosing block will consume.
    pub(crate) fn sync_stmt(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.current() {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.error("nesting too deep");
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn text_of(&self, token: Token) -> &str {
        token_text(self.source, &token)
    }
}
