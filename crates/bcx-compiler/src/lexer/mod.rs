//! Lexer for B source text.
//!
//! Produces span-based tokens without storing text; payloads are sliced from
//! the source when needed. Lexical errors (unterminated literals, bad
//! escapes, oversized character constants, stray bytes) are reported here
//! and the stream continues, so a single pass surfaces every problem.

mod literal;
mod token;


pub use literal::{BadEscape, Decoded, NumberValue, decode_quoted, escape_value, number_value};
pub use token::{BinOp, Token, TokenKind};

use logos::Logos;

use bcx_core::WordSize;

use crate::diagnostics::Diagnostics;
use crate::source::SourceId;
use crate::span::Span;

/// Tokenize one source. The returned vector always ends with an `Eof` token
/// whose span is empty at the end of input.
///
/// Unrecognized byte runs are reported once per run and skipped; they do not
/// appear in the output. Unterminated literals are reported at their opening
/// quote but still produce a literal token so parsing can continue.
pub fn lex(
    source: &str,
    source_id: SourceId,
    word_size: WordSize,
    diag: &mut Diagnostics,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_run: Option<std::ops::Range<usize>> = None;

    loop {
        let next = lexer.next();
        if next.is_some_and(|r| r.is_err()) {
            let span = lexer.span();
            match &mut error_run {
                None => error_run = Some(span),
                Some(run) => run.end = span.end,
            }
            continue;
        }

        if let Some(run) = error_run.take() {
            diag.error(source_id, "unexpected character in input", Span::from(run))
                .emit();
        }

        let Some(Ok(kind)) = next else {
            break;
        };

        let span = Span::from(lexer.span());
        check_token(kind, lexer.slice(), span, source_id, word_size, diag);
        tokens.push(Token::new(kind, span));
    }

    tokens.push(Token::new(
        TokenKind::Eof,
        Span::empty(source.len() as u32),
    ));
    tokens
}

/// Report lexical diagnostics for a single token.
fn check_token(
    kind: TokenKind,
    text: &str,
    span: Span,
    source_id: SourceId,
    word_size: WordSize,
    diag: &mut Diagnostics,
) {
    match kind {
        TokenKind::CharLit | TokenKind::UnterminatedChar => {
            if kind == TokenKind::UnterminatedChar {
                diag.error(
                    source_id,
                    "unterminated character constant",
                    Span::new(span.start, span.start + 1),
                )
                .emit();
            }
            let decoded = decode_quoted(text);
            report_bad_escapes(&decoded, span, source_id, diag);

            let capacity = word_size.char_capacity();
            if decoded.bytes.len() > capacity {
                diag.error(
                    source_id,
                    format!(
                        "character constant does not fit in {} bytes",
                        capacity
                    ),
                    span,
                )
                .emit();
            }
        }
        TokenKind::StrLit | TokenKind::UnterminatedStr => {
            if kind == TokenKind::UnterminatedStr {
                diag.error(
                    source_id,
                    "unterminated string constant",
                    Span::new(span.start, span.start + 1),
                )
                .emit();
            }
            let decoded = decode_quoted(text);
            report_bad_escapes(&decoded, span, source_id, diag);
        }
        TokenKind::Number => {
            if number_value(text).bad_octal_digit {
                diag.error(source_id, "invalid digit in octal constant", span)
                    .emit();
            }
        }
        _ => {}
    }
}

fn report_bad_escapes(
    decoded: &Decoded,
    span: Span,
    source_id: SourceId,
    diag: &mut Diagnostics,
) {
    for bad in &decoded.bad_escapes {
        let at = span.start + bad.offset;
        diag.error(
            source_id,
            format!("unknown escape character '*{}'", bad.ch.escape_default()),
            Span::new(at, at + 1 + bad.ch.len_utf8() as u32),
        )
        .emit();
    }
}

/// Text slice for a token. O(1) into the source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.span.to_range()]
}
