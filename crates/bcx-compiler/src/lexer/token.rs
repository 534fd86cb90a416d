//! Token kinds for the B language.
//!
//! Tokens are produced by logos and carry no text; the parser slices the
//! source through the span when it needs a payload. The compound and
//! relational assignment forms (`=+` through `=>=`, `===`, `=!=`) are single
//! tokens; logos maximal munch implements the greedy longest-match rule, so
//! `===` is one relational-assign token while `== =` is equality followed by
//! assignment.

use logos::Logos;
use serde::Serialize;

use crate::span::Span;

/// Binary operators, shared by operator tokens, compound assignment
/// payloads, and the tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinOp {
    /// Whether the operator yields a 0/1 truth value.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }

    /// Spelling of the operator in B source (and in C).
    pub fn sigil(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

/// Zero-copy token: kind + span. Text is sliced from the source on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x0c]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // Keywords
    #[token("auto")]
    KwAuto,
    #[token("extrn")]
    KwExtrn,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("return")]
    KwReturn,
    #[token("goto")]
    KwGoto,
    #[token("switch")]
    KwSwitch,
    #[token("case")]
    KwCase,
    #[token("default")]
    KwDefault,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,

    // Classical B allows `.` inside names (`rd.unit`), but not leading.
    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    // `*` is the escape introducer inside literals; `*'` and `*"` protect
    // the quote, so content is (anything but quote or star | star + any).
    #[regex(r"(?s)'([^'*]|\*.)*'")]
    CharLit,
    #[regex(r#"(?s)"([^"*]|\*.)*""#)]
    StrLit,
    #[regex(r"(?s)'([^'*]|\*.)*")]
    UnterminatedChar,
    #[regex(r#"(?s)"([^"*]|\*.)*"#)]
    UnterminatedStr,

    // Punctuation
    #[token(";")]
    Semi,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,

    // Increment/decrement
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,

    /// Plain `=`.
    #[token("=")]
    Assign,

    /// `=op` compound and relational assignment, carrying the embedded
    /// operation. Longest match makes `=<<` beat `=<` beat `=`.
    #[token("=+", |_| BinOp::Add)]
    #[token("=-", |_| BinOp::Sub)]
    #[token("=*", |_| BinOp::Mul)]
    #[token("=/", |_| BinOp::Div)]
    #[token("=%", |_| BinOp::Rem)]
    #[token("=&", |_| BinOp::And)]
    #[token("=|", |_| BinOp::Or)]
    #[token("=^", |_| BinOp::Xor)]
    #[token("=<<", |_| BinOp::Shl)]
    #[token("=>>", |_| BinOp::Shr)]
    #[token("=<", |_| BinOp::Lt)]
    #[token("=<=", |_| BinOp::Le)]
    #[token("=>", |_| BinOp::Gt)]
    #[token("=>=", |_| BinOp::Ge)]
    #[token("===", |_| BinOp::Eq)]
    #[token("=!=", |_| BinOp::Ne)]
    AssignOp(BinOp),

    /// End of input sentinel, appended by `lex`.
    Eof,
}

impl TokenKind {
    /// Short description for "expected X" diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::KwAuto => "'auto'",
            TokenKind::KwExtrn => "'extrn'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwWhile => "'while'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwGoto => "'goto'",
            TokenKind::KwSwitch => "'switch'",
            TokenKind::KwCase => "'case'",
            TokenKind::KwDefault => "'default'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::CharLit | TokenKind::UnterminatedChar => "character constant",
            TokenKind::StrLit | TokenKind::UnterminatedStr => "string constant",
            TokenKind::Semi => "';'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Question => "'?'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Bang => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::EqEq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Assign => "'='",
            TokenKind::AssignOp(_) => "assignment operator",
            TokenKind::Eof => "end of input",
        }
    }
}
