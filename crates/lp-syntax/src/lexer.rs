//! # Lexer - Tokenizing Lp Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens. The context-free core is generated by [Logos]; a thin hand-written
//! driver on top adds what Logos cannot express on its own.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** Comments and
//! whitespace are tokens too, and anything unrecognised is grouped into a
//! single `ERROR_TOKEN` run:
//!
//! ```
//! use lp_syntax::lexer::tokenize;
//!
//! let input = "c1: 2 x1 + 3x2 <= 10 \\ capacity\n";
//! let reconstructed: String = tokenize(input).map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Lexer Modes
//!
//! Section keywords (`Subject To`, `Bounds`, ...) are also perfectly good
//! variable names in the middle of a line. The parser therefore tells the
//! lexer what it expects through a [`LexMode`]: keywords are only recognised
//! in [`LexMode::StatementStart`]. [`tokenize`] derives the mode from the
//! previous significant token, which is exactly what the parser does.
//!
//! ## Numbers and Signs
//!
//! A `+` or `-` immediately followed by a digit (or `.digit`) is folded into
//! the number, and `-inf` / `+infinity` become a single `INFINITY` token.
//! `2x1` is `NUMBER(2) IDENT(x1)` and `2e` is `NUMBER(2) IDENT(e)`: an
//! exponent is only consumed when digits follow it.
//!
//! ## Public API
//!
//! - [`tokenize`] - Lazy token iterator ending with one `EOF` token
//! - [`lex`] - Collect all tokens (EOF excluded)
//! - [`Lexer`] - Resumable lexer, restartable at any token boundary
//! - [`Token`] - A token with its kind, range, position and text

use logos::Logos;
use text_size::{TextRange, TextSize};

use crate::grammar::LP;
use crate::syntax_kind::SyntaxKind;

/// What the parser expects at the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// First token of a statement: section keywords are recognised.
    #[default]
    StatementStart,
    /// Anywhere else: keyword spellings lex as identifiers.
    Inline,
}

impl LexMode {
    /// Mode for the token following a significant token of `kind`.
    pub fn after(kind: SyntaxKind) -> Self {
        if kind == SyntaxKind::NEWLINE || kind.is_section_keyword() {
            LexMode::StatementStart
        } else {
            LexMode::Inline
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numeral {
    Valid,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signed {
    Operator,
    Number(Numeral),
    Infinity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Word {
    Ident,
    Infinity,
}

/// Context-free token core produced by Logos.
///
/// Separate from [`SyntaxKind`] because Logos needs to derive on it and
/// because several variants carry data that decides the final kind.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    /// `\` not followed by `*`, up to the end of the line
    #[regex(r"\\([^*\r\n][^\r\n]*)?")]
    LineComment,

    #[token(r"\*", block_comment)]
    BlockComment,

    #[regex(r"[0-9]|\.[0-9]", number)]
    Number(Numeral),

    #[token("+", signed)]
    Plus(Signed),

    #[token("-", signed)]
    Minus(Signed),

    #[regex(r"[A-Za-z_!#$%&;?@'{}][A-Za-z0-9_!#$%&;?@'{}.]*", word)]
    Word(Word),

    #[token("<=")]
    #[token("=<")]
    LtEq,

    #[token(">=")]
    #[token("=>")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("=")]
    Eq,

    #[token("::")]
    Colon2,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl RawToken {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            RawToken::Whitespace => SyntaxKind::WHITESPACE,
            RawToken::Newline => SyntaxKind::NEWLINE,
            RawToken::LineComment => SyntaxKind::LINE_COMMENT,
            RawToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            RawToken::Number(numeral) => numeral.to_syntax_kind(),
            RawToken::Plus(signed) => signed.to_syntax_kind(SyntaxKind::PLUS),
            RawToken::Minus(signed) => signed.to_syntax_kind(SyntaxKind::MINUS),
            RawToken::Word(Word::Ident) => SyntaxKind::IDENT,
            RawToken::Word(Word::Infinity) => SyntaxKind::INFINITY,
            RawToken::LtEq => SyntaxKind::LT_EQ,
            RawToken::GtEq => SyntaxKind::GT_EQ,
            RawToken::Lt => SyntaxKind::LT,
            RawToken::Gt => SyntaxKind::GT,
            RawToken::Eq => SyntaxKind::EQ,
            RawToken::Colon2 => SyntaxKind::COLON2,
            RawToken::Colon => SyntaxKind::COLON,
            RawToken::LParen => SyntaxKind::L_PAREN,
            RawToken::RParen => SyntaxKind::R_PAREN,
        }
    }
}

impl Numeral {
    fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Numeral::Valid => SyntaxKind::NUMBER,
            Numeral::Malformed => SyntaxKind::INVALID_NUMBER,
        }
    }
}

impl Signed {
    fn to_syntax_kind(self, operator: SyntaxKind) -> SyntaxKind {
        match self {
            Signed::Operator => operator,
            Signed::Number(numeral) => numeral.to_syntax_kind(),
            Signed::Infinity => SyntaxKind::INFINITY,
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) {
    // Unterminated comments run to the end of input.
    let len = match lex.remainder().find("*\\") {
        Some(end) => end + 2,
        None => lex.remainder().len(),
    };
    lex.bump(len);
}

fn number(lex: &mut logos::Lexer<RawToken>) -> Numeral {
    let start = lex.span().start;
    let (len, numeral) = scan_number(&lex.source()[start..]);
    lex.bump(len - lex.slice().len());
    numeral
}

fn signed(lex: &mut logos::Lexer<RawToken>) -> Signed {
    let rest = lex.remainder();
    if starts_number(rest) {
        let (len, numeral) = scan_number(rest);
        lex.bump(len);
        return Signed::Number(numeral);
    }
    let word = ident_len(rest);
    if word > 0 && is_infinity(&rest[..word]) {
        lex.bump(word);
        return Signed::Infinity;
    }
    Signed::Operator
}

fn word(lex: &mut logos::Lexer<RawToken>) -> Word {
    if is_infinity(lex.slice()) {
        Word::Infinity
    } else {
        Word::Ident
    }
}

fn is_infinity(word: &str) -> bool {
    word.eq_ignore_ascii_case("inf") || word.eq_ignore_ascii_case("infinity")
}

fn starts_number(text: &str) -> bool {
    match text.as_bytes() {
        [first, ..] if first.is_ascii_digit() => true,
        [b'.', second, ..] => second.is_ascii_digit(),
        _ => false,
    }
}

/// Length of the numeric literal at the start of `text`, which must begin
/// with a digit or `.digit`.
fn scan_number(text: &str) -> (usize, Numeral) {
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut pos = digits(0);
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        pos += digits(pos);
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(pos + 1), Some(b'+' | b'-')));
        let exponent = digits(pos + 1 + sign);
        if exponent > 0 {
            pos += 1 + sign + exponent;
        }
    }

    // A second decimal point makes the whole run malformed.
    if bytes.get(pos) == Some(&b'.') {
        pos += bytes[pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .count();
        return (pos, Numeral::Malformed);
    }

    (pos, Numeral::Valid)
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || "_!#$%&;?@'{}".contains(c)
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '.'
}

fn ident_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if is_ident_start(c) => chars
            .find(|(_, c)| !is_ident_continue(*c))
            .map_or(text.len(), |(i, _)| i),
        _ => 0,
    }
}

/// Whether some rule can match at the start of `text`.
fn starts_token(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if " \t\x0C\r\n\\+-<>=:()".contains(c) => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit() || is_ident_start(c),
        None => false,
    }
}

/// Length of the maximal unrecognised run at the start of `text`.
fn error_run(text: &str) -> usize {
    text.char_indices()
        .skip(1)
        .find(|(i, _)| starts_token(&text[*i..]))
        .map_or(text.len(), |(i, _)| i)
}

/// Returns true if a `BLOCK_COMMENT` token's text has its closing `*\`.
pub fn is_terminated_block_comment(text: &str) -> bool {
    text.len() >= 4 && text.ends_with("*\\")
}

/// A lexed token.
///
/// `line` and `column` are zero-based; the column counts UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub line: u32,
    pub column: u32,
    pub text: &'a str,
}

/// Resumable lexer over a whole source text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// Start lexing at `offset`, which must be a token boundary.
    pub fn resume(text: &'a str, offset: TextSize) -> Self {
        let offset = usize::from(offset).min(text.len());
        debug_assert!(text.is_char_boundary(offset));
        let mut lexer = Self::new(text);
        lexer.advance(offset);
        lexer
    }

    pub fn offset(&self) -> TextSize {
        to_size(self.offset)
    }

    /// Lex one token. At the end of input this keeps returning `EOF`.
    pub fn next_token(&mut self, mode: LexMode) -> Token<'a> {
        let rest = &self.text[self.offset..];
        let (kind, len) = if rest.is_empty() {
            (SyntaxKind::EOF, 0)
        } else {
            classify(rest, mode)
        };

        let start = self.offset;
        let (line, column) = (self.line, self.column);
        self.advance(len);

        Token {
            kind,
            range: TextRange::new(to_size(start), to_size(start + len)),
            line,
            column,
            text: &self.text[start..start + len],
        }
    }

    fn advance(&mut self, len: usize) {
        let mut after_cr = false;
        for byte in self.text[self.offset..self.offset + len].bytes() {
            match byte {
                b'\n' if after_cr => {}
                b'\n' | b'\r' => {
                    self.line += 1;
                    self.column = 0;
                }
                _ => self.column += 1,
            }
            after_cr = byte == b'\r';
        }
        self.offset += len;
    }
}

fn classify(text: &str, mode: LexMode) -> (SyntaxKind, usize) {
    if mode == LexMode::StatementStart {
        if let Some(keyword) = LP.match_keyword(text) {
            return keyword;
        }
    }

    if !starts_token(text) {
        return (SyntaxKind::ERROR_TOKEN, error_run(text));
    }

    let mut raw = RawToken::lexer(text);
    match raw.next() {
        Some(Ok(token)) => (token.to_syntax_kind(), raw.span().end),
        _ => (SyntaxKind::ERROR_TOKEN, error_run(text)),
    }
}

pub(crate) fn to_size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::new(u32::MAX))
}

/// Lazy token stream, see [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    mode: LexMode,
    done: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let token = self.lexer.next_token(self.mode);
        if !token.kind.is_trivia() {
            self.mode = LexMode::after(token.kind);
        }
        self.done = token.kind == SyntaxKind::EOF;
        Some(token)
    }
}

/// Tokenize `text` lazily, choosing lexer modes the way the parser does.
///
/// The last item is always a single `EOF` token.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        lexer: Lexer::new(text),
        mode: LexMode::StatementStart,
        done: false,
    }
}

/// Collect every token of `text`, without the trailing `EOF`.
pub fn lex(text: &str) -> Vec<Token<'_>> {
    tokenize(text)
        .filter(|token| token.kind != SyntaxKind::EOF)
        .collect()
}
