//! Lazy token source with lexer hinting.
//!
//! The parser only ever looks at significant tokens. Trivia lexed in front
//! of a significant token is kept alongside it until the parser decides
//! where in the tree it goes. The lexer mode for each token is derived from
//! the significant token before it, so keyword recognition follows the
//! statement structure without the lexer knowing about it.

use std::collections::VecDeque;

use text_size::TextSize;

use crate::lexer::{LexMode, Lexer, Token};
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
struct Lookahead<'a> {
    trivia: Vec<Token<'a>>,
    token: Token<'a>,
}

#[derive(Debug)]
pub(crate) struct TokenSource<'a> {
    lexer: Lexer<'a>,
    mode: LexMode,
    buffer: VecDeque<Lookahead<'a>>,
}

impl<'a> TokenSource<'a> {
    /// Start at `offset`, lexing the first token in `mode`.
    pub(crate) fn at(text: &'a str, offset: TextSize, mode: LexMode) -> Self {
        Self {
            lexer: Lexer::resume(text, offset),
            mode,
            buffer: VecDeque::with_capacity(4),
        }
    }

    /// Make sure `buffer[n]` exists, or that the buffer ends with `EOF`.
    fn fill(&mut self, n: usize) {
        while self.buffer.len() <= n {
            if self
                .buffer
                .back()
                .is_some_and(|ahead| ahead.token.kind == SyntaxKind::EOF)
            {
                return;
            }
            let mut trivia = Vec::new();
            let token = loop {
                let token = self.lexer.next_token(self.mode);
                if !token.kind.is_trivia() {
                    break token;
                }
                trivia.push(token);
            };
            self.mode = LexMode::after(token.kind);
            self.buffer.push_back(Lookahead { trivia, token });
        }
    }

    /// The `n`th significant token ahead. Past the end this is `EOF`.
    pub(crate) fn nth(&mut self, n: usize) -> Token<'a> {
        self.fill(n);
        let index = n.min(self.buffer.len() - 1);
        self.buffer[index].token
    }

    /// Trivia in front of the current token, handed out once.
    pub(crate) fn take_trivia(&mut self) -> Vec<Token<'a>> {
        self.fill(0);
        std::mem::take(&mut self.buffer[0].trivia)
    }

    /// Move past the current token. `EOF` is never consumed.
    pub(crate) fn bump(&mut self) -> Token<'a> {
        self.fill(0);
        let token = self.buffer[0].token;
        if token.kind != SyntaxKind::EOF {
            self.buffer.pop_front();
        }
        token
    }
}
