//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from
//! rust-analyzer.
//!
//! ## Why Event-Based Parsing?
//!
//! Grammar functions never touch the tree. They emit a flat list of
//! **events** ([`Event`]) and the [`Sink`](sink::Sink) builds the arena tree
//! from them afterwards. This keeps error recovery simple (nothing has to be
//! unwound) and lets the incremental re-parser replay a statement's events
//! into a copy of an existing tree.
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker
//! **must** be completed with `marker.complete(parser, KIND)`, which turns
//! its placeholder into a `Start` and emits the matching `Finish`.
//!
//! If you drop a marker without completing it, **the program panics**.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::DECLARATION);
//! ```
//!
//! ## Trivia
//!
//! The grammar only sees significant tokens. Whitespace and comments are
//! attached when the parser moves past them: trivia in front of a token goes
//! into the node that consumes the token, trivia in front of a new node goes
//! into its parent. Statements therefore start and end with a significant
//! token.
//!
//! ## Error Recovery
//!
//! Nothing here returns `Err`. A token that does not fit is reported as a
//! [`ParseError`] and wrapped in an `ERROR` node:
//!
//! - junk (`~`, stray parentheses) is skipped one token at a time and the
//!   statement carries on
//! - anything else ends the statement: the rest of the line up to the next
//!   `NEWLINE`, section keyword or end of input goes into one `ERROR` node
//! - a piece missing at the end of a statement is reported with a zero-width
//!   range and nothing is consumed
//!
//! Every recovery consumes at least one token, so parsing is linear in the
//! number of tokens.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events into an arena tree
//! - `source` - Lazy token source with lexer mode hints
//! - `grammar` - Grammar rules (document, statements, expressions)

pub mod event;
pub(crate) mod sink;

mod grammar;
mod source;

use std::sync::Arc;

use text_size::{TextRange, TextSize};

use crate::ParseOptions;
use crate::error::{ParseError, ParseErrorKind, finish_errors};
use crate::grammar::StatementRule;
use crate::lexer::{LexMode, Token, is_terminated_block_comment};
use crate::syntax_kind::SyntaxKind;
use crate::syntax_set::SyntaxSet;
use crate::tree::SyntaxTree;
use event::Event;
use source::TokenSource;

/// The parser state machine.
///
/// Holds the token source, the accumulated events and the errors found so
/// far. Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_statement_end()`
/// - Consume tokens: `bump()`, `bump_as()`
/// - Build structure: `start()` → `Marker` → `complete()`
/// - Report problems: `missing()`, `err_and_bump()`, `recover()`
pub(crate) struct Parser<'a> {
    source: TokenSource<'a>,
    events: Vec<Event>,
    errors: Vec<ParseError>,
    /// Significant tokens consumed so far.
    consumed: usize,
    consumed_end: TextSize,
    last_kind: Option<SyntaxKind>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, offset: TextSize, mode: LexMode) -> Self {
        Self {
            source: TokenSource::at(text, offset, mode),
            events: Vec::new(),
            errors: Vec::new(),
            consumed: 0,
            consumed_end: offset,
            last_kind: None,
        }
    }

    /// Start a new node and return a marker.
    ///
    /// Pending trivia is attached to the enclosing node first, so the new
    /// node begins at a significant token.
    pub(crate) fn start(&mut self) -> Marker {
        if !self.events.is_empty() {
            self.flush_trivia();
        }
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the `n`th significant token ahead.
    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.source.nth(n).kind
    }

    pub(crate) fn nth_text(&mut self, n: usize) -> &'a str {
        self.source.nth(n).text
    }

    pub(crate) fn current_range(&mut self) -> TextRange {
        self.source.nth(0).range
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_set(&mut self, set: SyntaxSet) -> bool {
        set.contains(self.current())
    }

    /// At a `NEWLINE`, section keyword or the end of input.
    pub(crate) fn at_statement_end(&mut self) -> bool {
        self.at_set(crate::grammar::LP.statement_end)
    }

    /// Consume the current token unconditionally. Does nothing at `EOF`.
    pub(crate) fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Consume the current token, recording it as `kind`.
    pub(crate) fn bump_as(&mut self, kind: SyntaxKind) {
        if self.at(SyntaxKind::EOF) {
            return;
        }
        self.flush_trivia();
        let token = self.source.bump();
        self.events.push(Event::token(kind, token.range));
        self.consumed += 1;
        self.consumed_end = token.range.end();
        self.last_kind = Some(token.kind);
    }

    /// Emit the trivia in front of the current token into the open node.
    pub(crate) fn flush_trivia(&mut self) {
        for token in self.source.take_trivia() {
            if token.kind == SyntaxKind::BLOCK_COMMENT && !is_terminated_block_comment(token.text) {
                self.error(
                    ParseErrorKind::LexError,
                    token.range,
                    "block comment is not closed by `*\\`",
                );
            }
            self.events.push(Event::token(token.kind, token.range));
        }
    }

    pub(crate) fn error(
        &mut self,
        kind: ParseErrorKind,
        range: TextRange,
        message: impl Into<String>,
    ) {
        self.errors.push(ParseError::new(kind, range, message));
    }

    /// Report that `expected` is absent, right after the last consumed token.
    pub(crate) fn missing(&mut self, expected: &str) {
        let at = TextRange::empty(self.consumed_end);
        self.error(ParseErrorKind::MissingToken, at, format!("expected {expected}"));
    }

    /// Report the current token as not fitting.
    pub(crate) fn unexpected(&mut self, expected: &str) {
        let token: Token<'a> = self.source.nth(0);
        let found = match token.kind {
            SyntaxKind::NEWLINE => "end of line".to_string(),
            SyntaxKind::EOF => "end of input".to_string(),
            _ => format!("`{}`", token.text),
        };
        self.error(
            ParseErrorKind::UnexpectedToken,
            token.range,
            format!("expected {expected}, found {found}"),
        );
    }

    /// Wrap the current token alone in an `ERROR` node and carry on.
    pub(crate) fn err_and_bump(&mut self, expected: &str) {
        self.unexpected(expected);
        let m = self.start();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Give up on the rest of the statement.
    ///
    /// At a statement end this only reports `expected` as missing. Otherwise
    /// everything up to the statement end goes into one `ERROR` node.
    pub(crate) fn recover(&mut self, expected: &str) {
        if self.at_statement_end() {
            self.missing(expected);
            return;
        }
        self.unexpected(expected);
        log::trace!("resync from {:?}, expected {expected}", self.current_range());
        let m = self.start();
        while !self.at_statement_end() {
            self.bump();
        }
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    fn finish(self) -> (Vec<Event>, Vec<ParseError>) {
        (self.events, self.errors)
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it. The `#[must_use]` attribute and the `Drop`
/// impl together enforce that every marker is completed.
#[must_use = "Markers must be completed, dropping them is a bug"]
pub(crate) struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        debug_assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be completed");
        }
    }
}

/// A marker for a node that has been completed.
///
/// The only thing you can do with a `CompletedMarker` is call `precede()`
/// to wrap the completed node in a new parent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// The result of parsing: a tree, its errors and the options that made it.
///
/// Equality is structural, so a re-parsed result compares equal to parsing
/// the edited text from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub(crate) tree: SyntaxTree,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) options: ParseOptions,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Errors sorted by range, capped at `max_errors`.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn text(&self) -> &str {
        self.tree.text()
    }

    /// Typed view of the root node.
    pub fn document(&self) -> crate::ast::Document<'_> {
        crate::ast::Document::cast_root(&self.tree)
    }
}

/// Parse Lp source into a syntax tree with default options.
///
/// Never fails: problems are reported in [`Parse::errors`] and the tree
/// holds every byte of `text` regardless.
pub fn parse(text: &str) -> Parse {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Parse {
    let mut p = Parser::new(text, TextSize::new(0), LexMode::StatementStart);
    grammar::document(&mut p);
    let (events, mut errors) = p.finish();
    finish_errors(&mut errors, options.max_errors);

    Parse {
        tree: sink::build_tree(Arc::from(text), events),
        errors,
        options: options.clone(),
    }
}

/// Events for a single statement parsed out of a larger text.
#[derive(Debug)]
pub(crate) struct Fragment {
    pub(crate) events: Vec<Event>,
    pub(crate) errors: Vec<ParseError>,
    /// End of the last token consumed.
    pub(crate) end: TextSize,
    /// Lexed kind of the last token consumed.
    pub(crate) last_kind: SyntaxKind,
}

/// Parse one statement of `rule` starting exactly at `offset`.
///
/// `resume_after` is the end of the significant token before `offset`, where
/// errors for a piece missing at the very start are reported. Returns `None`
/// when no statement starts at `offset`.
pub(crate) fn parse_statement_at(
    text: &str,
    offset: TextSize,
    resume_after: TextSize,
    mode: LexMode,
    rule: StatementRule,
) -> Option<Fragment> {
    let mut p = Parser::new(text, offset, mode);
    p.consumed_end = resume_after;
    if p.at_statement_end() || p.current_range().start() != offset {
        return None;
    }
    grammar::statement(&mut p, rule);
    let end = p.consumed_end;
    let last_kind = p.last_kind?;
    let (events, errors) = p.finish();
    Some(Fragment {
        events,
        errors,
        end,
        last_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty_input() {
        let parse = parse("");
        assert_eq!(parse.tree().child_count(parse.tree().root()), 0);
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "Minimize \\ cost\n obj: 2x + 3y\nSubject To\n c1: x + y >= 2\nEnd\n";
        let parse = parse(input);
        assert_eq!(parse.tree().text_of(parse.tree().root()), input);
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let mut parser = Parser::new("x", TextSize::new(0), LexMode::StatementStart);
            let _marker = parser.start();
            // Marker dropped without completion - should panic
        });
        assert!(result.is_err());
    }

    #[test]
    fn trivia_goes_to_the_enclosing_node() {
        let mut p = Parser::new("  x", TextSize::new(0), LexMode::StatementStart);
        let doc = p.start();
        let inner = p.start();
        p.bump();
        inner.complete(&mut p, SyntaxKind::TERM);
        doc.complete(&mut p, SyntaxKind::DOCUMENT);
        let (events, _) = p.finish();
        let tree = sink::build_tree(Arc::from("  x"), events);
        assert_eq!(
            tree.debug_dump(),
            "DOCUMENT@0..3\n  WHITESPACE@0..2 \"  \"\n  TERM@2..3\n    IDENT@2..3 \"x\"\n"
        );
    }

    #[test]
    fn unexpected_names_what_was_found() {
        let mut p = Parser::new("~\n", TextSize::new(0), LexMode::StatementStart);
        let m = p.start();
        p.err_and_bump("a term");
        p.unexpected("a term");
        m.complete(&mut p, SyntaxKind::DOCUMENT);
        let messages: Vec<_> = p.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["expected a term, found `~`", "expected a term, found end of line"]
        );
    }

    #[test]
    fn fragment_requires_a_statement_at_offset() {
        let text = "x + y\n  z\n";
        let at = |offset: u32, mode| {
            let offset = TextSize::new(offset);
            parse_statement_at(text, offset, TextSize::new(6), mode, StatementRule::Implicit)
        };
        assert!(at(5, LexMode::Inline).is_none());
        assert!(at(6, LexMode::StatementStart).is_none());

        let fragment = at(8, LexMode::StatementStart).unwrap();
        assert_eq!(fragment.end, TextSize::new(9));
        assert_eq!(fragment.last_kind, SyntaxKind::IDENT);
        assert!(fragment.errors.is_empty());
    }

    #[test]
    fn fragment_wraps_a_bad_statement_start() {
        let text = "Subject To\n  ) x\n";
        let fragment = parse_statement_at(
            text,
            TextSize::new(13),
            TextSize::new(11),
            LexMode::StatementStart,
            StatementRule::Constraint,
        )
        .unwrap();
        assert_eq!(fragment.end, TextSize::new(16));
        assert_eq!(fragment.errors.len(), 1);
        assert_eq!(fragment.errors[0].message, "expected a constraint, found `)`");
        assert!(matches!(
            fragment.events.first(),
            Some(Event::Start { kind: SyntaxKind::ERROR, .. })
        ));
    }
}
