//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. The parser emits a **flat sequence** of events describing the
//! tree; the [`Sink`](super::sink::Sink) replays them into a
//! [`TreeBuilder`](crate::tree::builder::TreeBuilder).
//!
//! ```text
//! Start(CONSTRAINT)
//!   Start(LABEL)
//!     Token(IDENT)       c1
//!     Token(COLON)       :
//!   Finish
//!   Token(WHITESPACE)
//!   ...
//! Finish
//! ```
//!
//! Token events carry their source range, so the sink needs no access to the
//! token stream and the same events can be replayed into a fresh tree or
//! appended to a copy of an existing one.
//!
//! ## Forward Parent Links
//!
//! A binary expression is only known to be one after its left operand has
//! been parsed. `CompletedMarker::precede` then pushes a new `Start` at the
//! end of the list and points the operand's `Start` at it through
//! `forward_parent`. The Sink follows these links and opens the chain
//! outermost first, so the operand ends up inside the new node.

use text_size::TextRange;

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// If `forward_parent` is set it points to another `Start` event that
    /// becomes this node's parent (see
    /// [`CompletedMarker::precede`](super::CompletedMarker::precede)).
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add a token covering `range` to the current node.
    ///
    /// `kind` may differ from what the lexer produced when the grammar gives
    /// an identifier a contextual meaning (`free`, `S1`).
    Token { kind: SyntaxKind, range: TextRange },

    /// Finish the current node.
    Finish,

    /// Reserved by `Parser::start()` and replaced on completion. The Sink
    /// also leaves one behind for each forward parent it has opened.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    pub fn token(kind: SyntaxKind, range: TextRange) -> Self {
        Event::Token { kind, range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_start_creation() {
        assert_eq!(
            Event::start(SyntaxKind::BOUND),
            Event::Start {
                kind: SyntaxKind::BOUND,
                forward_parent: None
            }
        );
    }

    #[test]
    fn event_token_creation() {
        let range = TextRange::new(2.into(), 4.into());
        assert_eq!(
            Event::token(SyntaxKind::IDENT, range),
            Event::Token {
                kind: SyntaxKind::IDENT,
                range
            }
        );
    }
}
