//! # Grammar Rules
//!
//! The grammar functions that drive parsing. The document and section level
//! is a small state machine over an explicit stack of open productions
//! ([`Frame`]); statements and expressions below it are recursive-descent
//! functions that read the [`LP`] rules table.
//!
//! ## Module Structure
//!
//! - `statement` - One function per statement rule of the table
//! - `expression` - Linear expressions, terms, constants and labels
//!
//! ## Writing Grammar Rules
//!
//! A typical grammar function looks like:
//!
//! ```ignore
//! fn declaration(p: &mut Parser<'_>) {
//!     let m = p.start();               // 1. Start a node
//!     while p.at_set(VARIABLE) {       // 2. Consume tokens
//!         variable(p);
//!     }
//!     end_of_statement(p);             // 3. Recover from leftovers
//!     m.complete(p, SyntaxKind::DECLARATION); // 4. Complete the node
//! }
//! ```
//!
//! Grammar functions stop at a statement end and never consume it: the
//! `NEWLINE` between statements belongs to the enclosing section.

mod expression;
mod statement;

use text_size::TextRange;

use crate::ParseErrorKind;
use crate::grammar::{LP, StatementRule};
use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

/// An open production on the document stack.
enum Frame {
    Document(Marker),
    Section {
        marker: Marker,
        rule: StatementRule,
        name: &'static str,
        keyword: TextRange,
    },
}

/// Parse the whole document.
///
/// The stack starts with the single open `DOCUMENT`. A section keyword
/// closes the open section, if any, and opens a new one. `End` closes the
/// open section and everything after it is reported.
pub(crate) fn document(p: &mut Parser<'_>) {
    let mut stack = vec![Frame::Document(p.start())];

    loop {
        match p.current() {
            SyntaxKind::EOF => break,
            SyntaxKind::NEWLINE => p.bump(),
            SyntaxKind::END_KW => {
                close_section(p, &mut stack);
                let m = p.start();
                p.bump();
                m.complete(p, SyntaxKind::END);
                after_end(p);
            }
            kind if kind.is_section_keyword() => {
                close_section(p, &mut stack);
                open_section(p, &mut stack, kind);
            }
            _ => {
                let rule = match stack.last() {
                    Some(Frame::Section { rule, .. }) => *rule,
                    _ => StatementRule::Implicit,
                };
                statement(p, rule);
            }
        }
    }

    if let Some(Frame::Section { name, keyword, .. }) = stack.last() {
        let (name, keyword) = (*name, *keyword);
        p.error(
            ParseErrorKind::UnterminatedSection,
            keyword,
            format!("{name} section is not closed by `End`"),
        );
    }
    close_section(p, &mut stack);

    p.flush_trivia();
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Document(m) => {
                m.complete(p, SyntaxKind::DOCUMENT);
            }
            Frame::Section { marker, .. } => {
                marker.complete(p, SyntaxKind::SECTION);
            }
        }
    }
}

fn open_section(p: &mut Parser<'_>, stack: &mut Vec<Frame>, keyword: SyntaxKind) {
    let Some(section) = LP.section(keyword) else {
        p.err_and_bump("a section keyword");
        return;
    };
    let marker = p.start();
    let range = p.current_range();
    p.bump();
    stack.push(Frame::Section {
        marker,
        rule: section.statement,
        name: section.name,
        keyword: range,
    });
}

fn close_section(p: &mut Parser<'_>, stack: &mut Vec<Frame>) {
    match stack.pop() {
        Some(Frame::Section { marker, .. }) => {
            marker.complete(p, SyntaxKind::SECTION);
        }
        Some(other) => stack.push(other),
        None => {}
    }
}

/// Only blank lines and trivia may follow `End`.
fn after_end(p: &mut Parser<'_>) {
    const EXPECTED: &str = "end of input after `End`";
    loop {
        match p.current() {
            SyntaxKind::EOF => break,
            SyntaxKind::NEWLINE => p.bump(),
            kind if kind.is_section_keyword() => p.err_and_bump(EXPECTED),
            _ => p.recover(EXPECTED),
        }
    }
}

/// Parse one statement of `rule` at the current token.
///
/// Always consumes at least one token unless at end of input.
pub(crate) fn statement(p: &mut Parser<'_>, rule: StatementRule) {
    let before = p.consumed();

    if !p.at_set(rule.first()) {
        p.recover(rule.expected());
    } else {
        match rule {
            StatementRule::Implicit => statement::implicit(p),
            StatementRule::Objective => statement::objective(p),
            StatementRule::Constraint => statement::constraint(p),
            StatementRule::Bound => statement::bound(p),
            StatementRule::Declaration => statement::declaration(p),
            StatementRule::Sos => statement::sos_item(p),
        }
    }

    if p.consumed() == before && !p.at(SyntaxKind::EOF) {
        p.err_and_bump(rule.expected());
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParseErrorKind, SyntaxKind, parse};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_nest_under_document() {
        let parse = parse("Minimize\n x\nSubject To\n x >= 1\nBounds\n x <= 4\nEnd\n");
        let tree = parse.tree();
        let kinds: Vec<_> = tree.children(tree.root()).map(|id| tree.kind(id)).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::SECTION,
                SyntaxKind::SECTION,
                SyntaxKind::SECTION,
                SyntaxKind::END,
                SyntaxKind::NEWLINE,
            ]
        );
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn section_tree_shape() {
        let parse = parse("Bounds\n x free\nEnd");
        assert_snapshot!(parse.tree().debug_dump(), @r#"
        DOCUMENT@0..18
          SECTION@0..15
            BOUNDS_KW@0..6 "Bounds"
            NEWLINE@6..7 "\n"
            WHITESPACE@7..8 " "
            BOUND@8..14
              IDENT@8..9 "x"
              WHITESPACE@9..10 " "
              FREE_KW@10..14 "free"
            NEWLINE@14..15 "\n"
          END@15..18
            END_KW@15..18 "End"
        "#);
    }

    #[test]
    fn missing_end_is_reported_at_the_keyword() {
        let parse = parse("Subject To\n c1: x <= 1\n");
        let errors = parse.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedSection);
        assert_eq!(errors[0].message, "constraints section is not closed by `End`");
        assert_eq!(u32::from(errors[0].range.end()), 10);
    }

    #[test]
    fn content_after_end_is_an_error() {
        let parse = parse("x\nEnd\nstray words\nBounds\n");
        let kinds: Vec<_> = parse.errors().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ParseErrorKind::UnexpectedToken, ParseErrorKind::UnexpectedToken]);
        assert_eq!(parse.errors()[0].message, "expected end of input after `End`, found `stray`");
        assert_eq!(parse.tree().text_of(parse.tree().root()), "x\nEnd\nstray words\nBounds\n");
    }

    #[test]
    fn statement_start_junk_is_wrapped() {
        let parse = parse("Subject To\n ) x\nEnd\n");
        let tree = parse.tree();
        let section = tree.child_at(tree.root(), 0).unwrap();
        let error = tree
            .children(section)
            .find(|id| tree.kind(*id) == SyntaxKind::ERROR)
            .unwrap();
        assert_eq!(tree.text_of(error), ") x");
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].message, "expected a constraint, found `)`");
    }

    #[test]
    fn trailing_trivia_belongs_to_document() {
        let parse = parse("Bounds\n x >= 0 \\ done");
        let tree = parse.tree();
        let last = tree.children(tree.root()).last().unwrap();
        assert_eq!(tree.kind(last), SyntaxKind::LINE_COMMENT);
    }
}
