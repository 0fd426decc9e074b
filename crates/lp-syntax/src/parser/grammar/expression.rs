//! Linear expressions, terms, constants and labels.
//!
//! An expression is parsed by precedence climbing over the binary operator
//! table. With `+` and `-` sharing one left-associative level the result is
//! a single flat `EXPRESSION` whose children alternate terms and operators:
//!
//! ```text
//! EXPRESSION
//!   TERM      2 x1
//!   PLUS
//!   TERM      3 x2
//!   TERM      -4 x3     (a signed literal starts a new term)
//! ```

use crate::ParseErrorKind;
use crate::grammar::{Associativity, BinaryOperator, CONSTANT_FIRST, LP, TERM_FIRST, VARIABLE};
use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;
use crate::syntax_set::SyntaxSet;

/// Parse an expression if the current token can start one.
pub(super) fn expression(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at_set(TERM_FIRST) {
        return None;
    }
    let m = p.start();
    term(p);
    loop {
        let kind = p.current();
        if let Some(op) = LP.binary_operator(kind) {
            p.bump();
            operand(p, op);
        } else if starts_signed_term(p) {
            term(p);
        } else if LP.junk.contains(kind) {
            p.err_and_bump("an operator");
        } else {
            break;
        }
    }
    Some(m.complete(p, SyntaxKind::EXPRESSION))
}

/// The right-hand side of `op`, which has just been consumed.
fn operand(p: &mut Parser<'_>, op: &BinaryOperator) {
    // A trailing operator continues the expression on the next line
    let mut blank = 0;
    while p.nth(blank) == SyntaxKind::NEWLINE {
        blank += 1;
    }
    let next = p.nth(blank);
    if blank > 0 && (TERM_FIRST.contains(next) || LP.junk.contains(next)) {
        for _ in 0..blank {
            p.bump();
        }
    }
    while p.at_set(LP.junk) {
        p.err_and_bump("a term");
    }
    if !p.at_set(TERM_FIRST) {
        p.missing("a term after the operator");
        return;
    }

    let mut lhs = term(p);
    while let Some(next) = LP.binary_operator(p.current()) {
        let binds_tighter = next.precedence > op.precedence
            || (next.precedence == op.precedence && next.associativity == Associativity::Right);
        if !binds_tighter {
            break;
        }
        let m = lhs.precede(p);
        p.bump();
        operand(p, next);
        lhs = m.complete(p, SyntaxKind::EXPRESSION);
    }
}

/// `3x -2y`: a signed number right after a term brings its own sign.
fn starts_signed_term(p: &mut Parser<'_>) -> bool {
    p.at_set(LP.literals) && p.nth_text(0).starts_with(['+', '-'])
}

/// `sign* (NUMBER | INFINITY)? IDENT`
pub(super) fn term(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    while p.at_set(LP.signs) {
        p.bump();
    }
    if p.at_set(LP.literals) {
        p.bump();
    } else if p.at(SyntaxKind::INVALID_NUMBER) && VARIABLE.contains(p.nth(1)) {
        invalid_number(p);
    }
    if p.at_set(VARIABLE) {
        variable(p);
    } else {
        p.missing("a variable");
    }
    m.complete(p, SyntaxKind::TERM)
}

/// `sign* (NUMBER | INFINITY)`
pub(super) fn constant(p: &mut Parser<'_>) {
    if !p.at_set(CONSTANT_FIRST) {
        p.recover("a number");
        return;
    }
    let m = p.start();
    while p.at_set(LP.signs) {
        p.bump();
    }
    if p.at_set(LP.literals) {
        p.bump();
    } else if p.at(SyntaxKind::INVALID_NUMBER) {
        invalid_number(p);
    } else {
        p.missing("a number");
    }
    m.complete(p, SyntaxKind::CONSTANT);
}

/// `comparison constant`, for the right-hand side of constraints.
pub(super) fn comparison_rhs(p: &mut Parser<'_>) {
    if p.at_set(LP.comparisons) {
        p.bump();
        constant(p);
    } else {
        p.recover("a comparison operator");
    }
}

/// A variable name. Malformed numbers are accepted and reported.
pub(super) fn variable(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::INVALID_NUMBER) {
        invalid_number(p);
    } else {
        p.bump();
    }
}

fn invalid_number(p: &mut Parser<'_>) {
    let range = p.current_range();
    let text = p.nth_text(0);
    p.error(
        ParseErrorKind::InvalidNumber,
        range,
        format!("`{text}` is not a valid number"),
    );
    p.bump();
}

/// `IDENT` followed by one of `separators`.
pub(super) fn label(p: &mut Parser<'_>, separators: SyntaxSet) -> bool {
    if !p.at(SyntaxKind::IDENT) || !separators.contains(p.nth(1)) {
        return false;
    }
    let m = p.start();
    p.bump();
    p.bump();
    m.complete(p, SyntaxKind::LABEL);
    true
}

#[cfg(test)]
mod tests {
    use crate::{ParseErrorKind, parse};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_terms_and_operators() {
        let parse = parse("2 x1 + 3x2 -4x3");
        assert!(parse.errors().is_empty());
        assert_snapshot!(parse.tree().debug_dump(), @r#"
        DOCUMENT@0..15
          OBJECTIVE@0..15
            EXPRESSION@0..15
              TERM@0..4
                NUMBER@0..1 "2"
                WHITESPACE@1..2 " "
                IDENT@2..4 "x1"
              WHITESPACE@4..5 " "
              PLUS@5..6 "+"
              WHITESPACE@6..7 " "
              TERM@7..10
                NUMBER@7..8 "3"
                IDENT@8..10 "x2"
              WHITESPACE@10..11 " "
              TERM@11..15
                NUMBER@11..13 "-4"
                IDENT@13..15 "x3"
        "#);
    }

    #[test]
    fn operator_continues_on_next_line() {
        let parse = parse("x +\n  y\nz\n");
        let tree = parse.tree();
        let statements: Vec<_> = tree
            .children(tree.root())
            .filter(|id| !tree.kind(*id).is_token())
            .map(|id| tree.text_of(id))
            .collect();
        assert_eq!(statements, vec!["x +\n  y", "z"]);
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn dangling_operator_is_missing_a_term() {
        let parse = parse("x +\n");
        assert_eq!(parse.errors().len(), 1);
        let error = &parse.errors()[0];
        assert_eq!(error.kind, ParseErrorKind::MissingToken);
        assert_eq!(error.message, "expected a term after the operator");
        assert_eq!(u32::from(error.range.start()), 3);
        assert!(error.range.is_empty());
    }

    #[test]
    fn junk_is_skipped_inside_expressions() {
        let parse = parse("c: x + (y) <= 1");
        let messages: Vec<_> = parse.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["expected a term, found `(`", "expected an operator, found `)`"]
        );
        let constraint = parse.document().constraints().next().unwrap();
        assert_eq!(constraint.rhs(), Some(1.0));
    }

    #[test]
    fn malformed_coefficient() {
        let parse = parse("1.2.3x + y");
        let kinds: Vec<_> = parse.errors().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ParseErrorKind::InvalidNumber]);
        assert_eq!(parse.errors()[0].message, "`1.2.3` is not a valid number");
    }

    #[test]
    fn term_without_variable() {
        let parse = parse("x + 3\n");
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].message, "expected a variable");
        assert_eq!(u32::from(parse.errors()[0].range.start()), 5);
    }
}
