//! Statement rules, one per [`StatementRule`](crate::grammar::StatementRule).
//!
//! Each function parses exactly one statement node and stops at the
//! statement end without consuming it. Leftovers before the end are wrapped
//! by [`end_of_statement`].

use super::expression::{comparison_rhs, constant, expression, label, variable};
use crate::grammar::{LP, VARIABLE};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;
use crate::syntax_set::SyntaxSet;

const LABEL_SEPARATORS: SyntaxSet = SyntaxSet::new([SyntaxKind::COLON, SyntaxKind::COLON2]);
const COLON: SyntaxSet = SyntaxSet::new([SyntaxKind::COLON]);

/// A statement before any section: an objective unless a comparison
/// follows the expression.
pub(super) fn implicit(p: &mut Parser<'_>) {
    let m = p.start();
    label(p, LABEL_SEPARATORS);
    let has_expression = expression(p).is_some();

    if p.at_set(LP.comparisons) {
        if !has_expression {
            p.missing("an expression");
        }
        comparison_rhs(p);
        end_of_statement(p);
        m.complete(p, SyntaxKind::CONSTRAINT);
    } else {
        if !has_expression && !p.at_statement_end() {
            p.recover("an expression");
        }
        end_of_statement(p);
        m.complete(p, SyntaxKind::OBJECTIVE);
    }
}

/// `label? expression?` inside `Minimize` / `Maximize`.
pub(super) fn objective(p: &mut Parser<'_>) {
    let m = p.start();
    label(p, COLON);
    if expression(p).is_none() && !p.at_statement_end() {
        p.recover("an objective expression");
    }
    end_of_statement(p);
    m.complete(p, SyntaxKind::OBJECTIVE);
}

/// `label? expression comparison constant` inside `Subject To`.
pub(super) fn constraint(p: &mut Parser<'_>) {
    let m = p.start();
    label(p, LABEL_SEPARATORS);
    let has_expression = expression(p).is_some();
    if has_expression || p.at_set(LP.comparisons) {
        if !has_expression {
            p.missing("an expression");
        }
        comparison_rhs(p);
    } else {
        p.recover("an expression");
    }
    end_of_statement(p);
    m.complete(p, SyntaxKind::CONSTRAINT);
}

/// One line of a `Bounds` section:
///
/// ```text
/// x free
/// x <= 4
/// -inf <= x <= 4
/// 2 >= x
/// ```
pub(super) fn bound(p: &mut Parser<'_>) {
    let m = p.start();

    if p.at_set(VARIABLE) {
        let free = p.nth(1) == SyntaxKind::IDENT && LP.is_free(p.nth_text(1));
        variable(p);
        if free {
            p.bump_as(SyntaxKind::FREE_KW);
        } else if p.at_set(LP.comparisons) {
            p.bump();
            constant(p);
        } else {
            p.recover("`free` or a comparison operator");
        }
    } else {
        constant(p);
        if p.at_set(LP.comparisons) {
            p.bump();
            if p.at_set(VARIABLE) {
                variable(p);
                if p.at_set(LP.comparisons) {
                    p.bump();
                    constant(p);
                }
            } else {
                p.recover("a variable");
            }
        } else {
            p.recover("a comparison operator");
        }
    }

    end_of_statement(p);
    m.complete(p, SyntaxKind::BOUND);
}

/// Variable names in `Generals`, `Integers`, `Binaries` and
/// `Semi-Continuous`. Several may share a line.
pub(super) fn declaration(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        let kind = p.current();
        if VARIABLE.contains(kind) {
            variable(p);
        } else if LP.junk.contains(kind) {
            p.err_and_bump("a variable name");
        } else {
            break;
        }
    }
    end_of_statement(p);
    m.complete(p, SyntaxKind::DECLARATION);
}

/// An SOS set header with its entries on the same line, or a line of
/// entries continuing the previous set.
///
/// ```text
/// s1: S1:: x1:1 x2:2
///     x3:3
/// ```
pub(super) fn sos_item(p: &mut Parser<'_>) {
    let labelled =
        p.nth(1) == SyntaxKind::COLON && is_sos_type(p, 2) && p.nth(3) == SyntaxKind::COLON2;
    let bare = is_sos_type(p, 0) && p.nth(1) == SyntaxKind::COLON2;

    if labelled || bare {
        let m = p.start();
        if labelled {
            label(p, COLON);
        }
        p.bump_as(SyntaxKind::SOS_TYPE);
        p.bump();
        while at_sos_entry(p) {
            sos_entry(p);
        }
        end_of_statement(p);
        m.complete(p, SyntaxKind::SOS_SET);
    } else if at_sos_entry(p) {
        while at_sos_entry(p) {
            sos_entry(p);
        }
        end_of_statement(p);
    } else {
        p.recover("an SOS set or entry");
    }
}

fn is_sos_type(p: &mut Parser<'_>, n: usize) -> bool {
    p.nth(n) == SyntaxKind::IDENT && LP.is_sos_type(p.nth_text(n))
}

fn at_sos_entry(p: &mut Parser<'_>) -> bool {
    p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::COLON
}

/// `IDENT ":" constant`
fn sos_entry(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    p.bump();
    constant(p);
    m.complete(p, SyntaxKind::SOS_ENTRY);
}

/// Wrap whatever is left before the statement end.
fn end_of_statement(p: &mut Parser<'_>) {
    if !p.at_statement_end() {
        p.recover("end of line");
    }
}
