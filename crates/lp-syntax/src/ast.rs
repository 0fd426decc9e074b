//! Typed, read-only views over the syntax tree.
//!
//! Each wrapper is a [`SyntaxNode`] known to have a particular kind. The
//! accessors read the model out of the tree: coefficients, comparison
//! operators, right-hand sides, bounds, declared variables and SOS sets.
//! Anything missing from malformed input comes back as `None`.
//!
//! ```
//! let text = "Maximize\n obj: 2 x1 + 3x2\nSubject To\n c1: x1 + x2 <= 10\nEnd\n";
//! let parse = lp_syntax::parse(text);
//! let document = parse.document();
//!
//! let objective = document.objectives().next().unwrap();
//! let terms = objective.expression().unwrap().linear_terms();
//! assert_eq!(terms, vec![(Some(2.0), "x1"), (Some(3.0), "x2")]);
//!
//! let c1 = document.constraints().next().unwrap();
//! assert_eq!(c1.name(), Some("c1"));
//! assert_eq!(c1.rhs(), Some(10.0));
//! ```

use crate::SyntaxKind;
use crate::tree::{SyntaxNode, SyntaxTree};

pub trait AstNode<'a>: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>;

    fn syntax(&self) -> SyntaxNode<'a>;

    fn text(&self) -> &'a str {
        self.syntax().text()
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self(syntax))
            }

            fn syntax(&self) -> SyntaxNode<'a> {
                self.0
            }
        }
    };
}

ast_node!(
    /// The root of every tree.
    Document, DOCUMENT
);
ast_node!(
    /// A section keyword and the statements up to the next section.
    Section, SECTION
);
ast_node!(Label, LABEL);
ast_node!(Objective, OBJECTIVE);
ast_node!(Constraint, CONSTRAINT);
ast_node!(Bound, BOUND);
ast_node!(
    /// A line of variable names in a generals, integers, binaries or
    /// semi-continuous section.
    Declaration, DECLARATION
);
ast_node!(SosSet, SOS_SET);
ast_node!(SosEntry, SOS_ENTRY);
ast_node!(Expression, EXPRESSION);
ast_node!(Term, TERM);
ast_node!(Constant, CONSTANT);

fn child<'a, N: AstNode<'a>>(node: SyntaxNode<'a>) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<'a, N: AstNode<'a> + 'a>(node: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    node.children().filter_map(N::cast)
}

fn descendants<'a, N: AstNode<'a> + 'a>(node: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    node.descendants().filter_map(N::cast)
}

fn token_text<'a>(node: SyntaxNode<'a>, pred: impl Fn(SyntaxKind) -> bool) -> Option<&'a str> {
    node.children().find(|child| pred(child.kind())).map(|child| child.text())
}

/// Value of a `NUMBER` or `INFINITY` token, sign included.
fn literal_value(kind: SyntaxKind, text: &str) -> Option<f64> {
    match kind {
        SyntaxKind::NUMBER => text.parse().ok(),
        SyntaxKind::INFINITY => Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }),
        _ => None,
    }
}

/// Product of the unary signs, then the literal if there is one.
fn signed_value(node: SyntaxNode<'_>) -> (f64, Option<Option<f64>>) {
    let mut sign = 1.0;
    let mut literal = None;
    for token in node.children() {
        match token.kind() {
            SyntaxKind::MINUS => sign = -sign,
            SyntaxKind::PLUS => {}
            SyntaxKind::NUMBER | SyntaxKind::INFINITY => {
                literal = Some(literal_value(token.kind(), token.text()))
            }
            SyntaxKind::INVALID_NUMBER if literal.is_none() => literal = Some(None),
            _ => {}
        }
    }
    (sign, literal)
}

fn is_variable(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::IDENT | SyntaxKind::INVALID_NUMBER)
}

fn is_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OBJECTIVE
            | SyntaxKind::CONSTRAINT
            | SyntaxKind::BOUND
            | SyntaxKind::DECLARATION
            | SyntaxKind::SOS_SET
            | SyntaxKind::SOS_ENTRY
    )
}

impl<'a> Document<'a> {
    pub fn cast_root(tree: &'a SyntaxTree) -> Self {
        Self(tree.root_node())
    }

    pub fn sections(self) -> impl Iterator<Item = Section<'a>> + 'a {
        children(self.0)
    }

    /// Every statement node, in source order.
    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        self.0.descendants().filter(|node| is_statement(node.kind()))
    }

    pub fn objectives(self) -> impl Iterator<Item = Objective<'a>> + 'a {
        descendants(self.0)
    }

    pub fn constraints(self) -> impl Iterator<Item = Constraint<'a>> + 'a {
        descendants(self.0)
    }

    pub fn bounds(self) -> impl Iterator<Item = Bound<'a>> + 'a {
        descendants(self.0)
    }

    pub fn declarations(self) -> impl Iterator<Item = Declaration<'a>> + 'a {
        descendants(self.0)
    }

    pub fn sos_sets(self) -> impl Iterator<Item = SosSet<'a>> + 'a {
        descendants(self.0)
    }

    pub fn has_end(&self) -> bool {
        self.0.child_of_kind(SyntaxKind::END).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Objective(Sense),
    Constraints,
    Bounds,
    Generals,
    Integers,
    Binaries,
    SemiContinuous,
    Sos,
}

impl SectionKind {
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::MINIMIZE_KW => SectionKind::Objective(Sense::Minimize),
            SyntaxKind::MAXIMIZE_KW => SectionKind::Objective(Sense::Maximize),
            SyntaxKind::SUBJECT_TO_KW => SectionKind::Constraints,
            SyntaxKind::BOUNDS_KW => SectionKind::Bounds,
            SyntaxKind::GENERALS_KW => SectionKind::Generals,
            SyntaxKind::INTEGERS_KW => SectionKind::Integers,
            SyntaxKind::BINARIES_KW => SectionKind::Binaries,
            SyntaxKind::SEMI_CONTINUOUS_KW => SectionKind::SemiContinuous,
            SyntaxKind::SOS_KW => SectionKind::Sos,
            _ => return None,
        })
    }
}

impl<'a> Section<'a> {
    /// The section keyword token, exactly as written.
    pub fn keyword(&self) -> Option<SyntaxNode<'a>> {
        self.0.first_child().filter(|token| token.kind().is_section_keyword())
    }

    pub fn kind(&self) -> Option<SectionKind> {
        self.keyword()
            .and_then(|keyword| SectionKind::from_keyword(keyword.kind()))
    }

    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        self.0.children().filter(|node| is_statement(node.kind()))
    }
}

impl<'a> Label<'a> {
    pub fn name(&self) -> Option<&'a str> {
        token_text(self.0, |kind| kind == SyntaxKind::IDENT)
    }
}

impl<'a> Objective<'a> {
    pub fn label(&self) -> Option<Label<'a>> {
        child(self.0)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.label().and_then(|label| label.name())
    }

    pub fn expression(&self) -> Option<Expression<'a>> {
        child(self.0)
    }

    /// The sense of the enclosing section. `None` before any section.
    pub fn sense(&self) -> Option<Sense> {
        match Section::cast(self.0.parent()?)?.kind()? {
            SectionKind::Objective(sense) => Some(sense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::LT => Comparison::Lt,
            SyntaxKind::LT_EQ => Comparison::Le,
            SyntaxKind::GT => Comparison::Gt,
            SyntaxKind::GT_EQ => Comparison::Ge,
            SyntaxKind::EQ => Comparison::Eq,
            _ => return None,
        })
    }

    /// The same relation with its sides swapped (`2 >= x` is `x <= 2`).
    pub fn flipped(self) -> Self {
        match self {
            Comparison::Lt => Comparison::Gt,
            Comparison::Le => Comparison::Ge,
            Comparison::Gt => Comparison::Lt,
            Comparison::Ge => Comparison::Le,
            Comparison::Eq => Comparison::Eq,
        }
    }
}

impl<'a> Constraint<'a> {
    pub fn label(&self) -> Option<Label<'a>> {
        child(self.0)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.label().and_then(|label| label.name())
    }

    pub fn expression(&self) -> Option<Expression<'a>> {
        child(self.0)
    }

    pub fn comparison(&self) -> Option<Comparison> {
        self.0.children().find_map(|child| Comparison::from_kind(child.kind()))
    }

    pub fn rhs_constant(&self) -> Option<Constant<'a>> {
        child(self.0)
    }

    pub fn rhs(&self) -> Option<f64> {
        self.rhs_constant().and_then(|constant| constant.value())
    }
}

/// Limits a bound line puts on its variable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundLimits {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl BoundLimits {
    /// Record `variable <op> value`.
    fn apply(&mut self, op: Comparison, value: f64) {
        match op {
            Comparison::Lt | Comparison::Le => self.upper = Some(value),
            Comparison::Gt | Comparison::Ge => self.lower = Some(value),
            Comparison::Eq => {
                self.lower = Some(value);
                self.upper = Some(value);
            }
        }
    }
}

impl<'a> Bound<'a> {
    pub fn variable(&self) -> Option<&'a str> {
        token_text(self.0, is_variable)
    }

    pub fn is_free(&self) -> bool {
        self.0.child_of_kind(SyntaxKind::FREE_KW).is_some()
    }

    /// Lower and upper limits. A free variable has neither; limits whose
    /// value could not be read are left out.
    pub fn limits(&self) -> BoundLimits {
        let mut limits = BoundLimits::default();
        let mut leading: Option<Option<f64>> = None;
        let mut op = None;
        let mut seen_variable = false;

        for child in self.0.children() {
            let kind = child.kind();
            if let Some(comparison) = Comparison::from_kind(kind) {
                op = Some(comparison);
            } else if is_variable(kind) {
                // `value <op> variable` reads as `variable <flipped op> value`
                if let (Some(Some(value)), Some(op)) = (leading.take(), op.take()) {
                    limits.apply(op.flipped(), value);
                }
                seen_variable = true;
            } else if let Some(constant) = Constant::cast(child) {
                if !seen_variable {
                    leading = Some(constant.value());
                } else if let (Some(value), Some(op)) = (constant.value(), op.take()) {
                    limits.apply(op, value);
                }
            }
        }
        limits
    }

    pub fn lower(&self) -> Option<f64> {
        self.limits().lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.limits().upper
    }
}

impl<'a> Declaration<'a> {
    pub fn variables(self) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .children()
            .filter(|child| is_variable(child.kind()))
            .map(|child| child.text())
    }

    /// Which kind of declaration section this line is in.
    pub fn section_kind(&self) -> Option<SectionKind> {
        Section::cast(self.0.parent()?)?.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosType {
    S1,
    S2,
}

impl<'a> SosSet<'a> {
    pub fn label(&self) -> Option<Label<'a>> {
        child(self.0)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.label().and_then(|label| label.name())
    }

    pub fn sos_type(&self) -> Option<SosType> {
        let text = token_text(self.0, |kind| kind == SyntaxKind::SOS_TYPE)?;
        if text.eq_ignore_ascii_case("s1") {
            Some(SosType::S1)
        } else if text.eq_ignore_ascii_case("s2") {
            Some(SosType::S2)
        } else {
            None
        }
    }

    /// Entries on the header line plus the entry lines that follow it, up
    /// to the next set.
    pub fn entries(&self) -> Vec<SosEntry<'a>> {
        let mut entries: Vec<SosEntry<'a>> = children(self.0).collect();
        let mut next = self.0.next_sibling();
        while let Some(node) = next {
            match node.kind() {
                SyntaxKind::SOS_SET => break,
                SyntaxKind::SOS_ENTRY => entries.extend(SosEntry::cast(node)),
                _ => {}
            }
            next = node.next_sibling();
        }
        entries
    }
}

impl<'a> SosEntry<'a> {
    pub fn variable(&self) -> Option<&'a str> {
        token_text(self.0, |kind| kind == SyntaxKind::IDENT)
    }

    pub fn weight(&self) -> Option<f64> {
        child::<Constant<'a>>(self.0).and_then(|constant| constant.value())
    }
}

impl<'a> Expression<'a> {
    /// Terms in order, without the operators between them.
    pub fn terms(self) -> impl Iterator<Item = Term<'a>> + 'a {
        descendants(self.0)
    }

    /// `(coefficient, variable)` pairs with the binary operators folded into
    /// the coefficients. The coefficient is `None` when it is malformed.
    pub fn linear_terms(&self) -> Vec<(Option<f64>, &'a str)> {
        let mut out = Vec::new();
        collect_terms(self.0, 1.0, &mut out);
        out
    }
}

fn collect_terms<'a>(node: SyntaxNode<'a>, sign: f64, out: &mut Vec<(Option<f64>, &'a str)>) {
    let mut op = 1.0;
    for child in node.children() {
        match child.kind() {
            SyntaxKind::PLUS => op = 1.0,
            SyntaxKind::MINUS => op = -1.0,
            SyntaxKind::TERM => {
                let term = Term(child);
                if let Some(variable) = term.variable() {
                    out.push((term.coefficient().map(|c| c * sign * op), variable));
                }
                op = 1.0;
            }
            SyntaxKind::EXPRESSION => {
                collect_terms(child, sign * op, out);
                op = 1.0;
            }
            _ => {}
        }
    }
}

impl<'a> Term<'a> {
    /// The signs multiplied left to right, times the literal. A term
    /// without a literal has coefficient 1.
    pub fn coefficient(&self) -> Option<f64> {
        let (sign, literal) = signed_value(self.0);
        match literal {
            None => Some(sign),
            Some(value) => value.map(|value| sign * value),
        }
    }

    pub fn variable(&self) -> Option<&'a str> {
        self.0
            .children()
            .filter(|child| is_variable(child.kind()))
            .last()
            .map(|child| child.text())
    }
}

impl<'a> Constant<'a> {
    pub fn value(&self) -> Option<f64> {
        let (sign, literal) = signed_value(self.0);
        literal.flatten().map(|value| sign * value)
    }
}
