//! # Grammar Rules Table
//!
//! The Lp grammar as data. The parser engine never hard-codes keyword
//! spellings, section semantics or operator precedence; it looks them up
//! here. Changing what the language accepts means editing these tables.
//!
//! ## Productions
//!
//! ```text
//! document    → statement* section* END?
//! section     → SECTION_KW (statement | NEWLINE)*
//! objective   → label? expression?
//! constraint  → label? expression comparison constant
//! bound       → IDENT FREE_KW
//!             | IDENT comparison constant
//!             | constant comparison IDENT (comparison constant)?
//! declaration → IDENT+
//! sos item    → label? SOS_TYPE "::" | IDENT ":" constant
//! expression  → term (("+" | "-") term | signed_literal_term)*
//! term        → ("+" | "-")* (NUMBER | INFINITY)? IDENT
//! constant    → ("+" | "-")* (NUMBER | INFINITY)
//! label       → IDENT (":" | "::")
//! ```
//!
//! Statements before the first section use the implicit rule: an expression
//! followed by a comparison is a constraint, otherwise an objective.
//!
//! ## Keyword Set
//!
//! Section keywords are only recognised where a statement may start. The set
//! is versioned by [`KEYWORD_SET_VERSION`]; bump it whenever a spelling is
//! added or removed so downstream highlighters can notice.

use crate::SyntaxKind;
use crate::SyntaxKind as K;
use crate::lexer::is_ident_continue;
use crate::syntax_set::SyntaxSet;

/// Version of [`Grammar::keywords`].
pub const KEYWORD_SET_VERSION: u32 = 1;

/// One spelling of a section keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    /// Lowercase spelling; a space stands for any run of spaces or tabs.
    pub spelling: &'static str,
    pub kind: SyntaxKind,
    /// Whether a trailing `:` belongs to the keyword (`Subject To:`).
    pub allows_colon: bool,
}

/// Which statement production a section's body uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementRule {
    /// Before any section keyword.
    Implicit,
    Objective,
    Constraint,
    Bound,
    Declaration,
    Sos,
}

/// Maps a section keyword to the statements its body holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRule {
    pub keyword: SyntaxKind,
    pub statement: StatementRule,
    /// Human readable name used in diagnostics.
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperator {
    pub kind: SyntaxKind,
    pub precedence: u8,
    pub associativity: Associativity,
}

/// The complete rules table consumed by the parser engine.
#[derive(Debug)]
pub struct Grammar {
    /// Sorted longest spelling first so that prefixes never win.
    pub keywords: &'static [Keyword],
    pub sections: &'static [SectionRule],
    pub binary_operators: &'static [BinaryOperator],
    pub comparisons: SyntaxSet,
    /// Unary signs that may prefix a term or constant.
    pub signs: SyntaxSet,
    /// Numeric literals usable as a coefficient or constant.
    pub literals: SyntaxSet,
    /// Tokens that end a statement. Recovery resynchronises here.
    pub statement_end: SyntaxSet,
    /// Tokens skipped one at a time without abandoning the statement.
    pub junk: SyntaxSet,
    /// Identifiers that act as `free` inside a bound.
    pub free_words: &'static [&'static str],
    /// Identifiers that act as SOS types in an SOS header.
    pub sos_types: &'static [&'static str],
}

const fn kw(spelling: &'static str, kind: SyntaxKind) -> Keyword {
    Keyword {
        spelling,
        kind,
        allows_colon: false,
    }
}

const fn kw_colon(spelling: &'static str, kind: SyntaxKind) -> Keyword {
    Keyword {
        spelling,
        kind,
        allows_colon: true,
    }
}

const KEYWORDS: &[Keyword] = &[
    kw("semi-continuous", K::SEMI_CONTINUOUS_KW),
    kw_colon("subject to", K::SUBJECT_TO_KW),
    kw_colon("such that", K::SUBJECT_TO_KW),
    kw("minimize", K::MINIMIZE_KW),
    kw("minimise", K::MINIMIZE_KW),
    kw("maximize", K::MAXIMIZE_KW),
    kw("maximise", K::MAXIMIZE_KW),
    kw("binaries", K::BINARIES_KW),
    kw("integers", K::INTEGERS_KW),
    kw("generals", K::GENERALS_KW),
    kw("minimum", K::MINIMIZE_KW),
    kw("maximum", K::MAXIMIZE_KW),
    kw("integer", K::INTEGERS_KW),
    kw("general", K::GENERALS_KW),
    kw("binary", K::BINARIES_KW),
    kw("bounds", K::BOUNDS_KW),
    kw("bound", K::BOUNDS_KW),
    kw("semis", K::SEMI_CONTINUOUS_KW),
    kw_colon("s.t.", K::SUBJECT_TO_KW),
    kw("semi", K::SEMI_CONTINUOUS_KW),
    kw("min", K::MINIMIZE_KW),
    kw("max", K::MAXIMIZE_KW),
    kw("gen", K::GENERALS_KW),
    kw("bin", K::BINARIES_KW),
    kw("sos", K::SOS_KW),
    kw("end", K::END_KW),
    kw_colon("st", K::SUBJECT_TO_KW),
];

const SECTIONS: &[SectionRule] = &[
    SectionRule {
        keyword: K::MINIMIZE_KW,
        statement: StatementRule::Objective,
        name: "objective",
    },
    SectionRule {
        keyword: K::MAXIMIZE_KW,
        statement: StatementRule::Objective,
        name: "objective",
    },
    SectionRule {
        keyword: K::SUBJECT_TO_KW,
        statement: StatementRule::Constraint,
        name: "constraints",
    },
    SectionRule {
        keyword: K::BOUNDS_KW,
        statement: StatementRule::Bound,
        name: "bounds",
    },
    SectionRule {
        keyword: K::GENERALS_KW,
        statement: StatementRule::Declaration,
        name: "generals",
    },
    SectionRule {
        keyword: K::INTEGERS_KW,
        statement: StatementRule::Declaration,
        name: "integers",
    },
    SectionRule {
        keyword: K::BINARIES_KW,
        statement: StatementRule::Declaration,
        name: "binaries",
    },
    SectionRule {
        keyword: K::SEMI_CONTINUOUS_KW,
        statement: StatementRule::Declaration,
        name: "semi-continuous",
    },
    SectionRule {
        keyword: K::SOS_KW,
        statement: StatementRule::Sos,
        name: "sos",
    },
];

const BINARY_OPERATORS: &[BinaryOperator] = &[
    BinaryOperator {
        kind: SyntaxKind::PLUS,
        precedence: 1,
        associativity: Associativity::Left,
    },
    BinaryOperator {
        kind: SyntaxKind::MINUS,
        precedence: 1,
        associativity: Associativity::Left,
    },
];

const SECTION_KEYWORDS: SyntaxSet = SyntaxSet::new([
    K::MINIMIZE_KW,
    K::MAXIMIZE_KW,
    K::SUBJECT_TO_KW,
    K::BOUNDS_KW,
    K::GENERALS_KW,
    K::INTEGERS_KW,
    K::BINARIES_KW,
    K::SEMI_CONTINUOUS_KW,
    K::SOS_KW,
    K::END_KW,
]);

/// The Lp grammar.
pub static LP: Grammar = Grammar {
    keywords: KEYWORDS,
    sections: SECTIONS,
    binary_operators: BINARY_OPERATORS,
    comparisons: SyntaxSet::new([K::LT, K::LT_EQ, K::GT, K::GT_EQ, K::EQ]),
    signs: SyntaxSet::new([SyntaxKind::PLUS, SyntaxKind::MINUS]),
    literals: SyntaxSet::new([SyntaxKind::NUMBER, SyntaxKind::INFINITY]),
    statement_end: SyntaxSet::new([SyntaxKind::NEWLINE, SyntaxKind::EOF])
        .union(&SECTION_KEYWORDS),
    junk: SyntaxSet::new([
        SyntaxKind::ERROR_TOKEN,
        SyntaxKind::L_PAREN,
        SyntaxKind::R_PAREN,
    ]),
    free_words: &["free"],
    sos_types: &["s1", "s2"],
};

/// Tokens that can start a term.
pub(crate) const TERM_FIRST: SyntaxSet = SyntaxSet::new([
    K::PLUS,
    K::MINUS,
    K::NUMBER,
    K::INFINITY,
    K::IDENT,
    K::INVALID_NUMBER,
]);

/// Tokens that can start a constant.
pub(crate) const CONSTANT_FIRST: SyntaxSet = SyntaxSet::new([
    K::PLUS,
    K::MINUS,
    K::NUMBER,
    K::INFINITY,
    K::INVALID_NUMBER,
]);

/// Tokens that can name a variable. Malformed numbers are accepted (and
/// reported) so that a typo does not derail the rest of the statement.
pub(crate) const VARIABLE: SyntaxSet =
    SyntaxSet::new([SyntaxKind::IDENT, SyntaxKind::INVALID_NUMBER]);

impl StatementRule {
    /// Tokens that may begin a statement of this rule.
    pub fn first(self) -> SyntaxSet {
        match self {
            Self::Implicit | Self::Objective | Self::Constraint | Self::Bound => TERM_FIRST,
            Self::Declaration => VARIABLE,
            Self::Sos => SyntaxSet::new([SyntaxKind::IDENT]),
        }
    }

    /// What a diagnostic says was expected where a statement should start.
    pub fn expected(self) -> &'static str {
        match self {
            Self::Implicit => "an objective or a constraint",
            Self::Objective => "an objective expression",
            Self::Constraint => "a constraint",
            Self::Bound => "a bound",
            Self::Declaration => "a variable name",
            Self::Sos => "an SOS set or entry",
        }
    }
}

impl Keyword {
    /// Length of the keyword at the start of `text`, if it is there.
    fn match_at(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let mut pos = 0;

        for (index, word) in self.spelling.split(' ').enumerate() {
            if index > 0 {
                let gap = horizontal_space(&bytes[pos..]);
                if gap == 0 {
                    return None;
                }
                pos += gap;
            }
            let end = pos + word.len();
            if end > bytes.len() || !bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
                return None;
            }
            pos = end;
        }

        if text[pos..].chars().next().is_some_and(is_ident_continue) {
            return None;
        }

        if self.allows_colon {
            let gap = horizontal_space(&bytes[pos..]);
            if bytes.get(pos + gap) == Some(&b':') {
                pos += gap + 1;
            }
        }

        Some(pos)
    }
}

fn horizontal_space(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count()
}

impl Grammar {
    /// Section keyword at the start of `text`: its kind and byte length.
    pub fn match_keyword(&self, text: &str) -> Option<(SyntaxKind, usize)> {
        self.keywords
            .iter()
            .find_map(|keyword| keyword.match_at(text).map(|len| (keyword.kind, len)))
    }

    pub fn section(&self, keyword: SyntaxKind) -> Option<&SectionRule> {
        self.sections.iter().find(|rule| rule.keyword == keyword)
    }

    pub fn binary_operator(&self, kind: SyntaxKind) -> Option<&BinaryOperator> {
        self.binary_operators.iter().find(|op| op.kind == kind)
    }

    pub fn is_free(&self, text: &str) -> bool {
        self.free_words.iter().any(|w| w.eq_ignore_ascii_case(text))
    }

    pub fn is_sos_type(&self, text: &str) -> bool {
        self.sos_types.iter().any(|w| w.eq_ignore_ascii_case(text))
    }

    /// Whether the parser may give this identifier a keyword meaning.
    pub fn is_contextual(&self, text: &str) -> bool {
        self.is_free(text) || self.is_sos_type(text)
    }

    /// All spellings of `kind`, in table order.
    pub fn spellings(&self, kind: SyntaxKind) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords
            .iter()
            .filter(move |keyword| keyword.kind == kind)
            .map(|keyword| keyword.spelling)
    }
}
