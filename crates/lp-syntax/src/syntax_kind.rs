//! SyntaxKind enum for all tokens and nodes in the Lp CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Lp CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser
/// output). The `repr(u16)` keeps the kind small enough to pack into arena
/// entries and into [`SyntaxSet`](crate::syntax_set::SyntaxSet) bitsets.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
/// The names are part of the public contract: highlighting patterns and
/// snapshot dumps refer to them through [`SyntaxKind::name`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs, form feeds)
    WHITESPACE,
    /// Line ending, the statement separator
    NEWLINE,
    /// `\ comment` running to end of line
    LINE_COMMENT,
    /// `\* comment *\`, may span lines
    BLOCK_COMMENT,
    /// Variable or constraint name
    IDENT,
    /// Numeric literal, optionally signed
    NUMBER,
    /// `inf` / `infinity`, optionally signed
    INFINITY,
    /// Numeric-looking run that is not a valid number (`1.2.3`)
    INVALID_NUMBER,
    /// `+`
    PLUS,
    /// `-`
    MINUS,
    /// `<`
    LT,
    /// `<=` or `=<`
    LT_EQ,
    /// `>`
    GT,
    /// `>=` or `=>`
    GT_EQ,
    /// `=`
    EQ,
    /// `:`
    COLON,
    /// `::`
    COLON2,
    /// `(`
    L_PAREN,
    /// `)`
    R_PAREN,
    /// `Minimize` and its spellings
    MINIMIZE_KW,
    /// `Maximize` and its spellings
    MAXIMIZE_KW,
    /// `Subject To`, `such that`, `s.t.`, `st`
    SUBJECT_TO_KW,
    /// `Bounds`
    BOUNDS_KW,
    /// `Generals`
    GENERALS_KW,
    /// `Integers`
    INTEGERS_KW,
    /// `Binaries`
    BINARIES_KW,
    /// `Semi-Continuous`
    SEMI_CONTINUOUS_KW,
    /// `SOS`
    SOS_KW,
    /// `End`
    END_KW,
    /// Contextual `free` inside a bound
    FREE_KW,
    /// Contextual `S1` / `S2` inside an SOS header
    SOS_TYPE,
    /// Maximal run of unrecognised characters
    ERROR_TOKEN,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    DOCUMENT,
    /// Section keyword plus the statements that follow it
    SECTION,
    /// `name:` prefix of an objective, constraint or SOS set
    LABEL,
    /// Objective function statement
    OBJECTIVE,
    /// `expr <op> rhs` statement
    CONSTRAINT,
    /// Variable bound statement
    BOUND,
    /// Variable list in generals/integers/binaries/semi-continuous
    DECLARATION,
    /// `name: S1::` header
    SOS_SET,
    /// `x:weight` member of an SOS set
    SOS_ENTRY,
    /// Linear expression
    EXPRESSION,
    /// Signed coefficient times variable
    TERM,
    /// Signed numeric constant
    CONSTANT,
    /// `End` marker
    END,

    /// Error recovery node
    ERROR,
}

/// Coarse classification of token kinds.
///
/// Tools that only care about the broad shape of a token (highlighters,
/// formatters) match on this instead of the fine-grained [`SyntaxKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    SectionKeyword,
    Operator,
    Punctuation,
    Whitespace,
    Comment,
    Newline,
    EndOfInput,
    Error,
}

impl SyntaxKind {
    /// Every kind, in discriminant order.
    pub const ALL: [SyntaxKind; 47] = {
        use SyntaxKind::*;
        [
            WHITESPACE,
            NEWLINE,
            LINE_COMMENT,
            BLOCK_COMMENT,
            IDENT,
            NUMBER,
            INFINITY,
            INVALID_NUMBER,
            PLUS,
            MINUS,
            LT,
            LT_EQ,
            GT,
            GT_EQ,
            EQ,
            COLON,
            COLON2,
            L_PAREN,
            R_PAREN,
            MINIMIZE_KW,
            MAXIMIZE_KW,
            SUBJECT_TO_KW,
            BOUNDS_KW,
            GENERALS_KW,
            INTEGERS_KW,
            BINARIES_KW,
            SEMI_CONTINUOUS_KW,
            SOS_KW,
            END_KW,
            FREE_KW,
            SOS_TYPE,
            ERROR_TOKEN,
            EOF,
            DOCUMENT,
            SECTION,
            LABEL,
            OBJECTIVE,
            CONSTRAINT,
            BOUND,
            DECLARATION,
            SOS_SET,
            SOS_ENTRY,
            EXPRESSION,
            TERM,
            CONSTANT,
            END,
            ERROR,
        ]
    };

    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/comments).
    ///
    /// Newlines are not trivia in Lp: they terminate statements.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Returns true for the keywords that open a section (and `End`).
    pub fn is_section_keyword(self) -> bool {
        (Self::MINIMIZE_KW as u16..=Self::END_KW as u16).contains(&(self as u16))
    }

    /// Returns true for `<`, `<=`, `>`, `>=` and `=`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::LT | Self::LT_EQ | Self::GT | Self::GT_EQ | Self::EQ
        )
    }

    /// The coarse token class, or `None` for node kinds.
    pub fn token_kind(self) -> Option<TokenKind> {
        use SyntaxKind::*;
        let class = match self {
            IDENT | FREE_KW | SOS_TYPE => TokenKind::Identifier,
            NUMBER | INFINITY | INVALID_NUMBER => TokenKind::Number,
            k if k.is_section_keyword() => TokenKind::SectionKeyword,
            PLUS | MINUS | LT | LT_EQ | GT | GT_EQ | EQ => TokenKind::Operator,
            COLON | COLON2 | L_PAREN | R_PAREN => TokenKind::Punctuation,
            WHITESPACE => TokenKind::Whitespace,
            LINE_COMMENT | BLOCK_COMMENT => TokenKind::Comment,
            NEWLINE => TokenKind::Newline,
            EOF => TokenKind::EndOfInput,
            ERROR_TOKEN => TokenKind::Error,
            _ => return None,
        };
        Some(class)
    }

    /// Stable name of the kind, as used in tree dumps.
    pub fn name(self) -> &'static str {
        use SyntaxKind::*;
        match self {
            WHITESPACE => "WHITESPACE",
            NEWLINE => "NEWLINE",
            LINE_COMMENT => "LINE_COMMENT",
            BLOCK_COMMENT => "BLOCK_COMMENT",
            IDENT => "IDENT",
            NUMBER => "NUMBER",
            INFINITY => "INFINITY",
            INVALID_NUMBER => "INVALID_NUMBER",
            PLUS => "PLUS",
            MINUS => "MINUS",
            LT => "LT",
            LT_EQ => "LT_EQ",
            GT => "GT",
            GT_EQ => "GT_EQ",
            EQ => "EQ",
            COLON => "COLON",
            COLON2 => "COLON2",
            L_PAREN => "L_PAREN",
            R_PAREN => "R_PAREN",
            MINIMIZE_KW => "MINIMIZE_KW",
            MAXIMIZE_KW => "MAXIMIZE_KW",
            SUBJECT_TO_KW => "SUBJECT_TO_KW",
            BOUNDS_KW => "BOUNDS_KW",
            GENERALS_KW => "GENERALS_KW",
            INTEGERS_KW => "INTEGERS_KW",
            BINARIES_KW => "BINARIES_KW",
            SEMI_CONTINUOUS_KW => "SEMI_CONTINUOUS_KW",
            SOS_KW => "SOS_KW",
            END_KW => "END_KW",
            FREE_KW => "FREE_KW",
            SOS_TYPE => "SOS_TYPE",
            ERROR_TOKEN => "ERROR_TOKEN",
            EOF => "EOF",
            DOCUMENT => "DOCUMENT",
            SECTION => "SECTION",
            LABEL => "LABEL",
            OBJECTIVE => "OBJECTIVE",
            CONSTRAINT => "CONSTRAINT",
            BOUND => "BOUND",
            DECLARATION => "DECLARATION",
            SOS_SET => "SOS_SET",
            SOS_ENTRY => "SOS_ENTRY",
            EXPRESSION => "EXPRESSION",
            TERM => "TERM",
            CONSTANT => "CONSTANT",
            END => "END",
            ERROR => "ERROR",
        }
    }

    /// Raw lexer kind for contextual keywords the parser remaps.
    pub(crate) fn lexed_as(self) -> SyntaxKind {
        match self {
            Self::FREE_KW | Self::SOS_TYPE => Self::IDENT,
            kind => kind,
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
