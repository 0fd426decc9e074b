//! # lp-syntax
//!
//! A lossless, incremental syntax tree for Lp linear-programming model files,
//! using [Logos] for the token core and following the [rust-analyzer]
//! architecture model.
//!
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Lossless CST?
//!
//! Every byte of the input ends up in exactly one token of the tree:
//! whitespace, comments, blank lines and malformed input included. Printing
//! the leaves in order gives back the source. This enables:
//!
//! - **Highlighting and folding**: token kinds and node spans map straight
//!   onto the editor buffer
//! - **Accurate diagnostics**: every error carries a precise byte range
//! - **Formatting and linting**: tools see comments and layout, not just the
//!   model
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Arena Tree
//!               (Logos)  ↑         (Grammar)        (TreeBuilder)
//!                        └── lexer mode hint
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits the text into tokens. Section keywords (`Subject To`, `Bounds`,
//! ...) are only keywords at the start of a statement, so the parser passes
//! a [`LexMode`] hint with every request.
//!
//! ### 2. Parser (`parser` module)
//!
//! Consumes tokens and emits **events**. Grammar rules read the
//! [`grammar::LP`] rules table: section keywords, statement rules per section,
//! binary operators with precedence and associativity. Malformed input is
//! reported in [`Parse::errors`] and wrapped in `ERROR` nodes; parsing always
//! completes.
//!
//! ### 3. Tree ([`tree`] module)
//!
//! The sink replays the events into a flat arena addressed by [`NodeId`].
//! Trees are immutable and `Send + Sync`.
//!
//! ### 4. Incremental re-parse ([`incremental`] module)
//!
//! [`Parse::reparse`] applies a [`TextEdit`] by relexing one token or
//! re-parsing one statement when it can, sharing untouched storage with the
//! old tree.
//!
//! ## Module Structure
//!
//! ```text
//! lp-syntax/
//! ├── lib.rs           # This file - public API and scenario tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes)
//! ├── syntax_set.rs    # Bitset of kinds for FIRST sets and recovery
//! ├── lexer.rs         # Logos-based tokenizer with lexer modes
//! ├── grammar.rs       # The LP rules table
//! ├── error.rs         # ParseError, EditError
//! ├── options.rs       # ParseOptions
//! ├── ast.rs           # Typed views (coefficients, bounds, SOS sets)
//! ├── incremental.rs   # TextEdit and re-parse strategies
//! ├── parser/
//! │   ├── mod.rs       # Parser, Marker system, parse()
//! │   ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//! │   ├── sink.rs      # Events → arena tree
//! │   ├── source.rs    # Lazy token source
//! │   └── grammar/     # Document, statement and expression rules
//! └── tree/
//!     ├── mod.rs       # SyntaxTree, SyntaxNode
//!     ├── arena.rs     # Chunked copy-on-write storage
//!     ├── builder.rs   # TreeBuilder
//!     └── walk.rs      # Preorder traversal
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use lp_syntax::{SyntaxKind, parse};
//!
//! let parse = parse("Maximize\n obj: 2 x1 + 3x2\nSubject To\n c1: x1 + x2 <= 10\nEnd\n");
//! assert!(parse.errors().is_empty());
//!
//! // The tree preserves all text
//! let tree = parse.tree();
//! assert_eq!(tree.text_of(tree.root()), parse.text());
//!
//! // Navigate the tree structure
//! let section = tree.root_node().first_child().unwrap();
//! assert_eq!(section.kind(), SyntaxKind::SECTION);
//! assert_eq!(section.first_child().unwrap().kind(), SyntaxKind::MAXIMIZE_KW);
//! ```

pub mod ast;
mod error;
pub mod grammar;
pub mod incremental;
pub mod lexer;
mod options;
mod parser;
pub mod syntax_kind;
pub mod syntax_set;
pub mod tree;

pub use error::{EditError, ParseError, ParseErrorKind};
pub use incremental::{ReparseStats, ReparseStrategy, TextEdit};
pub use lexer::{LexMode, Lexer, Token, Tokens, lex, tokenize};
pub use options::ParseOptions;
pub use parser::{Parse, parse, parse_with};
pub use syntax_kind::{SyntaxKind, TokenKind};
pub use syntax_set::SyntaxSet;
pub use text_size::{TextRange, TextSize};
pub use tree::{NodeId, Preorder, SyntaxNode, SyntaxTree, WalkEvent};
