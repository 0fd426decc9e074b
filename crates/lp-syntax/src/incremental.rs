//! # Incremental Re-parse
//!
//! [`Parse::reparse`] applies a [`TextEdit`] and produces the tree for the
//! new text, reusing as much of the old tree as it safely can. The old
//! [`Parse`] is left untouched; the new tree shares every arena chunk the
//! re-parse did not write to.
//!
//! Three strategies are tried, narrowest first:
//!
//! 1. **Token**: the edit stays inside one identifier, number, whitespace or
//!    comment token and relexing gives back one token of the same kind with
//!    the same neighbours. Only spans change.
//! 2. **Statement**: the edit stays inside one statement. The statement is
//!    parsed again on its own with its section's rule and the new subtree is
//!    spliced into the parent's child slot.
//! 3. **Full**: anything else is parsed from scratch.
//!
//! Whatever the strategy, the result equals `parse_with` on the edited text.
//!
//! ```
//! use lp_syntax::{ReparseStrategy, TextEdit, TextRange, TextSize, parse};
//!
//! let old = parse("Subject To\n c1: x1 <= 5\nEnd\n");
//! let edit = TextEdit::replace(TextRange::new(TextSize::new(22), TextSize::new(23)), "50");
//! let (new, stats) = old.reparse_with_stats(&edit).unwrap();
//!
//! assert_eq!(new.text(), "Subject To\n c1: x1 <= 50\nEnd\n");
//! assert_eq!(stats.strategy, ReparseStrategy::Token);
//! assert_eq!(new, parse(new.text()));
//! ```

use std::sync::Arc;

use text_size::{TextRange, TextSize};

use crate::error::{EditError, ParseError, finish_errors, shift_range, shift_size};
use crate::grammar::{LP, StatementRule};
use crate::lexer::{LexMode, Lexer, is_terminated_block_comment};
use crate::parser::sink::Sink;
use crate::parser::{Parse, parse_statement_at};
use crate::syntax_set::SyntaxSet;
use crate::tree::builder::TreeBuilder;
use crate::tree::{NodeId, SyntaxTree};
use crate::{SyntaxKind, parse_with};

/// Tokens whose text can change without the parser noticing.
const RELEXABLE: SyntaxSet = SyntaxSet::new([
    SyntaxKind::IDENT,
    SyntaxKind::NUMBER,
    SyntaxKind::INFINITY,
    SyntaxKind::WHITESPACE,
    SyntaxKind::LINE_COMMENT,
    SyntaxKind::BLOCK_COMMENT,
]);

/// Nodes that can be parsed again on their own.
const STATEMENTS: SyntaxSet = SyntaxSet::new([
    SyntaxKind::OBJECTIVE,
    SyntaxKind::CONSTRAINT,
    SyntaxKind::BOUND,
    SyntaxKind::DECLARATION,
    SyntaxKind::SOS_SET,
    SyntaxKind::SOS_ENTRY,
]);

/// Replace `range` of the old text with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, "")
    }

    /// Change in text length.
    pub fn delta(&self) -> i64 {
        self.replacement.len() as i64 - i64::from(u32::from(self.range.len()))
    }

    /// The edited text.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        self.check(text)?;
        let mut out = String::with_capacity(text.len() + self.replacement.len());
        out.push_str(&text[..usize::from(self.range.start())]);
        out.push_str(&self.replacement);
        out.push_str(&text[usize::from(self.range.end())..]);
        Ok(out)
    }

    fn check(&self, text: &str) -> Result<(), EditError> {
        let len = TextSize::of(text);
        if self.range.end() > len {
            return Err(EditError::OutOfBounds {
                range: self.range,
                len,
            });
        }
        for offset in [self.range.start(), self.range.end()] {
            if !text.is_char_boundary(usize::from(offset)) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparseStrategy {
    Token,
    Statement,
    Full,
}

/// How a re-parse was done and how much of the old tree it kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparseStats {
    pub strategy: ReparseStrategy,
    /// Nodes of the new tree carried over from the old one.
    pub reused_nodes: usize,
    /// Nodes of the new tree that were built for this edit.
    pub reparsed_nodes: usize,
}

impl Parse {
    /// The parse of this text with `edit` applied.
    ///
    /// Fails only when the edit does not fit the text.
    pub fn reparse(&self, edit: &TextEdit) -> Result<Parse, EditError> {
        self.reparse_with_stats(edit).map(|(parse, _)| parse)
    }

    pub fn reparse_with_stats(&self, edit: &TextEdit) -> Result<(Parse, ReparseStats), EditError> {
        let text = edit.apply(self.text())?;

        if !self.options.incremental {
            return Ok(self.full(&text, "incremental re-parse is off"));
        }
        if let Some(max) = self.options.max_errors {
            if self.errors.len() >= max {
                return Ok(self.full(&text, "error cap reached"));
            }
        }

        if let Some(reparsed) = self.relex_token(edit, &text) {
            log::debug!("re-parsed {:?} by relexing one token", edit.range);
            return Ok(reparsed);
        }
        if let Some(reparsed) = self.reparse_statement(edit, &text) {
            log::debug!("re-parsed {:?} by parsing one statement", edit.range);
            return Ok(reparsed);
        }
        Ok(self.full(&text, "edit is not local to a token or statement"))
    }

    fn full(&self, text: &str, reason: &str) -> (Parse, ReparseStats) {
        log::debug!("full re-parse: {reason}");
        let parse = parse_with(text, &self.options);
        let stats = ReparseStats {
            strategy: ReparseStrategy::Full,
            reused_nodes: 0,
            reparsed_nodes: parse.tree.node_count(),
        };
        (parse, stats)
    }

    /// Strategy 1: the edit changes the text of a single token only.
    fn relex_token(&self, edit: &TextEdit, text: &str) -> Option<(Parse, ReparseStats)> {
        let tree = &self.tree;
        let leaf = tree.covering_node(edit.range);
        let kind = tree.kind(leaf);
        if !RELEXABLE.contains(kind) {
            return None;
        }

        let old = tree.span_of(leaf);
        if self.errors.iter().any(|error| touches(error.range, old)) {
            return None;
        }
        let delta = edit.delta();
        let new_range = TextRange::new(old.start(), shift_size(old.end(), delta));
        if !same_shape(kind, tree.text_of(leaf), &text[new_range]) {
            return None;
        }

        let (mut lexer, mode) = relex_prefix(tree, text, line_start(tree, leaf), leaf)?;
        let token = lexer.next_token(mode);
        if token.kind != kind || token.range != new_range {
            return None;
        }
        let mode = if kind.is_trivia() { mode } else { LexMode::after(kind) };
        if !next_matches(tree, leaf, &mut lexer, mode, delta) {
            return None;
        }

        let mut new_tree = SyntaxTree::from_parts(
            Arc::from(text),
            tree.nodes.clone(),
            tree.children.clone(),
            tree.root(),
            tree.dead(),
        );
        let mut data = new_tree.data_of(leaf);
        data.range = new_range;
        new_tree.set_data(leaf, data);
        shift_around(&mut new_tree, leaf, old, delta);

        let errors = self
            .errors
            .iter()
            .map(|error| shift_after(error, old.end(), delta))
            .collect();

        let stats = ReparseStats {
            strategy: ReparseStrategy::Token,
            reused_nodes: new_tree.node_count() - 1,
            reparsed_nodes: 1,
        };
        let parse = Parse {
            tree: new_tree,
            errors,
            options: self.options.clone(),
        };
        Some((parse, stats))
    }

    /// Strategy 2: the edit stays inside one statement.
    fn reparse_statement(&self, edit: &TextEdit, text: &str) -> Option<(Parse, ReparseStats)> {
        let tree = &self.tree;
        let statement = tree
            .node(tree.covering_node(edit.range))
            .ancestors()
            .find(|node| {
                STATEMENTS.contains(node.kind())
                    && node.parent().is_some_and(|parent| {
                        matches!(parent.kind(), SyntaxKind::SECTION | SyntaxKind::DOCUMENT)
                    })
            })?;
        // Later SOS entries of a line only parse as entries after the first
        if !starts_statement(tree, statement.id()) {
            return None;
        }
        let parent = statement.parent()?;
        let rule = match parent.kind() {
            SyntaxKind::SECTION => LP.section(parent.first_child()?.kind())?.statement,
            _ => StatementRule::Implicit,
        };

        let id = statement.id();
        let old = statement.text_range();
        let delta = edit.delta();
        let first = tree.first_leaf(id)?;
        let last = tree.last_leaf(id)?;

        let (_, mode) = relex_prefix(tree, text, line_start(tree, first), first)?;
        let resume_after = prev_significant(tree, first)
            .map(|prev| tree.span_of(prev).end())
            .unwrap_or_default();
        let fragment = parse_statement_at(text, old.start(), resume_after, mode, rule)?;

        if fragment.end != shift_size(old.end(), delta) {
            return None;
        }
        // A dangling operator on the line before looks at this token
        if first_token(&fragment.events) != Some(tree.kind(first).lexed_as()) {
            return None;
        }
        let mode = LexMode::after(fragment.last_kind);
        if mode != LexMode::after(tree.kind(last).lexed_as()) {
            return None;
        }
        let mut lexer = Lexer::resume(text, fragment.end);
        if !next_matches(tree, last, &mut lexer, mode, delta) {
            return None;
        }

        let slot = tree.data_of(id).index_in_parent;
        let mut builder = TreeBuilder::extending(tree, old.start(), parent.id(), slot);
        Sink::new(fragment.events).finish(&mut builder);
        let (nodes, children, roots) = builder.finish();
        let &[new_root] = roots.as_slice() else {
            return None;
        };

        let dead = tree.dead() + tree.subtree_size(id);
        let mut new_tree =
            SyntaxTree::from_parts(Arc::from(text), nodes, children, tree.root(), dead);
        if dead * 100 > new_tree.arena_len() * usize::from(self.options.max_dead_percent) {
            log::debug!("compacting: {dead} of {} arena entries are dead", new_tree.arena_len());
            return None;
        }
        new_tree.replace_child(parent.id(), slot, new_root);
        shift_around(&mut new_tree, new_root, old, delta);

        let mut errors: Vec<ParseError> = self
            .errors
            .iter()
            .filter(|error| !old.contains_range(error.range))
            .map(|error| shift_after(error, old.end(), delta))
            .collect();
        errors.extend(fragment.errors);
        finish_errors(&mut errors, self.options.max_errors);

        let reparsed_nodes = new_tree.subtree_size(new_root);
        let stats = ReparseStats {
            strategy: ReparseStrategy::Statement,
            reused_nodes: new_tree.node_count() - reparsed_nodes,
            reparsed_nodes,
        };
        let parse = Parse {
            tree: new_tree,
            errors,
            options: self.options.clone(),
        };
        Some((parse, stats))
    }
}

fn touches(a: TextRange, b: TextRange) -> bool {
    a.start() <= b.end() && b.start() <= a.end()
}

/// Whether a token can become `new` without the parser reading it any
/// differently.
fn same_shape(kind: SyntaxKind, old: &str, new: &str) -> bool {
    match kind {
        SyntaxKind::IDENT => !LP.is_contextual(old) && !LP.is_contextual(new),
        SyntaxKind::NUMBER | SyntaxKind::INFINITY => {
            old.starts_with(['+', '-']) == new.starts_with(['+', '-'])
        }
        SyntaxKind::BLOCK_COMMENT => {
            is_terminated_block_comment(old) && is_terminated_block_comment(new)
        }
        _ => true,
    }
}

fn shift_after(error: &ParseError, from: TextSize, delta: i64) -> ParseError {
    if error.range.start() >= from {
        error.clone().shifted(delta)
    } else {
        error.clone()
    }
}

fn prev_significant(tree: &SyntaxTree, leaf: NodeId) -> Option<NodeId> {
    let mut current = tree.prev_leaf(leaf);
    while let Some(id) = current {
        if !tree.kind(id).is_trivia() {
            return Some(id);
        }
        current = tree.prev_leaf(id);
    }
    None
}

/// Whether `id` begins at a line start or right after a section keyword,
/// where the document parser starts statements.
fn starts_statement(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(first) = tree.first_leaf(id) else {
        return false;
    };
    prev_significant(tree, first).is_none_or(|prev| {
        let kind = tree.kind(prev);
        kind == SyntaxKind::NEWLINE || kind.is_section_keyword()
    })
}

/// The lexer mode in effect at `leaf`.
fn mode_before(tree: &SyntaxTree, leaf: NodeId) -> LexMode {
    prev_significant(tree, leaf)
        .map(|prev| LexMode::after(tree.kind(prev).lexed_as()))
        .unwrap_or(LexMode::StatementStart)
}

/// First leaf of the line holding `leaf`. No token before it can look far
/// enough ahead to be affected by an edit at `leaf`.
fn line_start(tree: &SyntaxTree, leaf: NodeId) -> NodeId {
    let mut anchor = leaf;
    while let Some(prev) = tree.prev_leaf(anchor) {
        if matches!(tree.kind(prev), SyntaxKind::NEWLINE | SyntaxKind::BLOCK_COMMENT) {
            break;
        }
        anchor = prev;
    }
    anchor
}

/// Lex the new `text` from `anchor` up to `until`, checking every token
/// against the old leaves. Returns the lexer positioned at `until`.
fn relex_prefix<'t>(
    tree: &SyntaxTree,
    text: &'t str,
    anchor: NodeId,
    until: NodeId,
) -> Option<(Lexer<'t>, LexMode)> {
    let mut lexer = Lexer::resume(text, tree.span_of(anchor).start());
    let mut mode = mode_before(tree, anchor);
    let mut leaf = anchor;
    while leaf != until {
        let token = lexer.next_token(mode);
        if token.kind != tree.kind(leaf).lexed_as() || token.range != tree.span_of(leaf) {
            return None;
        }
        if !token.kind.is_trivia() {
            mode = LexMode::after(token.kind);
        }
        leaf = tree.next_leaf(leaf)?;
    }
    Some((lexer, mode))
}

/// Whether the next token lexed is the old leaf after `leaf`, moved by
/// `delta`. Everything after it lexes the same from there on.
fn next_matches(
    tree: &SyntaxTree,
    leaf: NodeId,
    lexer: &mut Lexer<'_>,
    mode: LexMode,
    delta: i64,
) -> bool {
    let token = lexer.next_token(mode);
    match tree.next_leaf(leaf) {
        Some(next) => {
            token.kind == tree.kind(next).lexed_as()
                && token.range == shift_range(tree.span_of(next), delta)
        }
        None => token.kind == SyntaxKind::EOF,
    }
}

fn first_token(events: &[crate::parser::event::Event]) -> Option<SyntaxKind> {
    events.iter().find_map(|event| match event {
        crate::parser::event::Event::Token { kind, .. } => Some(kind.lexed_as()),
        _ => None,
    })
}

/// Move every span after `old` by `delta` and stretch the ancestors of
/// `target`, whose own spans are already right.
fn shift_around(tree: &mut SyntaxTree, target: NodeId, old: TextRange, delta: i64) {
    if delta == 0 {
        return;
    }
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        if id == target {
            continue;
        }
        let mut data = tree.data_of(id);
        if data.range.end() <= old.start() {
            continue;
        }
        if data.range.start() >= old.end() {
            let subtree: Vec<NodeId> = tree.descendants(id).collect();
            for node in subtree {
                let mut data = tree.data_of(node);
                data.range = shift_range(data.range, delta);
                tree.set_data(node, data);
            }
            continue;
        }
        data.range = TextRange::new(data.range.start(), shift_size(data.range.end(), delta));
        tree.set_data(id, data);
        stack.extend(tree.children(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstNode;
    use crate::{ParseOptions, parse};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    fn check(text: &str, edit: TextEdit) -> ReparseStats {
        let old = parse(text);
        let (new, stats) = old.reparse_with_stats(&edit).unwrap();
        let expected = parse(&edit.apply(text).unwrap());
        assert_eq!(new.tree().debug_dump(), expected.tree().debug_dump());
        assert_eq!(new.errors(), expected.errors());
        assert_eq!(new, expected);
        assert_eq!(old, parse(text), "old parse must not change");
        stats
    }

    #[test]
    fn apply_replaces_range() {
        let edit = TextEdit::replace(range(2, 3), "yy");
        assert_eq!(edit.apply("x + y").unwrap(), "x yy y");
        assert_eq!(edit.delta(), 1);
        assert_eq!(TextEdit::delete(range(0, 4)).apply("x + y").unwrap(), "y");
        assert_eq!(TextEdit::insert(5.into(), "\n").apply("x + y").unwrap(), "x + y\n");
    }

    #[test]
    fn invalid_edits_are_rejected() {
        let parse = parse("x + é");
        assert_eq!(
            parse.reparse(&TextEdit::delete(range(3, 9))),
            Err(EditError::OutOfBounds {
                range: range(3, 9),
                len: 6.into(),
            })
        );
        assert_eq!(
            parse.reparse(&TextEdit::insert(5.into(), "z")),
            Err(EditError::NotCharBoundary { offset: 5.into() })
        );
    }

    #[rstest]
    #[case::number("Subject To\n c1: x1 <= 5\nEnd\n", TextEdit::replace(range(22, 23), "50"))]
    #[case::identifier("obj: x1 + x2\n", TextEdit::replace(range(10, 12), "longer_name"))]
    #[case::whitespace("obj: x1 +   x2\n", TextEdit::delete(range(9, 11)))]
    #[case::line_comment("x \\ note\ny\n", TextEdit::insert(8.into(), " more"))]
    #[case::block_comment("x \\* a *\\ + y", TextEdit::replace(range(5, 6), "abc"))]
    #[case::coefficient("2 x + 3 y", TextEdit::replace(range(0, 1), "2.5e3"))]
    fn token_edits(#[case] text: &str, #[case] edit: TextEdit) {
        assert_eq!(check(text, edit).strategy, ReparseStrategy::Token);
    }

    #[rstest]
    #[case::new_term(
        "Subject To\n c1: x <= 5\n c2: y >= 1\nEnd\n",
        TextEdit::insert(17.into(), " + z")
    )]
    #[case::objective_to_constraint("x + y\nz\n", TextEdit::insert(5.into(), " <= 4"))]
    #[case::bound_shape("Bounds\n x <= 4\nEnd", TextEdit::replace(range(10, 14), "free"))]
    #[case::broken_statement(
        "Subject To\n c1: x <= 5\nEnd\n",
        TextEdit::replace(range(19, 21), "((")
    )]
    #[case::split_identifier("Generals\n ab\nEnd", TextEdit::insert(11.into(), " "))]
    fn statement_edits(#[case] text: &str, #[case] edit: TextEdit) {
        assert_eq!(check(text, edit).strategy, ReparseStrategy::Statement);
    }

    #[rstest]
    #[case::new_section("x\ny\n", TextEdit::replace(range(2, 3), "Bounds"))]
    #[case::join_lines("x + y\nz\n", TextEdit::delete(range(5, 6)))]
    #[case::across_statements("x\ny\nz\n", TextEdit::replace(range(0, 3), "w"))]
    #[case::keyword("Minimize\n x\nEnd", TextEdit::replace(range(0, 8), "Maximize"))]
    #[case::open_comment("x + y\nz\n", TextEdit::insert(0.into(), "\\*"))]
    #[case::empty_document("", TextEdit::insert(0.into(), "x <= 1"))]
    fn full_reparse_fallbacks(#[case] text: &str, #[case] edit: TextEdit) {
        assert_eq!(check(text, edit).strategy, ReparseStrategy::Full);
    }

    #[test]
    fn keyword_lookalike_is_not_relexed() {
        // `st` at the start of a line is the constraints keyword
        let stats = check("Minimize\n sx + y\nEnd", TextEdit::replace(range(10, 12), "st"));
        assert_ne!(stats.strategy, ReparseStrategy::Token);
    }

    #[test]
    fn contextual_words_are_not_relexed() {
        let stats = check("Bounds\n x >= fred\nEnd", TextEdit::replace(range(13, 17), "free"));
        assert_ne!(stats.strategy, ReparseStrategy::Token);
        let stats = check("Bounds\n x free\nEnd", TextEdit::replace(range(10, 14), "fred"));
        assert_ne!(stats.strategy, ReparseStrategy::Token);
    }

    #[test]
    fn dangling_operator_pulls_in_the_next_line() {
        // Once the second line starts with a term it continues the first
        let stats = check("x +\n<= 3\n", TextEdit::replace(range(4, 6), "y"));
        assert_eq!(stats.strategy, ReparseStrategy::Full);
        let parse = parse("x +\ny 3\n");
        assert_eq!(parse.document().objectives().count(), 1);
    }

    #[test]
    fn later_sos_entry_on_a_line_is_not_parsed_alone() {
        // `b: S1::` only reads as a set header at the start of a line
        let text = "SOS\na:1 b: S1:: c:2\nEnd\n";
        let c = text.find("c:").unwrap() as u32;
        let stats = check(text, TextEdit::replace(range(c, c + 1), "c "));
        assert_eq!(stats.strategy, ReparseStrategy::Full);
        assert_eq!(parse(text).errors().len(), 1);
    }

    #[test]
    fn single_sos_entry_line_is_parsed_alone() {
        let text = "SOS\ns1: S1:: x:1\ny:2\nEnd\n";
        let y = text.find("y:").unwrap() as u32;
        let stats = check(text, TextEdit::insert((y + 2).into(), "+"));
        assert_eq!(stats.strategy, ReparseStrategy::Statement);
    }

    #[test]
    fn errors_move_with_the_text() {
        let text = "Subject To\n c1: x <= 5\n c2: y ~ >= 1\nEnd\n";
        let old = parse(text);
        assert_eq!(old.errors().len(), 1);
        let edit = TextEdit::replace(range(16, 17), "long_x");
        let (new, stats) = old.reparse_with_stats(&edit).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Token);
        assert_eq!(new.errors()[0].range, shift_range(old.errors()[0].range, 5));
        assert_eq!(new, parse(new.text()));
    }

    #[test]
    fn statement_errors_are_replaced() {
        let text = "Subject To\n c1: x <= \n c2: y >= 1\nEnd\n";
        let old = parse(text);
        assert_eq!(old.errors().len(), 1);
        let (new, stats) = old.reparse_with_stats(&TextEdit::insert(20.into(), " 7")).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Statement);
        assert!(new.errors().is_empty(), "{:?}", new.errors());
        assert_eq!(new, parse(new.text()));
    }

    #[test]
    fn errors_of_neighbouring_statements_survive() {
        let text = "Subject To\n c1: x <=\n c2: y >= 1\nEnd\n";
        let old = parse(text);
        assert_eq!(old.errors().len(), 1);
        let (new, stats) = old.reparse_with_stats(&TextEdit::insert(27.into(), " + z")).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Statement);
        assert_eq!(new.errors(), old.errors());
        assert_eq!(new, parse(new.text()));
    }

    #[test]
    fn untouched_nodes_keep_ids_and_storage() {
        let mut text = String::from("Subject To\n");
        for i in 0..200 {
            text.push_str(&format!(" c{i}: x{i} + y{i} <= {i}\n"));
        }
        text.push_str("End\n");
        let old = parse(&text);
        let offset = text.rfind("<= 199").unwrap() as u32 + 3;
        let edit = TextEdit::replace(range(offset, offset + 3), "2000");
        let (new, stats) = old.reparse_with_stats(&edit).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Token);
        assert_eq!(stats.reparsed_nodes, 1);

        let middle = old.document().constraints().nth(100).unwrap().syntax().id();
        assert_eq!(new.tree().kind(middle), SyntaxKind::CONSTRAINT);
        assert!(new.tree().shares_node_storage(old.tree(), middle));
        assert_eq!(new, parse(new.text()));
    }

    #[test]
    fn statement_reparse_appends_to_the_arena() {
        let text = "Subject To\n c1: x <= 5\n c2: y >= 1\nEnd\n";
        let old = parse(text);
        let (new, stats) = old.reparse_with_stats(&TextEdit::insert(17.into(), " + w")).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Statement);
        assert!(new.tree().arena_len() > old.tree().arena_len());
        assert_eq!(new.tree().node_count(), new.tree().descendants(new.tree().root()).count());
        assert_eq!(stats.reused_nodes + stats.reparsed_nodes, new.tree().node_count());
    }

    #[test]
    fn repeated_statement_edits_compact_eventually() {
        let options = ParseOptions {
            max_dead_percent: 10,
            ..ParseOptions::default()
        };
        let mut current = crate::parse_with("Subject To\n c1: x <= 5\nEnd\n", &options);
        let mut strategies = Vec::new();
        for _ in 0..5 {
            let edit = TextEdit::insert(17.into(), "+ z ");
            let (next, stats) = current.reparse_with_stats(&edit).unwrap();
            assert_eq!(next, crate::parse_with(next.text(), &options));
            strategies.push(stats.strategy);
            current = next;
        }
        assert!(strategies.contains(&ReparseStrategy::Full));
    }

    #[test]
    fn incremental_can_be_disabled() {
        let options = ParseOptions {
            incremental: false,
            ..ParseOptions::default()
        };
        let old = crate::parse_with("x + y", &options);
        let (new, stats) = old.reparse_with_stats(&TextEdit::replace(range(0, 1), "z")).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Full);
        assert_eq!(new.text(), "z + y");
    }

    #[test]
    fn error_cap_forces_full_reparse() {
        let options = ParseOptions {
            max_errors: Some(1),
            ..ParseOptions::default()
        };
        let old = crate::parse_with("x ~ y ~ z\nw", &options);
        assert_eq!(old.errors().len(), 1);
        let (new, stats) = old.reparse_with_stats(&TextEdit::replace(range(10, 11), "v")).unwrap();
        assert_eq!(stats.strategy, ReparseStrategy::Full);
        assert_eq!(new, crate::parse_with("x ~ y ~ z\nv", &options));
    }
}
