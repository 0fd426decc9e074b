//! # Syntax Tree
//!
//! An immutable, index-based concrete syntax tree. Every node (tokens
//! included) is an entry in a flat arena addressed by [`NodeId`]; a node's
//! children are stored contiguously in a second arena, so child access,
//! child count and parent lookup are all O(1).
//!
//! Tokens are leaves. Concatenating the text of the leaves in order gives
//! back the source exactly:
//!
//! ```
//! let parse = lp_syntax::parse("Maximize\n obj: 3x + 2y\nst\n c1: x <= 4\nend\n");
//! let tree = parse.tree();
//! let text: String = tree.leaves(tree.root()).map(|id| tree.text_of(id)).collect();
//! assert_eq!(text, tree.text());
//! ```
//!
//! Trees are never mutated after construction. Incremental re-parse builds a
//! new tree whose arenas share untouched chunks with the old one.

mod arena;
pub(crate) mod builder;
mod walk;

use std::fmt::{self, Write};
use std::sync::Arc;

use line_index::LineIndex;
use text_size::TextRange;

use crate::SyntaxKind;
use arena::Arena;

pub use walk::{Preorder, WalkEvent};

/// Index of a node in its [`SyntaxTree`].
///
/// Ids are only meaningful for the tree that produced them and for trees
/// derived from it by re-parsing, which keep ids of reused nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodeId>,
    pub(crate) index_in_parent: u32,
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
}

/// A parsed Lp document: the source text plus its node arena.
#[derive(Clone)]
pub struct SyntaxTree {
    text: Arc<str>,
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) children: Arena<NodeId>,
    root: NodeId,
    /// Arena entries no longer reachable from the root.
    dead: usize,
}

impl SyntaxTree {
    pub(crate) fn from_parts(
        text: Arc<str>,
        nodes: Arena<NodeData>,
        children: Arena<NodeId>,
        root: NodeId,
        dead: usize,
    ) -> Self {
        Self {
            text,
            nodes,
            children,
            root,
            dead,
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        self.nodes.get(id.0)
    }

    pub(crate) fn set_data(&mut self, id: NodeId, data: NodeData) {
        self.nodes.set(id.0, data);
    }

    pub(crate) fn data_of(&self, id: NodeId) -> NodeData {
        *self.data(id)
    }

    /// The `DOCUMENT` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind
    }

    pub fn span_of(&self, id: NodeId) -> TextRange {
        self.data(id).range
    }

    pub fn text_of(&self, id: NodeId) -> &str {
        &self.text[self.span_of(id)]
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.data(id).children_len as usize
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let data = self.data(id);
        if index >= data.children_len as usize {
            return None;
        }
        Some(*self.children.get(data.children_start + index as u32))
    }

    pub(crate) fn replace_child(&mut self, parent: NodeId, index: u32, child: NodeId) {
        let start = self.data(parent).children_start;
        self.children.set(start + index, child);
    }

    pub fn children(
        &self,
        id: NodeId,
    ) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        let data = *self.data(id);
        (data.children_start..data.children_start + data.children_len)
            .map(move |index| *self.children.get(index))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let parent = data.parent?;
        self.child_at(parent, data.index_in_parent as usize + 1)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let parent = data.parent?;
        let index = (data.index_in_parent as usize).checked_sub(1)?;
        self.child_at(parent, index)
    }

    /// Handle with navigation methods for `id`.
    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    pub fn root_node(&self) -> SyntaxNode<'_> {
        self.node(self.root)
    }

    pub fn preorder(&self, start: NodeId) -> Preorder<'_> {
        Preorder::new(self, start)
    }

    /// `start` and everything below it, in preorder.
    pub fn descendants(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder(start).filter_map(|event| match event {
            WalkEvent::Enter(id) => Some(id),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Tokens below `start`, in source order.
    pub fn leaves(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(start)
            .filter(move |id| self.kind(*id).is_token())
    }

    pub(crate) fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if self.kind(current).is_token() {
                return Some(current);
            }
            current = self.child_at(current, 0)?;
        }
    }

    pub(crate) fn last_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if self.kind(current).is_token() {
                return Some(current);
            }
            let count = self.child_count(current);
            current = self.child_at(current, count.checked_sub(1)?)?;
        }
    }

    /// The leaf right after `id`'s subtree, skipping empty nodes.
    pub(crate) fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let mut sibling = self.next_sibling(current);
            while let Some(candidate) = sibling {
                if let Some(leaf) = self.first_leaf(candidate) {
                    return Some(leaf);
                }
                sibling = self.next_sibling(candidate);
            }
            current = self.parent_of(current)?;
        }
    }

    /// The leaf right before `id`'s subtree, skipping empty nodes.
    pub(crate) fn prev_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let mut sibling = self.prev_sibling(current);
            while let Some(candidate) = sibling {
                if let Some(leaf) = self.last_leaf(candidate) {
                    return Some(leaf);
                }
                sibling = self.prev_sibling(candidate);
            }
            current = self.parent_of(current)?;
        }
    }

    pub(crate) fn subtree_size(&self, id: NodeId) -> usize {
        self.descendants(id).count()
    }

    /// The deepest node whose span contains `range`.
    ///
    /// Where two children both contain an empty range (it sits on their
    /// shared boundary) the left one wins.
    pub fn covering_node(&self, range: TextRange) -> NodeId {
        let mut current = self.root;
        'descend: loop {
            for child in self.children(current) {
                if self.span_of(child).contains_range(range) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.dead
    }

    /// Number of arena entries, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn dead(&self) -> usize {
        self.dead
    }

    /// Whether `id`'s entry in `self` is stored in memory shared with
    /// `other` (true for nodes an incremental re-parse left untouched).
    pub fn shares_node_storage(&self, other: &SyntaxTree, id: NodeId) -> bool {
        self.nodes.shares_entry(&other.nodes, id.0)
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }

    /// Indented dump of the whole tree, one node per line.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.preorder(self.root) {
            match event {
                WalkEvent::Enter(id) => {
                    let kind = self.kind(id);
                    let range = self.span_of(id);
                    let indent = "  ".repeat(depth);
                    // Writing to a `String` cannot fail.
                    if kind.is_token() {
                        writeln!(out, "{indent}{kind:?}@{range:?} {:?}", self.text_of(id)).ok();
                    } else {
                        writeln!(out, "{indent}{kind:?}@{range:?}").ok();
                    }
                    depth += 1;
                }
                WalkEvent::Leave(_) => depth -= 1,
            }
        }
        out
    }
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        if self.text != other.text {
            return false;
        }
        let shape = |tree: &SyntaxTree, id: NodeId| {
            (tree.kind(id), tree.span_of(id), tree.child_count(id))
        };
        let mut left = self.descendants(self.root);
        let mut right = other.descendants(other.root);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if shape(self, a) == shape(other, b) => {}
                _ => return false,
            }
        }
    }
}

impl Eq for SyntaxTree {}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_dump())
    }
}

/// A borrowed view of one node with tree navigation.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl<'a> SyntaxNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.tree.kind(self.id)
    }

    pub fn text_range(&self) -> TextRange {
        self.tree.span_of(self.id)
    }

    pub fn text(&self) -> &'a str {
        self.tree.text_of(self.id)
    }

    pub fn is_token(&self) -> bool {
        self.kind().is_token()
    }

    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        self.tree.parent_of(self.id).map(|id| self.tree.node(id))
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id).map(move |id| tree.node(id))
    }

    pub fn first_child(&self) -> Option<SyntaxNode<'a>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<SyntaxNode<'a>> {
        self.children().next_back()
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'a>> {
        self.tree.next_sibling(self.id).map(|id| self.tree.node(id))
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode<'a>> {
        self.tree.prev_sibling(self.id).map(|id| self.tree.node(id))
    }

    /// This node and its ancestors up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        std::iter::successors(Some(self), |node| node.parent())
    }

    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        let tree = self.tree;
        tree.descendants(self.id).map(move |id| tree.node(id))
    }

    /// Tokens under this node, trivia included.
    pub fn tokens(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        let tree = self.tree;
        tree.leaves(self.id).map(move |id| tree.node(id))
    }

    /// First direct child of the given kind.
    pub fn child_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxNode<'a>> {
        self.children().find(|child| child.kind() == kind)
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind(), self.text_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use text_size::TextSize;
    use pretty_assertions::assert_eq;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn trees_are_send_and_sync() {
        assert_send_sync::<SyntaxTree>();
        assert_send_sync::<crate::Parse>();
    }

    #[test]
    fn children_and_parents_agree() {
        let parse = parse("obj: x + y\nst\nx >= 1\nend\n");
        let tree = parse.tree();
        for id in tree.descendants(tree.root()) {
            for (index, child) in tree.children(id).enumerate() {
                assert_eq!(tree.parent_of(child), Some(id));
                assert_eq!(tree.child_at(id, index), Some(child));
                assert!(tree.span_of(id).contains_range(tree.span_of(child)));
            }
        }
        assert_eq!(tree.parent_of(tree.root()), None);
    }

    #[test]
    fn leaves_tile_the_text() {
        let text = "\\ header\nobj: 2x\nst\n  c: x <= 3 \\* cap *\\\nend";
        let parse = parse(text);
        let tree = parse.tree();
        let mut offset = TextSize::new(0);
        for leaf in tree.leaves(tree.root()) {
            assert_eq!(tree.span_of(leaf).start(), offset);
            offset = tree.span_of(leaf).end();
        }
        assert_eq!(offset, TextSize::of(text));
    }

    #[test]
    fn covering_node_finds_deepest() {
        let parse = parse("obj: 3x + y\n");
        let tree = parse.tree();
        let id = tree.covering_node(TextRange::new(6.into(), 7.into()));
        assert_eq!(tree.kind(id), SyntaxKind::IDENT);
        assert_eq!(tree.text_of(id), "x");

        let id = tree.covering_node(TextRange::new(5.into(), 11.into()));
        assert_eq!(tree.kind(id), SyntaxKind::EXPRESSION);
    }

    #[test]
    fn node_handles_navigate() {
        let parse = parse("obj: x + y\n");
        let tree = parse.tree();
        let objective = tree.root_node().first_child().unwrap();
        assert_eq!(objective.kind(), SyntaxKind::OBJECTIVE);
        assert_eq!(objective.next_sibling().map(|n| n.kind()), Some(SyntaxKind::NEWLINE));

        let label = objective.first_child().unwrap();
        assert_eq!(label.kind(), SyntaxKind::LABEL);
        assert_eq!(label.text(), "obj:");
        assert_eq!(label.prev_sibling(), None);

        let ident = tree.node(tree.covering_node(TextRange::new(9.into(), 10.into())));
        let kinds: Vec<_> = ident.ancestors().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::TERM,
                SyntaxKind::EXPRESSION,
                SyntaxKind::OBJECTIVE,
                SyntaxKind::DOCUMENT,
            ]
        );
        assert_eq!(format!("{ident:?}"), "IDENT@9..10");
    }

    #[test]
    fn structural_equality_ignores_storage() {
        let a = parse("x + y\n");
        let b = parse("x + y\n");
        let c = parse("x - y\n");
        assert_eq!(a.tree(), b.tree());
        assert_ne!(a.tree(), c.tree());
    }

    #[test]
    fn empty_document() {
        let parse = parse("");
        let tree = parse.tree();
        assert_eq!(tree.kind(tree.root()), SyntaxKind::DOCUMENT);
        assert_eq!(tree.child_count(tree.root()), 0);
        assert_eq!(tree.span_of(tree.root()), TextRange::empty(0.into()));
        assert_eq!(tree.debug_dump(), "DOCUMENT@0..0\n");
    }

    #[test]
    fn leaf_neighbours() {
        let parse = parse("x + y\n");
        let tree = parse.tree();
        let leaves: Vec<_> = tree.leaves(tree.root()).collect();
        assert_eq!(tree.prev_leaf(leaves[0]), None);
        assert_eq!(tree.next_leaf(leaves[0]), Some(leaves[1]));
        assert_eq!(tree.prev_leaf(leaves[2]), Some(leaves[1]));
        assert_eq!(tree.next_leaf(*leaves.last().unwrap()), None);
    }
}
