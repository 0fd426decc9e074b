//! Builds arena-backed trees from `start_node` / `token` / `finish_node`
//! calls.
//!
//! Nodes are allocated in preorder when they are started; their child list
//! is collected in a pooled buffer and copied into the shared children arena
//! when the node finishes, so every node's children are contiguous.

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;
use crate::tree::arena::Arena;
use crate::tree::{NodeData, NodeId, SyntaxTree};

const DEFAULT_TREE_DEPTH: usize = 16;
const DEFAULT_CHILDREN_LEN: usize = 8;

pub(crate) struct TreeBuilder {
    nodes: Arena<NodeData>,
    children: Arena<NodeId>,
    opened: Vec<(NodeId, Vec<NodeId>)>,
    children_pool: Vec<Vec<NodeId>>,
    roots: Vec<NodeId>,
    /// Parent and child slot given to top-level nodes (fragments only).
    attach: Option<(NodeId, u32)>,
    last_end: TextSize,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Arena::new(),
            children: Arena::new(),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            roots: Vec::new(),
            attach: None,
            last_end: TextSize::new(0),
        }
    }

    /// Continue appending to a copy of `tree`'s storage. Top-level nodes
    /// become children of `parent` at `slot`; the caller links them in.
    pub(crate) fn extending(tree: &SyntaxTree, start: TextSize, parent: NodeId, slot: u32) -> Self {
        Self {
            nodes: tree.nodes.clone(),
            children: tree.children.clone(),
            attach: Some((parent, slot)),
            last_end: start,
            ..Self::new()
        }
    }

    fn new_children_vec(&mut self) -> Vec<NodeId> {
        self.children_pool
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Allocates an entry and links it under the innermost open node.
    fn alloc(&mut self, kind: SyntaxKind, range: TextRange) -> NodeId {
        let (parent, index_in_parent) = match self.opened.last() {
            Some((parent, siblings)) => (Some(*parent), siblings.len() as u32),
            None => match self.attach {
                Some((parent, slot)) => (Some(parent), slot),
                None => (None, 0),
            },
        };
        let id = NodeId(self.nodes.push(NodeData {
            kind,
            range,
            parent,
            index_in_parent,
            children_start: 0,
            children_len: 0,
        }));
        match self.opened.last_mut() {
            Some((_, siblings)) => siblings.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        let id = self.alloc(kind, TextRange::empty(self.last_end));
        let children = self.new_children_vec();
        self.opened.push((id, children));
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, range: TextRange) {
        self.alloc(kind, range);
        self.last_end = range.end();
    }

    pub(crate) fn finish_node(&mut self) {
        let Some((id, mut children)) = self.opened.pop() else {
            return;
        };

        let mut data = *self.nodes.get(id.0);
        data.children_start = self.children.len() as u32;
        data.children_len = children.len() as u32;
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            let start = self.nodes.get(first.0).range.start();
            let end = self.nodes.get(last.0).range.end();
            data.range = TextRange::new(start, end);
        }
        for child in &children {
            self.children.push(*child);
        }
        self.nodes.set(id.0, data);

        children.clear();
        self.children_pool.push(children);
    }

    /// Storage plus the top-level nodes built, in order.
    pub(crate) fn finish(mut self) -> (Arena<NodeData>, Arena<NodeId>, Vec<NodeId>) {
        while !self.opened.is_empty() {
            self.finish_node();
        }
        (self.nodes, self.children, self.roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn node_ranges_come_from_children() {
        let mut builder = TreeBuilder::new();
        builder.start_node(SyntaxKind::DOCUMENT);
        builder.start_node(SyntaxKind::TERM);
        builder.token(SyntaxKind::NUMBER, range(0, 1));
        builder.token(SyntaxKind::IDENT, range(1, 3));
        builder.finish_node();
        builder.token(SyntaxKind::NEWLINE, range(3, 4));
        builder.finish_node();

        let (nodes, children, roots) = builder.finish();
        assert_eq!(roots.len(), 1);
        let tree = SyntaxTree::from_parts(Arc::from("2x1\n"), nodes, children, roots[0], 0);

        let term = tree.child_at(tree.root(), 0).map(|id| tree.span_of(id));
        assert_eq!(term, Some(range(0, 3)));
        assert_eq!(tree.span_of(tree.root()), range(0, 4));
        assert_eq!(tree.child_count(tree.root()), 2);
    }

    #[test]
    fn empty_node_sits_at_last_token_end() {
        let mut builder = TreeBuilder::new();
        builder.start_node(SyntaxKind::DOCUMENT);
        builder.token(SyntaxKind::IDENT, range(0, 1));
        builder.start_node(SyntaxKind::ERROR);
        builder.finish_node();
        builder.finish_node();

        let (nodes, _, _) = builder.finish();
        assert_eq!(nodes.get(2).range, range(1, 1));
    }

    #[test]
    fn unfinished_nodes_are_closed() {
        let mut builder = TreeBuilder::new();
        builder.start_node(SyntaxKind::DOCUMENT);
        builder.token(SyntaxKind::IDENT, range(0, 1));
        let (nodes, children, roots) = builder.finish();
        assert_eq!(roots, vec![NodeId(0)]);
        assert_eq!(nodes.get(0).children_len, 1);
        assert_eq!(*children.get(0), NodeId(1));
    }
}
