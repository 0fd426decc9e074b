use crate::tree::{NodeId, SyntaxTree};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WalkEvent<T> {
    Enter(T),
    Leave(T),
}

impl<T> WalkEvent<T> {
    pub fn map<F: FnOnce(T) -> U, U>(self, f: F) -> WalkEvent<U> {
        match self {
            WalkEvent::Enter(it) => WalkEvent::Enter(f(it)),
            WalkEvent::Leave(it) => WalkEvent::Leave(f(it)),
        }
    }
}

/// Preorder walk over a subtree, yielding an `Enter` and a `Leave` for every
/// node and token.
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    start: NodeId,
    next: Option<WalkEvent<NodeId>>,
}

impl<'a> Preorder<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, start: NodeId) -> Self {
        Self {
            tree,
            start,
            next: Some(WalkEvent::Enter(start)),
        }
    }

    /// Don't descend into the node most recently entered.
    pub fn skip_subtree(&mut self) {
        self.next = self.next.take().map(|next| match next {
            WalkEvent::Enter(first_child) => match self.tree.parent_of(first_child) {
                Some(parent) => WalkEvent::Leave(parent),
                None => WalkEvent::Leave(first_child),
            },
            WalkEvent::Leave(parent) => WalkEvent::Leave(parent),
        });
    }

    fn do_next(&self, current: WalkEvent<NodeId>) -> Option<WalkEvent<NodeId>> {
        match current {
            WalkEvent::Enter(node) => Some(match self.tree.child_at(node, 0) {
                Some(child) => WalkEvent::Enter(child),
                None => WalkEvent::Leave(node),
            }),
            WalkEvent::Leave(node) => {
                if node == self.start {
                    return None;
                }
                if let Some(sibling) = self.tree.next_sibling(node) {
                    return Some(WalkEvent::Enter(sibling));
                }
                self.tree.parent_of(node).map(WalkEvent::Leave)
            }
        }
    }
}

impl Iterator for Preorder<'_> {
    type Item = WalkEvent<NodeId>;

    fn next(&mut self) -> Option<WalkEvent<NodeId>> {
        let current = self.next.take()?;
        self.next = self.do_next(current);
        Some(current)
    }
}
