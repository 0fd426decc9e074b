//! Sink for converting parser events into an arena tree.

use std::sync::Arc;

use crate::parser::event::Event;
use crate::tree::builder::TreeBuilder;
use crate::tree::{NodeId, SyntaxTree};

/// Replays parser events into a [`TreeBuilder`].
pub(crate) struct Sink {
    events: Vec<Event>,
}

impl Sink {
    pub(crate) fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Consume the sink, feeding every event to `builder`.
    pub(crate) fn finish(mut self, builder: &mut TreeBuilder) {
        // Process forward_parent links to create proper tree structure
        let mut forward_parents = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    forward_parents.push(kind);
                    let mut fp = forward_parent;

                    while let Some(parent_idx) = fp {
                        let parent = &mut self.events[parent_idx];
                        fp = match std::mem::replace(parent, Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                forward_parents.push(kind);
                                forward_parent
                            }
                            _ => None,
                        };
                    }

                    // Outermost first
                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Token { kind, range } => builder.token(kind, range),
                Event::Finish => builder.finish_node(),
                Event::Placeholder => {}
            }
        }
    }
}

/// Build a fresh tree for `text` from a complete document's events.
pub(crate) fn build_tree(text: Arc<str>, events: Vec<Event>) -> SyntaxTree {
    let mut builder = TreeBuilder::new();
    Sink::new(events).finish(&mut builder);
    let (nodes, children, roots) = builder.finish();
    let root = roots.first().copied().unwrap_or(NodeId(0));
    SyntaxTree::from_parts(text, nodes, children, root, 0)
}
