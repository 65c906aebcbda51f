use std::fmt;
use std::vec::IntoIter;

use crate::dom_tree::Node;

/// A snapshot of nodes in document order. Later tree changes never rewrite it.
#[derive(Clone, Default)]
pub struct Selection<'a> {
    pub(crate) nodes: Vec<Node<'a>>,
}

impl<'a> fmt::Debug for Selection<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl<'a> From<Vec<Node<'a>>> for Selection<'a> {
    fn from(nodes: Vec<Node<'a>>) -> Self {
        Selection { nodes }
    }
}

impl<'a> Selection<'a> {
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = Node<'a>> + '_ {
        self.nodes.iter().copied()
    }

    pub fn first(&self) -> Option<Node<'a>> {
        self.nodes.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        self.nodes.get(index).copied()
    }

    /// Whether `node` itself, not an equal-looking node, is part of the selection.
    pub fn contains(&self, node: &Node<'a>) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    /// Detaches every node of the selection from its parent.
    pub fn remove(&self) {
        for node in &self.nodes {
            node.remove_from_parent()
        }
    }

    /// Detaches the nodes for which `predicate` returns true.
    pub fn remove_matching<F>(&self, mut predicate: F)
    where
        F: FnMut(&Node<'a>) -> bool,
    {
        for node in &self.nodes {
            if predicate(node) {
                node.remove_from_parent()
            }
        }
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = Node<'a>;
    type IntoIter = IntoIter<Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
