use std::collections::HashSet;
use std::iter::successors;

use crate::dom_tree::{Node, NodeData};
use crate::Selection;

impl<'a> Node<'a> {
    pub fn is_document(&self) -> bool {
        self.query(|data| matches!(data, NodeData::Document))
    }

    pub fn is_element(&self) -> bool {
        self.query(|data| matches!(data, NodeData::Element(_)))
    }

    pub fn is_text(&self) -> bool {
        self.query(|data| matches!(data, NodeData::Text { .. }))
    }

    pub fn is_comment(&self) -> bool {
        self.query(|data| matches!(data, NodeData::Comment { .. }))
    }

    /// Whether this is an element that can never hold children, such as `<br>`.
    pub fn is_void(&self) -> bool {
        self.query(|data| match data {
            NodeData::Element(element) => element.is_void(),
            _ => false,
        })
    }

    /// Element children only, skipping text and comments.
    pub fn children(&self) -> Vec<Node<'a>> {
        self.child_nodes()
            .into_iter()
            .filter(|child| child.is_element())
            .collect()
    }

    pub fn first_element_child(&self) -> Option<Node<'a>> {
        successors(self.first_child(), |node| node.next_sibling()).find(|node| node.is_element())
    }

    pub fn prev_element_sibling(&self) -> Option<Node<'a>> {
        successors(self.prev_sibling(), |node| node.prev_sibling()).find(|node| node.is_element())
    }

    pub fn next_element_sibling(&self) -> Option<Node<'a>> {
        successors(self.next_sibling(), |node| node.next_sibling()).find(|node| node.is_element())
    }
}

impl<'a> Selection<'a> {
    /// parent gets the parent of each element in the selection. It returns a
    /// new selection containing these elements.
    pub fn parent(&self) -> Self {
        let mut result = Vec::with_capacity(self.length());
        let mut set = HashSet::with_capacity(self.length());

        for node in self.nodes() {
            if let Some(parent) = node.parent() {
                if set.insert(parent.id) {
                    result.push(parent);
                }
            }
        }

        Self { nodes: result }
    }

    /// children gets the child elements of each element in the selection.
    /// It returns a new selection containing these elements.
    pub fn children(&self) -> Self {
        let mut result = Vec::with_capacity(self.length());
        let mut set = HashSet::with_capacity(self.length());

        for node in self.nodes() {
            for child in node.children() {
                if set.insert(child.id) {
                    result.push(child);
                }
            }
        }

        Self { nodes: result }
    }

    /// next gets the next element sibling of each element in the
    /// selection. It returns a new selection containing these elements.
    pub fn next(&self) -> Self {
        let mut result = Vec::with_capacity(self.length());
        let mut set = HashSet::with_capacity(self.length());

        for node in self.nodes() {
            if let Some(sibling) = node.next_element_sibling() {
                if set.insert(sibling.id) {
                    result.push(sibling);
                }
            }
        }

        Self { nodes: result }
    }
}
