use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::ptr;

use markup5ever::{local_name, namespace_url, ns};
use markup5ever::{Attribute, LocalName, QualName};
use tendril::StrTendril;

/// Alias for `NodeRef<'a, NodeData>`, the handle every public operation works on.
pub type Node<'a> = NodeRef<'a, NodeData>;

/// Index of a node inside its document's arena.
#[derive(Copy, Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    value: usize,
}

impl NodeId {
    pub(crate) fn new(value: usize) -> Self {
        NodeId { value }
    }
}

/// The different kinds of nodes in the DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The `Tree` itself - the root node of a HTML tree.
    Document,

    /// A `DOCTYPE` with name, public id, and system id. See
    /// [tree_builder]: https://html.spec.whatwg.org/multipage/syntax.html#the-doctype
    Doctype {
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    },

    /// A text node.
    Text { contents: StrTendril },

    /// A comment.
    Comment { contents: StrTendril },

    /// An element with attributes.
    Element(Element),

    /// A Processing instruction.
    ProcessingInstruction {
        target: StrTendril,
        contents: StrTendril,
    },
}

/// An element with attributes.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: QualName,
    pub attrs: Vec<Attribute>,

    /// Whether the node is a [HTML integration point].
    pub mathml_annotation_xml_integration_point: bool,
}

impl Element {
    pub(crate) fn new(
        name: QualName,
        attrs: Vec<Attribute>,
        mathml_annotation_xml_integration_point: bool,
    ) -> Element {
        Element {
            name,
            attrs,
            mathml_annotation_xml_integration_point,
        }
    }

    /// Value of the named attribute. Attribute lists are short, so this is a linear scan.
    pub fn attr(&self, name: &str) -> Option<&StrTendril> {
        self.attrs
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| &attr.value)
    }

    /// Overwrites the named attribute in place, or appends it when missing.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let value = StrTendril::from_slice(value);
        match self.attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|attr| &*attr.name.local != name);
    }

    /// Whether the `class` attribute contains the given token.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }
}

/// HTML elements that never have children and serialize as `<tag/>`.
pub fn is_void_element(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("area")
                | local_name!("base")
                | local_name!("br")
                | local_name!("col")
                | local_name!("embed")
                | local_name!("hr")
                | local_name!("img")
                | local_name!("input")
                | local_name!("keygen")
                | local_name!("link")
                | local_name!("meta")
                | local_name!("param")
                | local_name!("source")
                | local_name!("track")
                | local_name!("wbr")
        )
}

#[derive(Debug, Clone)]
pub(crate) struct InnerNode<T> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) data: T,
}

impl<T> InnerNode<T> {
    fn new(data: T) -> Self {
        InnerNode {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            data,
        }
    }
}

/// Node storage with explicit parent and sibling links.
///
/// Every structural change goes through `detach` followed by `insert`, so a
/// node is linked under at most one parent at any time.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    nodes: Vec<InnerNode<T>>,
}

impl<T> Arena<T> {
    pub(crate) fn new(root: T) -> Self {
        Arena {
            nodes: vec![InnerNode::new(root)],
        }
    }

    pub(crate) fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn create(&mut self, data: T) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(InnerNode::new(data));
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &InnerNode<T> {
        &self.nodes[id.value]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.value].data
    }

    pub(crate) fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut next = self.node(id).first_child;
        while let Some(child) = next {
            children.push(child);
            next = self.node(child).next_sibling;
        }
        children
    }

    /// Whether `candidate` is `id` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.node(node).parent;
        }
        false
    }

    /// Unlinks a node from its parent and siblings. Its own children stay attached to it.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &mut self.nodes[id.value];
            (
                node.parent.take(),
                node.prev_sibling.take(),
                node.next_sibling.take(),
            )
        };

        match (next, parent) {
            (Some(next), _) => self.nodes[next.value].prev_sibling = prev,
            (None, Some(parent)) => self.nodes[parent.value].last_child = prev,
            (None, None) => {}
        }

        match (prev, parent) {
            (Some(prev), _) => self.nodes[prev.value].next_sibling = next,
            (None, Some(parent)) => self.nodes[parent.value].first_child = next,
            (None, None) => {}
        }
    }

    /// Moves `child` under `parent`, before `before` or at the end when `before` is `None`.
    /// `before` must be a child of `parent`.
    pub(crate) fn insert(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        if before == Some(child) {
            return;
        }

        self.detach(child);

        let prev = match before {
            Some(before) => self.node(before).prev_sibling,
            None => self.node(parent).last_child,
        };

        {
            let node = &mut self.nodes[child.value];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = before;
        }

        match prev {
            Some(prev) => self.nodes[prev.value].next_sibling = Some(child),
            None => self.nodes[parent.value].first_child = Some(child),
        }

        match before {
            Some(before) => self.nodes[before.value].prev_sibling = Some(child),
            None => self.nodes[parent.value].last_child = Some(child),
        }
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        self.insert(parent, child, None);
    }

    pub(crate) fn prepend(&mut self, parent: NodeId, child: NodeId) {
        let first = self.node(parent).first_child;
        self.insert(parent, child, first);
    }

    pub(crate) fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        if let Some(parent) = self.node(sibling).parent {
            self.insert(parent, child, Some(sibling));
        }
    }

    pub(crate) fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from) {
            self.append(to, child);
        }
    }
}

impl Arena<NodeData> {
    /// Copies a node, and its descendants when `deep`, into fresh parentless nodes.
    pub(crate) fn clone_subtree(&mut self, id: NodeId, deep: bool) -> NodeId {
        let data = self.node(id).data.clone();
        let copy = self.create(data);
        if deep {
            for child in self.children(id) {
                let child_copy = self.clone_subtree(child, true);
                self.append(copy, child_copy);
            }
        }
        copy
    }

    /// Moves every node of `other` into this arena and returns the new id of its root.
    pub(crate) fn absorb(&mut self, other: Arena<NodeData>) -> NodeId {
        let offset = self.nodes.len();
        let shift = move |id: Option<NodeId>| id.map(|id| NodeId::new(id.value + offset));

        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.parent = shift(node.parent);
            node.prev_sibling = shift(node.prev_sibling);
            node.next_sibling = shift(node.next_sibling);
            node.first_child = shift(node.first_child);
            node.last_child = shift(node.last_child);
            node
        }));

        NodeId::new(offset)
    }
}

/// A DOM tree whose nodes can be read and rewritten through shared `NodeRef` handles.
pub struct Tree<T> {
    arena: RefCell<Arena<T>>,
}

impl<T: Debug> Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("len", &self.len()).finish()
    }
}

#[allow(clippy::len_without_is_empty)]
impl<T> Tree<T> {
    pub fn new(root: T) -> Self {
        Tree::from_arena(Arena::new(root))
    }

    pub(crate) fn from_arena(arena: Arena<T>) -> Self {
        Tree {
            arena: RefCell::new(arena),
        }
    }

    pub(crate) fn into_arena(self) -> Arena<T> {
        self.arena.into_inner()
    }

    pub fn root_id(&self) -> NodeId {
        self.arena.borrow().root_id()
    }

    pub fn root(&self) -> NodeRef<'_, T> {
        NodeRef::new(self.root_id(), self)
    }

    /// Number of nodes ever allocated, detached ones included.
    pub fn len(&self) -> usize {
        self.arena.borrow().len()
    }

    /// Allocates a parentless node.
    pub fn create_node(&self, data: T) -> NodeId {
        self.arena.borrow_mut().create(data)
    }

    pub(crate) fn with<F, B>(&self, f: F) -> B
    where
        F: FnOnce(&Arena<T>) -> B,
    {
        f(&self.arena.borrow())
    }

    pub(crate) fn with_mut<F, B>(&self, f: F) -> B
    where
        F: FnOnce(&mut Arena<T>) -> B,
    {
        f(&mut self.arena.borrow_mut())
    }
}

/// A handle to one node of a `Tree`. Equality is identity: same tree, same node.
///
/// Handles are only minted by the tree they point into:
///
/// ```compile_fail
/// let doc = html_dom::Document::default();
/// let other = html_dom::Document::default();
/// let _ = html_dom::NodeRef::new(doc.root().id, &other.root().tree);
/// ```
pub struct NodeRef<'a, T> {
    pub(crate) id: NodeId,
    pub(crate) tree: &'a Tree<T>,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> PartialEq for NodeRef<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && ptr::eq(self.tree, other.tree)
    }
}

impl<'a, T> Eq for NodeRef<'a, T> {}

impl<'a, T> Debug for NodeRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).finish()
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(id: NodeId, tree: &'a Tree<T>) -> Self {
        Self { id, tree }
    }

    pub fn query<F, B>(&self, f: F) -> B
    where
        F: FnOnce(&T) -> B,
    {
        self.tree.with(|arena| f(&arena.node(self.id).data))
    }

    pub fn update<F, B>(&self, f: F) -> B
    where
        F: FnOnce(&mut T) -> B,
    {
        self.tree.with_mut(|arena| f(arena.data_mut(self.id)))
    }

    /// Whether both handles point into the same tree.
    pub fn same_tree(&self, other: &NodeRef<'_, T>) -> bool {
        ptr::eq(self.tree, other.tree)
    }

    fn link<F>(&self, f: F) -> Option<Self>
    where
        F: FnOnce(&InnerNode<T>) -> Option<NodeId>,
    {
        self.tree
            .with(|arena| f(arena.node(self.id)))
            .map(|id| NodeRef::new(id, self.tree))
    }

    pub fn parent(&self) -> Option<Self> {
        self.link(|node| node.parent)
    }

    pub fn first_child(&self) -> Option<Self> {
        self.link(|node| node.first_child)
    }

    pub fn last_child(&self) -> Option<Self> {
        self.link(|node| node.last_child)
    }

    pub fn prev_sibling(&self) -> Option<Self> {
        self.link(|node| node.prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.link(|node| node.next_sibling)
    }

    /// Every child node, text and comments included.
    pub fn child_nodes(&self) -> Vec<Self> {
        self.tree
            .with(|arena| arena.children(self.id))
            .into_iter()
            .map(|id| NodeRef::new(id, self.tree))
            .collect()
    }

    /// Pre-order walk over the subtree, excluding this node.
    pub fn descendants(&self) -> Descendants<'a, T> {
        Descendants {
            root: self.id,
            tree: self.tree,
            next: self.tree.with(|arena| arena.node(self.id).first_child),
        }
    }
}

pub struct Descendants<'a, T> {
    root: NodeId,
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<'a, T> Iterator for Descendants<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let root = self.root;

        self.next = self.tree.with(|arena| {
            if let Some(child) = arena.node(current).first_child {
                return Some(child);
            }

            let mut id = current;
            while id != root {
                let node = arena.node(id);
                if let Some(sibling) = node.next_sibling {
                    return Some(sibling);
                }
                id = node.parent?;
            }
            None
        });

        Some(NodeRef::new(current, self.tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(arena: &Arena<&'static str>, parent: NodeId) -> Vec<&'static str> {
        arena
            .children(parent)
            .into_iter()
            .map(|id| arena.node(id).data)
            .collect()
    }

    #[test]
    fn test_append_moves_node() {
        let mut arena = Arena::new("root");
        let root = arena.root_id();
        let a = arena.create("a");
        let b = arena.create("b");
        let c = arena.create("c");
        arena.append(root, a);
        arena.append(root, b);
        arena.append(a, c);

        arena.append(b, c);

        assert_eq!(ids(&arena, a), Vec::<&str>::new());
        assert_eq!(ids(&arena, b), vec!["c"]);
        assert_eq!(arena.node(c).parent, Some(b));
        assert_eq!(arena.node(a).first_child, None);
        assert_eq!(arena.node(a).last_child, None);
    }

    #[test]
    fn test_prepend_and_insert_before() {
        let mut arena = Arena::new("root");
        let root = arena.root_id();
        let a = arena.create("a");
        let b = arena.create("b");
        let c = arena.create("c");
        arena.append(root, b);
        arena.prepend(root, a);
        arena.insert_before(b, c);

        assert_eq!(ids(&arena, root), vec!["a", "c", "b"]);
        assert_eq!(arena.node(b).prev_sibling, Some(c));
        assert_eq!(arena.node(a).next_sibling, Some(c));

        arena.prepend(root, a);
        assert_eq!(ids(&arena, root), vec!["a", "c", "b"]);

        arena.prepend(root, b);
        assert_eq!(ids(&arena, root), vec!["b", "a", "c"]);
        assert_eq!(arena.node(root).last_child, Some(c));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut arena = Arena::new("root");
        let root = arena.root_id();
        let a = arena.create("a");
        let b = arena.create("b");
        let c = arena.create("c");
        arena.append(root, a);
        arena.append(root, b);
        arena.append(root, c);

        arena.detach(b);

        assert_eq!(ids(&arena, root), vec!["a", "c"]);
        assert_eq!(arena.node(b).parent, None);
        assert_eq!(arena.node(c).prev_sibling, Some(a));
    }

    #[test]
    fn test_is_ancestor_or_self() {
        let mut arena = Arena::new("root");
        let root = arena.root_id();
        let a = arena.create("a");
        let b = arena.create("b");
        arena.append(root, a);
        arena.append(a, b);

        assert!(arena.is_ancestor_or_self(root, b));
        assert!(arena.is_ancestor_or_self(b, b));
        assert!(!arena.is_ancestor_or_self(b, a));
    }

    #[test]
    fn test_descendants_stay_inside_subtree() {
        let tree = Tree::new("root");
        let (a, b, c) = tree.with_mut(|arena| {
            let root = arena.root_id();
            let a = arena.create("a");
            let b = arena.create("b");
            let c = arena.create("c");
            arena.append(root, a);
            arena.append(a, b);
            arena.append(root, c);
            (a, b, c)
        });

        let under_a: Vec<NodeId> = NodeRef::new(a, &tree).descendants().map(|n| n.id).collect();
        assert_eq!(under_a, vec![b]);

        let all: Vec<NodeId> = tree.root().descendants().map(|n| n.id).collect();
        assert_eq!(all, vec![a, b, c]);
    }

    #[test]
    fn test_tree_always_holds_its_root() {
        let tree = Tree::new("root");
        assert_eq!(tree.len(), 1);

        let other = Tree::new("other");
        let a = NodeRef::new(tree.root_id(), &tree);
        let b = NodeRef::new(other.root_id(), &other);
        assert!(!a.same_tree(&b));
        assert!(a != b);
    }
}
