use markup5ever::{local_name, namespace_url, ns};
use markup5ever::QualName;
use tendril::StrTendril;
use tracing::{debug, trace};

use crate::dom_tree::{Node, NodeData, NodeRef};
use crate::Document;
use crate::Selection;

impl<'a> Node<'a> {
    /// Documents, fragments and non-void elements may hold children.
    pub fn accepts_children(&self) -> bool {
        self.query(|data| match data {
            NodeData::Document => true,
            NodeData::Element(element) => !element.is_void(),
            _ => false,
        })
    }

    // A child must come from the same tree and must not contain this node.
    fn can_adopt(&self, child: &Node<'a>) -> bool {
        if !self.same_tree(child) {
            debug!(node = ?child.id, "ignoring a node from another document");
            return false;
        }

        if !self.accepts_children() {
            trace!(node = ?self.id, "ignoring children for a node that cannot hold them");
            return false;
        }

        if self.tree.with(|arena| arena.is_ancestor_or_self(child.id, self.id)) {
            debug!(node = ?child.id, parent = ?self.id, "ignoring a move that would create a cycle");
            return false;
        }

        true
    }

    /// Moves `child` to the end of this node's children, detaching it from
    /// its previous parent. Ignored on void elements.
    pub fn append_child(&self, child: &Node<'a>) {
        if self.can_adopt(child) {
            self.tree.with_mut(|arena| arena.append(self.id, child.id));
        }
    }

    /// Moves `child` to the front of this node's children. Ignored on void elements.
    pub fn prepend_child(&self, child: &Node<'a>) {
        if self.can_adopt(child) {
            self.tree.with_mut(|arena| arena.prepend(self.id, child.id));
        }
    }

    /// Puts `new_child` where `old_child` is and detaches `old_child`.
    /// Nothing happens when `old_child` is not a child of this node.
    pub fn replace_child(&self, new_child: &Node<'a>, old_child: &Node<'a>) {
        if new_child == old_child || old_child.parent().as_ref() != Some(self) {
            return;
        }

        if self.can_adopt(new_child) {
            self.tree.with_mut(|arena| {
                arena.insert(self.id, new_child.id, Some(old_child.id));
                arena.detach(old_child.id);
            });
        }
    }

    /// Detaches the node from its parent. The node keeps its own subtree.
    pub fn remove_from_parent(&self) {
        self.tree.with_mut(|arena| arena.detach(self.id));
    }

    pub fn remove_children(&self) {
        self.tree.with_mut(|arena| {
            for child in arena.children(self.id) {
                arena.detach(child);
            }
        });
    }

    /// Copies the node, and its subtree when `deep`. The copy has no parent.
    pub fn clone_node(&self, deep: bool) -> Node<'a> {
        let id = self.tree.with_mut(|arena| arena.clone_subtree(self.id, deep));
        NodeRef::new(id, self.tree)
    }

    /// Replaces the children with a single text node. Text and comment nodes get
    /// their contents replaced instead. Ignored on void elements.
    pub fn set_text<T>(&self, text: T)
    where
        T: Into<StrTendril>,
    {
        let text = text.into();

        if self.is_text() || self.is_comment() {
            self.update(|data| match data {
                NodeData::Text { contents } | NodeData::Comment { contents } => *contents = text,
                _ => {}
            });
            return;
        }

        if !self.accepts_children() {
            trace!(node = ?self.id, "ignoring text for a node that cannot hold children");
            return;
        }

        self.remove_children();
        self.tree.with_mut(|arena| {
            let id = arena.create(NodeData::Text { contents: text });
            arena.append(self.id, id);
        });
    }

    /// Replaces the children with the parsed markup. The markup is parsed in the
    /// context of this element. Ignored on void elements.
    pub fn set_html<T>(&self, html: T)
    where
        T: Into<StrTendril>,
    {
        if !self.accepts_children() {
            trace!(node = ?self.id, "ignoring html for a node that cannot hold children");
            return;
        }

        let fragment = self.parse_fragment(html.into());
        self.remove_children();
        self.append_fragment(fragment);
    }

    /// Parses the markup and appends the result after the existing children.
    pub fn append_html<T>(&self, html: T)
    where
        T: Into<StrTendril>,
    {
        if !self.accepts_children() {
            trace!(node = ?self.id, "ignoring html for a node that cannot hold children");
            return;
        }

        let fragment = self.parse_fragment(html.into());
        self.append_fragment(fragment);
    }

    // Elements parse markup in their own context, anything else as `<body>` content.
    fn parse_fragment(&self, html: StrTendril) -> Document {
        let context = self.query(|data| match data {
            NodeData::Element(element) => element.name.clone(),
            _ => QualName::new(None, ns!(html), local_name!("body")),
        });

        let fragment = Document::parse_fragment(html, context);
        if !fragment.errors.is_empty() {
            debug!(errors = ?fragment.errors, "html fragment parsed with errors");
        }
        fragment
    }

    fn append_fragment(&self, fragment: Document) {
        let fragment = fragment.tree.into_arena();
        self.tree.with_mut(|arena| {
            let root = arena.absorb(fragment);
            if let Some(html) = arena.node(root).first_child {
                for child in arena.children(html) {
                    arena.append(self.id, child);
                }
            }
        });
    }
}

impl<'a> Selection<'a> {
    /// Set the html contents of each element in the selection to specified parsed HTML.
    pub fn set_html<T>(&self, html: T)
    where
        T: Into<StrTendril>,
    {
        let html = html.into();
        for node in self.nodes() {
            node.set_html(html.clone());
        }
    }

    /// Replaces the children of each element in the selection with the given text.
    pub fn set_text<T>(&self, text: T)
    where
        T: Into<StrTendril>,
    {
        let text = text.into();
        for node in self.nodes() {
            node.set_text(text.clone());
        }
    }
}
