use html5ever::serialize::TraversalScope;
use markup5ever::Attribute;
use tendril::StrTendril;

use crate::dom_tree::{Node, NodeData};
use crate::Document;
use crate::Selection;

impl Document {
    /// Gets the HTML contents of the document. It includes
    /// the text and comment nodes.
    pub fn html(&self) -> StrTendril {
        self.root().html()
    }

    /// Gets the text content of the document.
    pub fn text(&self) -> StrTendril {
        self.root().text()
    }
}

impl<'a> Node<'a> {
    /// Local name of an element, `None` for every other kind of node.
    pub fn tag_name(&self) -> Option<StrTendril> {
        self.query(|data| match data {
            NodeData::Element(element) => Some(StrTendril::from_slice(&element.name.local)),
            _ => None,
        })
    }

    pub fn attr(&self, name: &str) -> Option<StrTendril> {
        self.query(|data| match data {
            NodeData::Element(element) => element.attr(name).cloned(),
            _ => None,
        })
    }

    /// Works like `attr` but returns default value if attribute is not present.
    pub fn attr_or(&self, name: &str, default: &str) -> StrTendril {
        self.attr(name)
            .unwrap_or_else(|| StrTendril::from_slice(default))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.query(|data| match data {
            NodeData::Element(element) => element.attr(name).is_some(),
            _ => false,
        })
    }

    /// Sets an attribute, keeping its position when it already exists.
    pub fn set_attr(&self, name: &str, value: &str) {
        self.update(|data| {
            if let NodeData::Element(element) = data {
                element.set_attr(name, value);
            }
        })
    }

    pub fn remove_attr(&self, name: &str) {
        self.update(|data| {
            if let NodeData::Element(element) = data {
                element.remove_attr(name);
            }
        })
    }

    /// A copy of the element's attributes in source order.
    pub fn attrs(&self) -> Vec<Attribute> {
        self.query(|data| match data {
            NodeData::Element(element) => element.attrs.clone(),
            _ => Vec::new(),
        })
    }

    /// The trimmed `id` attribute, empty when missing.
    pub fn id_attr(&self) -> String {
        self.attr("id")
            .map(|id| id.trim().to_owned())
            .unwrap_or_default()
    }

    /// The `class` attribute with runs of whitespace collapsed, empty when missing.
    pub fn class_name(&self) -> String {
        self.attr("class")
            .map(|class| class.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    /// Concatenated text of this node and every descendant text node.
    pub fn text(&self) -> StrTendril {
        let mut text = StrTendril::new();
        self.tree.with(|arena| {
            let mut stack = vec![self.id];
            while let Some(id) = stack.pop() {
                match arena.node(id).data {
                    NodeData::Text { ref contents } => text.push_tendril(contents),
                    NodeData::Element(_) | NodeData::Document => {
                        stack.extend(arena.children(id).into_iter().rev())
                    }
                    _ => {}
                }
            }
        });
        text
    }

    /// Markup of the node itself and its subtree.
    pub fn html(&self) -> StrTendril {
        self.render(TraversalScope::IncludeNode)
    }

    /// Markup of the node's children only.
    pub fn inner_html(&self) -> StrTendril {
        self.render(TraversalScope::ChildrenOnly(None))
    }
}

impl<'a> Selection<'a> {
    /// Gets the specified attribute's value for the first element in the
    /// selection. To get the value for each element individually, use a looping
    /// construct such as map method.
    pub fn attr(&self, name: &str) -> Option<StrTendril> {
        self.nodes().first().and_then(|node| node.attr(name))
    }

    /// Works like `attr` but returns default value if attribute is not present.
    pub fn attr_or(&self, name: &str, default: &str) -> StrTendril {
        self.attr(name)
            .unwrap_or_else(|| StrTendril::from_slice(default))
    }

    /// Sets the given attribute to each element in the set of matched elements.
    pub fn set_attr(&self, name: &str, val: &str) {
        for node in self.nodes() {
            node.set_attr(name, val);
        }
    }

    /// Removes the named attribute from each element in the set of matched elements.
    pub fn remove_attr(&self, name: &str) {
        for node in self.nodes() {
            node.remove_attr(name);
        }
    }

    /// Returns the number of elements in the selection object.
    pub fn length(&self) -> usize {
        self.nodes().len()
    }

    /// Is an alias for `length`.
    pub fn size(&self) -> usize {
        self.length()
    }

    /// Is there any matched elements.
    pub fn exists(&self) -> bool {
        self.length() > 0
    }

    /// Gets the HTML contents of the first element in the set of matched
    /// elements. It includes the text and comment nodes.
    pub fn html(&self) -> StrTendril {
        self.nodes()
            .first()
            .map(|node| node.html())
            .unwrap_or_else(StrTendril::new)
    }

    /// Gets the combined text content of each element in the set of matched
    /// elements, including their descendants.
    pub fn text(&self) -> StrTendril {
        let mut s = StrTendril::new();

        for node in self.nodes() {
            s.push_tendril(&node.text());
        }

        s
    }
}
