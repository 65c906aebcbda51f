use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;

use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, parse_fragment, ParseOpts};
use markup5ever::interface::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use markup5ever::{namespace_url, ns};
use markup5ever::{Attribute, ExpandedName, LocalName, QualName};
use tendril::{StrTendril, TendrilSink};
use tracing::debug;

use crate::dom_tree::{Arena, Element, Node, NodeData, NodeId, NodeRef, Tree};
use crate::error::Result;

/// Document represents a parsed HTML document to be queried and rewritten.
#[derive(Debug)]
pub struct Document {
    /// The document's dom tree.
    pub(crate) tree: Tree<NodeData>,

    /// Errors that occurred during parsing.
    pub errors: Vec<Cow<'static, str>>,

    /// The document's quirks mode.
    pub quirks_mode: QuirksMode,
}

impl Default for Document {
    fn default() -> Document {
        Self {
            tree: Tree::new(NodeData::Document),
            errors: vec![],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }
}

impl From<&str> for Document {
    fn from(html: &str) -> Document {
        parse_document(DocumentSink::default(), Default::default()).one(html)
    }
}

impl From<StrTendril> for Document {
    fn from(html: StrTendril) -> Document {
        parse_document(DocumentSink::default(), Default::default()).one(html)
    }
}

impl From<&String> for Document {
    fn from(html: &String) -> Document {
        Document::from(html.as_str())
    }
}

impl Document {
    /// Parses a whole document from a reader. Invalid UTF-8 is replaced, I/O errors are returned.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Document> {
        let doc = parse_document(DocumentSink::default(), Default::default())
            .from_utf8()
            .read_from(reader)?;
        Ok(doc)
    }

    /// Parses `html` as the children of an element named `context`.
    /// The parsed nodes hang under the `<html>` element that is the root's first child.
    pub(crate) fn parse_fragment(html: StrTendril, context: QualName) -> Document {
        let opts = ParseOpts {
            tokenizer: Default::default(),
            tree_builder: TreeBuilderOpts {
                exact_errors: false,
                scripting_enabled: true,
                iframe_srcdoc: false,
                drop_doctype: true,
                ignore_missing_rules: false,
                quirks_mode: QuirksMode::NoQuirks,
            },
        };
        parse_fragment(DocumentSink::default(), opts, context, Vec::new()).one(html)
    }

    /// Return the underlying root document node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root()
    }

    /// Creates a parentless element. The tag name is lowercased.
    pub fn create_element(&self, name: &str) -> Node<'_> {
        let name = QualName::new(None, ns!(html), LocalName::from(name.to_ascii_lowercase()));
        let id = self
            .tree
            .create_node(NodeData::Element(Element::new(name, Vec::new(), false)));
        NodeRef::new(id, &self.tree)
    }

    /// Creates a parentless text node.
    pub fn create_text_node(&self, text: &str) -> Node<'_> {
        let id = self.tree.create_node(NodeData::Text {
            contents: StrTendril::from_slice(text),
        });
        NodeRef::new(id, &self.tree)
    }
}

/// The html5ever `TreeSink` that builds a `Document`.
pub struct DocumentSink {
    arena: Arena<NodeData>,
    errors: Vec<Cow<'static, str>>,
    quirks_mode: QuirksMode,
}

impl Default for DocumentSink {
    fn default() -> DocumentSink {
        DocumentSink {
            arena: Arena::new(NodeData::Document),
            errors: vec![],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }
}

fn append_to_existing_text(prev: &mut NodeData, text: &str) -> bool {
    match prev {
        NodeData::Text { contents } => {
            contents.push_slice(text);
            true
        }
        _ => false,
    }
}

impl DocumentSink {
    fn try_merge_text(&mut self, neighbour: Option<NodeId>, text: &str) -> bool {
        neighbour.map_or(false, |id| {
            append_to_existing_text(self.arena.data_mut(id), text)
        })
    }
}

impl TreeSink for DocumentSink {
    type Output = Document;

    type Handle = NodeId;

    fn finish(self) -> Document {
        debug!(
            nodes = self.arena.len(),
            errors = self.errors.len(),
            "parsed html"
        );

        Document {
            tree: Tree::from_arena(self.arena),
            errors: self.errors,
            quirks_mode: self.quirks_mode,
        }
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        self.errors.push(msg);
    }

    fn get_document(&mut self) -> NodeId {
        self.arena.root_id()
    }

    // Template contents are ordinary children of the template element.
    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        *target
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    // Never called on a non-element node.
    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        match self.arena.node(*target).data {
            NodeData::Element(Element { ref name, .. }) => name.expanded(),
            _ => panic!("not an element!"),
        }
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> NodeId {
        self.arena.create(NodeData::Element(Element::new(
            name,
            attrs,
            flags.mathml_annotation_xml_integration_point,
        )))
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.arena.create(NodeData::Comment { contents: text })
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> NodeId {
        self.arena.create(NodeData::ProcessingInstruction {
            target,
            contents: data,
        })
    }

    // Adjacent text is concatenated into the existing text node.
    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(id) => self.arena.append(*parent, id),
            NodeOrText::AppendText(text) => {
                let last_child = self.arena.node(*parent).last_child;
                if self.try_merge_text(last_child, &text) {
                    return;
                }

                let id = self.arena.create(NodeData::Text { contents: text });
                self.arena.append(*parent, id);
            }
        }
    }

    // `sibling` is never a text node, but its previous sibling may be one.
    fn append_before_sibling(&mut self, sibling: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(id) => self.arena.insert_before(*sibling, id),
            NodeOrText::AppendText(text) => {
                let prev_sibling = self.arena.node(*sibling).prev_sibling;
                if self.try_merge_text(prev_sibling, &text) {
                    return;
                }

                let id = self.arena.create(NodeData::Text { contents: text });
                self.arena.insert_before(*sibling, id);
            }
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.arena.node(*element).parent.is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let root = self.arena.root_id();
        let id = self.arena.create(NodeData::Doctype {
            name,
            public_id,
            system_id,
        });
        self.arena.append(root, id);
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<Attribute>) {
        let existing = match self.arena.data_mut(*target) {
            NodeData::Element(Element {
                attrs: ref mut existing,
                ..
            }) => existing,
            _ => panic!("not an element"),
        };

        let existing_names = existing
            .iter()
            .map(|attr| attr.name.clone())
            .collect::<HashSet<_>>();
        existing.extend(
            attrs
                .into_iter()
                .filter(|attr| !existing_names.contains(&attr.name)),
        );
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.arena.detach(*target);
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        self.arena.reparent_children(*node, *new_parent);
    }
}
