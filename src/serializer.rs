use std::io;

use html5ever::serialize::{AttrRef, Serialize, Serializer, TraversalScope};
use markup5ever::{local_name, namespace_url, ns};
use markup5ever::QualName;
use tendril::StrTendril;
use tracing::debug;

use crate::dom_tree::{is_void_element, Arena, Node, NodeData, NodeId};

/// Serializable wrapper of Node.
pub struct SerializableNodeRef<'a>(Node<'a>);

impl<'a> From<Node<'a>> for SerializableNodeRef<'a> {
    fn from(h: Node<'a>) -> SerializableNodeRef<'a> {
        SerializableNodeRef(h)
    }
}

enum SerializeOp {
    Open(NodeId),
    Close(QualName),
}

fn push_children(ops: &mut Vec<SerializeOp>, arena: &Arena<NodeData>, id: NodeId) {
    let children = arena.children(id);
    ops.extend(children.into_iter().rev().map(SerializeOp::Open));
}

impl<'a> Serialize for SerializableNodeRef<'a> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let id = self.0.id;
        self.0.tree.with(|arena| {
            let mut ops = Vec::new();
            match traversal_scope {
                TraversalScope::IncludeNode => ops.push(SerializeOp::Open(id)),
                TraversalScope::ChildrenOnly(_) => push_children(&mut ops, arena, id),
            }

            while let Some(op) = ops.pop() {
                match op {
                    SerializeOp::Open(id) => match arena.node(id).data {
                        NodeData::Element(ref element) => {
                            serializer.start_elem(
                                element.name.clone(),
                                element.attrs.iter().map(|attr| (&attr.name, &*attr.value)),
                            )?;
                            ops.push(SerializeOp::Close(element.name.clone()));
                            push_children(&mut ops, arena, id);
                        }
                        NodeData::Document => push_children(&mut ops, arena, id),
                        NodeData::Doctype { ref name, .. } => serializer.write_doctype(name)?,
                        NodeData::Text { ref contents } => serializer.write_text(contents)?,
                        NodeData::Comment { ref contents } => serializer.write_comment(contents)?,
                        NodeData::ProcessingInstruction {
                            ref target,
                            ref contents,
                        } => serializer.write_processing_instruction(target, contents)?,
                    },
                    SerializeOp::Close(name) => serializer.end_elem(name)?,
                }
            }

            Ok(())
        })
    }
}

/// Elements whose text children are written without escaping.
fn is_raw_text_element(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("iframe")
                | local_name!("noembed")
                | local_name!("noframes")
                | local_name!("noscript")
                | local_name!("plaintext")
                | local_name!("script")
                | local_name!("style")
                | local_name!("xmp")
        )
}

/// Elements that swallow one leading newline when parsed, so it is written back twice.
fn keeps_leading_newline(name: &QualName) -> bool {
    name.ns == ns!(html)
        && matches!(
            name.local,
            local_name!("pre") | local_name!("listing") | local_name!("textarea")
        )
}

#[derive(Default)]
struct ElemInfo {
    suppressed: bool,
    void: bool,
    raw_text: bool,
    leading_newline: bool,
    first_child: bool,
}

/// Writes markup with `<tag/>` void elements and the `&'<>"` plus CR escape set.
pub(crate) struct HtmlWriter {
    out: String,
    stack: Vec<ElemInfo>,
}

impl HtmlWriter {
    pub(crate) fn new() -> Self {
        HtmlWriter {
            out: String::new(),
            stack: Vec::new(),
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.out
    }

    // Children of void elements are never written.
    fn suppressed(&self) -> bool {
        self.stack
            .last()
            .map_or(false, |parent| parent.suppressed || parent.void)
    }

    fn take_first_child(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(parent) => std::mem::replace(&mut parent.first_child, false),
            None => false,
        }
    }

    fn write_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '\'' => self.out.push_str("&#39;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                '"' => self.out.push_str("&#34;"),
                '\r' => self.out.push_str("&#13;"),
                c => self.out.push(c),
            }
        }
    }
}

impl Serializer for HtmlWriter {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        if self.suppressed() {
            self.stack.push(ElemInfo {
                suppressed: true,
                ..Default::default()
            });
            return Ok(());
        }
        self.take_first_child();

        self.out.push('<');
        self.out.push_str(&name.local);
        for (attr_name, value) in attrs {
            self.out.push(' ');
            if let Some(ref prefix) = attr_name.prefix {
                self.out.push_str(prefix);
                self.out.push(':');
            }
            self.out.push_str(&attr_name.local);
            self.out.push_str("=\"");
            self.write_escaped(value);
            self.out.push('"');
        }

        let void = is_void_element(&name);
        self.out.push_str(if void { "/>" } else { ">" });

        self.stack.push(ElemInfo {
            suppressed: false,
            void,
            raw_text: is_raw_text_element(&name),
            leading_newline: keeps_leading_newline(&name),
            first_child: true,
        });
        Ok(())
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        match self.stack.pop() {
            Some(ElemInfo {
                suppressed: false,
                void: false,
                ..
            })
            | None => {
                self.out.push_str("</");
                self.out.push_str(&name.local);
                self.out.push('>');
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }

        let first_child = self.take_first_child();
        let (raw_text, leading_newline) = self
            .stack
            .last()
            .map_or((false, false), |parent| (parent.raw_text, parent.leading_newline));

        if leading_newline && first_child && text.starts_with('\n') {
            self.out.push('\n');
        }

        if raw_text {
            self.out.push_str(text);
        } else {
            self.write_escaped(text);
        }
        Ok(())
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        self.take_first_child();

        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
        Ok(())
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        self.out.push_str("<!DOCTYPE ");
        self.out.push_str(name);
        self.out.push('>');
        Ok(())
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        self.take_first_child();

        self.out.push_str("<?");
        self.out.push_str(target);
        self.out.push(' ');
        self.out.push_str(data);
        self.out.push('>');
        Ok(())
    }
}

impl<'a> Node<'a> {
    pub(crate) fn render(&self, traversal_scope: TraversalScope) -> StrTendril {
        let mut writer = HtmlWriter::new();
        let node: SerializableNodeRef = (*self).into();
        if let Err(err) = node.serialize(&mut writer, traversal_scope) {
            debug!(%err, "html serialization stopped early");
        }
        StrTendril::from(writer.into_string())
    }
}
