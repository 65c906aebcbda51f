//! Query and rewrite parsed HTML: selector lookups, structural edits and
//! markup serialization over an html5ever-built tree.

mod document;
mod dom_tree;
mod error;
mod manipulation;
mod matcher;
mod property;
mod query;
mod selection;
mod serializer;
mod traversal;

pub use document::{Document, DocumentSink};
pub use dom_tree::{is_void_element, Descendants, Element, Node, NodeData, NodeId, NodeRef, Tree};
pub use error::{Error, Result};
pub use matcher::{CompoundSelector, Matcher};
pub use selection::Selection;
pub use serializer::SerializableNodeRef;
