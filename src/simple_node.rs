//! Simple in-memory tree implementation of [`Navigator`] used in tests and
//! quick prototypes.
//!
//! Nodes are cheap `Arc` handles with identity equality; mutation goes
//! through `RwLock`-guarded fields so handles can be cloned freely while
//! the engine edits the tree.
//!
//! Example:
//! ```
//! use xpath_forge::simple_node::{doc, elem, attr};
//! use xpath_forge::Navigator;
//!
//! // <root id="r"><child>hello</child></root>
//! let document = doc();
//! let root = elem("root")
//!     .with_attr(attr("id", "r"))
//!     .with_child(elem("child").with_text("hello"));
//! document.append(&root);
//!
//! assert_eq!(document.elements()[0].name().local, "root");
//! ```

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::engine::runtime::Error;
use crate::model::{Navigator, NodeKind, QName};

#[derive(Debug)]
struct Inner {
    kind: NodeKind,
    name: QName,
    text: RwLock<String>,
    parent: RwLock<Option<Weak<Inner>>>,
    children: RwLock<Vec<SimpleNode>>,
    attributes: RwLock<Vec<SimpleNode>>,
}

/// An `Arc`-backed node handle with identity equality.
#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("text", &*self.0.text.read().unwrap())
            .finish()
    }
}

impl SimpleNode {
    fn new(kind: NodeKind, name: QName, text: &str) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name,
            text: RwLock::new(text.to_string()),
            parent: RwLock::new(None),
            children: RwLock::new(Vec::new()),
            attributes: RwLock::new(Vec::new()),
        }))
    }

    pub fn document() -> Self {
        Self::new(NodeKind::Document, QName::new(""), "")
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Element, QName::new(name), "")
    }

    pub fn attribute(name: impl Into<String>, value: &str) -> Self {
        Self::new(NodeKind::Attribute, QName::new(name), value)
    }

    fn adopt(&self, child: &SimpleNode) {
        *child.0.parent.write().unwrap() = Some(Arc::downgrade(&self.0));
    }

    /// Attach `child` as the last child element of this node.
    pub fn append(&self, child: &SimpleNode) {
        self.adopt(child);
        self.0.children.write().unwrap().push(child.clone());
    }

    /// Builder-style variant of [`SimpleNode::append`].
    #[must_use]
    pub fn with_child(self, child: SimpleNode) -> Self {
        self.append(&child);
        self
    }

    #[must_use]
    pub fn with_attr(self, attribute: SimpleNode) -> Self {
        debug_assert_eq!(attribute.0.kind, NodeKind::Attribute);
        self.adopt(&attribute);
        self.0.attributes.write().unwrap().push(attribute);
        self
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        *self.0.text.write().unwrap() = text.to_string();
        self
    }

    fn deep_copy(&self) -> SimpleNode {
        let copy = SimpleNode::new(self.0.kind, self.0.name.clone(), &self.0.text.read().unwrap());
        for attribute in self.attributes() {
            let attr_copy = attribute.deep_copy();
            copy.adopt(&attr_copy);
            copy.0.attributes.write().unwrap().push(attr_copy);
        }
        for child in self.elements() {
            copy.append(&child.deep_copy());
        }
        copy
    }

    /// Render the subtree as compact XML-like text; handy for asserting
    /// that a document is unchanged.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self.0.kind {
            NodeKind::Document => {
                for child in self.elements() {
                    child.render_into(out);
                }
            }
            NodeKind::Element => {
                out.push('<');
                out.push_str(&self.0.name.local);
                for attribute in self.attributes() {
                    out.push(' ');
                    out.push_str(&attribute.0.name.local);
                    out.push_str("=\"");
                    out.push_str(&attribute.text());
                    out.push('"');
                }
                out.push('>');
                out.push_str(&self.text());
                for child in self.elements() {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(&self.0.name.local);
                out.push('>');
            }
            NodeKind::Attribute => {
                out.push_str(&self.text());
            }
        }
    }
}

/// Convenience constructors for concise test trees.
pub fn doc() -> SimpleNode {
    SimpleNode::document()
}
pub fn elem(name: &str) -> SimpleNode {
    SimpleNode::element(name)
}
pub fn attr(name: &str, value: &str) -> SimpleNode {
    SimpleNode::attribute(name, value)
}

impl Navigator for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn name(&self) -> QName {
        self.0.name.clone()
    }

    fn text(&self) -> String {
        self.0.text.read().unwrap().clone()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.read().unwrap().as_ref().and_then(Weak::upgrade).map(SimpleNode)
    }

    fn elements(&self) -> Vec<Self> {
        self.0.children.read().unwrap().clone()
    }

    fn attributes(&self) -> Vec<Self> {
        self.0.attributes.read().unwrap().clone()
    }

    fn create_element(&self, name: &QName) -> Result<Self, Error> {
        match self.0.kind {
            NodeKind::Attribute => {
                return Err(Error::backend("an attribute cannot have child elements"));
            }
            NodeKind::Document if !self.elements().is_empty() => {
                return Err(Error::backend("document already has a root element"));
            }
            _ => {}
        }
        let child = SimpleNode::new(NodeKind::Element, name.clone(), "");
        self.append(&child);
        Ok(child)
    }

    fn create_attribute(&self, name: &QName) -> Result<Self, Error> {
        if self.0.kind != NodeKind::Element {
            return Err(Error::backend("only elements can hold attributes"));
        }
        let attribute = SimpleNode::new(NodeKind::Attribute, name.clone(), "");
        self.adopt(&attribute);
        self.0.attributes.write().unwrap().push(attribute.clone());
        Ok(attribute)
    }

    fn insert_element_before(&self, name: &QName) -> Result<Self, Error> {
        let parent = self.parent().ok_or_else(|| Error::backend("node has no parent"))?;
        let sibling = SimpleNode::new(NodeKind::Element, name.clone(), "");
        parent.adopt(&sibling);
        let mut children = parent.0.children.write().unwrap();
        let index = children
            .iter()
            .position(|c| c == self)
            .ok_or_else(|| Error::backend("node is detached from its parent"))?;
        children.insert(index, sibling.clone());
        Ok(sibling)
    }

    fn set_text(&self, text: &str) -> Result<(), Error> {
        if self.0.kind == NodeKind::Document {
            return Err(Error::backend("a document cannot hold raw text"));
        }
        *self.0.text.write().unwrap() = text.to_string();
        Ok(())
    }

    fn prepend_copy(&self) -> Result<Self, Error> {
        let parent = self.parent().ok_or_else(|| Error::backend("cannot copy the root node"))?;
        if self.0.kind != NodeKind::Element {
            return Err(Error::backend("only elements can be copied into siblings"));
        }
        let copy = self.deep_copy();
        parent.adopt(&copy);
        let mut children = parent.0.children.write().unwrap();
        let index = children
            .iter()
            .position(|c| c == self)
            .ok_or_else(|| Error::backend("node is detached from its parent"))?;
        children.insert(index, copy.clone());
        Ok(copy)
    }

    fn remove(&self) -> Result<(), Error> {
        let parent = self.parent().ok_or_else(|| Error::backend("cannot remove the root node"))?;
        if self.0.kind == NodeKind::Attribute {
            parent.0.attributes.write().unwrap().retain(|a| a != self);
        } else {
            parent.0.children.write().unwrap().retain(|c| c != self);
        }
        *self.0.parent.write().unwrap() = None;
        Ok(())
    }
}
