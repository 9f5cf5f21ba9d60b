//! Tree model boundary: node kinds, qualified names and the [`Navigator`]
//! capability trait every concrete tree backend implements.

use core::fmt;

use crate::engine::runtime::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
}

/// Qualified name of an element or attribute. `"*"` acts as a wildcard in
/// either the namespace URI or the local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
    pub ns_uri: Option<String>,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self { prefix: None, local: local.into(), ns_uri: None }
    }

    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>, ns_uri: Option<String>) -> Self {
        Self { prefix: Some(prefix.into()), local: local.into(), ns_uri }
    }

    /// The `*` name test: matches any element or attribute.
    pub fn any() -> Self {
        Self { prefix: None, local: "*".into(), ns_uri: Some("*".into()) }
    }

    /// True if the namespace URI or local part is the `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.local == "*" || self.ns_uri.as_deref() == Some("*")
    }

    /// Wildcard-aware name test. Namespace URI and local part match
    /// independently; for each, either side being `*` or plain string
    /// equality counts as a match. The test is symmetric.
    pub fn matches(&self, other: &QName) -> bool {
        fn part(a: &str, b: &str) -> bool {
            a == "*" || b == "*" || a == b
        }
        part(self.ns_uri.as_deref().unwrap_or(""), other.ns_uri.as_deref().unwrap_or(""))
            && part(&self.local, &other.local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{p}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Capability set the evaluator requires from a concrete tree backend.
///
/// Handles are cheap clones referring to shared backend storage; mutation
/// goes through `&self` and relies on the backend's interior mutability.
/// The engine assumes single-writer access for the duration of one
/// resolution call and performs no locking of its own.
pub trait Navigator: Clone + PartialEq + fmt::Debug {
    fn kind(&self) -> NodeKind;

    /// Node name. Document nodes report an empty local part.
    fn name(&self) -> QName;

    /// Own text for leaf-like nodes, empty for containers without text.
    fn text(&self) -> String;

    fn parent(&self) -> Option<Self>;

    /// Child elements in document order.
    fn elements(&self) -> Vec<Self>;

    /// Attributes of an element; empty for other node kinds.
    fn attributes(&self) -> Vec<Self>;

    /// The conceptual document root, reached by walking the parent chain.
    fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Append a new element with the given name as the last child.
    fn create_element(&self, name: &QName) -> Result<Self, Error>;

    /// Add a new attribute with an empty value to this element.
    fn create_attribute(&self, name: &QName) -> Result<Self, Error>;

    /// Insert a new element with the given name immediately before this
    /// node among its parent's children. Fails without a parent.
    fn insert_element_before(&self, name: &QName) -> Result<Self, Error>;

    /// Replace the node's text content.
    fn set_text(&self, text: &str) -> Result<(), Error>;

    /// Clone this node (subtree included) and insert the copy immediately
    /// before it among its siblings. Fails if the node has no parent.
    fn prepend_copy(&self) -> Result<Self, Error>;

    /// Detach this node from its parent. Fails on the root.
    fn remove(&self) -> Result<(), Error>;
}
