//! Action layer: thin composition of "resolve the path, creating if
//! needed" with an optional text assignment or a removal.

use tracing::debug;

use crate::engine::runtime::Error;
use crate::engine::value::Value;
use crate::model::Navigator;
use crate::parser::ast::Expr;
use crate::parser::{NamespaceContext, ParseError, parse, parse_with_context};

/// One mutation against a document, pre-parsed and reusable across
/// documents.
pub trait Action<N: Navigator> {
    fn perform(&self, root: &N) -> Result<(), Error>;
}

/// Ensure the location exists, creating missing structure.
#[derive(Debug, Clone)]
pub struct PutAction {
    expr: Expr,
}

impl PutAction {
    pub fn new(xpath: &str) -> Result<Self, ParseError> {
        Ok(Self { expr: parse(xpath)? })
    }

    pub fn with_namespaces(xpath: &str, namespaces: &dyn NamespaceContext) -> Result<Self, ParseError> {
        Ok(Self { expr: parse_with_context(xpath, namespaces)? })
    }
}

impl<N: Navigator> Action<N> for PutAction {
    fn perform(&self, root: &N) -> Result<(), Error> {
        debug!(expr = %self.expr, "put");
        self.expr.resolve(root, true).map(drop)
    }
}

/// Ensure the location exists and carries the given text.
#[derive(Debug, Clone)]
pub struct PutValueAction {
    expr: Expr,
    value: String,
}

impl PutValueAction {
    pub fn new(xpath: &str, value: impl Into<String>) -> Result<Self, ParseError> {
        Ok(Self { expr: parse(xpath)?, value: value.into() })
    }

    pub fn with_namespaces(
        xpath: &str,
        value: impl Into<String>,
        namespaces: &dyn NamespaceContext,
    ) -> Result<Self, ParseError> {
        Ok(Self { expr: parse_with_context(xpath, namespaces)?, value: value.into() })
    }
}

impl<N: Navigator> Action<N> for PutValueAction {
    fn perform(&self, root: &N) -> Result<(), Error> {
        debug!(expr = %self.expr, value = %self.value, "put value");
        let result = self.expr.resolve(root, true)?;
        for view in result.views() {
            view.node.set_text(&self.value)?;
        }
        Ok(())
    }
}

/// Detach every node the location matches. A miss is a no-op, not an
/// error.
#[derive(Debug, Clone)]
pub struct RemoveAction {
    expr: Expr,
}

impl RemoveAction {
    pub fn new(xpath: &str) -> Result<Self, ParseError> {
        Ok(Self { expr: parse(xpath)? })
    }

    pub fn with_namespaces(xpath: &str, namespaces: &dyn NamespaceContext) -> Result<Self, ParseError> {
        Ok(Self { expr: parse_with_context(xpath, namespaces)? })
    }
}

impl<N: Navigator> Action<N> for RemoveAction {
    fn perform(&self, root: &N) -> Result<(), Error> {
        debug!(expr = %self.expr, "remove");
        if let Value::NodeSet(views) = self.expr.resolve(root, false)? {
            for view in &views {
                view.node.remove()?;
            }
        }
        Ok(())
    }
}

/// Run actions in order against one document, stopping at the first
/// failure. Whether to continue past a failed location is the caller's
/// policy; this helper picks abort.
pub fn apply_all<'a, N: Navigator>(
    actions: impl IntoIterator<Item = &'a dyn Action<N>>,
    root: &N,
) -> Result<(), Error>
where
    N: 'a,
{
    for action in actions {
        action.perform(root)?;
    }
    Ok(())
}
