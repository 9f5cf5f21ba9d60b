//! Runtime state threaded through evaluation: the engine error type, the
//! per-traversal node cursor and the evaluation context.

use std::sync::Arc;

use crate::model::Navigator;
use crate::parser::ParseError;
use crate::parser::ast::AxisKind;

/// Engine failure. Absence of a match during read-only resolution is not an
/// error; it propagates as an empty node-set instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The expression stayed unsatisfied even after node creation.
    #[error("unable to satisfy expression `{0}`")]
    Unsatisfiable(String),
    #[error("axis `{axis}` cannot create nodes (required by `{expr}`)")]
    UncreatableAxis { axis: AxisKind, expr: String },
    #[error("cannot create a node with wildcard name `{0}`")]
    WildcardName(String),
    #[error("`{0}` cannot be created without a parent node")]
    MissingParent(String),
    #[error("cannot modify read-only value `{0}`")]
    ReadOnlyValue(String),
    #[error("ordering constraint `{0}` cannot be satisfied by mutation")]
    UnsatisfiableOrdering(String),
    /// The underlying tree backend rejected an operation.
    #[error("backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend { message: message.into(), source: None }
    }

    pub fn backend_caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Backend { message: message.into(), source: Some(Arc::new(source)) }
    }
}

/// Transient cursor over one tree node during a traversal step.
///
/// `position` is 1-based among the siblings considered so far and `has_next`
/// records whether more candidates remain at this level. The `is_new` and
/// `is_marked` flags live only for the duration of a single predicate
/// resolution pass: they keep the engine from re-creating nodes it has
/// already synthesized in that pass.
#[derive(Debug, Clone)]
pub struct NodeView<N: Navigator> {
    pub node: N,
    pub position: usize,
    pub has_next: bool,
    pub is_new: bool,
    pub is_marked: bool,
}

impl<N: Navigator> NodeView<N> {
    pub fn new(node: N, position: usize, has_next: bool) -> Self {
        Self { node, position, has_next, is_new: false, is_marked: false }
    }

    /// View over a node synthesized during the current greedy pass.
    pub fn fresh(node: N, position: usize) -> Self {
        Self { node, position, has_next: false, is_new: true, is_marked: false }
    }

    pub fn of(node: N) -> Self {
        Self::new(node, 1, false)
    }

    pub fn text(&self) -> String {
        self.node.text()
    }
}

impl<N: Navigator> PartialEq for NodeView<N> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

/// Evaluation context, cloned with overridden fields as the evaluator
/// descends; never shared mutably. Creation triggers only when `greedy` is
/// set and no further candidate remains at the current level (`has_next`
/// is false).
#[derive(Debug, Clone)]
pub struct Context<N: Navigator> {
    pub view: NodeView<N>,
    pub greedy: bool,
    pub has_next: bool,
    pub position: usize,
}

impl<N: Navigator> Context<N> {
    pub fn new(view: NodeView<N>, greedy: bool) -> Self {
        Self { view, greedy, has_next: false, position: 1 }
    }

    pub fn with_view(&self, view: NodeView<N>, has_next: bool, position: usize) -> Self {
        Self { view, greedy: self.greedy, has_next, position }
    }
}
