//! Runtime value algebra: node-sets and scalars with the XPath-style
//! mutual coercion rules.

use core::cmp::Ordering;

use crate::engine::runtime::NodeView;
use crate::model::Navigator;

#[derive(Debug, Clone)]
pub enum Value<N: Navigator> {
    /// Ordered, deduplicated sequence of node cursors.
    NodeSet(Vec<NodeView<N>>),
    Node(NodeView<N>),
    Literal(String),
    Number(f64),
    Boolean(bool),
}

impl<N: Navigator> Value<N> {
    pub fn empty() -> Self {
        Value::NodeSet(Vec::new())
    }

    /// Effective boolean value. A node is always non-empty; NaN is truthy
    /// because NaN != 0.0.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::NodeSet(views) => !views.is_empty(),
            Value::Node(_) => true,
            Value::Literal(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0,
            Value::Boolean(b) => *b,
        }
    }

    /// Numeric coercion; unparsable text becomes NaN. An empty node-set is
    /// NaN, a non-empty one delegates to its first element.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::NodeSet(views) => views.first().map_or(f64::NAN, |v| parse_number(&v.text())),
            Value::Node(view) => parse_number(&view.text()),
            Value::Literal(s) => parse_number(s),
            Value::Number(n) => *n,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// String coercion; an empty node-set becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::NodeSet(views) => views.first().map(NodeView::text).unwrap_or_default(),
            Value::Node(view) => view.text(),
            Value::Literal(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn is_node_backed(&self) -> bool {
        matches!(self, Value::NodeSet(_) | Value::Node(_))
    }

    /// Node cursors backing this value; empty for scalar kinds.
    pub fn views(&self) -> &[NodeView<N>] {
        match self {
            Value::NodeSet(views) => views,
            Value::Node(view) => core::slice::from_ref(view),
            _ => &[],
        }
    }

    /// XPath equality. Two node-sets are equal when any pair of their
    /// elements is textually equal; a boolean on either side coerces both
    /// sides to booleans (a node-set counts by emptiness); a node-set
    /// against any other scalar matches if any element's text does.
    /// Numbers force numeric comparison (NaN never equals), anything else
    /// compares textually.
    pub fn xpath_eq(&self, other: &Value<N>) -> bool {
        match (self, other) {
            (Value::NodeSet(left), Value::NodeSet(right)) => left
                .iter()
                .any(|l| right.iter().any(|r| l.text() == r.text())),
            (Value::Boolean(_), _) | (_, Value::Boolean(_)) => self.to_boolean() == other.to_boolean(),
            (set @ Value::NodeSet(_), scalar) | (scalar, set @ Value::NodeSet(_)) => {
                set.views().iter().any(|v| scalar_eq_text(scalar, &v.text()))
            }
            (Value::Number(_), _) | (_, Value::Number(_)) => {
                let (l, r) = (self.to_number(), other.to_number());
                l == r
            }
            _ => self.to_text() == other.to_text(),
        }
    }

    /// XPath ordering, used by `< <= > >=`: numeric coercion on both
    /// sides. Two node-sets order by size. `None` when NaN is involved.
    pub fn xpath_cmp(&self, other: &Value<N>) -> Option<Ordering> {
        if let (Value::NodeSet(left), Value::NodeSet(right)) = (self, other) {
            return Some(left.len().cmp(&right.len()));
        }
        self.to_number().partial_cmp(&other.to_number())
    }
}

impl<N: Navigator> From<NodeView<N>> for Value<N> {
    fn from(view: NodeView<N>) -> Self {
        Value::Node(view)
    }
}

fn scalar_eq_text<N: Navigator>(scalar: &Value<N>, text: &str) -> bool {
    match scalar {
        Value::Number(n) => parse_number(text) == *n,
        _ => scalar.to_text() == text,
    }
}

pub(crate) fn parse_number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

/// Render a number the way it appears in canonical XPath text and in text
/// assigned to nodes: integral finite values lose the fractional part.
pub fn format_number(n: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
