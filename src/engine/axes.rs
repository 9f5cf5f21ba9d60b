//! Per-axis traversal and creation strategies.
//!
//! Traversal enumerates candidate nodes for a context node, filtered by the
//! wildcard-aware name test. Creation synthesizes one node of the axis's
//! kind; axes that are inherently read-only refuse. The decision *whether*
//! to create is owned by the evaluator, not by this module.

use tracing::debug;

use crate::engine::runtime::Error;
use crate::model::{Navigator, QName};
use crate::parser::ast::AxisKind;

pub fn traverse<N: Navigator>(axis: AxisKind, name: &QName, node: &N) -> Vec<N> {
    match axis {
        AxisKind::Child => filter_named(node.elements(), name),
        AxisKind::Attribute => filter_named(node.attributes(), name),
        AxisKind::SelfAxis => filter_named(vec![node.clone()], name),
        AxisKind::Parent => filter_named(node.parent().into_iter().collect(), name),
        AxisKind::Ancestor => filter_named(ancestors(node), name),
        AxisKind::AncestorOrSelf => {
            let mut all = vec![node.clone()];
            all.extend(ancestors(node));
            filter_named(all, name)
        }
        AxisKind::DescendantOrSelf => {
            let mut all = Vec::new();
            descend(node, &mut all);
            filter_named(all, name)
        }
        AxisKind::FollowingSibling => filter_named(following_siblings(node), name),
        AxisKind::Following => {
            let mut all = Vec::new();
            for sibling in following_siblings(node) {
                descend(&sibling, &mut all);
            }
            filter_named(all, name)
        }
        AxisKind::PrecedingSibling => filter_named(preceding_siblings(node), name),
        AxisKind::Preceding => {
            let mut all = Vec::new();
            for sibling in preceding_siblings(node) {
                descend(&sibling, &mut all);
            }
            filter_named(all, name)
        }
    }
}

/// Synthesize one node reachable from `node` over `axis`. `expr` is the
/// rendering of the requesting step, quoted in errors.
pub fn create<N: Navigator>(axis: AxisKind, name: &QName, node: &N, expr: &str) -> Result<N, Error> {
    match axis {
        AxisKind::Child => {
            reject_wildcard(name)?;
            debug!(name = %name, "creating element");
            node.create_element(name)
        }
        AxisKind::Attribute => {
            // an attribute must have a concrete name
            reject_wildcard(name)?;
            debug!(name = %name, "creating attribute");
            node.create_attribute(name)
        }
        AxisKind::Following | AxisKind::FollowingSibling => {
            reject_wildcard(name)?;
            let parent = node.parent().ok_or_else(|| Error::MissingParent(expr.to_string()))?;
            debug!(name = %name, "creating following sibling element");
            parent.create_element(name)
        }
        AxisKind::Preceding | AxisKind::PrecedingSibling => {
            reject_wildcard(name)?;
            if node.parent().is_none() {
                return Err(Error::MissingParent(expr.to_string()));
            }
            debug!(name = %name, "creating preceding sibling element");
            node.insert_element_before(name)
        }
        AxisKind::SelfAxis
        | AxisKind::Parent
        | AxisKind::Ancestor
        | AxisKind::AncestorOrSelf
        | AxisKind::DescendantOrSelf => Err(Error::UncreatableAxis { axis, expr: expr.to_string() }),
    }
}

fn reject_wildcard(name: &QName) -> Result<(), Error> {
    if name.is_wildcard() {
        Err(Error::WildcardName(name.to_string()))
    } else {
        Ok(())
    }
}

fn filter_named<N: Navigator>(nodes: Vec<N>, name: &QName) -> Vec<N> {
    nodes.into_iter().filter(|n| name.matches(&n.name())).collect()
}

fn ancestors<N: Navigator>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut current = node.parent();
    while let Some(n) = current {
        current = n.parent();
        out.push(n);
    }
    out
}

/// Depth-first pre-order traversal including `node` itself.
fn descend<N: Navigator>(node: &N, out: &mut Vec<N>) {
    out.push(node.clone());
    for child in node.elements() {
        descend(&child, out);
    }
}

/// Remaining children of the parent after `node`, located by identity.
fn following_siblings<N: Navigator>(node: &N) -> Vec<N> {
    let Some(parent) = node.parent() else { return Vec::new() };
    parent
        .elements()
        .into_iter()
        .skip_while(|sibling| sibling != node)
        .skip(1)
        .collect()
}

/// Children of the parent enumerated forward, stopping at `node` itself.
fn preceding_siblings<N: Navigator>(node: &N) -> Vec<N> {
    let Some(parent) = node.parent() else { return Vec::new() };
    parent
        .elements()
        .into_iter()
        .take_while(|sibling| sibling != node)
        .collect()
}
