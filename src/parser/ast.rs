//! Expression AST for the supported XPath subset. Nodes are immutable after
//! construction and render themselves back to canonical XPath text, which is
//! how failing sub-expressions are quoted in error messages.

use core::fmt;

use crate::model::QName;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(Vec<Step>),
    Literal(String),
    Number(f64),
    Neg(Box<Expr>),
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// One location step of a path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Leading `/`: jump to the document root.
    Root,
    /// `.`
    Identity(Vec<Predicate>),
    /// `..`
    Parent(Vec<Predicate>),
    /// Abbreviated child step: `name`.
    Element { name: QName, predicates: Vec<Predicate> },
    /// Abbreviated attribute step: `@name`.
    Attribute { name: QName, predicates: Vec<Predicate> },
    /// Explicit axis step: `axis::name`.
    Axis { axis: AxisKind, name: QName, predicates: Vec<Predicate> },
}

impl Step {
    pub fn predicates(&self) -> &[Predicate] {
        match self {
            Step::Root => &[],
            Step::Identity(p) | Step::Parent(p) => p,
            Step::Element { predicates, .. }
            | Step::Attribute { predicates, .. }
            | Step::Axis { predicates, .. } => predicates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    Child,
    Attribute,
    SelfAxis,
    Parent,
    Ancestor,
    AncestorOrSelf,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Preceding,
    PrecedingSibling,
}

impl AxisKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => AxisKind::Child,
            "attribute" => AxisKind::Attribute,
            "self" => AxisKind::SelfAxis,
            "parent" => AxisKind::Parent,
            "ancestor" => AxisKind::Ancestor,
            "ancestor-or-self" => AxisKind::AncestorOrSelf,
            "descendant-or-self" => AxisKind::DescendantOrSelf,
            "following" => AxisKind::Following,
            "following-sibling" => AxisKind::FollowingSibling,
            "preceding" => AxisKind::Preceding,
            "preceding-sibling" => AxisKind::PrecedingSibling,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            AxisKind::Child => "child",
            AxisKind::Attribute => "attribute",
            AxisKind::SelfAxis => "self",
            AxisKind::Parent => "parent",
            AxisKind::Ancestor => "ancestor",
            AxisKind::AncestorOrSelf => "ancestor-or-self",
            AxisKind::DescendantOrSelf => "descendant-or-self",
            AxisKind::Following => "following",
            AxisKind::FollowingSibling => "following-sibling",
            AxisKind::Preceding => "preceding",
            AxisKind::PrecedingSibling => "preceding-sibling",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bracketed filter expression of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate(pub Expr);

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

fn write_predicates(f: &mut fmt::Formatter<'_>, predicates: &[Predicate]) -> fmt::Result {
    for p in predicates {
        write!(f, "{p}")?;
    }
    Ok(())
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Root => f.write_str("/"),
            Step::Identity(p) => {
                f.write_str(".")?;
                write_predicates(f, p)
            }
            Step::Parent(p) => {
                f.write_str("..")?;
                write_predicates(f, p)
            }
            Step::Element { name, predicates } => {
                write!(f, "{name}")?;
                write_predicates(f, predicates)
            }
            Step::Attribute { name, predicates } => {
                write!(f, "@{name}")?;
                write_predicates(f, predicates)
            }
            Step::Axis { axis, name, predicates } => {
                write!(f, "{axis}::{name}")?;
                write_predicates(f, predicates)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Path(steps) => {
                let mut rest = steps.as_slice();
                if let Some(Step::Root) = rest.first() {
                    f.write_str("/")?;
                    rest = &rest[1..];
                }
                let mut first = true;
                for step in rest {
                    if !first {
                        f.write_str("/")?;
                    }
                    first = false;
                    write!(f, "{step}")?;
                }
                Ok(())
            }
            Expr::Literal(s) => write!(f, "'{s}'"),
            Expr::Number(n) => f.write_str(&crate::engine::value::format_number(*n)),
            Expr::Neg(e) => write!(f, "-{e}"),
            Expr::Binary { op, left, right } => write!(f, "{left} {} {right}", op.symbol()),
        }
    }
}
