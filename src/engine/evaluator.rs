//! The resolve-or-create core: step resolution, predicate filtering with
//! positional sibling synthesis, and operator evaluation with greedy
//! repair.

use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::engine::axes;
use crate::engine::runtime::{Context, Error, NodeView};
use crate::engine::value::{Value, format_number};
use crate::model::{Navigator, QName};
use crate::parser::ast::{AxisKind, BinaryOp, Expr, Predicate, Step};

impl Expr {
    /// Evaluate this expression against `start`. In greedy mode, missing
    /// structure is created so the expression ends up satisfied; otherwise
    /// a miss is a normal empty result.
    pub fn resolve<N: Navigator>(&self, start: &N, greedy: bool) -> Result<Value<N>, Error> {
        let ctx = Context::new(NodeView::of(start.clone()), greedy);
        evaluate(self, &ctx)
    }
}

pub fn evaluate<N: Navigator>(expr: &Expr, ctx: &Context<N>) -> Result<Value<N>, Error> {
    match expr {
        Expr::Literal(s) => Ok(Value::Literal(s.clone())),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Neg(inner) => Ok(Value::Number(-evaluate(inner, ctx)?.to_number())),
        Expr::Path(steps) => resolve_path(steps, ctx),
        Expr::Binary { op, left, right } => binary(*op, left, right, ctx, expr),
    }
}

fn resolve_path<N: Navigator>(steps: &[Step], ctx: &Context<N>) -> Result<Value<N>, Error> {
    let mut current: Vec<NodeView<N>> = vec![ctx.view.clone()];
    for step in steps {
        let total = current.len();
        let mut next: Vec<NodeView<N>> = Vec::new();
        for (i, view) in current.iter().enumerate() {
            let step_ctx = ctx.with_view(view.clone(), i + 1 < total, i + 1);
            for out in resolve_step(step, &step_ctx)? {
                // node-sets stay deduplicated under identity
                if !next.iter().any(|existing| existing.node == out.node) {
                    next.push(out);
                }
            }
        }
        if next.is_empty() {
            return Ok(Value::empty());
        }
        current = next;
    }
    Ok(Value::NodeSet(current))
}

fn resolve_step<N: Navigator>(step: &Step, ctx: &Context<N>) -> Result<Vec<NodeView<N>>, Error> {
    match step {
        Step::Root => Ok(vec![NodeView::of(ctx.view.node.root())]),
        Step::Identity(preds) => axis_step(AxisKind::SelfAxis, &QName::any(), preds, ctx, step),
        Step::Parent(preds) => axis_step(AxisKind::Parent, &QName::any(), preds, ctx, step),
        Step::Element { name, predicates } => axis_step(AxisKind::Child, name, predicates, ctx, step),
        Step::Attribute { name, predicates } => {
            axis_step(AxisKind::Attribute, name, predicates, ctx, step)
        }
        Step::Axis { axis, name, predicates } => axis_step(*axis, name, predicates, ctx, step),
    }
}

/// Resolve one axis step: enumerate candidates, filter through predicates,
/// and when that leaves nothing while this context is greedy and owns the
/// last candidate slot, synthesize exactly one node and re-run the
/// predicates against it.
fn axis_step<N: Navigator>(
    axis: AxisKind,
    name: &QName,
    predicates: &[Predicate],
    ctx: &Context<N>,
    step: &Step,
) -> Result<Vec<NodeView<N>>, Error> {
    let nodes = axes::traverse(axis, name, &ctx.view.node);
    let total = nodes.len();
    let candidates: Vec<NodeView<N>> = nodes
        .into_iter()
        .enumerate()
        .map(|(i, n)| NodeView::new(n, i + 1, i + 1 < total))
        .collect();
    let filtered = resolve_predicates(predicates, candidates, ctx)?;
    if !filtered.is_empty() {
        return Ok(filtered);
    }
    if !ctx.greedy || ctx.has_next {
        return Ok(Vec::new());
    }
    let created = axes::create(axis, name, &ctx.view.node, &step.to_string())?;
    trace!(step = %step, "created node to satisfy step");
    let fresh = NodeView::fresh(created, total + 1);
    let out = resolve_predicates(predicates, vec![fresh], ctx)?;
    if out.is_empty() {
        return Err(Error::Unsatisfiable(step.to_string()));
    }
    Ok(out)
}

/// Apply predicates left to right; each one filters the survivors of the
/// previous with positions re-derived against the current candidate list.
fn resolve_predicates<N: Navigator>(
    predicates: &[Predicate],
    candidates: Vec<NodeView<N>>,
    ctx: &Context<N>,
) -> Result<Vec<NodeView<N>>, Error> {
    let mut current = candidates;
    for predicate in predicates {
        current = resolve_predicate(predicate, current, ctx)?;
    }
    Ok(current)
}

fn resolve_predicate<N: Navigator>(
    predicate: &Predicate,
    candidates: Vec<NodeView<N>>,
    ctx: &Context<N>,
) -> Result<Vec<NodeView<N>>, Error> {
    let total = candidates.len();
    let mut survivors: SmallVec<[NodeView<N>; 4]> = SmallVec::new();
    // First pass: read-only for pre-existing candidates. A node this pass
    // already synthesized (is_new) or repaired (is_marked) keeps its
    // mutation rights so positional predicates can continue to synthesize
    // siblings against it.
    for (i, view) in candidates.iter().enumerate() {
        let mut v = view.clone();
        v.position = i + 1;
        v.has_next = i + 1 < total;
        let mutate = (v.is_new || v.is_marked) && ctx.greedy && !ctx.has_next && !v.has_next;
        let pctx = Context { view: v.clone(), greedy: mutate, has_next: v.has_next, position: v.position };
        let value = evaluate(&predicate.0, &pctx)?;
        if predicate_holds(&value, &mut v, mutate)? {
            if mutate {
                v.is_marked = true;
            }
            survivors.push(v);
        }
    }
    if !survivors.is_empty() || !ctx.greedy || ctx.has_next {
        return Ok(survivors.into_vec());
    }
    // Greedy repair against the last candidate only; earlier candidates
    // must never be mutated while an alternative remains.
    let Some(last) = candidates.last() else {
        return Ok(Vec::new());
    };
    if last.is_new || last.is_marked {
        // a synthesized node already had its mutation chance above;
        // repairing it again would re-run the same mutations
        return Ok(Vec::new());
    }
    let mut v = last.clone();
    v.position = total;
    v.has_next = false;
    let pctx = Context { view: v.clone(), greedy: true, has_next: false, position: v.position };
    let value = evaluate(&predicate.0, &pctx)?;
    if predicate_holds(&value, &mut v, true)? {
        v.is_marked = true;
        Ok(vec![v])
    } else {
        Ok(Vec::new())
    }
}

/// A numeric predicate selects by position; anything else is coerced to a
/// boolean. With `mutate` set (greedy repair over the last candidate), a
/// positional shortfall of `target - position` is repaired by prepending
/// that many sibling copies before the reference node, which then occupies
/// the target position.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn predicate_holds<N: Navigator>(
    value: &Value<N>,
    view: &mut NodeView<N>,
    mutate: bool,
) -> Result<bool, Error> {
    let Value::Number(target) = value else {
        return Ok(value.to_boolean());
    };
    if view.position as f64 == *target {
        return Ok(true);
    }
    if mutate && target.fract() == 0.0 && *target > view.position as f64 {
        let missing = *target as usize - view.position;
        for _ in 0..missing {
            view.node.prepend_copy()?;
        }
        debug!(copies = missing, "synthesized positional siblings");
        view.position = *target as usize;
        return Ok(true);
    }
    Ok(false)
}

fn binary<N: Navigator>(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    ctx: &Context<N>,
    whole: &Expr,
) -> Result<Value<N>, Error> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
            let l = evaluate(left, ctx)?.to_number();
            let r = evaluate(right, ctx)?.to_number();
            let result = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                _ => l * r,
            };
            Ok(Value::Number(result))
        }
        BinaryOp::Eq => {
            let lv = evaluate(left, ctx)?;
            let rv = evaluate(right, ctx)?;
            if lv.xpath_eq(&rv) {
                return Ok(Value::Boolean(true));
            }
            if ctx.greedy && !ctx.has_next {
                assign(&lv, &rv.to_text(), whole)?;
                return Ok(Value::Boolean(true));
            }
            Ok(Value::Boolean(false))
        }
        BinaryOp::Ne => {
            let lv = evaluate(left, ctx)?;
            let rv = evaluate(right, ctx)?;
            if !lv.xpath_eq(&rv) {
                return Ok(Value::Boolean(true));
            }
            if ctx.greedy && !ctx.has_next {
                let original = rv.to_text();
                let negated = negate(&rv);
                if negated == original {
                    return Err(Error::Unsatisfiable(whole.to_string()));
                }
                assign(&lv, &negated, whole)?;
                return Ok(Value::Boolean(true));
            }
            Ok(Value::Boolean(false))
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Ge => {
            let lv = evaluate(left, ctx)?;
            let rv = evaluate(right, ctx)?;
            if ordering_holds(op, lv.xpath_cmp(&rv)) {
                return Ok(Value::Boolean(true));
            }
            if ctx.greedy && !ctx.has_next {
                // ordering constraints are not satisfiable by mutation
                return Err(Error::UnsatisfiableOrdering(whole.to_string()));
            }
            Ok(Value::Boolean(false))
        }
        BinaryOp::Le => {
            let lv = evaluate(left, ctx)?;
            let rv = evaluate(right, ctx)?;
            if ordering_holds(op, lv.xpath_cmp(&rv)) {
                return Ok(Value::Boolean(true));
            }
            if ctx.greedy && !ctx.has_next {
                // `<=` falls back to equality-style mutation
                assign(&lv, &rv.to_text(), whole)?;
                return Ok(Value::Boolean(true));
            }
            Ok(Value::Boolean(false))
        }
    }
}

fn ordering_holds(op: BinaryOp, ord: Option<Ordering>) -> bool {
    let Some(ord) = ord else { return false };
    match op {
        BinaryOp::Lt => ord == Ordering::Less,
        BinaryOp::Le => ord != Ordering::Greater,
        BinaryOp::Gt => ord == Ordering::Greater,
        BinaryOp::Ge => ord != Ordering::Less,
        _ => false,
    }
}

/// Overwrite the text of every node backing `value`. Scalar values cannot
/// be assigned to.
fn assign<N: Navigator>(value: &Value<N>, text: &str, expr: &Expr) -> Result<(), Error> {
    let views = value.views();
    if !value.is_node_backed() || views.is_empty() {
        return Err(Error::ReadOnlyValue(expr.to_string()));
    }
    for view in views {
        view.node.set_text(text)?;
    }
    debug!(expr = %expr, text, "assigned text to satisfy comparison");
    Ok(())
}

/// Produce a string textually different from the right operand, chosen per
/// the operand's value kind: numbers negate, booleans invert, everything
/// else reverses the string. Reversal of a palindrome (the empty string
/// included) yields the original and is treated as unsatisfiable by the
/// caller.
fn negate<N: Navigator>(value: &Value<N>) -> String {
    match value {
        Value::Number(n) => format_number(-n),
        Value::Boolean(b) => (!b).to_string(),
        _ => value.to_text().chars().rev().collect(),
    }
}
