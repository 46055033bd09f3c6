use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::arena::ExprDag;
use crate::expr::ExprNode;
use crate::handle::NodeId;
use crate::value::Value;

/// Total structural order on the nodes of one DAG.
///
/// Constants sort before variables, variables before operations. Within a
/// kind, constants compare by value, variables by name, and operations by
/// operator, then operand by operand, then operand count.
pub fn compare_nodes(dag: &ExprDag, a: NodeId, b: NodeId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (node_a, node_b) = match (dag.get_node(a), dag.get_node(b)) {
        (Some(x), Some(y)) => (x, y),
        (x, y) => return x.is_none().cmp(&y.is_none()),
    };

    let rank_a = node_a.kind();
    let rank_b = node_b.kind();
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (node_a, node_b) {
        (ExprNode::Constant(x), ExprNode::Constant(y)) => compare_values(*x, *y),
        (ExprNode::Variable(x), ExprNode::Variable(y)) => x.cmp(y),
        (ExprNode::Operation(x), ExprNode::Operation(y)) => match x.cmp(y) {
            Ordering::Equal => compare_operands(
                dag,
                dag.children(a).unwrap_or_default(),
                dag.children(b).unwrap_or_default(),
            ),
            ord => ord,
        },
        _ => Ordering::Equal,
    }
}

fn compare_operands(dag: &ExprDag, xs: &[NodeId], ys: &[NodeId]) -> Ordering {
    for (&x, &y) in xs.iter().zip(ys) {
        match compare_nodes(dag, x, y) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    xs.len().cmp(&ys.len())
}

// Exact values compare exactly. Otherwise by magnitude, with an exact
// value before an equal float.
fn compare_values(x: Value, y: Value) -> Ordering {
    match (x.as_rational(), y.as_rational()) {
        (Some(p), Some(q)) => p.cmp(&q),
        _ => x
            .to_f64()
            .total_cmp(&y.to_f64())
            .then_with(|| y.is_exact().cmp(&x.is_exact())),
    }
}

impl ExprDag {
    /// Whether the expressions under the two roots have the same shape,
    /// node for node. Ids may differ, so graphs from different builds
    /// compare. Two empty graphs are equal.
    #[must_use]
    pub fn structural_eq(&self, other: &ExprDag) -> bool {
        match (self.root(), other.root()) {
            (None, None) => true,
            (Some(a), Some(b)) => same_shape(self, a, other, b, &mut FxHashSet::default()),
            _ => false,
        }
    }
}

fn same_shape(
    left: &ExprDag,
    a: NodeId,
    right: &ExprDag,
    b: NodeId,
    seen: &mut FxHashSet<(NodeId, NodeId)>,
) -> bool {
    if !seen.insert((a, b)) {
        return true;
    }
    match (left.get_node(a), right.get_node(b)) {
        (Some(x), Some(y)) if x == y => {}
        _ => return false,
    }
    let xs = left.children(a).unwrap_or_default();
    let ys = right.children(b).unwrap_or_default();
    xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys)
            .all(|(&x, &y)| same_shape(left, x, right, y, seen))
}
