//! DAG-to-DAG rewrites: canonicalization and simplification.
//!
//! Every pass rebuilds a fresh [`ExprDag`] bottom-up from the root,
//! re-interning each node. Because operands are rebuilt before their
//! parent, every rule sees already-rewritten operands, so one pass reaches
//! a fixed point.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::arena::ExprDag;
use crate::error::{BuildError, EvalError};
use crate::expr::{ExprNode, OpType};
use crate::handle::NodeId;
use crate::intern::Operands;
use crate::ordering::compare_nodes;
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    /// Verbatim copy of the nodes reachable from the root.
    Compact,
    Canonicalize,
    Simplify,
    SimplifyExact,
    CombineLikeTerms,
}

impl Pass {
    fn folds(self) -> bool {
        matches!(
            self,
            Pass::Simplify | Pass::SimplifyExact | Pass::CombineLikeTerms
        )
    }
}

struct Rebuilder<'a> {
    src: &'a ExprDag,
    out: ExprDag,
    memo: FxHashMap<NodeId, NodeId>,
    pass: Pass,
}

impl<'a> Rebuilder<'a> {
    fn new(src: &'a ExprDag, pass: Pass) -> Self {
        Self {
            src,
            out: ExprDag::with_config(*src.config()),
            memo: FxHashMap::default(),
            pass,
        }
    }

    fn rebuild(&mut self, id: NodeId) -> Result<NodeId, BuildError> {
        if let Some(&done) = self.memo.get(&id) {
            return Ok(done);
        }

        let src = self.src;
        let rebuilt = match src.get_node(id) {
            None => return Err(BuildError::NodeNotFound(id)),
            Some(ExprNode::Variable(name)) => self.out.add_var(name)?,
            Some(ExprNode::Constant(value)) => self.out.add_const(*value)?,
            Some(ExprNode::Operation(op)) => {
                let mut operands = Operands::new();
                for &child in src.children(id).unwrap_or_default() {
                    operands.push(self.rebuild(child)?);
                }
                if self.pass.folds() {
                    self.simplify_op(*op, operands)?
                } else {
                    self.canonical_op(*op, operands)?
                }
            }
        };

        self.memo.insert(id, rebuilt);
        Ok(rebuilt)
    }

    fn canonical_op(&mut self, op: OpType, operands: Operands) -> Result<NodeId, BuildError> {
        if self.pass != Pass::Canonicalize || !op.is_commutative() {
            return self.out.add_op(op, &operands);
        }
        let mut flat = self.flatten(op, &operands);
        let out = &self.out;
        flat.sort_by(|&a, &b| compare_nodes(out, a, b));
        self.out.add_op(op, &flat)
    }

    fn flatten(&self, op: OpType, operands: &[NodeId]) -> Operands {
        let mut flat = Operands::new();
        for &id in operands {
            match self.out.children(id) {
                Some(inner) if self.out.get_node(id).and_then(ExprNode::op) == Some(op) => {
                    flat.extend_from_slice(inner);
                }
                _ => flat.push(id),
            }
        }
        flat
    }

    fn constant(&self, id: NodeId) -> Option<Value> {
        self.out.get_node(id).and_then(ExprNode::value)
    }

    // A folded result is kept only if it succeeded, is finite and, in the
    // exact pass, stayed exact.
    fn accept(&self, folded: Result<Value, EvalError>) -> Option<Value> {
        let value = folded.ok()?;
        let exact_enough = self.pass != Pass::SimplifyExact || value.is_exact();
        (exact_enough && value.to_f64().is_finite()).then_some(value)
    }

    fn simplify_op(&mut self, op: OpType, operands: Operands) -> Result<NodeId, BuildError> {
        match op {
            OpType::Add | OpType::Mul => self.simplify_chain(op, &operands),
            _ if operands.len() == 2 => self.simplify_binary(op, operands[0], operands[1]),
            _ if operands.len() == 1 => {
                let arg = operands[0];
                if let Some(value) = self.constant(arg) {
                    if let Some(folded) = self.accept(value.apply_unary(op)) {
                        return self.out.add_const(folded);
                    }
                }
                self.out.add_op(op, &[arg])
            }
            _ => self.out.add_op(op, &operands),
        }
    }

    fn simplify_binary(&mut self, op: OpType, a: NodeId, b: NodeId) -> Result<NodeId, BuildError> {
        let (ca, cb) = (self.constant(a), self.constant(b));
        let is = |c: Option<Value>, test: fn(&Value) -> bool| c.as_ref().is_some_and(test);

        match op {
            OpType::Sub if is(cb, Value::is_zero) => return Ok(a),
            OpType::Div if is(cb, Value::is_one) => return Ok(a),
            OpType::Div if is(ca, Value::is_zero) && !is(cb, Value::is_zero) => return Ok(a),
            OpType::Pow if is(cb, Value::is_one) => return Ok(a),
            OpType::Pow if is(cb, Value::is_zero) => return self.out.add_const(1),
            _ => {}
        }

        if let (Some(x), Some(y)) = (ca, cb) {
            if let Some(folded) = self.accept(Value::apply_binary(op, x, y)) {
                return self.out.add_const(folded);
            }
        }
        self.out.add_op(op, &[a, b])
    }

    fn simplify_chain(&mut self, op: OpType, operands: &[NodeId]) -> Result<NodeId, BuildError> {
        let identity = if op == OpType::Add { Value::Int(0) } else { Value::Int(1) };
        let is_identity = |v: &Value| if op == OpType::Add { v.is_zero() } else { v.is_one() };

        let mut terms = Operands::new();
        let mut constants: SmallVec<[Value; 4]> = SmallVec::new();
        for id in self.flatten(op, operands) {
            match self.constant(id) {
                Some(value) => constants.push(value),
                None => terms.push(id),
            }
        }

        if op == OpType::Mul {
            if let Some(zero) = constants.iter().find(|v| v.is_zero()) {
                return self.out.add_const(*zero);
            }
        }

        if self.pass == Pass::CombineLikeTerms && op == OpType::Add {
            terms = self.merge_like_terms(terms)?;
        }

        let folded = constants
            .iter()
            .try_fold(identity, |acc, &c| Value::apply_binary(op, acc, c));
        match self.accept(folded) {
            Some(total) if op == OpType::Mul && total.is_zero() => {
                return self.out.add_const(total);
            }
            Some(total) if is_identity(&total) => {}
            Some(total) => terms.push(self.out.add_const(total)?),
            None => {
                for value in constants {
                    terms.push(self.out.add_const(value)?);
                }
            }
        }

        match terms.len() {
            0 => self.out.add_const(identity),
            1 => Ok(terms[0]),
            _ => self.out.add_op(op, &terms),
        }
    }

    // Groups `k * x` and `x` terms by `x`, summing the coefficients, in
    // order of first appearance.
    fn merge_like_terms(&mut self, terms: Operands) -> Result<Operands, BuildError> {
        let mut groups: Vec<(NodeId, Value)> = Vec::with_capacity(terms.len());
        for term in terms {
            let (base, coefficient) = self.split_coefficient(term)?;
            let merged = groups
                .iter_mut()
                .find(|(b, _)| *b == base)
                .and_then(|(_, total)| total.try_add(coefficient).ok().map(|sum| *total = sum));
            if merged.is_none() {
                groups.push((base, coefficient));
            }
        }

        let mut merged = Operands::new();
        for (base, coefficient) in groups {
            if coefficient.is_zero() {
                continue;
            }
            if coefficient.is_one() {
                merged.push(base);
                continue;
            }
            let k = self.out.add_const(coefficient)?;
            merged.push(self.out.add_op(OpType::Mul, &[base, k])?);
        }
        Ok(merged)
    }

    fn split_coefficient(&mut self, term: NodeId) -> Result<(NodeId, Value), BuildError> {
        let product = match self.out.get_node(term).and_then(ExprNode::op) {
            Some(OpType::Mul) => self.out.children(term).unwrap_or_default(),
            _ => return Ok((term, Value::Int(1))),
        };

        let mut coefficient = None;
        let mut rest = Operands::new();
        for &factor in product {
            match (self.constant(factor), coefficient) {
                (Some(value), None) => coefficient = Some(value),
                _ => rest.push(factor),
            }
        }

        match (coefficient, rest.len()) {
            (Some(value), 1) => Ok((rest[0], value)),
            (Some(value), n) if n > 1 => Ok((self.out.add_op(OpType::Mul, &rest)?, value)),
            _ => Ok((term, Value::Int(1))),
        }
    }
}

impl ExprDag {
    fn rebuild(&self, pass: Pass) -> Result<ExprDag, BuildError> {
        let mut rebuilder = Rebuilder::new(self, pass);
        if let Some(root) = self.root() {
            let new_root = rebuilder.rebuild(root)?;
            rebuilder.out.set_root(new_root)?;
        }

        // Folding leaves behind operands that no longer feed the root.
        let out = if pass.folds() {
            rebuilder.out.rebuild(Pass::Compact)?
        } else {
            rebuilder.out
        };

        debug!(
            ?pass,
            before = self.len(),
            after = out.len(),
            "rebuilt expression"
        );
        Ok(out)
    }

    /// Rebuilds the expression in canonical form.
    ///
    /// Operands of `+` and `*` are flattened and sorted structurally, so
    /// structurally equivalent inputs (up to associativity and
    /// commutativity) produce identical graphs. Nothing is folded.
    ///
    /// # Errors
    ///
    /// Fails only if the rebuilt graph exceeds the configured limits.
    pub fn canonicalize(&self) -> Result<ExprDag, BuildError> {
        self.rebuild(Pass::Canonicalize)
    }

    /// Rebuilds the expression with constants folded.
    ///
    /// Applies `x + 0 = x`, `x * 1 = x`, `x * 0 = 0`, `x - 0 = x`,
    /// `x / 1 = x`, `0 / x = 0` (for `x` not the zero constant),
    /// `x ^ 1 = x`, `x ^ 0 = 1`, folds every all-constant operation, and
    /// accumulates the constants of each `+`/`*` chain into one trailing
    /// term. Non-constant operands keep their order.
    ///
    /// Operations that cannot be folded (`1 / 0`, overflowing exact
    /// arithmetic, `sqrt(-1)`) are kept as they are.
    ///
    /// # Errors
    ///
    /// Fails only if the rebuilt graph exceeds the configured limits.
    pub fn simplify(&self) -> Result<ExprDag, BuildError> {
        self.rebuild(Pass::Simplify)
    }

    /// As [`ExprDag::simplify`], but folds only where the result is exact:
    /// `sqrt(2)` or `sin(1)` stay symbolic.
    ///
    /// # Errors
    ///
    /// Fails only if the rebuilt graph exceeds the configured limits.
    pub fn simplify_exact(&self) -> Result<ExprDag, BuildError> {
        self.rebuild(Pass::SimplifyExact)
    }

    /// As [`ExprDag::simplify`], and additionally merges repeated terms of
    /// a sum: `x + 2*x + y + x` becomes `4*x + y`.
    ///
    /// # Errors
    ///
    /// Fails only if the rebuilt graph exceeds the configured limits.
    pub fn combine_like_terms(&self) -> Result<ExprDag, BuildError> {
        self.rebuild(Pass::CombineLikeTerms)
    }
}
