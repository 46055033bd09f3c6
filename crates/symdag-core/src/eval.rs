//! Evaluation in floating and exact mode.
//!
//! Both modes walk the ordered operands from the root. Shared nodes are
//! evaluated once per path that reaches them; there is no memoization.

use rustc_hash::FxHashMap;
use symdag_rational::{Rational, RationalError};
use tracing::debug;

use crate::arena::ExprDag;
use crate::error::EvalError;
use crate::expr::{Arity, ExprNode, OpType};
use crate::handle::NodeId;
use crate::value::{named_constant, Bindings, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Every leaf is converted to a float first.
    Float,
    /// Values stay exact until an operator forces a float.
    Exact,
}

struct Evaluator<'a> {
    dag: &'a ExprDag,
    bindings: &'a Bindings,
    mode: Mode,
    visits: usize,
}

impl Evaluator<'_> {
    fn eval(&mut self, id: NodeId) -> Result<Value, EvalError> {
        self.visits += 1;
        let value = match self.dag.get_node(id) {
            None => return Err(EvalError::NodeNotFound(id)),
            Some(ExprNode::Constant(value)) => *value,
            Some(ExprNode::Variable(name)) => self.lookup(name)?,
            Some(ExprNode::Operation(op)) => return self.apply(id, *op),
        };
        Ok(match self.mode {
            Mode::Float => value.to_float(),
            Mode::Exact => value,
        })
    }

    // Named constants shadow bindings.
    fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(constant) = named_constant(name) {
            return Ok(Value::Float(constant));
        }
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.to_owned()))
    }

    fn apply(&mut self, id: NodeId, op: OpType) -> Result<Value, EvalError> {
        let dag = self.dag;
        let operands = dag.children(id).ok_or(EvalError::NodeNotFound(id))?;
        if !op.arity().accepts(operands.len()) {
            return Err(EvalError::Arity {
                op,
                expected: op.arity(),
                found: operands.len(),
            });
        }

        let first = self.eval(operands[0])?;
        if op.arity() == Arity::Unary {
            return first.apply_unary(op);
        }

        operands[1..].iter().try_fold(first, |acc, &operand| {
            let rhs = self.eval(operand)?;
            Value::apply_binary(op, acc, rhs)
        })
    }
}

impl ExprDag {
    fn evaluate(
        &self,
        id: NodeId,
        bindings: &Bindings,
        mode: Mode,
    ) -> Result<(Value, usize), EvalError> {
        let mut evaluator = Evaluator {
            dag: self,
            bindings,
            mode,
            visits: 0,
        };
        let value = evaluator.eval(id)?;
        debug!(?mode, visits = evaluator.visits, %value, "evaluated expression");
        Ok((value, evaluator.visits))
    }

    fn require_root(&self) -> Result<NodeId, EvalError> {
        self.root().ok_or(EvalError::EmptyExpression)
    }

    /// Evaluates the root in floating point.
    ///
    /// The result is always [`Value::Float`].
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::EmptyExpression`] before anything is built,
    /// [`EvalError::UnboundVariable`] for a free variable with no binding,
    /// and [`EvalError::DivisionByZero`] for a zero divisor.
    pub fn eval(&self, bindings: &Bindings) -> Result<Value, EvalError> {
        let root = self.require_root()?;
        self.evaluate(root, bindings, Mode::Float).map(|(value, _)| value)
    }

    /// Evaluates the root exactly where possible.
    ///
    /// Integers and rationals stay exact through `+ - * /`, negation,
    /// `abs` and integer powers. Float constants or bindings, named
    /// constants and transcendental operators produce floats.
    ///
    /// # Errors
    ///
    /// As [`ExprDag::eval`], plus [`EvalError::Arithmetic`] when exact
    /// arithmetic overflows.
    pub fn eval_exact(&self, bindings: &Bindings) -> Result<Value, EvalError> {
        let root = self.require_root()?;
        self.evaluate(root, bindings, Mode::Exact).map(|(value, _)| value)
    }

    /// Returns true if the sub-expression at `id` can only evaluate to an
    /// exact value, given exact bindings.
    ///
    /// That excludes float constants, named constants, transcendental
    /// operators and powers whose exponent is not an integer constant.
    #[must_use]
    pub fn is_rational_expression(&self, id: NodeId) -> bool {
        let mut memo = FxHashMap::default();
        self.rational_subtree(id, &mut memo)
    }

    fn rational_subtree(&self, id: NodeId, memo: &mut FxHashMap<NodeId, bool>) -> bool {
        if let Some(&known) = memo.get(&id) {
            return known;
        }

        let result = match self.get_node(id) {
            None => false,
            Some(ExprNode::Constant(value)) => value.is_exact(),
            Some(ExprNode::Variable(name)) => named_constant(name).is_none(),
            Some(ExprNode::Operation(op)) => {
                let operands = self.children(id).unwrap_or_default();
                let op_ok = match op {
                    OpType::Pow => operands
                        .get(1)
                        .and_then(|&exp| self.get_node(exp))
                        .and_then(ExprNode::value)
                        .is_some_and(|exp| matches!(exp, Value::Int(_))),
                    other => !other.is_transcendental(),
                };
                op_ok && operands.iter().all(|&child| self.rational_subtree(child, memo))
            }
        };

        memo.insert(id, result);
        result
    }

    /// Evaluates the root exactly and returns it as a rational.
    ///
    /// A floating result is approximated with the configured Stern–Brocot
    /// tolerances.
    ///
    /// # Errors
    ///
    /// As [`ExprDag::eval_exact`], plus [`EvalError::NotRational`] for NaN
    /// or infinite results.
    pub fn to_rational(&self, bindings: &Bindings) -> Result<Rational, EvalError> {
        let root = self.require_root()?;
        self.to_rational_at(root, bindings)
    }

    /// As [`ExprDag::to_rational`], for the sub-expression at `id`.
    ///
    /// # Errors
    ///
    /// As [`ExprDag::to_rational`].
    pub fn to_rational_at(&self, id: NodeId, bindings: &Bindings) -> Result<Rational, EvalError> {
        let (value, _) = self.evaluate(id, bindings, Mode::Exact)?;
        if let Some(exact) = value.as_rational() {
            return Ok(exact);
        }

        let x = value.to_f64();
        Rational::approximate_with(x, &self.config().approx).map_err(|err| match err {
            RationalError::NotFinite => EvalError::NotRational(x),
            other => other.into(),
        })
    }
}
