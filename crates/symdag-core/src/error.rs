//! Error types for parsing, building and evaluating expressions.

use symdag_graph::GraphError;
use symdag_rational::RationalError;
use thiserror::Error;

use crate::expr::{Arity, OpType};
use crate::handle::NodeId;

/// Errors from turning expression text into a DAG.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token is neither a number, an identifier, an operator nor a
    /// parenthesis.
    #[error("unknown token {0:?}")]
    UnknownToken(String),

    /// A `)` without a matching `(`, or the reverse.
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// Operators and operands do not form a single expression.
    #[error("invalid expression: {0}")]
    InvalidExpression(&'static str),

    /// Node construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors from interning nodes or rebuilding a DAG.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The id does not name a live node of this DAG.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// An operator was given the wrong number of operands.
    #[error("operator {op} expects {expected} operand(s), got {found}")]
    Arity {
        /// The operator.
        op: OpType,
        /// The operand count it accepts.
        expected: Arity,
        /// The operand count it was given.
        found: usize,
    },

    /// The new node would be nested deeper than `DagConfig::max_depth`.
    #[error("expression depth {depth} exceeds the limit of {limit}")]
    DepthExceeded {
        /// Height of the rejected node.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },

    /// The id space of this DAG is exhausted.
    #[error("node id space exhausted")]
    CapacityExceeded,

    /// The underlying graph rejected an edge.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors from evaluating an expression.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    /// The DAG has no root.
    #[error("no expression has been built")]
    EmptyExpression,

    /// A free variable has no binding and is not a named constant.
    #[error("unbound variable {0:?}")]
    UnboundVariable(String),

    /// An operation node has the wrong number of operands.
    #[error("operator {op} expects {expected} operand(s), got {found}")]
    Arity {
        /// The operator.
        op: OpType,
        /// The operand count it accepts.
        expected: Arity,
        /// The operand count it has.
        found: usize,
    },

    /// Division by an exact zero, or by `0.0` in floating mode.
    #[error("division by zero")]
    DivisionByZero,

    /// The id does not name a live node of this DAG.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The value has no rational representation.
    #[error("{0} cannot be represented as a rational")]
    NotRational(f64),

    /// Exact arithmetic left the `i64` range.
    #[error(transparent)]
    Arithmetic(RationalError),
}

impl From<RationalError> for EvalError {
    fn from(err: RationalError) -> Self {
        match err {
            RationalError::DivisionByZero => EvalError::DivisionByZero,
            other => EvalError::Arithmetic(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_division_maps_to_eval_division() {
        let err: EvalError = RationalError::DivisionByZero.into();
        assert_eq!(err, EvalError::DivisionByZero);

        let err: EvalError = RationalError::Overflow { op: "addition" }.into();
        assert!(matches!(err, EvalError::Arithmetic(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalError::UnboundVariable("x".into()).to_string(),
            "unbound variable \"x\""
        );
        assert_eq!(
            ParseError::from(BuildError::NodeNotFound(NodeId::new(3))).to_string(),
            "node node_3 not found"
        );
        let err = BuildError::Arity {
            op: OpType::Sub,
            expected: Arity::Binary,
            found: 3,
        };
        assert_eq!(err.to_string(), "operator - expects 2 operand(s), got 3");
    }
}
